use std::collections::BTreeMap;

use ssy_schemas::BookingRecord;

/// Error returned when a source contains two records with the same composite
/// key. Silently dropping either record is forbidden, so the whole set is
/// rejected and the operator has to fix the export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateKey {
    pub key: String,
}

impl std::fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DUPLICATE_KEY: composite key '{}' appears more than once in one source",
            self.key
        )
    }
}

impl std::error::Error for DuplicateKey {}

/// An order-preserving collection of booking records indexed by composite key.
///
/// Iteration follows source order (the ledger's natural grouping by event is
/// what the progress banners rely on); membership tests and upserts go
/// through the key index.
#[derive(Clone, Debug, Default)]
pub struct RecordSet {
    records: Vec<BookingRecord>,
    index: BTreeMap<String, usize>,
}

impl RecordSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from records in source order.
    /// Fails on the first duplicated composite key.
    pub fn from_records(records: Vec<BookingRecord>) -> Result<Self, DuplicateKey> {
        let mut set = Self::empty();
        for rec in records {
            let key = rec.composite_key();
            if set.index.contains_key(&key) {
                return Err(DuplicateKey { key });
            }
            set.index.insert(key, set.records.len());
            set.records.push(rec);
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&BookingRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut BookingRecord> {
        self.index.get(key).map(|&i| &mut self.records[i])
    }

    /// Insert or replace by composite key. A replaced record keeps its
    /// original position; a new record appends.
    pub fn upsert(&mut self, rec: BookingRecord) {
        let key = rec.composite_key();
        match self.index.get(&key) {
            Some(&i) => self.records[i] = rec,
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(rec);
            }
        }
    }

    /// Records in source order, for iteration and persistence.
    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BookingRecord> {
        self.records.iter()
    }
}
