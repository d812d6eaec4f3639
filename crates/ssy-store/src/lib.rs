//! ssy-store
//!
//! File IO for SeatSync: the mirror JSON export, the box-office ledger CSV,
//! the merchant mapping, and the per-run tag cache.
//!
//! The mirror and the tag cache are rewritten wholesale, never appended. The
//! mirror rewrite after every successful mutation is the recovery mechanism:
//! a crash mid-run loses at most the in-flight action.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ssy_reconcile::RecordSet;
use ssy_schemas::{BookingRecord, BookingStatus, MerchantMapping, TagCache};

/// Load the booking-platform export and index it by composite key.
///
/// Only ACTIVE records survive the load; cancelled mirror records are
/// invisible to the differ, which is what makes the cancel pass idempotent
/// across runs.
pub fn load_mirror(path: &Path) -> Result<RecordSet> {
    let raw = fs::read_to_string(path).with_context(|| format!("read mirror {:?}", path))?;
    let records: Vec<BookingRecord> =
        serde_json::from_str(&raw).with_context(|| format!("parse mirror json {:?}", path))?;

    let active: Vec<BookingRecord> = records
        .into_iter()
        .filter(|r| r.status == BookingStatus::Active)
        .collect();

    RecordSet::from_records(active).with_context(|| format!("index mirror {:?}", path))
}

/// Load the box-office ledger CSV and index it by composite key.
pub fn load_ledger(path: &Path) -> Result<RecordSet> {
    let mut rdr =
        csv::Reader::from_path(path).with_context(|| format!("open ledger csv {:?}", path))?;

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let rec: BookingRecord = row.with_context(|| format!("parse ledger row {:?}", path))?;
        records.push(rec);
    }

    RecordSet::from_records(records).with_context(|| format!("index ledger {:?}", path))
}

/// Load the venue→merchant mapping. Read-only input, loaded once per run.
pub fn load_merchants(path: &Path) -> Result<Vec<MerchantMapping>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read merchants {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parse merchants json {:?}", path))
}

/// Rewrite the mirror file from the in-memory set.
///
/// Called immediately after every successful create or cancel. Records keep
/// their in-memory order; cancelled records written here disappear on the
/// next load's ACTIVE filter.
pub fn save_mirror(path: &Path, mirror: &RecordSet) -> Result<()> {
    let json = serde_json::to_string(mirror.records()).context("serialize mirror")?;
    fs::write(path, json).with_context(|| format!("write mirror {:?}", path))
}

/// Rewrite the tag-cache file. Runs once per run, right after the refresh;
/// the file exists for operator inspection, not as a cross-run cache.
pub fn save_tag_cache(path: &Path, cache: &TagCache) -> Result<()> {
    let json = serde_json::to_string(cache).context("serialize tag cache")?;
    fs::write(path, json).with_context(|| format!("write tag cache {:?}", path))
}
