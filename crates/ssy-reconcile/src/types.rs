use chrono::NaiveDateTime;

use ssy_schemas::BookingRecord;

use crate::eventtime::EventTimeError;

/// One planned action: the source record plus its already-parsed event time
/// (parsed once during planning, reused at submission).
#[derive(Clone, Debug, PartialEq)]
pub struct PlanEntry {
    pub record: BookingRecord,
    pub event_at: NaiveDateTime,
}

/// The full reconciliation plan for one run.
///
/// Cancels execute before creates, each in source-iteration order. The two
/// sets are disjoint by construction (a key can be missing from at most one
/// side), so execution order between them is cosmetic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Mirror ACTIVE records for future events with no ledger counterpart.
    pub cancels: Vec<PlanEntry>,
    /// Ledger records for future events with no active mirror counterpart.
    pub creates: Vec<PlanEntry>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.cancels.is_empty() && self.creates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cancels.len() + self.creates.len()
    }
}

/// Planning failure: a record whose event time cannot be parsed.
///
/// Pastness cannot be established for such a record, so the run aborts
/// rather than guessing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanError {
    pub key: String,
    pub source: EventTimeError,
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PLAN_REJECTED key='{}': {}", self.key, self.source)
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
