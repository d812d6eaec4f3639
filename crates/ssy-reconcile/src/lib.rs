//! ssy-reconcile
//!
//! Reconciliation core for SeatSync.
//!
//! Architectural decisions:
//! - Two one-directional scans: ledger-but-not-mirror emits creates,
//!   mirror-but-not-ledger emits cancels
//! - Past events are immutable history, never sync targets
//! - Source iteration order is preserved; no reordering, no batching
//! - Duplicate composite keys reject the whole set
//!
//! Deterministic, pure logic. No IO. No clock reads — callers pass `now`.

mod engine;
mod eventtime;
mod set;
mod tags;
mod types;

pub use engine::build_plan;
pub use eventtime::{is_actionable, parse_event_datetime, EventTimeError};
pub use set::{DuplicateKey, RecordSet};
pub use tags::{merchant_for_event, resolve_tag, TagResolveError};
pub use types::*;
