use chrono::NaiveDateTime;

use crate::eventtime::{is_actionable, parse_event_datetime};
use crate::set::RecordSet;
use crate::{PlanEntry, PlanError, ReconcilePlan};

/// Compute the reconciliation plan between the ledger and the active mirror.
///
/// Two one-directional scans, each in source-iteration order:
/// - mirror record with no ledger counterpart → cancel
/// - ledger record with no mirror counterpart → create
///
/// Past events (at or before `now`) are skipped unconditionally in both
/// directions, even when the sources disagree about them. A record whose
/// event time cannot be parsed fails the whole plan.
pub fn build_plan(
    ledger: &RecordSet,
    mirror: &RecordSet,
    now: NaiveDateTime,
) -> Result<ReconcilePlan, PlanError> {
    let mut plan = ReconcilePlan::default();

    for rec in mirror.iter() {
        let event_at = parse_record_time(rec)?;
        if !is_actionable(event_at, now) {
            continue;
        }
        if ledger.contains_key(&rec.composite_key()) {
            continue;
        }
        plan.cancels.push(PlanEntry {
            record: rec.clone(),
            event_at,
        });
    }

    for rec in ledger.iter() {
        let event_at = parse_record_time(rec)?;
        if !is_actionable(event_at, now) {
            continue;
        }
        if mirror.contains_key(&rec.composite_key()) {
            continue;
        }
        plan.creates.push(PlanEntry {
            record: rec.clone(),
            event_at,
        });
    }

    Ok(plan)
}

fn parse_record_time(rec: &ssy_schemas::BookingRecord) -> Result<NaiveDateTime, PlanError> {
    parse_event_datetime(&rec.event_date, &rec.event_time).map_err(|source| PlanError {
        key: rec.composite_key(),
        source,
    })
}
