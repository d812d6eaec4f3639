use chrono::{NaiveDate, NaiveDateTime};
use ssy_reconcile::*;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 4)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn scenario_mirror_record_absent_from_ledger_emits_one_cancel() {
    let mirror = RecordSet::from_records(vec![serde_json::from_str(
        r#"{
            "order_num": "200",
            "event_name": "WXYZ Show",
            "event_date": "15/10/2026",
            "event_time": "20:00",
            "status": "ACTIVE",
            "reservation_public_id": "p-200"
        }"#,
    )
    .unwrap()])
    .unwrap();

    let plan = build_plan(&RecordSet::empty(), &mirror, now()).unwrap();

    assert_eq!(plan.creates.len(), 0);
    assert_eq!(plan.cancels.len(), 1);
    assert_eq!(plan.cancels[0].record.composite_key(), "200WXYZ Show");
    assert_eq!(plan.cancels[0].record.public_id, "p-200");
}

#[test]
fn scenario_mirror_record_matched_by_ledger_is_not_cancelled() {
    let record: ssy_schemas::BookingRecord = serde_json::from_str(
        r#"{
            "order_num": "200",
            "event_name": "WXYZ Show",
            "event_date": "15/10/2026",
            "event_time": "20:00",
            "status": "ACTIVE"
        }"#,
    )
    .unwrap();
    let ledger = RecordSet::from_records(vec![record.clone()]).unwrap();
    let mirror = RecordSet::from_records(vec![record]).unwrap();

    let plan = build_plan(&ledger, &mirror, now()).unwrap();
    assert!(plan.is_empty());
}
