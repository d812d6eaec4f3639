use chrono::{NaiveDate, NaiveDateTime};
use ssy_reconcile::*;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 4)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn scenario_ledger_record_absent_from_mirror_emits_one_create() {
    let ledger = RecordSet::from_records(vec![serde_json::from_str(
        r#"{
            "order_num": "100",
            "acct_id": "A-1",
            "event_name": "ABCD Gala",
            "event_date": "01/09/2026",
            "event_time": "19:00",
            "pax": "4",
            "full_name": "Jo Client"
        }"#,
    )
    .unwrap()])
    .unwrap();

    let plan = build_plan(&ledger, &RecordSet::empty(), now()).unwrap();

    assert_eq!(plan.cancels.len(), 0);
    assert_eq!(plan.creates.len(), 1);
    assert_eq!(plan.creates[0].record.composite_key(), "100ABCD Gala");
}
