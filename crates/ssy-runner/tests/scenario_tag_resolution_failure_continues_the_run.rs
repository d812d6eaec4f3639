use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use ssy_gateway::{BookingGateway, CreateReservation, CreatedReservation, GatewayError};
use ssy_runner::{run, RunConfig, ScriptedDecisions};
use ssy_schemas::MerchantTags;

/// The platform only defines a "Walk-in" tag for merchant m-88; merchant
/// m-77 gets the tag its mapping expects.
struct SplitTagGateway;

#[async_trait]
impl BookingGateway for SplitTagGateway {
    async fn list_reservation_tags(
        &self,
        merchant_id: &str,
    ) -> Result<MerchantTags, GatewayError> {
        let body = if merchant_id == "m-77" {
            r#"{"reservationTags": [{"id": "t-9", "name": "VIP"}]}"#
        } else {
            r#"{"reservationTags": [{"id": "t-1", "name": "Walk-in"}]}"#
        };
        Ok(serde_json::from_str(body).unwrap())
    }

    async fn create_reservation(
        &self,
        _req: &CreateReservation,
    ) -> Result<CreatedReservation, GatewayError> {
        Ok(CreatedReservation {
            id: "p-new".to_string(),
            number: 7,
        })
    }

    async fn cancel_reservation(&self, _public_id: &str) -> Result<(), GatewayError> {
        Ok(())
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 4)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn scenario_unresolvable_tag_fails_one_create_and_the_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RunConfig {
        mirror_path: write(&dir, "mirror.json", "[]"),
        // WXYZ first so a resolution failure on it must not stop ABCD.
        ledger_path: write(
            &dir,
            "ledger.csv",
            "order_num,acct_id,event_name,event_date,event_time,pax,full_name,company_name\n\
             300,A-3,WXYZ Opera,01/09/2026,19:00,2,Ria Third,\n\
             100,A-1,ABCD Gala,01/09/2026,19:00,4,Jo Client,\n",
        ),
        merchants_path: write(
            &dir,
            "merchants.json",
            r#"[
                {
                    "venue_code": "ABCD",
                    "merchant_id": "m-77",
                    "merchant_name": "The Gala Room",
                    "reservation_tag": "VIP"
                },
                {
                    "venue_code": "WXYZ",
                    "merchant_id": "m-88",
                    "merchant_name": "Opera Kitchen",
                    "reservation_tag": "Box Office"
                }
            ]"#,
        ),
        tag_cache_path: dir.path().join("tag_cache.json"),
    };

    let mut decisions = ScriptedDecisions::default();
    let summary = run(&cfg, &SplitTagGateway, &mut decisions, now())
        .await
        .unwrap();

    assert_eq!(summary.resolution_failures, 1);
    assert_eq!(summary.created, 1);
    assert_eq!(decisions.calls(), 0);

    // Only the resolvable booking reached the mirror.
    let raw = fs::read_to_string(&cfg.mirror_path).unwrap();
    assert!(raw.contains("ABCD Gala"));
    assert!(!raw.contains("WXYZ Opera"));
}
