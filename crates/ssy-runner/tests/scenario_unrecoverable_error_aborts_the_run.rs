use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use ssy_gateway::{BookingGateway, CreateReservation, CreatedReservation, GatewayError};
use ssy_runner::{run, RunConfig, ScriptedDecisions};
use ssy_schemas::MerchantTags;

/// First create succeeds, the second hits a contract violation.
#[derive(Default)]
struct BreaksOnSecondCreate {
    create_calls: AtomicUsize,
}

#[async_trait]
impl BookingGateway for BreaksOnSecondCreate {
    async fn list_reservation_tags(
        &self,
        _merchant_id: &str,
    ) -> Result<MerchantTags, GatewayError> {
        Ok(serde_json::from_str(r#"{"reservationTags": [{"id": "t-9", "name": "VIP"}]}"#).unwrap())
    }

    async fn create_reservation(
        &self,
        _req: &CreateReservation,
    ) -> Result<CreatedReservation, GatewayError> {
        match self.create_calls.fetch_add(1, Ordering::SeqCst) {
            0 => Ok(CreatedReservation {
                id: "p-first".to_string(),
                number: 1,
            }),
            _ => Err(GatewayError::Protocol {
                message: "undecodable response body".to_string(),
            }),
        }
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
async fn scenario_protocol_error_aborts_but_earlier_work_is_already_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RunConfig {
        mirror_path: write(&dir, "mirror.json", "[]"),
        ledger_path: write(
            &dir,
            "ledger.csv",
            "order_num,acct_id,event_name,event_date,event_time,pax,full_name,company_name\n\
             100,A-1,ABCD Gala,01/09/2026,19:00,4,Jo Client,\n\
             101,A-2,ABCD Gala,01/09/2026,19:00,2,Sam Guest,\n\
             102,A-3,ABCD Gala,01/09/2026,19:00,6,Ria Third,\n",
        ),
        merchants_path: write(
            &dir,
            "merchants.json",
            r#"[{
                "venue_code": "ABCD",
                "merchant_id": "m-77",
                "merchant_name": "The Gala Room",
                "reservation_tag": "VIP"
            }]"#,
        ),
        tag_cache_path: dir.path().join("tag_cache.json"),
    };

    let gateway = BreaksOnSecondCreate::default();
    let mut decisions = ScriptedDecisions::default();
    let err = run(&cfg, &gateway, &mut decisions, now()).await.unwrap_err();

    // The error surfaces with the failing booking's key; the operator loop
    // was never consulted; the third action never ran.
    assert!(format!("{:#}", err).contains("101ABCD Gala"));
    assert!(format!("{:#}", err).contains("GATEWAY_PROTOCOL"));
    assert_eq!(decisions.calls(), 0);
    assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 2);

    // Persist-per-mutation: the first create survives the abort on disk.
    let raw = fs::read_to_string(&cfg.mirror_path).unwrap();
    assert!(raw.contains("p-first"));
    assert!(!raw.contains("\"order_num\":\"101\""));
}
