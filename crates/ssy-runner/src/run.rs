//! Plan execution against the booking gateway.
//!
//! Ordering and recovery contract:
//! - Cancels first, then creates, each in source-iteration order.
//! - The mirror file is rewritten immediately after every successful
//!   mutation; a crash loses at most the in-flight action.
//! - Tag/party-size resolution failures are fatal to their single create,
//!   never to the run.
//! - Recoverable gateway failures go to the decision source; skip-all is
//!   run-scoped state on the runner, set once and never prompted again.
//! - Unrecoverable gateway failures abort the run with context.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use ssy_gateway::{BookingGateway, CreateReservation, GatewayError};
use ssy_reconcile::{build_plan, merchant_for_event, resolve_tag, PlanEntry, RecordSet};
use ssy_schemas::{BookingRecord, BookingStatus, MerchantMapping, TagCache};

use crate::decision::{ActionFailure, ActionKind, DecisionSource, Directive};
use crate::identity;

/// Input/output file locations for one run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub mirror_path: PathBuf,
    pub ledger_path: PathBuf,
    pub merchants_path: PathBuf,
    pub tag_cache_path: PathBuf,
}

/// What one run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub created: usize,
    pub cancelled: usize,
    /// Actions abandoned on operator direction (skip or skip-all).
    pub skipped: usize,
    /// Creates dropped because no tag/merchant/party size could be resolved.
    pub resolution_failures: usize,
}

/// One full reconciliation pass: load, refresh tags, plan, execute.
///
/// `now` is injected so tests can pin the future/past boundary.
pub async fn run<G, D>(
    cfg: &RunConfig,
    gateway: &G,
    decisions: &mut D,
    now: NaiveDateTime,
) -> Result<RunSummary>
where
    G: BookingGateway,
    D: DecisionSource,
{
    let mut mirror = ssy_store::load_mirror(&cfg.mirror_path)?;
    let ledger = ssy_store::load_ledger(&cfg.ledger_path)?;
    let merchants = ssy_store::load_merchants(&cfg.merchants_path)?;

    let cache = refresh_tag_cache(gateway, &merchants, &cfg.tag_cache_path).await?;
    let plan = build_plan(&ledger, &mirror, now)?;
    info!(
        "plan: {} cancels, {} creates",
        plan.cancels.len(),
        plan.creates.len()
    );

    let runner = PlanRunner {
        gateway,
        decisions,
        merchants: &merchants,
        cache: &cache,
        mirror_path: &cfg.mirror_path,
        skip_all: false,
        summary: RunSummary::default(),
    };
    runner.execute(&plan, &mut mirror).await
}

/// Query the platform for every mapped merchant's current tags and rewrite
/// the cache file. Tag ids are platform-assigned and may have changed since
/// the last run, so nothing stale is ever reused.
///
/// A gateway failure here aborts the run: without fresh tags no create can
/// be resolved, and the operator retry loop only covers per-booking actions.
pub async fn refresh_tag_cache<G: BookingGateway>(
    gateway: &G,
    merchants: &[MerchantMapping],
    cache_path: &Path,
) -> Result<TagCache> {
    info!(
        "START:    refreshing reservation tags for {} merchants",
        merchants.len()
    );
    let mut cache = TagCache::new();
    for merchant in merchants {
        let tags = gateway
            .list_reservation_tags(&merchant.merchant_id)
            .await
            .with_context(|| {
                format!(
                    "list reservation tags for merchant '{}'",
                    merchant.merchant_id
                )
            })?;
        cache.insert(merchant.merchant_id.clone(), tags);
    }
    ssy_store::save_tag_cache(cache_path, &cache)?;
    info!("FINISHED: refreshing reservation tags");
    Ok(cache)
}

struct PlanRunner<'a, G, D>
where
    G: BookingGateway,
    D: DecisionSource,
{
    gateway: &'a G,
    decisions: &'a mut D,
    merchants: &'a [MerchantMapping],
    cache: &'a TagCache,
    mirror_path: &'a Path,
    /// Run-scoped: once set by a SkipAll directive, every later recoverable
    /// failure is skipped without prompting.
    skip_all: bool,
    summary: RunSummary,
}

impl<G, D> PlanRunner<'_, G, D>
where
    G: BookingGateway,
    D: DecisionSource,
{
    async fn execute(
        mut self,
        plan: &ssy_reconcile::ReconcilePlan,
        mirror: &mut RecordSet,
    ) -> Result<RunSummary> {
        info!("START:    cancelling bookings in the mirror but absent from the ledger");
        let mut banner = EventBanner::default();
        for entry in &plan.cancels {
            banner.on_event(&entry.record.event_name);
            self.cancel_one(entry, mirror).await?;
        }
        info!("FINISHED: cancelling bookings in the mirror but absent from the ledger");

        info!("START:    creating bookings in the ledger but absent from the mirror");
        let mut banner = EventBanner::default();
        for entry in &plan.creates {
            banner.on_event(&entry.record.event_name);
            self.create_one(entry, mirror).await?;
        }
        info!("FINISHED: creating bookings in the ledger but absent from the mirror");

        Ok(self.summary)
    }

    async fn create_one(&mut self, entry: &PlanEntry, mirror: &mut RecordSet) -> Result<()> {
        let rec = &entry.record;

        let Some(merchant) = merchant_for_event(&rec.event_name, self.merchants) else {
            warn!(
                "SKIPPED  {}: no merchant mapping for venue code '{}'",
                rec.composite_key(),
                rec.venue_code()
            );
            self.summary.resolution_failures += 1;
            return Ok(());
        };

        let tag_id = match resolve_tag(&rec.event_name, self.merchants, self.cache) {
            Ok(id) => id,
            Err(e) => {
                warn!("SKIPPED  {}: {}", rec.composite_key(), e);
                self.summary.resolution_failures += 1;
                return Ok(());
            }
        };

        let capacity: u32 = match rec.party_size.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                warn!(
                    "SKIPPED  {}: party size '{}' is not a number",
                    rec.composite_key(),
                    rec.party_size
                );
                self.summary.resolution_failures += 1;
                return Ok(());
            }
        };

        let req = CreateReservation {
            merchant_id: merchant.merchant_id.clone(),
            capacity,
            event_at: entry.event_at,
            customer: identity::customer_identity(rec),
            extra_info: trace_metadata(rec),
            tag_ids: vec![tag_id],
        };

        loop {
            match self.gateway.create_reservation(&req).await {
                Ok(created) => {
                    let mut updated = rec.clone();
                    updated.public_id = created.id.clone();
                    updated.display_number = created.number.to_string();
                    updated.status = BookingStatus::Active;
                    mirror.upsert(updated);
                    ssy_store::save_mirror(self.mirror_path, mirror)?;
                    info!(
                        "SUCCESS  booking ({}) created for ({}, {})",
                        created.id, rec.order_number, rec.account_id
                    );
                    self.summary.created += 1;
                    return Ok(());
                }
                Err(e) if e.is_recoverable() => {
                    if !self.handle_recoverable(ActionKind::Create, &e, rec, merchant, entry) {
                        return Ok(());
                    }
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("create reservation {}", rec.composite_key()));
                }
            }
        }
    }

    async fn cancel_one(&mut self, entry: &PlanEntry, mirror: &mut RecordSet) -> Result<()> {
        let rec = &entry.record;
        let key = rec.composite_key();

        loop {
            match self.gateway.cancel_reservation(&rec.public_id).await {
                Ok(()) => {
                    if let Some(stored) = mirror.get_mut(&key) {
                        stored.status = BookingStatus::Cancelled;
                    }
                    ssy_store::save_mirror(self.mirror_path, mirror)?;
                    info!("SUCCESS  booking ({}) cancelled", rec.public_id);
                    self.summary.cancelled += 1;
                    return Ok(());
                }
                Err(e) if e.is_recoverable() => {
                    let merchant = merchant_for_event(&rec.event_name, self.merchants);
                    if !self.handle_recoverable_named(
                        ActionKind::Cancel,
                        &e,
                        rec,
                        merchant.map(|m| m.merchant_name.as_str()).unwrap_or(""),
                        entry,
                    ) {
                        return Ok(());
                    }
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("cancel reservation {}", key));
                }
            }
        }
    }

    /// Route one recoverable failure. Returns `true` to retry the action,
    /// `false` to move on.
    fn handle_recoverable(
        &mut self,
        kind: ActionKind,
        error: &GatewayError,
        rec: &BookingRecord,
        merchant: &MerchantMapping,
        entry: &PlanEntry,
    ) -> bool {
        self.handle_recoverable_named(kind, error, rec, &merchant.merchant_name, entry)
    }

    fn handle_recoverable_named(
        &mut self,
        kind: ActionKind,
        error: &GatewayError,
        rec: &BookingRecord,
        merchant_name: &str,
        entry: &PlanEntry,
    ) -> bool {
        if self.skip_all {
            debug!(
                "skip-all in effect, dropping failed {} for {}",
                kind.as_str(),
                rec.composite_key()
            );
            self.summary.skipped += 1;
            return false;
        }

        warn!("FAILURE  {} {}: {}", kind.as_str(), rec.composite_key(), error);
        let failure = ActionFailure::new(kind, error, rec, merchant_name, entry.event_at);
        match self.decisions.decide(&failure) {
            Directive::Retry => true,
            Directive::Skip => {
                self.summary.skipped += 1;
                false
            }
            Directive::SkipAll => {
                self.skip_all = true;
                self.summary.skipped += 1;
                false
            }
        }
    }
}

/// Traceability metadata echoed into the platform record, so a reservation
/// can always be joined back to its box-office origin.
fn trace_metadata(rec: &BookingRecord) -> String {
    serde_json::json!({
        "box_office": {
            "order_num": rec.order_number,
            "acct_id": rec.account_id,
            "event_name": rec.event_name,
        }
    })
    .to_string()
}

/// Per-event separator banners for operator-readable progress, driven by the
/// ledger's natural event grouping. Cosmetic only.
#[derive(Default)]
struct EventBanner {
    current: Option<String>,
}

impl EventBanner {
    fn on_event(&mut self, event_name: &str) {
        if self.current.as_deref() != Some(event_name) {
            self.current = Some(event_name.to_string());
            info!("--------------------{}--------------------", event_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_metadata_echoes_the_ledger_identity() {
        let rec: BookingRecord = serde_json::from_str(
            r#"{"order_num": "100", "acct_id": "A-1", "event_name": "ABCD Gala"}"#,
        )
        .unwrap();
        let meta: serde_json::Value = serde_json::from_str(&trace_metadata(&rec)).unwrap();
        assert_eq!(meta["box_office"]["order_num"], "100");
        assert_eq!(meta["box_office"]["acct_id"], "A-1");
        assert_eq!(meta["box_office"]["event_name"], "ABCD Gala");
    }
}
