//! ssy-runner
//!
//! Reconciliation driver for SeatSync: executes a plan from `ssy-reconcile`
//! against a `ssy-gateway` implementation, persisting the mirror after every
//! successful mutation.
//!
//! The driver owns no interactive IO. Recoverable failures surface through
//! the [`DecisionSource`] seam; the CLI implements it over the console and
//! scenario tests script it.

mod decision;
mod identity;
mod run;

pub use decision::{ActionFailure, ActionKind, DecisionSource, Directive, ScriptedDecisions};
pub use identity::{customer_identity, synthesize_email, EMAIL_DOMAIN};
pub use run::{refresh_tag_cache, run, RunConfig, RunSummary};
