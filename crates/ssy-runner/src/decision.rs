//! Operator decision plumbing.
//!
//! The runner never touches stdin. When an action fails recoverably it
//! builds an [`ActionFailure`] and asks the injected [`DecisionSource`] what
//! to do; the CLI answers from the console, scenario tests from a script.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use ssy_schemas::BookingRecord;

/// Which half of the reconciliation the failing action belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Cancel,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Cancel => "cancel",
        }
    }
}

/// A recoverable action failure, carrying the human-identifying booking
/// details the operator needs to resolve the conflict out-of-band
/// (rearrange tables, add combos) before answering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionFailure {
    pub kind: ActionKind,
    /// Rendered gateway error.
    pub error: String,
    /// "{company} {name}", trimmed when the company is absent.
    pub customer: String,
    pub party_size: String,
    pub merchant_name: String,
    /// Event time in operator-friendly form.
    pub event_at: String,
}

impl ActionFailure {
    pub fn new(
        kind: ActionKind,
        error: &dyn std::fmt::Display,
        record: &BookingRecord,
        merchant_name: &str,
        event_at: NaiveDateTime,
    ) -> Self {
        Self {
            kind,
            error: error.to_string(),
            customer: format!("{} {}", record.company_name, record.full_name)
                .trim()
                .to_string(),
            party_size: record.party_size.clone(),
            merchant_name: merchant_name.to_string(),
            event_at: event_at.format("%H:%M on %A %d %B %Y").to_string(),
        }
    }
}

/// What the operator chose to do about a recoverable failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    /// Try the same action again immediately.
    Retry,
    /// Abandon this one action.
    Skip,
    /// Abandon this action and silently skip every later recoverable
    /// failure for the rest of the run.
    SkipAll,
}

impl Directive {
    /// Parse free operator input, case-insensitively. Anything that is not
    /// `skip` or `skipall` (including plain ENTER) means retry.
    pub fn parse(input: &str) -> Directive {
        match input.trim().to_ascii_uppercase().as_str() {
            "SKIP" => Directive::Skip,
            "SKIPALL" => Directive::SkipAll,
            _ => Directive::Retry,
        }
    }
}

/// Source of operator directives. The CLI implements this over the console;
/// tests substitute a scripted source.
pub trait DecisionSource {
    fn decide(&mut self, failure: &ActionFailure) -> Directive;
}

/// Pre-scripted decision source for scenario tests. Answers in order and
/// falls back to [`Directive::Skip`] when the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    queue: VecDeque<Directive>,
    calls: usize,
}

impl ScriptedDecisions {
    pub fn new(directives: impl IntoIterator<Item = Directive>) -> Self {
        Self {
            queue: directives.into_iter().collect(),
            calls: 0,
        }
    }

    /// How many times the runner actually asked for a decision.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl DecisionSource for ScriptedDecisions {
    fn decide(&mut self, _failure: &ActionFailure) -> Directive {
        self.calls += 1;
        self.queue.pop_front().unwrap_or(Directive::Skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_parse_is_case_insensitive_and_defaults_to_retry() {
        assert_eq!(Directive::parse("skip"), Directive::Skip);
        assert_eq!(Directive::parse("SKIP"), Directive::Skip);
        assert_eq!(Directive::parse(" SkipAll "), Directive::SkipAll);
        assert_eq!(Directive::parse(""), Directive::Retry);
        assert_eq!(Directive::parse("retry"), Directive::Retry);
        assert_eq!(Directive::parse("anything else"), Directive::Retry);
    }

    #[test]
    fn failure_customer_line_omits_an_absent_company() {
        let record: BookingRecord = serde_json::from_str(
            r#"{"order_num": "1", "event_name": "ABCD Gala", "full_name": "Jo Client", "pax": "4"}"#,
        )
        .unwrap();
        let event_at = chrono::NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();

        let failure = ActionFailure::new(
            ActionKind::Create,
            &"boom",
            &record,
            "The Gala Room",
            event_at,
        );
        assert_eq!(failure.customer, "Jo Client");
        assert_eq!(failure.event_at, "19:00 on Tuesday 01 September 2026");
    }
}
