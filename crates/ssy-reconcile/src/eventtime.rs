//! Event date/time parsing and the future filter.
//!
//! Box-office exports carry free-form localized date and time text with a
//! day-before-month convention. Parsing tries a fixed format list; anything
//! that matches none of them is an error, never a guess.

use chrono::NaiveDateTime;

/// Supported `"{event_date} {event_time}"` shapes, day first.
/// More specific formats (with seconds / four-digit years) come first so a
/// match is never truncated by a looser sibling.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d-%m-%Y %I:%M %p",
    "%d.%m.%Y %H:%M",
    "%d %b %Y %H:%M",
    "%d %b %Y %I:%M %p",
    "%d %B %Y %H:%M",
    "%d %B %Y %I:%M %p",
];

/// Error for event date/time text that matches no supported format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventTimeError {
    pub raw: String,
}

impl std::fmt::Display for EventTimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EVENT_TIME_UNPARSEABLE: '{}' matches no supported day-first format",
            self.raw
        )
    }
}

impl std::error::Error for EventTimeError {}

/// Parse an event's date and time fields into a naive local timestamp.
///
/// The inputs carry no zone; they are wall-clock text in the venue's locale,
/// compared against the caller's local `now`.
pub fn parse_event_datetime(date: &str, time: &str) -> Result<NaiveDateTime, EventTimeError> {
    let raw = format!("{} {}", date.trim(), time.trim());
    for fmt in DAY_FIRST_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&raw, fmt) {
            return Ok(dt);
        }
    }
    Err(EventTimeError { raw })
}

/// Whether an event is subject to reconciliation at all.
///
/// Only strictly-future events are actionable; an event at exactly `now`
/// already counts as past.
pub fn is_actionable(event_at: NaiveDateTime, now: NaiveDateTime) -> bool {
    event_at > now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn day_comes_before_month() {
        // 08/11 is the 8th of November, not August 11.
        let parsed = parse_event_datetime("08/11/2026", "18:30").unwrap();
        assert_eq!(parsed, dt(2026, 11, 8, 18, 30));
    }

    #[test]
    fn twelve_hour_and_named_month_forms_parse() {
        assert_eq!(
            parse_event_datetime("08/11/2026", "06:30 PM").unwrap(),
            dt(2026, 11, 8, 18, 30)
        );
        assert_eq!(
            parse_event_datetime("8 Nov 2026", "18:30").unwrap(),
            dt(2026, 11, 8, 18, 30)
        );
        assert_eq!(
            parse_event_datetime("8 November 2026", "06:30 PM").unwrap(),
            dt(2026, 11, 8, 18, 30)
        );
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert_eq!(
            parse_event_datetime(" 08/11/2026 ", " 18:30 ").unwrap(),
            dt(2026, 11, 8, 18, 30)
        );
    }

    #[test]
    fn unparseable_text_is_an_error_naming_the_input() {
        let err = parse_event_datetime("next Tuesday", "evening").unwrap_err();
        assert!(err.to_string().contains("next Tuesday evening"));
    }

    #[test]
    fn exactly_now_counts_as_past() {
        let now = dt(2026, 8, 4, 12, 0);
        assert!(!is_actionable(now, now));
        assert!(!is_actionable(dt(2026, 8, 4, 11, 59), now));
        assert!(is_actionable(dt(2026, 8, 4, 12, 1), now));
    }
}
