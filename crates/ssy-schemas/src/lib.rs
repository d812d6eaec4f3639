//! ssy-schemas
//!
//! Shared wire data model for SeatSync: booking records as they appear in the
//! mirror export and the box-office ledger, the venue→merchant mapping, and
//! the per-merchant reservation-tag cache.
//!
//! Everything on the wire is a string. Sources routinely omit or null fields,
//! so every optional field deserializes null/absent to `""` — downstream key
//! concatenation and comparison never deal with absence.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Number of leading event-name characters that encode the owning venue.
pub const VENUE_CODE_LEN: usize = 4;

fn null_to_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Reservation status as stored in the mirror export.
///
/// Ledger rows carry no status column; they default to `Unknown`, which is
/// never persisted (only mirror records are written back, and those are
/// always `Active` or `Cancelled`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Active,
    Cancelled,
    #[default]
    Unknown,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "ACTIVE",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for BookingStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ACTIVE" => BookingStatus::Active,
            "CANCELLED" => BookingStatus::Cancelled,
            _ => BookingStatus::Unknown,
        }
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        status.as_str().to_string()
    }
}

/// One reservation as described by either source.
///
/// The serde names are the wire names shared by the mirror JSON export and
/// the ledger CSV header. Platform-assigned fields (`reservation_public_id`,
/// `reservation_id`, `status`) exist only on mirror records and default to
/// empty/`Unknown` when loading the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(rename = "order_num", deserialize_with = "null_to_empty")]
    pub order_number: String,

    #[serde(rename = "acct_id", default, deserialize_with = "null_to_empty")]
    pub account_id: String,

    #[serde(rename = "event_name", deserialize_with = "null_to_empty")]
    pub event_name: String,

    #[serde(rename = "event_date", default, deserialize_with = "null_to_empty")]
    pub event_date: String,

    #[serde(rename = "event_time", default, deserialize_with = "null_to_empty")]
    pub event_time: String,

    /// Party size. Kept as the source string; parsed only at submission time.
    #[serde(rename = "pax", default, deserialize_with = "null_to_empty")]
    pub party_size: String,

    #[serde(rename = "full_name", default, deserialize_with = "null_to_empty")]
    pub full_name: String,

    #[serde(rename = "company_name", default, deserialize_with = "null_to_empty")]
    pub company_name: String,

    #[serde(default)]
    pub status: BookingStatus,

    /// Platform-assigned public reservation id, once created.
    #[serde(
        rename = "reservation_public_id",
        default,
        deserialize_with = "null_to_empty"
    )]
    pub public_id: String,

    /// Platform-assigned human-facing reservation number, once created.
    #[serde(rename = "reservation_id", default, deserialize_with = "null_to_empty")]
    pub display_number: String,
}

impl BookingRecord {
    /// Composite identity key: order number ++ event name.
    ///
    /// Unique within each source's active set; the join key between sources.
    pub fn composite_key(&self) -> String {
        format!("{}{}", self.order_number, self.event_name)
    }

    /// The venue code encoded in the event name's leading characters.
    /// Short event names yield the whole name.
    pub fn venue_code(&self) -> &str {
        self.event_name.get(..VENUE_CODE_LEN).unwrap_or(&self.event_name)
    }
}

/// One venue→merchant mapping row. Loaded once per run, read-only after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantMapping {
    #[serde(deserialize_with = "null_to_empty")]
    pub venue_code: String,

    #[serde(deserialize_with = "null_to_empty")]
    pub merchant_id: String,

    #[serde(default, deserialize_with = "null_to_empty")]
    pub merchant_name: String,

    /// The tag name this merchant expects on synced reservations. Matched
    /// case-insensitively against the platform's current tag list.
    #[serde(default, deserialize_with = "null_to_empty")]
    pub reservation_tag: String,
}

/// One reservation tag as defined on the platform. Tag ids are
/// platform-assigned and may change between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationTag {
    pub id: String,
    pub name: String,
}

/// The platform's current tag list for one merchant, cached verbatim in the
/// shape the gateway returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantTags {
    #[serde(rename = "reservationTags", default)]
    pub reservation_tags: Vec<ReservationTag>,
}

/// Per-run tag cache: merchant id → current platform tag list.
/// Rebuilt at the start of every run; never trusted across runs.
pub type TagCache = BTreeMap<String, MerchantTags>;
