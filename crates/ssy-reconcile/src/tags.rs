//! Reservation-tag resolution.
//!
//! A merchant names the tag it expects on synced reservations; the platform
//! assigns the tag ids. Resolution joins the two through the per-run cache:
//! venue code → merchant → configured tag name → cached platform tag id.

use ssy_schemas::{MerchantMapping, TagCache, VENUE_CODE_LEN};

/// Why a tag could not be resolved for an event.
///
/// Fatal to the single create action it belongs to, never to the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagResolveError {
    /// No merchant mapping matches the event name's venue code.
    UnknownVenue { event_name: String },
    /// The cache has no entry for the merchant (it was not refreshed, or the
    /// platform returned nothing for it).
    NoTagsForMerchant { merchant_id: String },
    /// The merchant's configured tag name is absent from the platform's
    /// current tag list.
    NoMatchingTag {
        merchant_id: String,
        wanted: String,
    },
}

impl std::fmt::Display for TagResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagResolveError::UnknownVenue { event_name } => write!(
                f,
                "TAG_UNKNOWN_VENUE: no merchant mapping for event '{}'",
                event_name
            ),
            TagResolveError::NoTagsForMerchant { merchant_id } => write!(
                f,
                "TAG_CACHE_MISS: no cached tag list for merchant '{}'",
                merchant_id
            ),
            TagResolveError::NoMatchingTag {
                merchant_id,
                wanted,
            } => write!(
                f,
                "TAG_NOT_FOUND: merchant '{}' has no reservation tag named '{}'",
                merchant_id, wanted
            ),
        }
    }
}

impl std::error::Error for TagResolveError {}

/// The merchant owning an event, by venue-code prefix match.
pub fn merchant_for_event<'a>(
    event_name: &str,
    merchants: &'a [MerchantMapping],
) -> Option<&'a MerchantMapping> {
    let code = event_name.get(..VENUE_CODE_LEN).unwrap_or(event_name);
    merchants.iter().find(|m| m.venue_code == code)
}

/// Resolve the platform tag id to attach to a reservation for `event_name`.
///
/// The merchant's configured tag name is matched case-insensitively against
/// the cached platform list; the first match wins.
pub fn resolve_tag(
    event_name: &str,
    merchants: &[MerchantMapping],
    cache: &TagCache,
) -> Result<String, TagResolveError> {
    let merchant =
        merchant_for_event(event_name, merchants).ok_or_else(|| TagResolveError::UnknownVenue {
            event_name: event_name.to_string(),
        })?;

    let tags = cache
        .get(&merchant.merchant_id)
        .ok_or_else(|| TagResolveError::NoTagsForMerchant {
            merchant_id: merchant.merchant_id.clone(),
        })?;

    tags.reservation_tags
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(&merchant.reservation_tag))
        .map(|t| t.id.clone())
        .ok_or_else(|| TagResolveError::NoMatchingTag {
            merchant_id: merchant.merchant_id.clone(),
            wanted: merchant.reservation_tag.clone(),
        })
}
