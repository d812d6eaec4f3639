//! Deterministic customer identity synthesis.
//!
//! The platform requires a customer on every reservation, but the box office
//! never exports contact details. The email address is derived from stable
//! record fields so that re-running the job reproduces the same identity
//! instead of minting a new customer per attempt.

use ssy_gateway::CustomerIdentity;
use ssy_schemas::BookingRecord;

/// Fixed domain for synthesized addresses. Nothing is ever delivered there.
pub const EMAIL_DOMAIN: &str = "ssorder.com";

/// Fixed placeholder that passes the platform's phone validation.
const PHONE_PLACEHOLDER: &str = "466920029";

/// Synthesize the deterministic address for a booking.
///
/// order number ++ full name ++ (company name, or the full name again when
/// the company is empty), spaces to `_`, everything outside `[0-9A-Za-z_]`
/// stripped, then `@` and the fixed domain.
pub fn synthesize_email(order_number: &str, full_name: &str, company_name: &str) -> String {
    let surname = if company_name.is_empty() {
        full_name
    } else {
        company_name
    };

    let local: String = format!("{}{}{}", order_number, full_name, surname)
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    format!("{}@{}", local, EMAIL_DOMAIN)
}

/// The full customer identity submitted with a creation request. The company
/// name stands in as the surname when present, mirroring how the box office
/// labels corporate bookings.
pub fn customer_identity(record: &BookingRecord) -> CustomerIdentity {
    let last_name = if record.company_name.is_empty() {
        record.full_name.clone()
    } else {
        record.company_name.clone()
    };

    CustomerIdentity {
        first_name: record.full_name.clone(),
        last_name,
        email: synthesize_email(&record.order_number, &record.full_name, &record.company_name),
        phone_number: PHONE_PLACEHOLDER.to_string(),
    }
}
