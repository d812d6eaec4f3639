//! ssy-gateway
//!
//! HTTP client for the booking platform — the single choke-point for all
//! platform operations (list reservation tags, create a reservation, cancel
//! a reservation).
//!
//! # Error classification
//!
//! The runner's failure routing depends on a hard split:
//! - **Recoverable** — the platform rejected the request (any non-success
//!   status, e.g. a capacity conflict) or the transport failed. These reach
//!   the operator, who can fix the table layout and retry.
//! - **Unrecoverable** — the platform answered with something this client
//!   cannot decode. Retrying cannot help; the run aborts.
//!
//! Auth is a token + agent-id header pair on every request; values come from
//! process configuration and are never logged.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ssy_schemas::MerchantTags;

/// Wire format for reservation date-times. The platform localizes; we send
/// the venue's wall-clock time unzoned.
const DATETIME_WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A failed gateway operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayError {
    /// The platform refused the request. Carries the HTTP status and the
    /// response body's message so the operator sees what the platform said.
    Rejected { status: u16, message: String },
    /// The request never completed (connect failure, broken transfer).
    Transport { message: String },
    /// The platform answered but the response violates the contract
    /// (undecodable body). Not retryable.
    Protocol { message: String },
}

impl GatewayError {
    /// Whether the operator retry loop applies. Rejections and transport
    /// failures are transient from the run's point of view; contract
    /// violations are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GatewayError::Protocol { .. })
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Rejected { status, message } => {
                write!(f, "GATEWAY_REJECTED status={} message={}", status, message)
            }
            GatewayError::Transport { message } => {
                write!(f, "GATEWAY_TRANSPORT {}", message)
            }
            GatewayError::Protocol { message } => {
                write!(f, "GATEWAY_PROTOCOL {}", message)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Customer identity attached to a created reservation. The email is
/// synthesized deterministically by the runner, never collected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomerIdentity {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

/// One reservation-creation request.
#[derive(Clone, Debug, PartialEq)]
pub struct CreateReservation {
    pub merchant_id: String,
    pub capacity: u32,
    pub event_at: NaiveDateTime,
    pub customer: CustomerIdentity,
    /// Free-form traceability metadata echoed back by the platform.
    pub extra_info: String,
    pub tag_ids: Vec<String>,
}

/// Platform-assigned identifiers for a created reservation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedReservation {
    /// Public reservation id, used for later cancellation.
    pub id: String,
    /// Human-facing reservation number.
    pub number: i64,
}

#[derive(Serialize)]
struct CreateReservationBody<'a> {
    #[serde(rename = "merchantId")]
    merchant_id: &'a str,
    capacity: u32,
    #[serde(rename = "dateTime")]
    date_time: String,
    customer: &'a CustomerIdentity,
    #[serde(rename = "extraInfo")]
    extra_info: &'a str,
    #[serde(rename = "reservationTags")]
    reservation_tags: &'a [String],
}

#[derive(Serialize)]
struct CancelBody {
    status: &'static str,
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

/// The three platform operations the reconciliation run consumes.
///
/// The runner is generic over this trait; scenario tests drive it with
/// scripted in-memory doubles instead of HTTP.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// The merchant's currently defined reservation tags.
    async fn list_reservation_tags(&self, merchant_id: &str)
        -> Result<MerchantTags, GatewayError>;

    /// Create a reservation; returns the platform-assigned identifiers.
    async fn create_reservation(
        &self,
        req: &CreateReservation,
    ) -> Result<CreatedReservation, GatewayError>;

    /// Cancel a reservation by its public id. Idempotent on the platform
    /// side; a second cancel of the same id is still a success.
    async fn cancel_reservation(&self, public_id: &str) -> Result<(), GatewayError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// reqwest-backed gateway. Base URL is overridable so tests can point it at
/// a local mock server.
#[derive(Clone)]
pub struct HttpBookingGateway {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
    agent_id: String,
}

impl std::fmt::Debug for HttpBookingGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print credentials.
        f.debug_struct("HttpBookingGateway")
            .field("base_url", &self.base_url)
            .field("auth_token", &"<REDACTED>")
            .field("agent_id", &"<REDACTED>")
            .finish()
    }
}

impl HttpBookingGateway {
    pub fn new(base_url: impl Into<String>, auth_token: String, agent_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            auth_token,
            agent_id,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-Auth-Token", &self.auth_token)
            .header("X-Agent-Id", &self.agent_id)
    }

    /// Map a completed HTTP exchange to the gateway error taxonomy and
    /// decode the success body.
    async fn decode<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| GatewayError::Transport {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Protocol {
            message: format!("undecodable response body: {}", e),
        })
    }

    async fn expect_success(resp: reqwest::Response) -> Result<(), GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(GatewayError::Rejected {
            status: status.as_u16(),
            message: body.trim().to_string(),
        })
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport {
        message: e.to_string(),
    }
}

#[async_trait]
impl BookingGateway for HttpBookingGateway {
    async fn list_reservation_tags(
        &self,
        merchant_id: &str,
    ) -> Result<MerchantTags, GatewayError> {
        let url = self.url(&format!("/v1/merchants/{}/reservation-tags", merchant_id));
        let resp = self
            .with_auth(self.http.get(url))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(resp).await
    }

    async fn create_reservation(
        &self,
        req: &CreateReservation,
    ) -> Result<CreatedReservation, GatewayError> {
        let body = CreateReservationBody {
            merchant_id: &req.merchant_id,
            capacity: req.capacity,
            date_time: req.event_at.format(DATETIME_WIRE_FORMAT).to_string(),
            customer: &req.customer,
            extra_info: &req.extra_info,
            reservation_tags: &req.tag_ids,
        };

        let resp = self
            .with_auth(self.http.put(self.url("/v1/reservations")))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(resp).await
    }

    async fn cancel_reservation(&self, public_id: &str) -> Result<(), GatewayError> {
        let url = self.url(&format!("/v1/reservations/{}", public_id));
        let resp = self
            .with_auth(self.http.patch(url))
            .json(&CancelBody { status: "CANCELED" })
            .send()
            .await
            .map_err(transport)?;
        Self::expect_success(resp).await
    }
}

// ---------------------------------------------------------------------------
// Tests (mock server, no real network)
// ---------------------------------------------------------------------------
