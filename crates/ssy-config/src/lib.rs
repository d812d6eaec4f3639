//! ssy-config
//!
//! Runtime credential resolution for the booking-platform gateway.
//!
//! # Contract
//! - Callers invoke [`resolve_credentials`] **once** at startup and pass the
//!   result into constructors; never scatter `std::env::var` calls across
//!   the codebase.
//! - Missing required variables fail fast, before any reconciliation work.
//! - Error messages reference the env var **NAME**, never the value.
//! - `Debug` output **redacts** credential values.

use anyhow::{bail, Result};

/// Env var holding the platform auth token. Required.
pub const AUTH_TOKEN_VAR: &str = "SSY_AUTH_TOKEN";

/// Env var holding the platform agent id. Required.
pub const AGENT_ID_VAR: &str = "SSY_AGENT_ID";

/// Env var overriding the gateway base URL. Optional.
pub const GATEWAY_URL_VAR: &str = "SSY_GATEWAY_URL";

/// Production gateway base URL, used when [`GATEWAY_URL_VAR`] is unset.
pub const DEFAULT_GATEWAY_URL: &str = "https://api.tablevine.com";

/// Gateway credentials resolved from the environment.
/// Built once at startup. **Values are redacted in `Debug` output.**
#[derive(Clone)]
pub struct Credentials {
    pub auth_token: String,
    pub agent_id: String,
    pub gateway_url: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_token", &"<REDACTED>")
            .field("agent_id", &"<REDACTED>")
            .field("gateway_url", &self.gateway_url)
            .finish()
    }
}

/// Resolve a named environment variable.
/// Returns `None` if the variable is unset or its value is blank.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve gateway credentials from the environment.
///
/// # Errors
/// Returns `Err` naming the first missing required variable. The actual
/// value is never mentioned.
pub fn resolve_credentials() -> Result<Credentials> {
    let Some(auth_token) = resolve_env(AUTH_TOKEN_VAR) else {
        bail!(
            "SECRETS_MISSING: required env var '{}' (platform auth token) is not set or empty",
            AUTH_TOKEN_VAR,
        );
    };
    let Some(agent_id) = resolve_env(AGENT_ID_VAR) else {
        bail!(
            "SECRETS_MISSING: required env var '{}' (platform agent id) is not set or empty",
            AGENT_ID_VAR,
        );
    };

    let gateway_url =
        resolve_env(GATEWAY_URL_VAR).unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());

    Ok(Credentials {
        auth_token,
        agent_id,
        gateway_url,
    })
}
