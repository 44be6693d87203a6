// ── Core error types ──
//
// User-facing errors from pihole-core. Consumers never see HTTP or JSON
// failures directly; `CoreError::from_api` translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the accessory layer.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to Pi-hole at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Pi-hole did not answer within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Authentication errors ────────────────────────────────────────
    #[error("Pi-hole requires a password but none is configured")]
    AuthenticationRequired,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Protocol errors ──────────────────────────────────────────────
    #[error("Pi-hole API error: {message}")]
    Protocol {
        message: String,
        /// The appliance's error key (e.g. `unauthorized`), when it sent one.
        key: Option<String>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Translate a client error. `timeout_secs` is the configured request
    /// timeout, reported back when the request timed out.
    pub fn from_api(err: pihole_api::Error, timeout_secs: u64) -> Self {
        match err {
            pihole_api::Error::AuthRequired => Self::AuthenticationRequired,
            pihole_api::Error::AuthRejected { message } => Self::AuthenticationFailed { message },
            pihole_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout { timeout_secs }
                } else {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            pihole_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("invalid URL: {e}"),
            },
            pihole_api::Error::Tls(reason) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            pihole_api::Error::InvalidResponse { preview } => Self::Protocol {
                message: format!("Invalid response: {preview}"),
                key: None,
            },
            pihole_api::Error::Api { key, message } => Self::Protocol {
                message: format!("Api error: {message}"),
                key: Some(key),
            },
            pihole_api::Error::Deserialization { message, .. } => Self::Protocol {
                message: format!("unexpected response shape: {message}"),
                key: None,
            },
        }
    }

    /// Returns `true` for failures a later call may not hit again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}
