use thiserror::Error;

/// Top-level error type for the `pihole-api` crate.
///
/// Covers every failure mode a get/set call can hit: authentication,
/// transport, and response classification. Session persistence failures
/// are deliberately absent -- they are logged and swallowed inside the
/// client and never reach the caller. `pihole-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The appliance reported no valid session and no password is configured.
    #[error("Auth is required")]
    AuthRequired,

    /// The password was submitted but the appliance still reports an
    /// invalid session.
    #[error("Auth not valid: {message}")]
    AuthRejected { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Response classification ─────────────────────────────────────
    /// The body was not JSON, or was JSON but not an object.
    #[error("Invalid response: {preview}")]
    InvalidResponse { preview: String },

    /// The body carried an `error` object.
    #[error("Api error: {key}: {message}")]
    Api { key: String, message: String },

    /// JSON object of the wrong shape, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` for the two terminal auth failures.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired | Self::AuthRejected { .. })
    }

    /// Returns `true` if this is a transient error worth retrying on a
    /// later call.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// First 200 bytes of a body, cut on a char boundary.
pub(crate) fn preview(body: &str) -> String {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_owned()
}
