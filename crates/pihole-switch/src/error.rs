//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use pihole_config::ConfigError;
use pihole_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Pi-hole at {url}")]
    #[diagnostic(
        code(pihole::connection_failed),
        help(
            "Check that the appliance is running and reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try: pihole-switch status --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(pihole::timeout),
        help("Increase the timeout with --timeout or check the appliance's load.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Pi-hole requires a password")]
    #[diagnostic(
        code(pihole::auth_required),
        help("Set `auth` in the config file, or pass --auth / PIHOLE_AUTH.")
    )]
    AuthRequired,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(pihole::auth_failed),
        help("Use the web interface password (or an app password) of this Pi-hole.")
    )]
    AuthFailed { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Pi-hole API error: {message}")]
    #[diagnostic(code(pihole::api_error), help("Error key reported by the appliance: {key:?}"))]
    Api { key: Option<String>, message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pihole::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(pihole::no_config),
        help("Pass an existing .json or .toml file with --config, or drop the flag.")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(pihole::config))]
    Config(ConfigError),

    // ── Output ───────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthRequired | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::Config(_) => exit_code::USAGE,
            Self::Api { .. } | Self::Io(_) | Self::Json(_) | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::AuthenticationRequired => Self::AuthRequired,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Protocol { message, key } => Self::Api { key, message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            other => Self::Config(other),
        }
    }
}
