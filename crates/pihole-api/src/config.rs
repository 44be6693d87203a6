// ── Client connection configuration ──
//
// Everything a `PiholeClient` needs, resolved once at construction.
// Nothing here touches disk; `pihole-config` builds it from the host's
// accessory config.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use url::Url;

use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::TransportConfig;

/// Default API path prefix, resolved against the base URL.
pub const DEFAULT_API_PATH: &str = "/api";

/// Verbosity of the lines the client and accessory emit.
///
/// Mirrors the host config's numeric `logLevel` (0, 1, 2). Ordered, so
/// callers gate with `log_level >= LogLevel::Info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Nothing is logged, not even persistence failures.
    Disabled,
    /// Errors only.
    #[default]
    Error,
    /// Errors plus a line per request and response.
    Info,
}

impl LogLevel {
    pub fn from_number(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Disabled),
            1 => Some(Self::Error),
            2 => Some(Self::Info),
            _ => None,
        }
    }

    pub fn as_number(self) -> u8 {
        match self {
            Self::Disabled => 0,
            Self::Error => 1,
            Self::Info => 2,
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_number())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        Self::from_number(raw).ok_or_else(|| {
            de::Error::custom(format!("log level must be 0, 1 or 2, got {raw}"))
        })
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disabled => "disabled",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// Configuration for one client talking to one appliance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Appliance root (e.g. `http://pi.hole`).
    pub base_url: Url,
    /// API prefix resolved against `base_url` (default `/api`).
    pub path: String,
    /// Web interface password. `None` only works for appliances without one.
    pub password: Option<SecretString>,
    pub transport: TransportConfig,
    pub log_level: LogLevel,
    /// Where to mirror the session. `None` keeps it in memory only.
    pub session_store: Option<SessionStore>,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            path: DEFAULT_API_PATH.into(),
            password: None,
            transport: TransportConfig::default(),
            log_level: LogLevel::default(),
            session_store: None,
        }
    }

    /// The normalized API prefix: `path` resolved against `base_url`,
    /// without a trailing slash.
    ///
    /// `http://localhost/` with `/api/` gives `http://localhost/api`.
    pub fn api_base(&self) -> Result<String, Error> {
        let url = self.base_url.join(&self.path)?;
        Ok(url.as_str().trim_end_matches('/').to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base: &str, path: &str) -> ClientConfig {
        ClientConfig {
            path: path.into(),
            ..ClientConfig::new(Url::parse(base).unwrap())
        }
    }

    #[test]
    fn api_base_defaults_to_api() {
        let cfg = ClientConfig::new(Url::parse("http://localhost").unwrap());
        assert_eq!(cfg.api_base().unwrap(), "http://localhost/api");
    }

    #[test]
    fn api_base_strips_trailing_slashes() {
        assert_eq!(
            config("http://localhost/", "/api/").api_base().unwrap(),
            "http://localhost/api"
        );
    }

    #[test]
    fn api_base_honors_custom_path() {
        assert_eq!(
            config("http://pi.hole:8080", "/admin/api").api_base().unwrap(),
            "http://pi.hole:8080/admin/api"
        );
    }

    #[test]
    fn relative_path_nests_under_base_path() {
        assert_eq!(
            config("https://proxy.lan/pihole/", "api").api_base().unwrap(),
            "https://proxy.lan/pihole/api"
        );
    }

    #[test]
    fn log_level_is_ordered_and_numeric() {
        assert!(LogLevel::Info > LogLevel::Error);
        assert!(LogLevel::Error > LogLevel::Disabled);
        assert_eq!(LogLevel::from_number(2), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_number(3), None);
        assert_eq!(serde_json::to_string(&LogLevel::Error).unwrap(), "1");
        assert!(serde_json::from_str::<LogLevel>("7").is_err());
    }
}
