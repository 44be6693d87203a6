//! Configuration for the Pi-hole switch accessory.
//!
//! Keys mirror the host plugin's accessory block (`baseUrl`,
//! `serial-number`, `persistSession`, …) so an existing config can be
//! reused as-is. Loading layers a JSON or TOML file under `PIHOLE_*`
//! environment variables, and [`AccessoryConfig::resolve`] validates the
//! result into a `pihole_core::SwitchConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml},
    value::{Uncased, UncasedStr},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

use pihole_core::{
    AccessoryInfo, ClientConfig, DEFAULT_API_PATH, LogLevel, SessionStore, SwitchConfig, TlsMode,
    TransportConfig,
};

/// Environment variable prefix for overrides (`PIHOLE_BASE_URL`, …).
pub const ENV_PREFIX: &str = "PIHOLE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("persistSession is set but no storage directory could be determined")]
    NoStorageDir,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Accessory block ─────────────────────────────────────────────────

/// One accessory block, as written in the host config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessoryConfig {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    #[serde(rename = "serial-number")]
    pub serial_number: String,

    /// Web interface password. Empty means "no password".
    #[serde(deserialize_with = "secret")]
    pub auth: Option<SecretString>,
    /// Appliance root, e.g. `http://pi.hole`.
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
    /// API prefix under `baseUrl`.
    pub path: String,
    #[serde(rename = "rejectUnauthorized")]
    pub reject_unauthorized: bool,
    /// PEM bundle trusted in addition to the system roots.
    #[serde(rename = "caCert")]
    pub ca_cert: Option<PathBuf>,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// 0 = disabled, 1 = errors, 2 = info.
    #[serde(rename = "logLevel")]
    pub log_level: u8,

    pub reversed: bool,
    /// Seconds a disable lasts. 0 = until re-enabled.
    pub time: u64,

    #[serde(rename = "persistSession")]
    pub persist_session: bool,
    /// Directory for session files; defaults to the platform data dir.
    #[serde(rename = "storagePath")]
    pub storage_path: Option<PathBuf>,

    // Pre-`baseUrl` keys, used only when `baseUrl` is absent.
    pub host: Option<String>,
    pub port: Option<u16>,
    pub ssl: Option<bool>,
}

fn secret<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.map(SecretString::from))
}

impl Default for AccessoryConfig {
    fn default() -> Self {
        let info = AccessoryInfo::default();
        Self {
            name: "Pi-hole".into(),
            manufacturer: info.manufacturer,
            model: info.model,
            serial_number: info.serial_number,
            auth: None,
            base_url: None,
            path: DEFAULT_API_PATH.into(),
            reject_unauthorized: true,
            ca_cert: None,
            timeout: 30,
            log_level: LogLevel::default().as_number(),
            reversed: false,
            time: 0,
            persist_session: false,
            storage_path: None,
            host: None,
            port: None,
            ssl: None,
        }
    }
}

impl AccessoryConfig {
    /// The appliance root URL as configured, before parsing.
    ///
    /// `baseUrl` wins; otherwise `host`/`port`/`ssl` are assembled, with
    /// port 443 implying https. No keys at all gives `http://localhost`.
    pub fn base_url(&self) -> String {
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.is_empty()) {
            return url.to_owned();
        }
        if self.host.is_none() && self.port.is_none() && self.ssl.is_none() {
            return "http://localhost".into();
        }

        let host = self.host.as_deref().unwrap_or("localhost");
        let port = self.port.unwrap_or(80);
        let ssl = self.ssl.unwrap_or(false) || port == 443;
        let scheme = if ssl { "https" } else { "http" };
        format!("{scheme}://{host}:{port}")
    }

    /// Validate and convert into the runtime accessory configuration.
    pub fn resolve(&self) -> Result<SwitchConfig, ConfigError> {
        let log_level =
            LogLevel::from_number(self.log_level).ok_or_else(|| ConfigError::Validation {
                field: "logLevel".into(),
                reason: format!("expected 0, 1 or 2, got {}", self.log_level),
            })?;

        let raw_url = self.base_url();
        let base_url = Url::parse(&raw_url).map_err(|e| ConfigError::Validation {
            field: "baseUrl".into(),
            reason: format!("'{raw_url}': {e}"),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "baseUrl".into(),
                reason: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let tls = if self.reject_unauthorized {
            self.ca_cert.clone().map_or(TlsMode::System, TlsMode::CustomCa)
        } else {
            TlsMode::DangerAcceptInvalid
        };

        let password = self
            .auth
            .as_ref()
            .filter(|secret| !secret.expose_secret().is_empty())
            .cloned();

        let session_store = if self.persist_session {
            let dir = self
                .storage_path
                .clone()
                .or_else(default_storage_dir)
                .ok_or(ConfigError::NoStorageDir)?;
            Some(SessionStore::new(dir, &self.serial_number))
        } else {
            None
        };

        let client = ClientConfig {
            base_url,
            path: self.path.clone(),
            password,
            transport: TransportConfig {
                tls,
                timeout: Duration::from_secs(self.timeout),
            },
            log_level,
            session_store,
        };

        Ok(SwitchConfig {
            name: self.name.clone(),
            info: AccessoryInfo {
                manufacturer: self.manufacturer.clone(),
                model: self.model.clone(),
                serial_number: self.serial_number.clone(),
            },
            reversed: self.reversed,
            time: self.time,
            client,
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("net", "pi-hole", "pihole-switch")
}

/// Default config file location (platform config dir).
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default directory for persisted sessions (platform data dir).
pub fn default_storage_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pihole-switch");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Map `PIHOLE_*` suffixes onto the camelCase / kebab-case file keys.
fn env_key(key: &UncasedStr) -> Uncased<'_> {
    let lower = key.as_str().to_ascii_lowercase();
    let mapped = match lower.as_str() {
        "serial_number" => "serial-number",
        "base_url" => "baseUrl",
        "reject_unauthorized" => "rejectUnauthorized",
        "ca_cert" => "caCert",
        "log_level" => "logLevel",
        "persist_session" => "persistSession",
        "storage_path" => "storagePath",
        _ => return Uncased::from(lower),
    };
    Uncased::from(mapped)
}

/// The provider stack: file (JSON when the extension says so, TOML
/// otherwise) under `PIHOLE_*` environment variables.
pub fn provider(path: &Path) -> Figment {
    let file = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        Figment::from(Json::file(path))
    } else {
        Figment::from(Toml::file(path))
    };

    file.merge(Env::prefixed(ENV_PREFIX).lowercase(false).map(env_key))
}

/// Load the accessory config.
///
/// An explicit `path` must exist; the default path is optional and
/// falls back to defaults plus environment.
pub fn load_config(path: Option<&Path>) -> Result<AccessoryConfig, ConfigError> {
    let path = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound {
                path: p.to_path_buf(),
            });
        }
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    Ok(provider(&path).extract()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn legacy_keys_build_base_url() {
        let cfg = AccessoryConfig {
            host: Some("pi.hole".into()),
            port: Some(8080),
            ..AccessoryConfig::default()
        };
        assert_eq!(cfg.base_url(), "http://pi.hole:8080");
    }

    #[test]
    fn legacy_port_443_implies_https() {
        let cfg = AccessoryConfig {
            port: Some(443),
            ..AccessoryConfig::default()
        };
        assert_eq!(cfg.base_url(), "https://localhost:443");
    }

    #[test]
    fn base_url_wins_over_legacy_keys() {
        let cfg = AccessoryConfig {
            base_url: Some("http://10.0.0.2".into()),
            host: Some("pi.hole".into()),
            ssl: Some(true),
            ..AccessoryConfig::default()
        };
        assert_eq!(cfg.base_url(), "http://10.0.0.2");
    }

    #[test]
    fn defaults_resolve_to_localhost() {
        let sw = AccessoryConfig::default().resolve().unwrap();
        assert_eq!(sw.client.base_url.as_str(), "http://localhost/");
        assert_eq!(sw.client.path, "/api");
        assert_eq!(sw.client.log_level, LogLevel::Error);
        assert_eq!(sw.client.transport.tls, TlsMode::System);
        assert!(sw.client.password.is_none());
        assert!(sw.client.session_store.is_none());
        assert_eq!(sw.info, AccessoryInfo::default());
    }

    #[test]
    fn empty_auth_means_no_password() {
        let cfg = AccessoryConfig {
            auth: Some(SecretString::from(String::new())),
            ..AccessoryConfig::default()
        };
        assert!(cfg.resolve().unwrap().client.password.is_none());
    }

    #[test]
    fn reject_unauthorized_false_accepts_invalid_certs() {
        let cfg = AccessoryConfig {
            reject_unauthorized: false,
            ca_cert: Some("/etc/pihole/ca.pem".into()),
            ..AccessoryConfig::default()
        };
        assert_eq!(
            cfg.resolve().unwrap().client.transport.tls,
            TlsMode::DangerAcceptInvalid
        );
    }

    #[test]
    fn out_of_range_log_level_is_rejected() {
        let cfg = AccessoryConfig {
            log_level: 3,
            ..AccessoryConfig::default()
        };
        let err = cfg.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "logLevel"));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let cfg = AccessoryConfig {
            base_url: Some("ftp://pi.hole".into()),
            ..AccessoryConfig::default()
        };
        assert!(matches!(
            cfg.resolve().unwrap_err(),
            ConfigError::Validation { ref field, .. } if field == "baseUrl"
        ));
    }

    #[test]
    fn persist_session_uses_storage_path_and_serial() {
        let cfg = AccessoryConfig {
            persist_session: true,
            storage_path: Some("/var/lib/homebridge".into()),
            serial_number: "pi-1".into(),
            ..AccessoryConfig::default()
        };
        let store = cfg.resolve().unwrap().client.session_store.unwrap();
        assert_eq!(
            store.path(),
            Path::new("/var/lib/homebridge/pihole-session-pi-1.json")
        );
    }

    #[test]
    fn env_keys_map_to_file_keys() {
        assert_eq!(env_key(UncasedStr::new("BASE_URL")).as_str(), "baseUrl");
        assert_eq!(env_key(UncasedStr::new("SERIAL_NUMBER")).as_str(), "serial-number");
        assert_eq!(env_key(UncasedStr::new("AUTH")).as_str(), "auth");
    }
}
