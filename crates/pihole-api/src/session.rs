// Session model and on-disk session cache
//
// The appliance hands out a session id (`sid`) from `/auth`. The client
// keeps the latest one in memory and, when a store is configured, mirrors
// it to a single JSON file per accessory so a restart can reuse it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

static SAVE_SEQ: AtomicU64 = AtomicU64::new(0);

/// An authentication session as reported by `GET/POST /auth`.
///
/// Every field defaults when absent: the appliance answers an
/// unauthenticated check with little more than `{"valid": false}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub valid: bool,
    pub sid: Option<String>,
    /// Remaining lifetime in seconds.
    pub validity: f64,
    pub totp: bool,
    pub csrf: Option<String>,
    pub message: Option<String>,
}

impl Session {
    /// The session id to send as `X-FTL-SID`, if this session may be used
    /// as a credential at all.
    pub fn credential(&self) -> Option<&str> {
        if !self.valid {
            return None;
        }
        self.sid.as_deref().filter(|sid| !sid.is_empty())
    }
}

/// Body of both `/auth` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
    pub took: Option<f64>,
}

/// Failure reading or writing the session file.
///
/// Never surfaces from a get/set call; the client logs and moves on.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One JSON file holding the last session of one accessory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store for the accessory identified by `identity` (its serial number)
    /// inside `dir`.
    pub fn new(dir: impl AsRef<Path>, identity: &str) -> Self {
        Self {
            path: dir.as_ref().join(Self::file_name(identity)),
        }
    }

    /// `pihole-session-<identity>.json`, with anything outside
    /// `[A-Za-z0-9._-]` replaced by `_` so the identity cannot escape `dir`.
    pub fn file_name(identity: &str) -> String {
        let safe: String = identity
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("pihole-session-{safe}.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session.
    ///
    /// A missing file, a JSON `null`, or a session without a `sid` all
    /// mean "no prior session" and return `Ok(None)`.
    pub async fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session: Option<Session> = serde_json::from_str(&contents)?;
        Ok(session.filter(|s| s.sid.as_deref().is_some_and(|sid| !sid.is_empty())))
    }

    /// Overwrite the stored session.
    ///
    /// Writes a sibling temp file and renames it over the target, so a
    /// reader never sees a half-written session. Each call gets its own
    /// temp name; concurrent saves race only on the final rename.
    pub async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_string(session)?;
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, payload).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// `<file>.<pid>.<seq>.tmp` next to the target.
    fn tmp_path(&self) -> PathBuf {
        let seq = SAVE_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.{seq}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}
