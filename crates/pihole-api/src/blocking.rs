// DNS blocking endpoints
//
// `GET /dns/blocking` reads the blocking state, `POST /dns/blocking`
// writes it. Both run the session flow first.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::PiholeClient;
use crate::error::Error;

/// Blocking state as reported by the appliance.
///
/// The vocabulary is closed: any other word is a deserialization error.
/// `Failed` and `Unknown` are passed through untouched; deciding what they
/// mean for a switch is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockingStatus {
    Enabled,
    Disabled,
    Failed,
    Unknown,
}

impl BlockingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BlockingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of both blocking endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockingResponse {
    pub blocking: BlockingStatus,
    /// Seconds until the appliance reverts the current state, if a timer
    /// is running.
    #[serde(default)]
    pub timer: Option<f64>,
    /// Server-side processing time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub took: Option<f64>,
}

/// Body of `POST /dns/blocking`. `timer` is omitted entirely when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetBlockingRequest {
    pub blocking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<u64>,
}

impl PiholeClient {
    /// Read the current blocking state.
    pub async fn get_blocking(&self) -> Result<BlockingResponse, Error> {
        self.ensure_session().await?;
        self.get("/dns/blocking", true).await
    }

    /// Enable or disable blocking.
    ///
    /// `timer` is the number of seconds after which the appliance flips
    /// back; pass it when disabling for a limited time.
    pub async fn set_blocking(
        &self,
        blocking: bool,
        timer: Option<u64>,
    ) -> Result<BlockingResponse, Error> {
        self.ensure_session().await?;
        debug!(blocking, ?timer, "setting blocking state");
        let body = SetBlockingRequest { blocking, timer };
        self.post("/dns/blocking", &body, true).await
    }
}
