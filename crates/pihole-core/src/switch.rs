// ── Pi-hole switch accessory ──
//
// Maps the appliance's blocking state onto a single boolean `On`
// characteristic. Polarity, the disable timer and the last known value
// live here; sessions and wire details stay in `pihole-api`.

use pihole_api::{BlockingResponse, BlockingStatus, LogLevel, PiholeClient};
use tokio::sync::watch;
use tracing::{debug, error};

use crate::accessory::{AccessoryInfo, AccessoryPlugin, Service};
use crate::config::SwitchConfig;
use crate::error::CoreError;

/// Switch value for a blocking status.
///
/// Only the "active" word turns the switch on: `enabled` normally,
/// `disabled` when reversed. `failed` and `unknown` read as off either way.
pub fn on_from_status(status: BlockingStatus, reversed: bool) -> bool {
    if reversed {
        status == BlockingStatus::Disabled
    } else {
        status == BlockingStatus::Enabled
    }
}

/// Blocking state to request for a switch value.
pub fn blocking_for_on(on: bool, reversed: bool) -> bool {
    on != reversed
}

/// A Pi-hole exposed as a switch.
///
/// The host calls [`get_on`](Self::get_on) / [`set_on`](Self::set_on) from
/// its characteristic handlers. [`last_known_on`](Self::last_known_on) is
/// what it can show immediately while a read is in flight, and
/// [`subscribe`](Self::subscribe) pushes every confirmed value.
pub struct PiholeSwitch {
    name: String,
    info: AccessoryInfo,
    reversed: bool,
    time: u64,
    timeout_secs: u64,
    log_level: LogLevel,
    client: PiholeClient,
    on: watch::Sender<Option<bool>>,
}

impl PiholeSwitch {
    pub fn new(config: SwitchConfig) -> Result<Self, CoreError> {
        let timeout_secs = config.client.transport.timeout.as_secs();
        let log_level = config.client.log_level;
        let client = PiholeClient::new(config.client)
            .map_err(|e| CoreError::from_api(e, timeout_secs))?;
        let (on, _) = watch::channel(None);
        Ok(Self {
            name: config.name,
            info: config.info,
            reversed: config.reversed,
            time: config.time,
            timeout_secs,
            log_level,
            client,
            on,
        })
    }

    pub fn client(&self) -> &PiholeClient {
        &self.client
    }

    pub fn info(&self) -> &AccessoryInfo {
        &self.info
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Configured disable timer in seconds (0 = indefinitely).
    pub fn time(&self) -> u64 {
        self.time
    }

    // ── Characteristic handlers ──────────────────────────────────────

    /// The last confirmed switch value, `None` before the first success.
    pub fn last_known_on(&self) -> Option<bool> {
        *self.on.borrow()
    }

    /// Watch confirmed switch values.
    pub fn subscribe(&self) -> watch::Receiver<Option<bool>> {
        self.on.subscribe()
    }

    /// Read the blocking state and map it onto the switch.
    ///
    /// A failure leaves the last known value in place.
    pub async fn get_on(&self) -> Result<bool, CoreError> {
        let status = self.blocking_status().await?;
        let on = self.apply(&status);
        debug!(name = %self.name, on, blocking = %status.blocking, "switch state read");
        Ok(on)
    }

    /// Turn the switch on or off.
    ///
    /// Returns the value the appliance confirmed, which is what the host
    /// should display afterwards.
    pub async fn set_on(&self, on: bool) -> Result<bool, CoreError> {
        let status = self.write_on(on).await?;
        Ok(on_from_status(status.blocking, self.reversed))
    }

    /// [`set_on`](Self::set_on), returning the appliance's full answer.
    ///
    /// The configured `time` is sent only when the request disables
    /// blocking.
    pub async fn write_on(&self, on: bool) -> Result<BlockingResponse, CoreError> {
        let blocking = blocking_for_on(on, self.reversed);
        let timer = (!blocking && self.time > 0).then_some(self.time);

        let status = self.set_blocking(blocking, timer).await?;
        debug!(name = %self.name, requested = on, blocking = %status.blocking, "switch state written");
        Ok(status)
    }

    // ── Raw blocking access ──────────────────────────────────────────

    /// Current blocking state, unmapped.
    pub async fn blocking_status(&self) -> Result<BlockingResponse, CoreError> {
        self.client
            .get_blocking()
            .await
            .map_err(|e| self.fail("read blocking state", e))
    }

    /// Write a blocking state directly, bypassing polarity and the
    /// configured timer.
    pub async fn set_blocking(
        &self,
        blocking: bool,
        timer: Option<u64>,
    ) -> Result<BlockingResponse, CoreError> {
        let status = self
            .client
            .set_blocking(blocking, timer)
            .await
            .map_err(|e| self.fail("write blocking state", e))?;
        self.apply(&status);
        Ok(status)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn apply(&self, status: &BlockingResponse) -> bool {
        let on = on_from_status(status.blocking, self.reversed);
        self.on.send_replace(Some(on));
        on
    }

    fn fail(&self, action: &str, err: pihole_api::Error) -> CoreError {
        if self.log_level >= LogLevel::Error {
            error!(name = %self.name, error = %err, "failed to {action}");
        }
        CoreError::from_api(err, self.timeout_secs)
    }
}

impl AccessoryPlugin for PiholeSwitch {
    fn name(&self) -> &str {
        &self.name
    }

    fn services(&self) -> Vec<Service> {
        vec![
            Service::AccessoryInformation(self.info.clone()),
            Service::Switch {
                name: self.name.clone(),
            },
        ]
    }
}
