// ── Runtime accessory configuration ──
//
// Describes one switch accessory: how it identifies itself, how it maps
// blocking onto a switch, and how its client reaches the appliance.
// Never touches disk; `pihole-config` constructs it.

use pihole_api::ClientConfig;

use crate::accessory::AccessoryInfo;

/// Configuration for a single `PiholeSwitch`.
#[derive(Debug, Clone)]
pub struct SwitchConfig {
    /// Accessory display name, also the switch service name.
    pub name: String,
    pub info: AccessoryInfo,
    /// Switch ON means "blocking disabled" instead of "blocking enabled".
    pub reversed: bool,
    /// Seconds after which a disable request auto-reverts. 0 = indefinitely.
    pub time: u64,
    pub client: ClientConfig,
}

impl SwitchConfig {
    pub fn new(name: impl Into<String>, client: ClientConfig) -> Self {
        Self {
            name: name.into(),
            info: AccessoryInfo::default(),
            reversed: false,
            time: 0,
            client,
        }
    }
}
