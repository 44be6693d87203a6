// ── Host capability interface ──
//
// What the smart-home host asks of an accessory: a static information
// block and the list of services it exposes. The host owns the device
// model; this module only describes the accessory in its terms.

use serde::{Deserialize, Serialize};

/// Static identification shown by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInfo {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

impl Default for AccessoryInfo {
    fn default() -> Self {
        Self {
            manufacturer: "Raspberry Pi".into(),
            model: "Pi-hole".into(),
            serial_number: "123-456-789".into(),
        }
    }
}

/// A service the accessory exposes to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Service {
    /// Manufacturer / model / serial characteristics.
    AccessoryInformation(AccessoryInfo),
    /// A toggle with one read/write `On` characteristic.
    Switch { name: String },
}

/// The fixed interface a host uses to register an accessory.
pub trait AccessoryPlugin {
    /// Display name configured for the accessory.
    fn name(&self) -> &str;

    /// Services to register, information service first.
    fn services(&self) -> Vec<Service>;
}
