//! Accessory layer between `pihole-api` and a smart-home host.
//!
//! - **[`PiholeSwitch`]**: one Pi-hole presented as a switch. Reads map
//!   `enabled`/`disabled` onto `On` (optionally reversed), writes apply the
//!   configured disable timer, and the last confirmed value is kept in a
//!   `watch` channel so a failed read never blanks what the host shows.
//! - **[`AccessoryPlugin`]**: the capability interface a host registers:
//!   a name plus the [`Service`] list (information block and switch).
//! - **[`SwitchConfig`]**: runtime configuration, built by `pihole-config`.

pub mod accessory;
pub mod config;
pub mod error;
pub mod switch;

pub use accessory::{AccessoryInfo, AccessoryPlugin, Service};
pub use config::SwitchConfig;
pub use error::CoreError;
pub use switch::{PiholeSwitch, blocking_for_on, on_from_status};

pub use pihole_api::{
    BlockingResponse, BlockingStatus, ClientConfig, DEFAULT_API_PATH, LogLevel, SessionStore,
    TlsMode, TransportConfig,
};
