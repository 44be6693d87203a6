//! CLI-aware config resolution: file + env from `pihole-config`, then
//! command-line flags on top.

use secrecy::SecretString;

use pihole_config::{AccessoryConfig, load_config};
use pihole_core::SwitchConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Apply flag overrides to a loaded accessory block.
pub fn apply_overrides(cfg: &mut AccessoryConfig, global: &GlobalOpts) {
    if let Some(ref url) = global.base_url {
        cfg.base_url = Some(url.clone());
    }
    if let Some(ref path) = global.path {
        cfg.path.clone_from(path);
    }
    if let Some(ref auth) = global.auth {
        cfg.auth = Some(SecretString::from(auth.clone()));
    }
    if global.insecure {
        cfg.reject_unauthorized = false;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
}

/// Load, override, validate.
pub fn build_switch_config(global: &GlobalOpts) -> Result<SwitchConfig, CliError> {
    let mut cfg = load_config(global.config.as_deref())?;
    apply_overrides(&mut cfg, global);
    tracing::debug!(base_url = %cfg.base_url(), path = %cfg.path, "resolved accessory config");
    Ok(cfg.resolve()?)
}
