//! `enable`, `disable`: raw blocking writes, polarity and `time` ignored.

use pihole_core::PiholeSwitch;

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::switch::{SwitchView, print};

pub async fn set(
    switch: &PiholeSwitch,
    blocking: bool,
    seconds: Option<u64>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let timer = seconds.filter(|s| *s > 0);
    let status = switch.set_blocking(blocking, timer).await?;
    print(&SwitchView::new(&status, switch.is_reversed()), global)
}
