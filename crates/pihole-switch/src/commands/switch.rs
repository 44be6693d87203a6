//! `status`, `on`, `off`: the switch as the host sees it.

use serde::Serialize;

use pihole_core::{BlockingResponse, BlockingStatus, PiholeSwitch, on_from_status};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
pub struct SwitchView {
    pub on: bool,
    pub blocking: BlockingStatus,
    /// Seconds until the appliance flips back, when a timer is running.
    pub timer: Option<f64>,
    pub reversed: bool,
}

impl SwitchView {
    pub fn new(status: &BlockingResponse, reversed: bool) -> Self {
        Self {
            on: on_from_status(status.blocking, reversed),
            blocking: status.blocking,
            timer: status.timer,
            reversed,
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

fn detail(view: &SwitchView) -> String {
    let mut pairs = vec![
        ("Switch", on_off(view.on).to_owned()),
        ("Blocking", view.blocking.to_string()),
    ];
    if let Some(timer) = view.timer {
        pairs.push(("Timer", format!("{timer:.0}s")));
    }
    if view.reversed {
        pairs.push(("Polarity", "reversed".into()));
    }
    output::detail_lines(&pairs)
}

pub fn print(view: &SwitchView, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, view, detail, |v| on_off(v.on).to_owned())?;
    output::print_output(&out, global.quiet)
}

pub async fn status(switch: &PiholeSwitch, global: &GlobalOpts) -> Result<(), CliError> {
    let status = switch.blocking_status().await?;
    print(&SwitchView::new(&status, switch.is_reversed()), global)
}

pub async fn set(switch: &PiholeSwitch, on: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let status = switch.write_on(on).await?;
    let view = SwitchView::new(&status, switch.is_reversed());
    if view.on != on {
        tracing::warn!(requested = on_off(on), blocking = %view.blocking, "appliance did not apply the switch state");
    }
    print(&view, global)
}
