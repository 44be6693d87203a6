//! Command dispatch: bridges CLI args -> switch operations -> output.

pub mod blocking;
pub mod info;
pub mod switch;

use pihole_core::PiholeSwitch;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an appliance-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    switch: &PiholeSwitch,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => switch::status(switch, global).await,
        Command::On => switch::set(switch, true, global).await,
        Command::Off => switch::set(switch, false, global).await,
        Command::Enable => blocking::set(switch, true, None, global).await,
        Command::Disable(args) => blocking::set(switch, false, args.seconds, global).await,
        Command::Info => info::show(switch, global),
        // Completions are handled before a switch is built
        Command::Completions(_) => Ok(()),
    }
}
