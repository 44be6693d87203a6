//! Clap derive structures for the `pihole-switch` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pihole-switch -- flip Pi-hole ad blocking like a light switch
#[derive(Debug, Parser)]
#[command(
    name = "pihole-switch",
    version,
    about = "Toggle Pi-hole ad blocking from the command line",
    long_about = "Reads and writes the blocking state of a Pi-hole v6 appliance.\n\n\
        Uses the same accessory configuration as the smart-home plugin\n\
        (baseUrl, auth, reversed, time, persistSession, ...), so the switch\n\
        behaves identically from a terminal.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Accessory config file (.json or .toml)
    #[arg(long, short = 'C', env = "PIHOLE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Appliance URL, e.g. http://pi.hole (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API path under the base URL (overrides config)
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// Web interface password
    #[arg(long, env = "PIHOLE_AUTH", global = true, hide_env_values = true)]
    pub auth: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PIHOLE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Bare value (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the switch and blocking state
    #[command(alias = "st")]
    Status,

    /// Turn the switch on (blocking enabled, or disabled when reversed)
    On,

    /// Turn the switch off (applies the configured disable time)
    Off,

    /// Disable blocking, ignoring switch polarity
    Disable(DisableArgs),

    /// Enable blocking, ignoring switch polarity
    Enable,

    /// Show the accessory information and services
    Info,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct DisableArgs {
    /// Re-enable automatically after this many seconds
    #[arg(long = "for", value_name = "SECS")]
    pub seconds: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
