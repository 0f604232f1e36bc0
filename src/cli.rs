//! Command line arguments for the desk binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(
    name = "clinic-desk",
    version,
    about = "Clinic front desk - patient registry and appointment agenda",
    long_about = "Register patients, book and cancel appointments, and list the agenda.\n\n\
                  Runs a terminal UI by default; use --plain for numbered menus on stdin."
)]
pub struct Cli {
    /// JSON file with clinic policy overrides (age, hours, slot grid, collision rule).
    #[arg(long = "policy", value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Pin the desk clock to "DD/MM/YYYY HHMM" local time instead of the system clock.
    #[arg(long = "now", value_name = "WHEN")]
    pub now: Option<String>,

    /// Use the line-oriented menu shell instead of the terminal UI.
    #[arg(long = "plain")]
    pub plain: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr. Required for logs while the terminal UI runs.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Omit timestamps from log lines.
    #[arg(long = "log-no-time")]
    pub log_no_time: bool,

    /// Include the emitting module in log lines.
    #[arg(long = "log-target")]
    pub log_target: bool,

    /// Log patient identifiers unredacted.
    #[arg(long = "log-data")]
    pub log_data: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
