// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use tracing::Level;

use clinic_desk::input::{parse_clock, parse_date};
use clinic_desk::logging::{init_logging, LogConfig, LogFormat};
use clinic_desk::shell::Shell;
use clinic_desk::{ClinicDesk, ClinicPolicy, FixedClock};

use crate::cli::{Cli, LogFormatArg, LogLevelArg};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let policy = match &cli.policy {
        Some(path) => ClinicPolicy::from_file(path)?,
        None => ClinicPolicy::default(),
    };

    let use_tui = cfg!(feature = "tui") && !cli.plain;

    // The terminal UI owns the screen; it only logs when a file is given
    if !use_tui || cli.log_file.is_some() {
        init_logging(&log_config_from_cli(&cli))?;
    }

    let desk = match &cli.now {
        Some(when) => ClinicDesk::with_clock(policy, pinned_clock(when)?.shared()),
        None => ClinicDesk::new(policy),
    };
    tracing::debug!(tui = use_tui, "desk ready");

    if use_tui {
        run_ui_mode(desk)
    } else {
        run_plain_mode(desk)
    }
}

fn run_plain_mode(mut desk: ClinicDesk) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(&mut desk, stdin.lock(), stdout.lock()).run()
}

#[cfg(feature = "tui")]
fn run_ui_mode(desk: ClinicDesk) -> Result<()> {
    let mut app = ui::App::new(desk);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(desk: ClinicDesk) -> Result<()> {
    run_plain_mode(desk)
}

/// Parse "DD/MM/YYYY HHMM" into a clock frozen at that local time
fn pinned_clock(when: &str) -> Result<FixedClock> {
    let (date, time) = when
        .trim()
        .split_once(' ')
        .ok_or_else(|| anyhow!("--now expects \"DD/MM/YYYY HHMM\", got {:?}", when))?;
    let date = parse_date(date).with_context(|| format!("invalid --now date {:?}", date))?;
    let time = parse_clock(time.trim()).with_context(|| format!("invalid --now time {:?}", time))?;

    FixedClock::at(date.and_time(time)).with_context(|| format!("{} does not exist in the local time zone", when))
}

/// Explicit --log-level wins over -v/-q
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level = match cli.log_level {
        Some(LogLevelArg::Error) => Level::ERROR,
        Some(LogLevelArg::Warn) => Level::WARN,
        Some(LogLevelArg::Info) => Level::INFO,
        Some(LogLevelArg::Debug) => Level::DEBUG,
        Some(LogLevelArg::Trace) => Level::TRACE,
        None => cli.verbosity.tracing_level().unwrap_or(Level::ERROR),
    };

    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };

    LogConfig::default()
        .with_level(level)
        .with_format(format)
        .with_timestamps(!cli.log_no_time)
        .with_target(cli.log_target)
        .with_ansi(cli.log_file.is_none() && io::stderr().is_terminal())
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::Clock;

    #[test]
    fn test_pinned_clock() {
        let clock = pinned_clock("10/03/2026 0930").unwrap();
        assert_eq!(clock.local().naive_local().to_string(), "2026-03-10 09:30:00");

        assert!(pinned_clock("10/03/2026").is_err());
        assert!(pinned_clock("31/02/2026 0930").is_err());
        assert!(pinned_clock("10/03/2026 2500").is_err());
    }
}
