//! Interactive scan station.
//!
//! Badge ids arrive one per line on stdin (keyboard-wedge readers type the
//! id followed by Enter). The sync engine runs in the background for the
//! whole session and is stopped before returning.

use crate::cli::commands::summary::render_summary;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::debounce::Debouncer;
use crate::core::event_log::EventLog;
use crate::core::scan::{ScanHandler, ScanOutcome};
use crate::errors::{AppError, AppResult};
use crate::sync::{MongoRemoteStore, StatusReporter, SyncEngine};
use crate::ui::messages::{error, success, warning};
use crate::utils::colors::{RESET, color_for_state, colorize_direction};
use crate::utils::date;
use std::collections::BTreeMap;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error as log_error, info};

const QUIT_COMMANDS: [&str; 2] = ["quit", "exit"];

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Kiosk { interval } = cmd {
        let log = Arc::new(EventLog::open(&cfg.database)?);
        let interval = interval
            .map(Duration::from_secs)
            .unwrap_or_else(|| cfg.sync_interval());

        let remote = MongoRemoteStore::from_config(cfg.usable_remote());
        if remote.is_none() {
            warning("No usable remote store configured: running offline.");
        }

        let engine = SyncEngine::new(Arc::clone(&log), remote, interval);
        engine.start()?;
        info!(db = %cfg.database, "kiosk started");

        let mut handler = ScanHandler::new(
            Arc::clone(&log),
            cfg.employees.clone(),
            Debouncer::new(cfg.debounce()),
        );

        let result = run_session(&log, &mut handler, cfg, &engine.reporter());
        engine.stop();
        result?;
    }
    Ok(())
}

fn run_session(
    log: &EventLog,
    handler: &mut ScanHandler<BTreeMap<String, String>>,
    cfg: &Config,
    reporter: &StatusReporter,
) -> AppResult<()> {
    let stdin = io::stdin();
    let interactive = io::stdout().is_terminal();

    draw_dashboard(log, cfg, interactive)?;
    print_prompt(reporter)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            draw_dashboard(log, cfg, interactive)?;
            print_prompt(reporter)?;
            continue;
        }
        if QUIT_COMMANDS.contains(&input.to_ascii_lowercase().as_str()) {
            break;
        }

        let outcome = match handler.handle(input) {
            Err(e) if !matches!(e, AppError::InvalidBadge(_)) => {
                // the scan was not recorded; stop accepting scans
                log_error!(error = %e, "scan could not be recorded");
                error(format!("Scan NOT recorded: {e}"));
                return Err(e);
            }
            other => other,
        };
        draw_dashboard(log, cfg, interactive)?;

        match outcome {
            Ok(ScanOutcome::Recorded(rec)) => success(format!(
                "{} {} at {}",
                rec.display_name,
                colorize_direction(rec.direction),
                rec.time_str()
            )),
            Ok(ScanOutcome::Cooldown { badge_id, remaining }) => warning(format!(
                "Cooldown active for {badge_id}, wait {}s",
                remaining.as_secs() + 1
            )),
            Err(e) => warning(format!("Ignored badge input: {e}")),
        }
        print_prompt(reporter)?;
    }

    Ok(())
}

fn draw_dashboard(log: &EventLog, cfg: &Config, interactive: bool) -> AppResult<()> {
    let today = date::today();
    let summary = log.summary_for_date(&today)?;

    if interactive {
        // clear screen, cursor home
        print!("\x1b[2J\x1b[H");
    }
    println!("📋 Attendance {today}\n");
    print!("{}", render_summary(&today, &cfg.employees, &summary));
    println!();
    Ok(())
}

fn print_prompt(reporter: &StatusReporter) -> AppResult<()> {
    let mut out = io::stdout();
    writeln!(
        out,
        "Sync: {}{}{RESET}",
        color_for_state(&reporter.status()),
        reporter.line()
    )?;
    write!(out, "Scan badge (or 'quit'): ")?;
    out.flush()?;
    Ok(())
}
