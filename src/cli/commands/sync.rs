use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::event_log::EventLog;
use crate::errors::AppResult;
use crate::sync::{MongoRemoteStore, SyncEngine, TickOutcome};
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{RESET, color_for_state};
use std::sync::Arc;

/// One manual sync cycle. Remote problems are reported, never returned:
/// the records stay pending and the command succeeds.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync { status_only } = cmd {
        let log = Arc::new(EventLog::open(&cfg.database)?);

        if *status_only {
            let stats = log.stats()?;
            println!("Pending records: {}", stats.unsynced);
            match cfg.usable_remote() {
                Some(r) => println!("Remote store:    mongodb {}", r.target()),
                None => println!("Remote store:    not configured"),
            }
            return Ok(());
        }

        let remote = MongoRemoteStore::from_config(cfg.usable_remote());
        let engine = SyncEngine::new(Arc::clone(&log), remote, cfg.sync_interval());
        let outcome = engine.tick();

        match outcome {
            TickOutcome::Pushed(n) => success(format!("{n} record(s) delivered")),
            TickOutcome::Idle => info("Nothing to sync"),
            TickOutcome::Offline => warning("Remote store unavailable, records kept locally"),
            TickOutcome::Failed => warning("Sync failed, records kept locally"),
            TickOutcome::Skipped => info("Another sync is running"),
        }

        let reporter = engine.reporter();
        println!(
            "Status: {}{}{RESET}",
            color_for_state(&reporter.status()),
            reporter.line()
        );
    }
    Ok(())
}
