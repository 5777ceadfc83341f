use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::debounce::Debouncer;
use crate::core::event_log::EventLog;
use crate::core::scan::{ScanHandler, ScanOutcome};
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::colors::colorize_direction;
use std::sync::Arc;
use std::time::Duration;

/// Record one scan. A single invocation has nothing to debounce against.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan { badge } = cmd {
        let log = Arc::new(EventLog::open(&cfg.database)?);
        let mut handler = ScanHandler::new(log, cfg.employees.clone(), Debouncer::new(Duration::ZERO));

        match handler.handle(badge)? {
            ScanOutcome::Recorded(rec) => success(format!(
                "{} ({}) {} at {}",
                rec.display_name,
                rec.badge_id,
                colorize_direction(rec.direction),
                rec.time_str()
            )),
            ScanOutcome::Cooldown { badge_id, remaining } => warning(format!(
                "Cooldown active for {badge_id}, retry in {}s",
                remaining.as_secs() + 1
            )),
        }
    }
    Ok(())
}
