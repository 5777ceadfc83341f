use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::event_log::EventLog;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the configuration file (skipped in test mode)
///  - the SQLite scan log and its migrations
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    //
    // 1️⃣ CONFIGURATION
    //
    let path = cfg.init_all(cli.test)?;

    println!("⚙️  Initializing rattendance…");
    if cli.test {
        println!("📄 Config file : (test mode, not written)");
    } else {
        println!("📄 Config file : {}", path.display());
    }
    println!("🗄️  Database   : {}", cfg.database);

    //
    // 2️⃣ DATABASE (tables + migrations)
    //
    let log = EventLog::open(&cfg.database)?;
    success(format!("Database initialized at {}", cfg.database));

    //
    // 3️⃣ AUDIT ENTRY (non blocking)
    //
    if let Err(e) = log.audit(
        "init",
        "Database initialized",
        &format!("Database initialized at {}", cfg.database),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    if cfg.usable_remote().is_none() {
        warning("No usable remote store configured: scans will stay local until one is set.");
    }

    println!("🎉 rattendance initialization completed!");
    Ok(())
}
