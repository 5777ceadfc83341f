use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::event_log::EventLog;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RED, RESET, YELLOW};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        check,
        vacuum,
        info,
    } = cmd
    {
        let log = EventLog::open(&cfg.database)?;

        //
        // 1) INFO
        //
        if *info {
            print_db_info(&log, &cfg.database)?;
        }

        //
        // 2) CHECK
        //
        if *check {
            println!("{CYAN}▶ Running integrity check…{RESET}");
            let integrity = log.integrity_check()?;
            if integrity == "ok" {
                println!("{GREEN}✔ Integrity check passed.{RESET}\n");
            } else {
                println!("{RED}✘ Integrity check failed:{RESET} {integrity}\n");
            }
        }

        //
        // 3) VACUUM
        //
        if *vacuum {
            println!("{CYAN}▶ Running VACUUM…{RESET}");
            log.vacuum()?;
            let _ = log.audit("vacuum", &cfg.database, "Database vacuumed");
            println!("{GREEN}✔ Vacuum completed.{RESET}\n");
        }
    }

    Ok(())
}

fn print_db_info(log: &EventLog, db_path: &str) -> AppResult<()> {
    let stats = log.stats()?;

    let file_size = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!();
    println!("{CYAN}• File:{RESET} {YELLOW}{db_path}{RESET}");
    println!("{CYAN}• Size:{RESET} {file_mb:.2} MB");
    println!("{CYAN}• Total scans:{RESET} {GREEN}{}{RESET}", stats.total);
    println!("{CYAN}• Distinct badges:{RESET} {}", stats.badges);

    let pending_color = if stats.unsynced > 0 { YELLOW } else { GREEN };
    println!(
        "{CYAN}• Pending sync:{RESET} {pending_color}{}{RESET}",
        stats.unsynced
    );

    let placeholder = format!("{GREY}--{RESET}");
    println!("{CYAN}• Date range:{RESET}");
    println!(
        "    from: {}",
        stats.first_date.as_deref().unwrap_or(&placeholder)
    );
    println!(
        "    to:   {}",
        stats.last_date.as_deref().unwrap_or(&placeholder)
    );
    println!();
    Ok(())
}
