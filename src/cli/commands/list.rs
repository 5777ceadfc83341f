use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::event_log::EventLog;
use crate::errors::AppResult;
use crate::models::scan::ScanRecord;
use crate::utils::colors::{GREEN, GREY, RESET, colorize_direction};
use crate::utils::date;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { date, unsynced } = cmd {
        let log = EventLog::open(&cfg.database)?;

        let records = if *unsynced {
            log.unsynced_records()?
        } else {
            let day = date::resolve_date(date.as_deref())?;
            log.records_for_date(&day)?
        };

        if records.is_empty() {
            println!("No records.");
            return Ok(());
        }

        print!("{}", render_records(&records));
        println!("\n{} record(s)", records.len());
    }
    Ok(())
}

fn render_records(records: &[ScanRecord]) -> String {
    let mut table = Table::new(vec![
        Column::new("#", 4),
        Column::new("Badge", 6),
        Column::new("Name", 20),
        Column::new("Timestamp", 19),
        Column::new("Dir", 3),
        Column::new("Synced", 6),
    ]);

    for rec in records {
        table.add_row(vec![
            rec.id.to_string(),
            rec.badge_id.clone(),
            rec.display_name.clone(),
            rec.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_direction(rec.direction),
            if rec.synced {
                format!("{GREEN}yes{RESET}")
            } else {
                format!("{GREY}no{RESET}")
            },
        ]);
    }

    table.render()
}
