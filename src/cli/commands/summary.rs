use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::event_log::EventLog;
use crate::errors::AppResult;
use crate::models::day_summary::DailySummary;
use crate::ui::messages::header;
use crate::utils::colors::{colorize_direction, colorize_optional};
use crate::utils::date;
use crate::utils::formatting::fmt_time_opt;
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary { date } = cmd {
        let day = date::resolve_date(date.as_deref())?;
        let log = EventLog::open(&cfg.database)?;
        let summary = log.summary_for_date(&day)?;

        header(format!("Attendance {day}"));
        print!("{}", render_summary(&day, &cfg.employees, &summary));
    }
    Ok(())
}

/// Dashboard table: every known employee, then unknown badges seen on `day`.
pub fn render_summary(
    _day: &NaiveDate,
    employees: &BTreeMap<String, String>,
    summary: &BTreeMap<String, DailySummary>,
) -> String {
    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("Name", 20),
        Column::new("First In", 10),
        Column::new("Last Out", 10),
        Column::new("Status", 6),
    ]);

    let unknown = summary
        .iter()
        .filter(|(badge, _)| !employees.contains_key(*badge))
        .map(|(badge, s)| (badge, s.display_name.as_str()));
    let rows = employees
        .iter()
        .map(|(badge, name)| (badge, name.as_str()))
        .chain(unknown);

    for (badge, name) in rows {
        let day = summary.get(badge);
        let status = day
            .map(|s| colorize_direction(s.last_action))
            .unwrap_or_else(|| colorize_optional("--"));

        table.add_row(vec![
            badge.clone(),
            name.to_string(),
            colorize_optional(&fmt_time_opt(day.and_then(|s| s.first_in.as_ref()))),
            colorize_optional(&fmt_time_opt(day.and_then(|s| s.last_out.as_ref()))),
            status,
        ]);
    }

    table.render()
}
