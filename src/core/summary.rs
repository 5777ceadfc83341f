use crate::models::day_summary::DailySummary;
use crate::models::scan::ScanRecord;
use std::collections::BTreeMap;

/// Fold one day of records (id order) into a per-badge summary.
pub fn fold_daily_summaries(records: &[ScanRecord]) -> BTreeMap<String, DailySummary> {
    let mut out: BTreeMap<String, DailySummary> = BTreeMap::new();

    for rec in records {
        let entry = out
            .entry(rec.badge_id.clone())
            .or_insert_with(|| DailySummary {
                display_name: rec.display_name.clone(),
                first_in: None,
                last_out: None,
                last_action: rec.direction,
                scans: 0,
            });

        entry.scans += 1;
        entry.last_action = rec.direction;

        if rec.direction.is_in() && entry.first_in.is_none_or(|t| rec.timestamp < t) {
            entry.first_in = Some(rec.timestamp);
        }

        if rec.direction.is_out() && entry.last_out.is_none_or(|t| rec.timestamp >= t) {
            entry.last_out = Some(rec.timestamp);
        }
    }

    out
}
