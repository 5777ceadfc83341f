//! Formatting utilities used for CLI outputs.

use super::colors::EMPTY_TIME;
use chrono::{DateTime, Local};
use regex::Regex;
use std::sync::OnceLock;
use unicode_width::UnicodeWidthStr;

fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern"))
}

pub fn strip_ansi(s: &str) -> String {
    ansi_re().replace_all(s, "").into_owned()
}

/// Display width of `s` ignoring ANSI escapes.
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).width()
}

/// Pad to `width` display columns, ANSI-aware.
pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_width(s));
    format!("{s}{}", " ".repeat(pad))
}

/// "HH:MM:SS" or the empty-time placeholder.
pub fn fmt_time_opt(ts: Option<&DateTime<Local>>) -> String {
    ts.map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| EMPTY_TIME.to_string())
}
