//! ANSI color helper utilities for terminal output.
use crate::models::direction::Direction;
use crate::sync::state::SyncState;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// Placeholder shown for a missing time.
pub const EMPTY_TIME: &str = "--:--:--";

/// Grey for placeholders, plain text otherwise.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == EMPTY_TIME || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// IN green, OUT red.
pub fn colorize_direction(dir: Direction) -> String {
    match dir {
        Direction::In => format!("{GREEN}{dir}{RESET}"),
        Direction::Out => format!("{RED}{dir}{RESET}"),
    }
}

pub fn color_for_state(state: &SyncState) -> &'static str {
    match state {
        SyncState::Connected | SyncState::Idle => GREEN,
        SyncState::Syncing { .. } => CYAN,
        SyncState::Disconnected => YELLOW,
        SyncState::Error(_) => RED,
    }
}
