use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// Entry or exit. Stored upper-case in the `scans.direction` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl Direction {
    /// Convert enum → DB string
    pub fn to_db_str(self) -> &'static str {
        match self {
            Direction::In => "IN",
            Direction::Out => "OUT",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "IN" => Some(Direction::In),
            "OUT" => Some(Direction::Out),
            _ => None,
        }
    }

    /// The direction that follows this one for the same badge.
    pub fn toggled(self) -> Self {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }

    pub fn is_in(self) -> bool {
        matches!(self, Direction::In)
    }

    pub fn is_out(self) -> bool {
        matches!(self, Direction::Out)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl FromStr for Direction {
    type Err = AppError;

    /// Lenient parse used for CLI input and legacy rows ("in", "Out", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::from_db_str(&s.trim().to_uppercase())
            .ok_or_else(|| AppError::InvalidDirection(s.to_string()))
    }
}
