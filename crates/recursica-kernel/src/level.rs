//! The fixed color-level vocabulary.
//!
//! Levels run from `000` (lightest) to `1000` (darkest). `000` is an alias
//! of `050`: lookups that miss on `000` retry on `050`.

use crate::error::TokenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One position within a color scale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    L000,
    L050,
    L100,
    L200,
    L300,
    L400,
    L500,
    L600,
    L700,
    L800,
    L900,
    L1000,
}

/// All twelve levels, lightest first.
pub const ALL_LEVELS: [Level; 12] = [
    Level::L000,
    Level::L050,
    Level::L100,
    Level::L200,
    Level::L300,
    Level::L400,
    Level::L500,
    Level::L600,
    Level::L700,
    Level::L800,
    Level::L900,
    Level::L1000,
];

/// The eleven audited levels (`000` excluded as an alias of `050`).
pub const CANONICAL_LEVELS: [Level; 11] = [
    Level::L050,
    Level::L100,
    Level::L200,
    Level::L300,
    Level::L400,
    Level::L500,
    Level::L600,
    Level::L700,
    Level::L800,
    Level::L900,
    Level::L1000,
];

/// Which way to move along a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward `1000`.
    Darker,
    /// Toward `000`.
    Lighter,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Darker => Direction::Lighter,
            Direction::Lighter => Direction::Darker,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Darker => "darker",
            Direction::Lighter => "lighter",
        }
    }
}

impl FromStr for Direction {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "darker" => Ok(Direction::Darker),
            "lighter" => Ok(Direction::Lighter),
            other => Err(TokenError::InvalidDirection(other.to_string())),
        }
    }
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::L000 => "000",
            Level::L050 => "050",
            Level::L100 => "100",
            Level::L200 => "200",
            Level::L300 => "300",
            Level::L400 => "400",
            Level::L500 => "500",
            Level::L600 => "600",
            Level::L700 => "700",
            Level::L800 => "800",
            Level::L900 => "900",
            Level::L1000 => "1000",
        }
    }

    /// Position within [`ALL_LEVELS`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        ALL_LEVELS.get(index).copied()
    }

    /// The level one step in `direction`, clamped at the scale boundary.
    pub fn step(self, direction: Direction) -> Self {
        let index = match direction {
            Direction::Darker => (self.index() + 1).min(ALL_LEVELS.len() - 1),
            Direction::Lighter => self.index().saturating_sub(1),
        };
        ALL_LEVELS[index]
    }

    /// `000` collapses to `050`; every other level is itself.
    pub fn canonical(self) -> Self {
        match self {
            Level::L000 => Level::L050,
            other => other,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_LEVELS
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| TokenError::InvalidLevel(s.to_string()))
    }
}

impl TryFrom<String> for Level {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_and_render_symmetrically() {
        for level in ALL_LEVELS {
            assert_eq!(level.as_str().parse::<Level>().ok(), Some(level));
        }
        assert!("50".parse::<Level>().is_err());
        assert!("1100".parse::<Level>().is_err());
    }

    #[test]
    fn stepping_clamps_at_both_ends() {
        assert_eq!(Level::L900.step(Direction::Darker), Level::L1000);
        assert_eq!(Level::L1000.step(Direction::Darker), Level::L1000);
        assert_eq!(Level::L050.step(Direction::Lighter), Level::L000);
        assert_eq!(Level::L000.step(Direction::Lighter), Level::L000);
    }

    #[test]
    fn zero_level_is_alias_of_050() {
        assert_eq!(Level::L000.canonical(), Level::L050);
        assert_eq!(Level::L500.canonical(), Level::L500);
        assert!(!CANONICAL_LEVELS.contains(&Level::L000));
    }
}
