//! Vote types

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A visitor's stance on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("direction must be 'up' or 'down', got '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Aggregate tally for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub up: i64,
    pub down: i64,
    pub score: i64,
}

impl VoteCounts {
    /// Build counts, deriving `score` from the tallies
    pub fn new(up: i64, down: i64) -> Self {
        Self {
            up,
            down,
            score: up - down,
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0)
    }
}

impl Default for VoteCounts {
    fn default() -> Self {
        Self::empty()
    }
}

/// Counts for an item plus the caller's own vote on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    #[serde(flatten)]
    pub counts: VoteCounts,
    pub user_vote: Option<Direction>,
}

/// `POST /api/vote` body
///
/// `direction` stays a raw string so an unknown value is reported as a
/// validation error rather than a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub slug: String,
    pub direction: String,
}
