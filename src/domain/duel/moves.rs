//! Move vocabulary and outcome resolution.
//!
//! The beats relation is fixed: Rock > Scissors, Scissors > Paper,
//! Paper > Rock.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DuelError;

/// One of the three moves a participant can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Every move, in declaration order.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Returns true if `self` defeats `other`.
    pub fn beats(self, other: Move) -> bool {
        use Move::*;
        matches!(
            (self, other),
            (Rock, Scissors) | (Scissors, Paper) | (Paper, Rock)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Move {
    type Err = DuelError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            _ => Err(DuelError::InvalidMove(s.to_string())),
        }
    }
}

/// Resolution of two moves, relative to the order they were given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Tie,
    FirstWins,
    SecondWins,
}

impl Outcome {
    /// The outcome seen from the other side.
    pub fn reversed(self) -> Self {
        match self {
            Outcome::Tie => Outcome::Tie,
            Outcome::FirstWins => Outcome::SecondWins,
            Outcome::SecondWins => Outcome::FirstWins,
        }
    }
}

/// Resolves `first` against `second`.
pub fn resolve(first: Move, second: Move) -> Outcome {
    if first == second {
        Outcome::Tie
    } else if first.beats(second) {
        Outcome::FirstWins
    } else {
        Outcome::SecondWins
    }
}
