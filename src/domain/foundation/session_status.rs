//! SessionStatus enum for tracking the lifecycle of a duel.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a duel session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    AwaitingMoves,
    Resolved,
}

impl SessionStatus {
    /// Returns true if the session still accepts moves.
    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::AwaitingMoves)
    }
}

impl StateMachine for SessionStatus {
    /// Valid transitions:
    /// - AwaitingMoves -> Resolved
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!((self, target), (AwaitingMoves, Resolved))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            SessionStatus::AwaitingMoves => vec![SessionStatus::Resolved],
            SessionStatus::Resolved => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::AwaitingMoves => "AwaitingMoves",
            SessionStatus::Resolved => "Resolved",
        };
        write!(f, "{}", s)
    }
}
