//! Notifier port - Interface for delivering duel notifications.
//!
//! The engine only names *what* to say (a [`NotificationKind`] plus
//! substitution parameters). Rendering templates and talking to the
//! messaging transport are the adapter's job.
//!
//! ## Parameters per kind
//!
//! | Kind | Recipient | Params |
//! |------|-----------|--------|
//! | `Challenge` | each participant | `Name`, `Opponent` |
//! | `Result` | channel | `Winner`, `Loser` |
//! | `Winner` / `Loser` | participant | `Winner`, `Loser` |
//! | `Draw` | channel, both participants | `Challenger`, `Challengee` |
//! | `AlreadyEngaged` | challenger | `Name` |
//! | `InvalidMove` | submitter | `Move` |
//! | `Expired` / `Superseded` | participant | `Opponent` |

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, ParticipantId};

/// Kinds of notification the engine can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Invitation to pick a move.
    Challenge,
    /// Public announcement of a decisive duel.
    Result,
    Winner,
    Loser,
    Draw,
    /// One of the parties is already in a duel.
    AlreadyEngaged,
    /// The submitted text was not a move.
    InvalidMove,
    /// A move arrived from someone with no active duel.
    NotInDuel,
    /// The submitter already moved in this duel.
    MoveAlreadyRecorded,
    SelfChallenge,
    /// A start command named nobody to challenge.
    MissingOpponent,
    /// The duel timed out waiting for moves.
    Expired,
    /// The duel was replaced by a newer challenge.
    Superseded,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Challenge => "challenge",
            NotificationKind::Result => "result",
            NotificationKind::Winner => "winner",
            NotificationKind::Loser => "loser",
            NotificationKind::Draw => "draw",
            NotificationKind::AlreadyEngaged => "already_engaged",
            NotificationKind::InvalidMove => "invalid_move",
            NotificationKind::NotInDuel => "not_in_duel",
            NotificationKind::MoveAlreadyRecorded => "move_already_recorded",
            NotificationKind::SelfChallenge => "self_challenge",
            NotificationKind::MissingOpponent => "missing_opponent",
            NotificationKind::Expired => "expired",
            NotificationKind::Superseded => "superseded",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named substitution values for a notification template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationParams(BTreeMap<String, String>);

impl NotificationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Errors that can occur while delivering a notification.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifierError {
    /// The template for a kind could not be rendered.
    #[error("Render error: {0}")]
    Render(String),

    /// The transport refused or failed the delivery.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Port for rendering and delivering notifications.
///
/// Each call is one delivery attempt; the engine never retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post a notification to a channel.
    async fn send_to_channel(
        &self,
        channel: &ChannelId,
        kind: NotificationKind,
        params: &NotificationParams,
    ) -> Result<(), NotifierError>;

    /// Send a notification to a participant directly.
    async fn send_to_participant(
        &self,
        participant: &ParticipantId,
        kind: NotificationKind,
        params: &NotificationParams,
    ) -> Result<(), NotifierError>;
}
