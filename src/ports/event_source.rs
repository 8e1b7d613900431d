//! EventSource port - Interface for inbound duel commands.
//!
//! Transport adapters parse raw platform payloads into [`InboundEvent`]
//! values. Anything they cannot parse is dropped before it reaches the
//! engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::duel::Participant;
use crate::domain::foundation::{ChannelId, ParticipantId};

/// A command delivered by the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Someone issued a challenge in a channel.
    Start {
        channel: ChannelId,
        challenger: Participant,
        challengee: Option<Participant>,
    },
    /// A participant picked a move.
    Move {
        participant_id: ParticipantId,
        raw_text: String,
    },
}

impl InboundEvent {
    /// Participant that caused the event.
    pub fn origin(&self) -> &ParticipantId {
        match self {
            InboundEvent::Start { challenger, .. } => challenger.id(),
            InboundEvent::Move { participant_id, .. } => participant_id,
        }
    }
}

/// Errors that can occur while reading inbound events.
#[derive(Debug, thiserror::Error)]
pub enum EventSourceError {
    /// Reading from the underlying stream failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection to the transport was lost.
    #[error("Disconnected: {0}")]
    Disconnected(String),
}

/// Port for receiving inbound events one at a time.
#[async_trait]
pub trait EventSource: Send {
    /// Wait for the next event.
    ///
    /// Returns `Ok(None)` once the stream is closed.
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, EventSourceError>;
}
