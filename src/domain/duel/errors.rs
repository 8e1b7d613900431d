//! Duel-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ParticipantId, SessionId, ValidationError};

/// Errors raised while starting duels and recording moves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuelError {
    /// A participant tried to challenge themselves.
    #[error("Participant {0} cannot challenge themselves")]
    InvalidSession(ParticipantId),

    /// A participant is already in another active duel.
    #[error("Participant {0} is already engaged in a duel")]
    AlreadyEngaged(ParticipantId),

    /// The participant is not one of the session's two participants.
    #[error("Participant {participant} is not part of session {session_id}")]
    UnknownParticipant {
        session_id: SessionId,
        participant: ParticipantId,
    },

    /// The participant has no active duel.
    #[error("Participant {0} has no active duel")]
    NoActiveSession(ParticipantId),

    /// The participant already submitted a move in this session.
    #[error("Participant {0} already submitted a move")]
    DuplicateMove(ParticipantId),

    /// The submitted text is not a move in the vocabulary.
    #[error("'{0}' is not a valid move")]
    InvalidMove(String),

    /// The session is resolved and accepts no more moves.
    #[error("Session {0} is already resolved")]
    SessionResolved(SessionId),

    /// The outcome was requested before both moves were in.
    #[error("Session {0} is not resolved yet")]
    NotResolved(SessionId),

    /// A status transition was rejected.
    #[error(transparent)]
    InvalidTransition(#[from] ValidationError),
}

impl DuelError {
    /// Stable code for structured logging.
    pub fn code(&self) -> ErrorCode {
        match self {
            DuelError::InvalidSession(_) => ErrorCode::SelfChallenge,
            DuelError::AlreadyEngaged(_) => ErrorCode::AlreadyEngaged,
            DuelError::UnknownParticipant { .. } => ErrorCode::UnknownParticipant,
            DuelError::NoActiveSession(_) => ErrorCode::NoActiveSession,
            DuelError::DuplicateMove(_) => ErrorCode::DuplicateMove,
            DuelError::InvalidMove(_) => ErrorCode::InvalidMove,
            DuelError::SessionResolved(_) => ErrorCode::SessionResolved,
            DuelError::NotResolved(_) => ErrorCode::SessionNotResolved,
            DuelError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
        }
    }
}
