//! Error types shared by the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Stable error codes, emitted as a structured field in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Input errors
    InvalidMove,
    SelfChallenge,

    // Engagement errors
    AlreadyEngaged,
    NoActiveSession,
    UnknownParticipant,

    // State errors
    InvalidStateTransition,
    DuplicateMove,
    SessionResolved,
    SessionNotResolved,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidMove => "INVALID_MOVE",
            ErrorCode::SelfChallenge => "SELF_CHALLENGE",
            ErrorCode::AlreadyEngaged => "ALREADY_ENGAGED",
            ErrorCode::NoActiveSession => "NO_ACTIVE_SESSION",
            ErrorCode::UnknownParticipant => "UNKNOWN_PARTICIPANT",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::DuplicateMove => "DUPLICATE_MOVE",
            ErrorCode::SessionResolved => "SESSION_RESOLVED",
            ErrorCode::SessionNotResolved => "SESSION_NOT_RESOLVED",
        };
        write!(f, "{}", s)
    }
}
