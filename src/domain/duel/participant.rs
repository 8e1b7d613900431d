//! Participant snapshot captured when a duel starts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ParticipantId, ValidationError};

/// An addressable player in a duel.
///
/// Captured once per session and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    handle: String,
    display_name: String,
}

impl Participant {
    /// Creates a participant.
    ///
    /// A blank handle falls back to the identifier, and a blank display name
    /// falls back to the handle.
    pub fn new(
        id: impl Into<String>,
        handle: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let id = ParticipantId::new(id)?;
        let mut handle = handle.into();
        if handle.trim().is_empty() {
            handle = id.to_string();
        }
        let mut display_name = display_name.into();
        if display_name.trim().is_empty() {
            display_name = handle.clone();
        }
        Ok(Self {
            id,
            handle,
            display_name,
        })
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    /// Handle used in notification templates (e.g. `@alice`).
    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
