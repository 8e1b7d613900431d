//! Session registry - every active duel, keyed by session and participant.
//!
//! # Architecture
//!
//! ```text
//! sessions:      session-1 → Session(alice, bob)
//!                session-2 → Session(carol, dave)
//! participants:  alice → session-1, bob → session-1,
//!                carol → session-2, dave → session-2
//! ```
//!
//! # Thread Safety
//!
//! Both maps sit behind one `tokio::sync::Mutex`. Every operation holds the
//! lock for its whole check-mutate-unregister sequence and never awaits
//! anything else while holding it, so two concurrent moves for the same
//! session cannot both see it unresolved.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::domain::duel::{DuelError, Move, Participant, Session};
use crate::domain::foundation::{ChannelId, ParticipantId, SessionId, Timestamp};

/// What to do when a challenge names a participant who is already dueling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementPolicy {
    /// Refuse the new duel with `AlreadyEngaged`.
    #[default]
    Reject,
    /// Drop the participant's previous duel and start the new one.
    Supersede,
}

/// A freshly registered session.
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session: Session,
    /// Sessions removed to make room under [`EngagementPolicy::Supersede`].
    pub superseded: Vec<Session>,
}

/// Snapshot of a session after a move was recorded.
#[derive(Debug, Clone)]
pub struct RecordedMove {
    pub session: Session,
    /// True when this move resolved the session; it is then no longer registered.
    pub resolved: bool,
}

#[derive(Debug, Default)]
struct RegistryState {
    sessions: HashMap<SessionId, Session>,
    participants: HashMap<ParticipantId, SessionId>,
}

impl RegistryState {
    fn unregister(&mut self, session_id: &SessionId) -> Option<Session> {
        let session = self.sessions.remove(session_id)?;
        for participant in session.participants() {
            if self.participants.get(participant.id()) == Some(session_id) {
                self.participants.remove(participant.id());
            }
        }
        Some(session)
    }
}

/// Process-wide tracker of active duels.
pub struct SessionRegistry {
    state: Mutex<RegistryState>,
    policy: EngagementPolicy,
}

impl SessionRegistry {
    /// Create an empty registry with the given engagement policy.
    pub fn new(policy: EngagementPolicy) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            policy,
        }
    }

    pub fn policy(&self) -> EngagementPolicy {
        self.policy
    }

    /// Start a new duel and map both participants to it.
    ///
    /// # Errors
    ///
    /// - `InvalidSession` on self-challenge
    /// - `AlreadyEngaged` if either side is dueling and the policy is `Reject`
    pub async fn start_session(
        &self,
        channel: ChannelId,
        challenger: Participant,
        challengee: Participant,
    ) -> Result<StartedSession, DuelError> {
        let session = Session::new(channel, challenger, challengee)?;
        let mut state = self.state.lock().await;

        let engaged: Vec<(ParticipantId, SessionId)> = session
            .participants()
            .iter()
            .filter_map(|p| state.participants.get(p.id()).map(|sid| (p.id().clone(), *sid)))
            .collect();

        let mut superseded = Vec::new();
        if let Some((participant, _)) = engaged.first() {
            match self.policy {
                EngagementPolicy::Reject => {
                    return Err(DuelError::AlreadyEngaged(participant.clone()));
                }
                EngagementPolicy::Supersede => {
                    for (_, session_id) in &engaged {
                        if let Some(previous) = state.unregister(session_id) {
                            tracing::debug!(session_id = %session_id, "Superseding session");
                            superseded.push(previous);
                        }
                    }
                }
            }
        }

        let id = *session.id();
        for participant in session.participants() {
            state.participants.insert(participant.id().clone(), id);
        }
        state.sessions.insert(id, session.clone());

        Ok(StartedSession {
            session,
            superseded,
        })
    }

    /// Record a move for the participant's active duel.
    ///
    /// When the move resolves the duel, the session and both participant
    /// mappings are removed before the lock is released.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` if the participant is not dueling
    /// - any error from [`Session::record_move`]
    pub async fn record_move(
        &self,
        participant_id: &ParticipantId,
        played: Move,
    ) -> Result<RecordedMove, DuelError> {
        let mut state = self.state.lock().await;

        let session_id = *state
            .participants
            .get(participant_id)
            .ok_or_else(|| DuelError::NoActiveSession(participant_id.clone()))?;
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| DuelError::NoActiveSession(participant_id.clone()))?;

        let resolved = session.record_move(participant_id, played)?;
        let snapshot = if resolved {
            state
                .unregister(&session_id)
                .ok_or_else(|| DuelError::NoActiveSession(participant_id.clone()))?
        } else {
            session.clone()
        };

        Ok(RecordedMove {
            session: snapshot,
            resolved,
        })
    }

    /// Remove every unresolved session older than `max_age`.
    pub async fn remove_stale(&self, max_age: Duration, now: Timestamp) -> Vec<Session> {
        let mut state = self.state.lock().await;

        let stale: Vec<SessionId> = state
            .sessions
            .values()
            .filter(|s| s.status().is_open() && now.elapsed_since(s.created_at()) >= max_age)
            .map(|s| *s.id())
            .collect();

        stale
            .iter()
            .filter_map(|id| state.unregister(id))
            .collect()
    }

    /// Snapshot of the participant's active session, if any.
    pub async fn session_for(&self, participant_id: &ParticipantId) -> Option<Session> {
        let state = self.state.lock().await;
        state
            .participants
            .get(participant_id)
            .and_then(|id| state.sessions.get(id))
            .cloned()
    }

    /// Snapshot of a session by id.
    pub async fn get(&self, session_id: &SessionId) -> Option<Session> {
        self.state.lock().await.sessions.get(session_id).cloned()
    }

    pub async fn is_engaged(&self, participant_id: &ParticipantId) -> bool {
        self.state.lock().await.participants.contains_key(participant_id)
    }

    /// Number of active sessions (diagnostics).
    pub async fn active_session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(EngagementPolicy::default())
    }
}
