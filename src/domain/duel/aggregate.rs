//! Session aggregate entity.
//!
//! A session is one duel between a challenger and a challengee. Moves
//! arrive one at a time in any order; the second distinct move resolves
//! the session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ChannelId, ParticipantId, SessionId, SessionStatus, StateMachine, Timestamp,
};

use super::moves::{resolve, Move, Outcome};
use super::{DuelError, Participant};

/// Session aggregate - one duel between two participants.
///
/// # Invariants
///
/// - `challenger` and `challengee` have distinct identifiers
/// - `moves` only holds entries for the two participants (size 0..=2)
/// - `status` is `Resolved` exactly when `moves` holds two entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    channel: ChannelId,
    challenger: Participant,
    challengee: Participant,
    moves: HashMap<ParticipantId, Move>,
    status: SessionStatus,
    created_at: Timestamp,
}

impl Session {
    /// Create a new session awaiting moves.
    ///
    /// # Errors
    ///
    /// - `InvalidSession` if both sides are the same participant
    pub fn new(
        channel: ChannelId,
        challenger: Participant,
        challengee: Participant,
    ) -> Result<Self, DuelError> {
        Self::with_created_at(channel, challenger, challengee, Timestamp::now())
    }

    /// Create a session with an explicit creation time.
    pub fn with_created_at(
        channel: ChannelId,
        challenger: Participant,
        challengee: Participant,
        created_at: Timestamp,
    ) -> Result<Self, DuelError> {
        if challenger.id() == challengee.id() {
            return Err(DuelError::InvalidSession(challenger.id().clone()));
        }

        Ok(Self {
            id: SessionId::new(),
            channel,
            challenger,
            challengee,
            moves: HashMap::with_capacity(2),
            status: SessionStatus::AwaitingMoves,
            created_at,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Channel that receives the public result announcement.
    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    pub fn challenger(&self) -> &Participant {
        &self.challenger
    }

    pub fn challengee(&self) -> &Participant {
        &self.challengee
    }

    /// Both participants in creation order.
    pub fn participants(&self) -> [&Participant; 2] {
        [&self.challenger, &self.challengee]
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns the move recorded for a participant, if any.
    pub fn move_of(&self, participant_id: &ParticipantId) -> Option<Move> {
        self.moves.get(participant_id).copied()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn has_participant(&self, participant_id: &ParticipantId) -> bool {
        self.challenger.id() == participant_id || self.challengee.id() == participant_id
    }

    /// Returns the other side of the duel.
    pub fn opponent_of(&self, participant_id: &ParticipantId) -> Option<&Participant> {
        if self.challenger.id() == participant_id {
            Some(&self.challengee)
        } else if self.challengee.id() == participant_id {
            Some(&self.challenger)
        } else {
            None
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record a participant's move.
    ///
    /// Returns `true` when this move completes the pair and resolves the
    /// session. The first submission per participant is authoritative.
    ///
    /// # Errors
    ///
    /// - `SessionResolved` if the session no longer accepts moves
    /// - `UnknownParticipant` if the participant is not in this session
    /// - `DuplicateMove` if the participant already moved
    pub fn record_move(
        &mut self,
        participant_id: &ParticipantId,
        played: Move,
    ) -> Result<bool, DuelError> {
        if !self.status.is_open() {
            return Err(DuelError::SessionResolved(self.id));
        }
        if !self.has_participant(participant_id) {
            return Err(DuelError::UnknownParticipant {
                session_id: self.id,
                participant: participant_id.clone(),
            });
        }
        if self.moves.contains_key(participant_id) {
            return Err(DuelError::DuplicateMove(participant_id.clone()));
        }

        self.moves.insert(participant_id.clone(), played);

        if self.moves.len() == 2 {
            self.status = self.status.transition_to(SessionStatus::Resolved)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Compute the verdict of a resolved session.
    ///
    /// # Errors
    ///
    /// - `NotResolved` while moves are still outstanding
    pub fn verdict(&self) -> Result<Verdict, DuelError> {
        let (Some(first), Some(second)) = (
            self.move_of(self.challenger.id()),
            self.move_of(self.challengee.id()),
        ) else {
            return Err(DuelError::NotResolved(self.id));
        };
        if self.status.is_open() {
            return Err(DuelError::NotResolved(self.id));
        }

        Ok(Verdict {
            outcome: resolve(first, second),
            challenger: self.challenger.clone(),
            challenger_move: first,
            challengee: self.challengee.clone(),
            challengee_move: second,
        })
    }
}

/// Result of a resolved duel.
///
/// `outcome` is relative to (challenger, challengee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    outcome: Outcome,
    challenger: Participant,
    challenger_move: Move,
    challengee: Participant,
    challengee_move: Move,
}

impl Verdict {
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_draw(&self) -> bool {
        self.outcome == Outcome::Tie
    }

    /// Outcome plus (winner, loser); on a tie, (challenger, challengee).
    pub fn ranked(&self) -> (Outcome, &Participant, &Participant) {
        match self.outcome {
            Outcome::SecondWins => (self.outcome, &self.challengee, &self.challenger),
            Outcome::Tie | Outcome::FirstWins => {
                (self.outcome, &self.challenger, &self.challengee)
            }
        }
    }

    pub fn winner(&self) -> Option<&Participant> {
        match self.outcome {
            Outcome::Tie => None,
            _ => Some(self.ranked().1),
        }
    }

    pub fn loser(&self) -> Option<&Participant> {
        match self.outcome {
            Outcome::Tie => None,
            _ => Some(self.ranked().2),
        }
    }

    pub fn challenger(&self) -> (&Participant, Move) {
        (&self.challenger, self.challenger_move)
    }

    pub fn challengee(&self) -> (&Participant, Move) {
        (&self.challengee, self.challengee_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str) -> Participant {
        Participant::new(id, format!("@{}", id), id.to_uppercase()).unwrap()
    }

    fn pid(id: &str) -> ParticipantId {
        ParticipantId::new(id).unwrap()
    }

    fn test_session() -> Session {
        Session::new(
            ChannelId::new("C-general").unwrap(),
            participant("alice"),
            participant("bob"),
        )
        .unwrap()
    }

    // Construction tests

    #[test]
    fn new_session_awaits_moves() {
        let session = test_session();
        assert_eq!(session.status(), SessionStatus::AwaitingMoves);
        assert_eq!(session.move_count(), 0);
    }

    #[test]
    fn new_session_rejects_self_challenge() {
        let result = Session::new(
            ChannelId::new("C-general").unwrap(),
            participant("alice"),
            participant("alice"),
        );
        assert_eq!(result.unwrap_err(), DuelError::InvalidSession(pid("alice")));
    }

    #[test]
    fn participants_keep_creation_order() {
        let session = test_session();
        let [first, second] = session.participants();
        assert_eq!(first.id(), &pid("alice"));
        assert_eq!(second.id(), &pid("bob"));
    }

    #[test]
    fn opponent_of_returns_other_side() {
        let session = test_session();
        assert_eq!(session.opponent_of(&pid("alice")).unwrap().id(), &pid("bob"));
        assert_eq!(session.opponent_of(&pid("bob")).unwrap().id(), &pid("alice"));
        assert!(session.opponent_of(&pid("carol")).is_none());
    }

    // Move recording tests

    #[test]
    fn first_move_does_not_resolve() {
        let mut session = test_session();
        let resolved = session.record_move(&pid("alice"), Move::Rock).unwrap();
        assert!(!resolved);
        assert_eq!(session.status(), SessionStatus::AwaitingMoves);
        assert_eq!(session.move_of(&pid("alice")), Some(Move::Rock));
    }

    #[test]
    fn second_distinct_move_resolves() {
        let mut session = test_session();
        session.record_move(&pid("bob"), Move::Scissors).unwrap();
        let resolved = session.record_move(&pid("alice"), Move::Rock).unwrap();
        assert!(resolved);
        assert_eq!(session.status(), SessionStatus::Resolved);
    }

    #[test]
    fn duplicate_move_is_rejected_and_first_kept() {
        let mut session = test_session();
        session.record_move(&pid("alice"), Move::Rock).unwrap();

        let err = session.record_move(&pid("alice"), Move::Paper).unwrap_err();
        assert_eq!(err, DuelError::DuplicateMove(pid("alice")));
        assert_eq!(session.move_of(&pid("alice")), Some(Move::Rock));
        assert_eq!(session.status(), SessionStatus::AwaitingMoves);
    }

    #[test]
    fn unknown_participant_is_rejected() {
        let mut session = test_session();
        let err = session.record_move(&pid("carol"), Move::Rock).unwrap_err();
        assert!(matches!(err, DuelError::UnknownParticipant { .. }));
        assert_eq!(session.move_count(), 0);
    }

    #[test]
    fn resolved_session_accepts_no_third_move() {
        let mut session = test_session();
        session.record_move(&pid("alice"), Move::Rock).unwrap();
        session.record_move(&pid("bob"), Move::Rock).unwrap();

        for who in ["alice", "bob", "carol"] {
            let err = session.record_move(&pid(who), Move::Paper).unwrap_err();
            assert_eq!(err, DuelError::SessionResolved(*session.id()));
        }
        assert_eq!(session.move_count(), 2);
    }

    // Verdict tests

    #[test]
    fn verdict_requires_resolution() {
        let mut session = test_session();
        assert!(matches!(session.verdict(), Err(DuelError::NotResolved(_))));

        session.record_move(&pid("alice"), Move::Rock).unwrap();
        assert!(matches!(session.verdict(), Err(DuelError::NotResolved(_))));
    }

    #[test]
    fn verdict_challenger_wins() {
        let mut session = test_session();
        session.record_move(&pid("alice"), Move::Rock).unwrap();
        session.record_move(&pid("bob"), Move::Scissors).unwrap();

        let verdict = session.verdict().unwrap();
        let (outcome, winner, loser) = verdict.ranked();
        assert_eq!(outcome, Outcome::FirstWins);
        assert_eq!(winner.id(), &pid("alice"));
        assert_eq!(loser.id(), &pid("bob"));
    }

    #[test]
    fn verdict_challengee_wins_regardless_of_arrival_order() {
        let mut session = test_session();
        session.record_move(&pid("bob"), Move::Paper).unwrap();
        session.record_move(&pid("alice"), Move::Rock).unwrap();

        let verdict = session.verdict().unwrap();
        assert_eq!(verdict.outcome(), Outcome::SecondWins);
        assert_eq!(verdict.winner().unwrap().id(), &pid("bob"));
        assert_eq!(verdict.loser().unwrap().id(), &pid("alice"));
    }

    #[test]
    fn verdict_tie_keeps_creation_order() {
        let mut session = test_session();
        session.record_move(&pid("bob"), Move::Paper).unwrap();
        session.record_move(&pid("alice"), Move::Paper).unwrap();

        let verdict = session.verdict().unwrap();
        assert!(verdict.is_draw());
        assert!(verdict.winner().is_none());
        let (_, first, second) = verdict.ranked();
        assert_eq!(first.id(), &pid("alice"));
        assert_eq!(second.id(), &pid("bob"));
        assert_eq!(verdict.challengee().1, Move::Paper);
    }
}
