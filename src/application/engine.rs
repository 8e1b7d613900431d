//! DuelEngine - orchestrates the registry, sessions and notifier.
//!
//! Notification failures are logged per recipient and never undo a state
//! change: a resolved duel stays resolved even if every message is lost.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::duel::{DuelError, Move, Participant, Session, Verdict};
use crate::domain::foundation::{ChannelId, ParticipantId, SessionId, Timestamp};
use crate::ports::{InboundEvent, NotificationKind, NotificationParams, Notifier};

use super::registry::{SessionRegistry, StartedSession};

/// Result of a successful move submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Move stored; the opponent has not moved yet.
    Waiting { session_id: SessionId },
    /// Move stored and the duel resolved.
    Resolved { session_id: SessionId, verdict: Verdict },
}

enum Recipient<'a> {
    Channel(&'a ChannelId),
    Participant(&'a ParticipantId),
}

/// Entry point for challenge and move commands.
pub struct DuelEngine {
    registry: Arc<SessionRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl DuelEngine {
    pub fn new(registry: Arc<SessionRegistry>, notifier: Arc<dyn Notifier>) -> Self {
        Self { registry, notifier }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Handle one inbound event, logging instead of returning errors.
    pub async fn handle_event(&self, event: InboundEvent) {
        match event {
            InboundEvent::Start {
                channel,
                challenger,
                challengee: Some(challengee),
            } => {
                if let Err(err) = self.start_game(channel, challenger, challengee).await {
                    debug!(code = %err.code(), "Start rejected: {}", err);
                }
            }
            InboundEvent::Start {
                channel,
                challenger,
                challengee: None,
            } => {
                debug!(channel = %channel, participant = %challenger.id(), "Start without opponent");
                let params = NotificationParams::new().with("Name", challenger.handle());
                self.notify(
                    Recipient::Participant(challenger.id()),
                    NotificationKind::MissingOpponent,
                    &params,
                )
                .await;
            }
            InboundEvent::Move {
                participant_id,
                raw_text,
            } => {
                if let Err(err) = self.submit_move(&participant_id, &raw_text).await {
                    debug!(code = %err.code(), participant = %participant_id, "Move rejected: {}", err);
                }
            }
        }
    }

    /// Start a duel and challenge both participants.
    ///
    /// Rejections are reported to the challenger and also returned.
    pub async fn start_game(
        &self,
        channel: ChannelId,
        challenger: Participant,
        challengee: Participant,
    ) -> Result<SessionId, DuelError> {
        let started = self
            .registry
            .start_session(channel, challenger.clone(), challengee.clone())
            .await;

        let StartedSession {
            session,
            superseded,
        } = match started {
            Ok(started) => started,
            Err(err) => {
                self.report_start_error(&challenger, &challengee, &err).await;
                return Err(err);
            }
        };

        info!(
            session_id = %session.id(),
            channel = %session.channel(),
            challenger = %challenger.id(),
            challengee = %challengee.id(),
            "Duel started"
        );

        self.notify_displaced(&superseded, NotificationKind::Superseded)
            .await;

        let challenger_params = NotificationParams::new()
            .with("Name", challenger.handle())
            .with("Opponent", challengee.handle());
        let challengee_params = NotificationParams::new()
            .with("Name", challengee.handle())
            .with("Opponent", challenger.handle());

        futures::join!(
            self.notify(
                Recipient::Participant(challenger.id()),
                NotificationKind::Challenge,
                &challenger_params,
            ),
            self.notify(
                Recipient::Participant(challengee.id()),
                NotificationKind::Challenge,
                &challengee_params,
            ),
        );

        Ok(*session.id())
    }

    /// Parse and record a move, announcing the result when the duel resolves.
    ///
    /// Per-submission errors are reported to the submitter only.
    pub async fn submit_move(
        &self,
        participant_id: &ParticipantId,
        raw_text: &str,
    ) -> Result<Submission, DuelError> {
        let recorded = match raw_text.parse::<Move>() {
            Ok(played) => self.registry.record_move(participant_id, played).await,
            Err(err) => Err(err),
        };

        let recorded = match recorded {
            Ok(recorded) => recorded,
            Err(err) => {
                self.report_move_error(participant_id, raw_text, &err).await;
                return Err(err);
            }
        };

        let session_id = *recorded.session.id();
        if !recorded.resolved {
            debug!(session_id = %session_id, participant = %participant_id, "Move recorded, waiting for opponent");
            return Ok(Submission::Waiting { session_id });
        }

        let verdict = recorded.session.verdict()?;
        info!(
            session_id = %session_id,
            outcome = ?verdict.outcome(),
            challenger_move = %verdict.challenger().1,
            challengee_move = %verdict.challengee().1,
            "Duel resolved"
        );
        self.announce(&recorded.session, &verdict).await;

        Ok(Submission::Resolved {
            session_id,
            verdict,
        })
    }

    /// Drop duels that have waited longer than `max_age` and tell both sides.
    ///
    /// Returns the number of expired sessions.
    pub async fn expire_stale(&self, max_age: Duration) -> usize {
        let expired = self.registry.remove_stale(max_age, Timestamp::now()).await;
        for session in &expired {
            info!(session_id = %session.id(), moves = session.move_count(), "Duel expired");
        }
        self.notify_displaced(&expired, NotificationKind::Expired)
            .await;
        expired.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Sends the three result notifications concurrently.
    async fn announce(&self, session: &Session, verdict: &Verdict) {
        let (_, first, second) = verdict.ranked();

        if verdict.is_draw() {
            let params = NotificationParams::new()
                .with("Challenger", first.handle())
                .with("Challengee", second.handle());
            futures::join!(
                self.notify(
                    Recipient::Channel(session.channel()),
                    NotificationKind::Draw,
                    &params
                ),
                self.notify(
                    Recipient::Participant(first.id()),
                    NotificationKind::Draw,
                    &params
                ),
                self.notify(
                    Recipient::Participant(second.id()),
                    NotificationKind::Draw,
                    &params
                ),
            );
        } else {
            let params = NotificationParams::new()
                .with("Winner", first.handle())
                .with("Loser", second.handle());
            futures::join!(
                self.notify(
                    Recipient::Channel(session.channel()),
                    NotificationKind::Result,
                    &params
                ),
                self.notify(
                    Recipient::Participant(first.id()),
                    NotificationKind::Winner,
                    &params
                ),
                self.notify(
                    Recipient::Participant(second.id()),
                    NotificationKind::Loser,
                    &params
                ),
            );
        }
    }

    async fn report_start_error(
        &self,
        challenger: &Participant,
        challengee: &Participant,
        err: &DuelError,
    ) {
        let (kind, params) = match err {
            DuelError::AlreadyEngaged(busy) => {
                let handle = if busy == challengee.id() {
                    challengee.handle()
                } else {
                    challenger.handle()
                };
                (
                    NotificationKind::AlreadyEngaged,
                    NotificationParams::new().with("Name", handle),
                )
            }
            DuelError::InvalidSession(_) => (
                NotificationKind::SelfChallenge,
                NotificationParams::new().with("Name", challenger.handle()),
            ),
            other => {
                warn!(code = %other.code(), "Unexpected start error: {}", other);
                return;
            }
        };
        self.notify(Recipient::Participant(challenger.id()), kind, &params)
            .await;
    }

    async fn report_move_error(&self, participant_id: &ParticipantId, raw_text: &str, err: &DuelError) {
        let kind = match err {
            DuelError::InvalidMove(_) => NotificationKind::InvalidMove,
            DuelError::NoActiveSession(_) | DuelError::UnknownParticipant { .. } => {
                NotificationKind::NotInDuel
            }
            DuelError::DuplicateMove(_) | DuelError::SessionResolved(_) => {
                NotificationKind::MoveAlreadyRecorded
            }
            other => {
                warn!(code = %other.code(), participant = %participant_id, "Unexpected move error: {}", other);
                return;
            }
        };
        let params = NotificationParams::new().with("Move", raw_text.trim());
        self.notify(Recipient::Participant(participant_id), kind, &params)
            .await;
    }

    /// Tells both participants of each removed session, concurrently.
    async fn notify_displaced(&self, sessions: &[Session], kind: NotificationKind) {
        let deliveries: Vec<(ParticipantId, NotificationParams)> = sessions
            .iter()
            .flat_map(|session| {
                [
                    (session.challenger(), session.challengee()),
                    (session.challengee(), session.challenger()),
                ]
            })
            .map(|(recipient, opponent)| {
                (
                    recipient.id().clone(),
                    NotificationParams::new().with("Opponent", opponent.handle()),
                )
            })
            .collect();

        join_all(
            deliveries
                .iter()
                .map(|(recipient, params)| self.notify(Recipient::Participant(recipient), kind, params)),
        )
        .await;
    }

    /// One delivery attempt; failures are logged and swallowed.
    async fn notify(&self, recipient: Recipient<'_>, kind: NotificationKind, params: &NotificationParams) {
        let result = match recipient {
            Recipient::Channel(channel) => {
                let result = self.notifier.send_to_channel(channel, kind, params).await;
                if let Err(err) = &result {
                    warn!(channel = %channel, kind = %kind, "Failed to notify channel: {}", err);
                }
                result
            }
            Recipient::Participant(participant) => {
                let result = self
                    .notifier
                    .send_to_participant(participant, kind, params)
                    .await;
                if let Err(err) = &result {
                    warn!(participant = %participant, kind = %kind, "Failed to notify participant: {}", err);
                }
                result
            }
        };
        if result.is_ok() {
            debug!(kind = %kind, "Notification delivered");
        }
    }
}
