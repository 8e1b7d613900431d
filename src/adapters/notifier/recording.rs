//! Recording notifier for testing.
//!
//! Captures every notification instead of delivering it, and can be told to
//! fail for specific recipients.
//!
//! # Panics
//!
//! Methods may panic if the internal lock is poisoned. This adapter is for
//! tests and local runs only.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::RwLock;

use crate::domain::foundation::{ChannelId, ParticipantId};
use crate::ports::{NotificationKind, NotificationParams, Notifier, NotifierError};

/// Where a captured notification was addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Channel(ChannelId),
    Participant(ParticipantId),
}

/// One captured notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub destination: Destination,
    pub kind: NotificationKind,
    pub params: NotificationParams,
}

/// In-memory notifier that records deliveries for assertions.
///
/// # Example
///
/// ```ignore
/// let notifier = Arc::new(RecordingNotifier::new());
/// let engine = DuelEngine::new(registry, notifier.clone());
///
/// engine.submit_move(&alice, "rock").await?;
/// assert_eq!(notifier.count_of(NotificationKind::Result), 1);
/// ```
#[derive(Default)]
pub struct RecordingNotifier {
    sent: RwLock<Vec<SentNotification>>,
    failing: RwLock<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deliveries to this channel or participant id fail.
    pub fn fail_for(&self, recipient: impl Into<String>) {
        self.failing
            .write()
            .expect("RecordingNotifier: failing lock poisoned")
            .insert(recipient.into());
    }

    // === Test Helpers ===

    /// Returns all successfully delivered notifications.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent
            .read()
            .expect("RecordingNotifier: sent lock poisoned")
            .clone()
    }

    /// Notifications sent directly to a participant.
    pub fn sent_to(&self, participant: &str) -> Vec<SentNotification> {
        self.sent()
            .into_iter()
            .filter(|n| {
                matches!(&n.destination, Destination::Participant(p) if p.as_str() == participant)
            })
            .collect()
    }

    /// Notifications posted to a channel.
    pub fn posted_to(&self, channel: &str) -> Vec<SentNotification> {
        self.sent()
            .into_iter()
            .filter(|n| matches!(&n.destination, Destination::Channel(c) if c.as_str() == channel))
            .collect()
    }

    /// Number of delivered notifications of a kind, across all recipients.
    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.sent().iter().filter(|n| n.kind == kind).count()
    }

    pub fn clear(&self) {
        self.sent
            .write()
            .expect("RecordingNotifier: sent lock poisoned")
            .clear();
    }

    fn record(&self, recipient: &str, notification: SentNotification) -> Result<(), NotifierError> {
        let failing = self
            .failing
            .read()
            .expect("RecordingNotifier: failing lock poisoned")
            .contains(recipient);
        if failing {
            return Err(NotifierError::Delivery(format!(
                "Simulated failure for {}",
                recipient
            )));
        }
        self.sent
            .write()
            .expect("RecordingNotifier: sent lock poisoned")
            .push(notification);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_to_channel(
        &self,
        channel: &ChannelId,
        kind: NotificationKind,
        params: &NotificationParams,
    ) -> Result<(), NotifierError> {
        self.record(
            channel.as_str(),
            SentNotification {
                destination: Destination::Channel(channel.clone()),
                kind,
                params: params.clone(),
            },
        )
    }

    async fn send_to_participant(
        &self,
        participant: &ParticipantId,
        kind: NotificationKind,
        params: &NotificationParams,
    ) -> Result<(), NotifierError> {
        self.record(
            participant.as_str(),
            SentNotification {
                destination: Destination::Participant(participant.clone()),
                kind,
                params: params.clone(),
            },
        )
    }
}
