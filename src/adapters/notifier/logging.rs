//! Notifier that writes every notification to the tracing log.
//!
//! Stands in for a real messaging transport when running locally: the
//! rendered form is just the kind plus its parameters as JSON.

use async_trait::async_trait;

use crate::domain::foundation::{ChannelId, ParticipantId};
use crate::ports::{NotificationKind, NotificationParams, Notifier, NotifierError};

pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }

    fn render(params: &NotificationParams) -> Result<String, NotifierError> {
        serde_json::to_string(params).map_err(|e| NotifierError::Render(e.to_string()))
    }
}

impl Default for TracingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send_to_channel(
        &self,
        channel: &ChannelId,
        kind: NotificationKind,
        params: &NotificationParams,
    ) -> Result<(), NotifierError> {
        let rendered = Self::render(params)?;
        tracing::info!(target: "duel_engine::notify", channel = %channel, kind = %kind, params = %rendered, "channel notification");
        Ok(())
    }

    async fn send_to_participant(
        &self,
        participant: &ParticipantId,
        kind: NotificationKind,
        params: &NotificationParams,
    ) -> Result<(), NotifierError> {
        let rendered = Self::render(params)?;
        tracing::info!(target: "duel_engine::notify", participant = %participant, kind = %kind, params = %rendered, "direct notification");
        Ok(())
    }
}
