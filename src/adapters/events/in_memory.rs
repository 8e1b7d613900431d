//! In-memory event source backed by a tokio mpsc channel.
//!
//! Lets tests and embedding code push [`InboundEvent`]s straight into the
//! dispatcher without a transport.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::ports::{EventSource, EventSourceError, InboundEvent};

/// Event source fed through an mpsc channel.
///
/// The stream ends once every sender is dropped.
pub struct ChannelEventSource {
    receiver: mpsc::Receiver<InboundEvent>,
}

impl ChannelEventSource {
    pub fn new(receiver: mpsc::Receiver<InboundEvent>) -> Self {
        Self { receiver }
    }

    /// Create a source and the sender that feeds it.
    pub fn channel(capacity: usize) -> (mpsc::Sender<InboundEvent>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, EventSourceError> {
        Ok(self.receiver.recv().await)
    }
}
