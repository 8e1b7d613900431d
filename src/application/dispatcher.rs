//! EventDispatcher - Pulls inbound events and handles each on its own task.
//!
//! The receive loop only reads and spawns. Engine work, including the
//! notifier round-trips, runs on independent tokio tasks so a slow
//! delivery never stalls the transport.
//!
//! ## Graceful Shutdown
//!
//! On a shutdown signal or end of stream the dispatcher stops reading and
//! waits for in-flight events to finish.

use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

use crate::ports::{EventSource, EventSourceError};

use super::engine::DuelEngine;

/// Configuration for the EventDispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Maximum events handled concurrently.
    pub max_in_flight: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { max_in_flight: 64 }
    }
}

impl DispatcherConfig {
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }
}

/// Feeds inbound events into the engine.
///
/// Events from one source are not handled in arrival order. A `Move`
/// overtaking the `Start` of its duel is rejected with `NoActiveSession`;
/// transports only deliver a participant's move after that participant
/// received the `Challenge`, which is sent once the duel is registered.
pub struct EventDispatcher {
    engine: Arc<DuelEngine>,
    config: DispatcherConfig,
}

impl EventDispatcher {
    pub fn new(engine: Arc<DuelEngine>) -> Self {
        Self::with_config(engine, DispatcherConfig::default())
    }

    pub fn with_config(engine: Arc<DuelEngine>, config: DispatcherConfig) -> Self {
        Self { engine, config }
    }

    /// Run until the source closes or shutdown is signalled.
    ///
    /// Returns the number of events dispatched.
    ///
    /// # Errors
    ///
    /// Returns the source error that ended the loop, after in-flight
    /// events have drained.
    pub async fn run<S>(
        &self,
        mut source: S,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<usize, EventSourceError>
    where
        S: EventSource,
    {
        let permits = Arc::new(Semaphore::new(self.config.max_in_flight));
        let mut tasks = JoinSet::new();
        let mut dispatched = 0;

        let outcome = loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Dispatcher shutting down");
                        break Ok(());
                    }
                }

                next = source.next_event() => {
                    let event = match next {
                        Ok(Some(event)) => event,
                        Ok(None) => {
                            tracing::info!("Event source closed");
                            break Ok(());
                        }
                        Err(err) => {
                            tracing::error!("Event source failed: {}", err);
                            break Err(err);
                        }
                    };

                    let Ok(permit) = permits.clone().acquire_owned().await else {
                        break Ok(());
                    };
                    tracing::trace!(origin = %event.origin(), "Dispatching event");

                    let engine = self.engine.clone();
                    tasks.spawn(async move {
                        engine.handle_event(event).await;
                        drop(permit);
                    });
                    dispatched += 1;
                }

                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(err) = joined {
                        tracing::error!("Event task failed: {}", err);
                    }
                }
            }
        };

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                tracing::error!("Event task failed: {}", err);
            }
        }

        outcome.map(|()| dispatched)
    }
}
