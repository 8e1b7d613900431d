//! SessionSweeper - Background expiry of duels stuck waiting for a move.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `session_ttl` | 1h | Age after which an unresolved duel expires |
//! | `sweep_interval` | 60s | How often to look for expired duels |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use super::engine::DuelEngine;

/// Configuration for the SessionSweeper service.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    pub session_ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl SweeperConfig {
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Periodically expires stale duels through the engine.
pub struct SessionSweeper {
    engine: Arc<DuelEngine>,
    config: SweeperConfig,
}

impl SessionSweeper {
    pub fn new(engine: Arc<DuelEngine>, config: SweeperConfig) -> Self {
        Self { engine, config }
    }

    /// Run the sweep loop until shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.sweep_interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// Expire stale duels once; returns how many were removed.
    pub async fn sweep_once(&self) -> usize {
        let expired = self.engine.expire_stale(self.config.session_ttl).await;
        if expired > 0 {
            tracing::info!(expired, "Swept stale duels");
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingNotifier;
    use crate::application::SessionRegistry;
    use crate::domain::duel::Participant;
    use crate::domain::foundation::ChannelId;
    use crate::ports::NotificationKind;

    async fn engine_with_duel(notifier: Arc<RecordingNotifier>) -> Arc<DuelEngine> {
        let engine = Arc::new(DuelEngine::new(
            Arc::new(SessionRegistry::default()),
            notifier,
        ));
        engine
            .start_game(
                ChannelId::new("C-duels").unwrap(),
                Participant::new("alice", "@alice", "Alice").unwrap(),
                Participant::new("bob", "@bob", "Bob").unwrap(),
            )
            .await
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn sweep_once_keeps_fresh_duels() {
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = engine_with_duel(notifier.clone()).await;

        let sweeper = SessionSweeper::new(engine.clone(), SweeperConfig::default());
        assert_eq!(sweeper.sweep_once().await, 0);
        assert_eq!(engine.registry().active_session_count().await, 1);
    }

    #[tokio::test]
    async fn sweep_once_expires_old_duels() {
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = engine_with_duel(notifier.clone()).await;

        let config = SweeperConfig::default().with_session_ttl(Duration::ZERO);
        let sweeper = SessionSweeper::new(engine.clone(), config);

        assert_eq!(sweeper.sweep_once().await, 1);
        assert_eq!(engine.registry().active_session_count().await, 0);
        assert_eq!(notifier.count_of(NotificationKind::Expired), 2);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = engine_with_duel(notifier.clone()).await;

        let config = SweeperConfig::default()
            .with_session_ttl(Duration::ZERO)
            .with_sweep_interval(Duration::from_millis(10));
        let sweeper = SessionSweeper::new(engine.clone(), config);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(engine.registry().active_session_count().await, 0);
    }

    #[test]
    fn config_defaults_are_reasonable() {
        let config = SweeperConfig::default();
        assert_eq!(config.session_ttl, Duration::from_secs(3600));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }
}
