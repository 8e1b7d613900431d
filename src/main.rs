//! Duel Engine - local runner
//!
//! Reads `start`/`move` commands from stdin and logs every notification.
//! Run with: `cargo run`, then type e.g. `start C1 alice bob`. Exits when
//! stdin closes or on Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use duel_engine::adapters::{ConsoleEventSource, TracingNotifier};
use duel_engine::application::{DuelEngine, EventDispatcher, SessionRegistry, SessionSweeper};
use duel_engine::config::{AppConfig, LogFormat};

/// Grace period for blocking work (the stdin reader) at exit.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let result = runtime.block_on(run(config));
    shutdown_runtime(runtime, SHUTDOWN_GRACE);
    result
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let registry = Arc::new(SessionRegistry::new(config.engine.engagement_policy));
    tracing::info!(
        environment = ?config.runtime.environment,
        policy = ?registry.policy(),
        session_ttl_secs = config.engine.session_ttl_secs,
        "Duel Engine starting..."
    );

    let engine = Arc::new(DuelEngine::new(registry, Arc::new(TracingNotifier::new())));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper = config.engine.sweeper().map(|sweeper_config| {
        let sweeper = SessionSweeper::new(engine.clone(), sweeper_config);
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move { sweeper.run(shutdown).await })
    });

    let dispatcher = EventDispatcher::with_config(engine.clone(), config.engine.dispatcher());
    let mut dispatch = tokio::spawn({
        let shutdown = shutdown_rx.clone();
        async move { dispatcher.run(ConsoleEventSource::stdin(), shutdown).await }
    });

    let joined = tokio::select! {
        joined = &mut dispatch => joined,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupt received");
            shutdown_tx.send(true).ok();
            dispatch.await
        }
    };
    let dispatched = joined.context("Dispatcher task panicked")??;

    shutdown_tx.send(true).ok();
    if let Some(handle) = sweeper {
        handle.await.context("Sweeper task panicked")?;
    }

    let active_sessions = engine.registry().active_session_count().await;
    tracing::info!(dispatched, active_sessions, "Duel Engine shutdown");
    Ok(())
}

/// Stops the runtime without waiting on blocking reads beyond `grace`.
///
/// The stdin reader is a blocking task that cannot be cancelled.
fn shutdown_runtime(runtime: Runtime, grace: Duration) {
    runtime.shutdown_timeout(grace);
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.runtime.log_level))
        .context("Invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.runtime.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
    Ok(())
}
