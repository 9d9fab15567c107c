//! Waitlist Engine - Main Entry Point
//!
//! Composition root: wires the in-memory store, the queue service, the event
//! broadcast and the notification dispatcher. Transport layers (HTTP,
//! WebSocket) attach to the service and to `BroadcastEventSink::subscribe`.

mod config;
mod notifier;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{DaemonConfig, LogFormat};
use notifier::LogNotifier;
use waitlist_core::application::{shutdown_channel, NotificationDispatcher, QueueService};
use waitlist_core::port::id_provider::UuidProvider;
use waitlist_core::port::time_provider::SystemTimeProvider;
use waitlist_infra_memory::{BroadcastEventSink, InMemoryQueueRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env();

    // 2. Initialize logging
    init_logging(config.log_format)?;

    info!("Waitlist Engine v{} starting...", VERSION);

    // 3. Setup dependencies (DI wiring)
    let queue_repo = Arc::new(InMemoryQueueRepository::new());
    let event_sink = Arc::new(BroadcastEventSink::new(config.event_capacity));

    let service = QueueService::new(
        queue_repo.clone(),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        event_sink.clone(),
        config.service_config(),
    );

    // 4. Start notification dispatcher
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let dispatcher = NotificationDispatcher::new(queue_repo.clone(), Arc::new(LogNotifier));
    let events = event_sink.subscribe();
    let dispatcher_handle = tokio::spawn(async move {
        dispatcher.run(events, shutdown_rx).await;
    });

    // 5. Bootstrap configured queues
    for name in &config.bootstrap_queues {
        match service
            .create_queue(name.clone(), config.default_settings.clone())
            .await
        {
            Ok(queue) => info!(queue_id = %queue.id, name = %queue.name, "Bootstrap queue ready"),
            Err(e) => warn!(name = %name, error = %e, "Bootstrap queue rejected"),
        }
    }

    let stats = service.dashboard_stats().await?;
    info!(
        active_queues = stats.active_queues,
        strict_transitions = config.strict_transitions,
        "System ready"
    );
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), dispatcher_handle).await;

    info!("Shutdown complete.");

    Ok(())
}

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("waitlist=info"))?;

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .init(),
    }

    Ok(())
}
