//! # devicehubd: devicehub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Construct the event bus and the sensor reading source
//! - Construct the device registry, injecting both
//! - Bind to a TCP port and serve newline-delimited JSON
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use devicehub_adapter_tcp_json::{Dispatcher, serve_with_shutdown};
use devicehub_adapter_virtual::VirtualReadings;
use devicehub_app::event_bus::InProcessEventBus;
use devicehub_app::ports::ReadingSource;
use devicehub_app::services::device_registry::DeviceRegistry;
use devicehub_domain::event::Event;
use devicehub_domain::reading::FixedReading;

use crate::config::{Config, DEFAULT_FILTER};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.logging.filter)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Event bus
    let event_bus = InProcessEventBus::new(256);
    spawn_event_logger(event_bus.subscribe());

    // Sensor readings
    let readings: Arc<dyn ReadingSource> = if config.integrations.virtual_enabled {
        tracing::info!(baselines = ?config.sensors, "virtual sensor readings enabled");
        Arc::new(VirtualReadings::new(config.sensors))
    } else {
        Arc::new(FixedReading::default())
    };

    // Registry
    let registry = Arc::new(DeviceRegistry::new(event_bus).with_readings(readings));
    let dispatcher = Dispatcher::new(Arc::clone(&registry));

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "devicehubd listening");

    serve_with_shutdown(listener, dispatcher, shutdown_signal()).await;

    let states = registry.list_states();
    for status in &states {
        tracing::debug!(device_id = %status.id, ?status, "final device state");
    }
    tracing::info!(devices = states.len(), "server shutdown complete");
    Ok(())
}

/// Log every device event at debug level until the bus closes.
fn spawn_event_logger(mut events: broadcast::Receiver<Event>) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::debug!(
                    kind = %event.kind,
                    device_id = %event.device_id,
                    data = %event.data,
                    "device event"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event logger fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
