//! Discord adapter: gateway client, event handler and relay worker wiring.
//!
//! [`run_discord`] starts two concurrent pieces:
//! 1. **Gateway client** -- serenity shard(s) delivering events to
//!    [`handler::RelayHandler`], which admits and enqueues messages
//! 2. **Relay worker** -- drains the queue in order through the
//!    [`crate::relay::RelayPipeline`]
//!
//! Blocks until the client stops (Ctrl+C or a fatal gateway error).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use serenity::Client;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::Connector;
use crate::config::RelayConfig;
use crate::relay::{run_worker, Gatekeeper, InboundEvent, RelayPipeline};

pub mod client;
pub mod convert;
pub mod handler;

use client::{DiscordResolver, HttpFetcher};
use handler::RelayHandler;

/// Upper bound on waiting for queued events after the gateway stops.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Connector`] that runs the relay against the Discord gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscordConnector;

#[async_trait]
impl Connector for DiscordConnector {
    async fn connect(&self, config: RelayConfig) -> anyhow::Result<()> {
        run_discord(config).await
    }
}

/// Connect to Discord and relay until shutdown.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the gateway
/// connection fails.
pub async fn run_discord(config: RelayConfig) -> anyhow::Result<()> {
    let (queue_tx, queue_rx) = mpsc::channel::<InboundEvent>(config.queue_capacity);

    let handler = RelayHandler::new(Gatekeeper::new(config.source), config.target, queue_tx);

    let mut client = Client::builder(config.token.expose(), RelayHandler::intents())
        .event_handler(handler)
        .await
        .context("failed to build discord client")?;

    let resolver = DiscordResolver::new(Arc::clone(&client.http));
    let pipeline = RelayPipeline::new(
        config.target,
        Arc::new(resolver),
        Arc::new(HttpFetcher::default()),
    );
    let worker = tokio::spawn(run_worker(pipeline, queue_rx));

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        info!("shutdown requested");
        shard_manager.shutdown_all().await;
    });

    info!("connecting to discord gateway");
    let result = client.start().await;

    // Dropping the client drops the handler and its queue sender, which lets
    // the worker finish whatever is still queued.
    drop(client);
    match tokio::time::timeout(DRAIN_TIMEOUT, worker).await {
        Ok(Ok(_stats)) => {}
        Ok(Err(e)) => warn!(error = %e, "relay worker panicked"),
        Err(_) => warn!("relay worker did not drain in time"),
    }

    result.context("discord gateway connection failed")
}
