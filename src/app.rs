//! Startup contract: validate configuration, then connect.
//!
//! [`launch`] is the only path from raw [`Settings`] to a running relay.
//! A configuration problem is logged and returned before the [`Connector`]
//! is ever invoked, so a misconfigured process never opens a gateway
//! connection.

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::{ConfigError, RelayConfig, Settings};

/// Something that establishes the platform connection and runs the relay.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect with a validated configuration and run until shutdown.
    async fn connect(&self, config: RelayConfig) -> anyhow::Result<()>;
}

/// Fatal startup failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration is missing or invalid; no connection was attempted.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The connection could not be established or terminated abnormally.
    #[error("failed to start bot: {0}")]
    Connect(anyhow::Error),
}

/// Validate `settings` and, only if valid, hand control to `connector`.
///
/// # Errors
///
/// Returns [`StartupError::Config`] before any connection attempt when a
/// required value is missing, or [`StartupError::Connect`] when the
/// connector fails.
pub async fn launch(settings: Settings, connector: &dyn Connector) -> Result<(), StartupError> {
    let config = match settings.validate() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return Err(StartupError::Config(e));
        }
    };

    info!(source_channel = %config.source, target_channel = %config.target, "starting bot");

    connector.connect(config).await.map_err(|e| {
        error!(error = %e, "failed to start bot");
        StartupError::Connect(e)
    })
}
