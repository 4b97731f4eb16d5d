//! Tests for `src/app.rs` — no connection without valid configuration.

use std::sync::Mutex;

use async_trait::async_trait;

use discord_relay::app::{launch, Connector, StartupError};
use discord_relay::config::{ConfigError, RelayConfig, Settings};
use discord_relay::relay::ConduitId;

#[derive(Default)]
struct RecordingConnector {
    connected: Mutex<Vec<RelayConfig>>,
    fail: bool,
}

impl RecordingConnector {
    fn attempts(&self) -> usize {
        self.connected.lock().expect("connected lock").len()
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn connect(&self, config: RelayConfig) -> anyhow::Result<()> {
        self.connected.lock().expect("connected lock").push(config);
        if self.fail {
            anyhow::bail!("401: Unauthorized");
        }
        Ok(())
    }
}

fn settings(token: Option<&str>, source: Option<u64>, target: Option<u64>) -> Settings {
    Settings {
        token: token.map(str::to_owned),
        source_channel_id: source,
        target_channel_id: target,
        queue_capacity: None,
    }
}

#[tokio::test]
async fn zero_source_aborts_before_connecting() {
    let connector = RecordingConnector::default();

    let result = launch(settings(Some("abc"), Some(0), Some(5)), &connector).await;

    match result {
        Err(StartupError::Config(ConfigError::MissingSourceChannel)) => {}
        other => panic!("expected missing source error, got {other:?}"),
    }
    assert_eq!(connector.attempts(), 0);
}

#[tokio::test]
async fn missing_token_aborts_before_connecting() {
    let connector = RecordingConnector::default();

    let err = launch(settings(None, Some(1), Some(2)), &connector)
        .await
        .expect_err("should fail");

    assert_eq!(
        err.to_string(),
        "No Discord token found in environment variables"
    );
    assert_eq!(connector.attempts(), 0);
}

#[tokio::test]
async fn missing_target_aborts_before_connecting() {
    let connector = RecordingConnector::default();

    let result = launch(settings(Some("abc"), Some(1), None), &connector).await;

    assert!(matches!(
        result,
        Err(StartupError::Config(ConfigError::MissingTargetChannel))
    ));
    assert_eq!(connector.attempts(), 0);
}

#[tokio::test]
async fn valid_settings_connect_once_with_validated_config() {
    let connector = RecordingConnector::default();

    launch(settings(Some("abc"), Some(1), Some(2)), &connector)
        .await
        .expect("should launch");

    let connected = connector.connected.lock().expect("connected lock");
    assert_eq!(connected.len(), 1);
    assert_eq!(connected[0].source, ConduitId(1));
    assert_eq!(connected[0].target, ConduitId(2));
    assert_eq!(connected[0].token.expose(), "abc");
}

#[tokio::test]
async fn connection_failure_is_a_startup_error() {
    let connector = RecordingConnector {
        fail: true,
        ..RecordingConnector::default()
    };

    let err = launch(settings(Some("abc"), Some(1), Some(2)), &connector)
        .await
        .expect_err("should fail");

    assert!(matches!(err, StartupError::Connect(_)));
    assert!(err.to_string().starts_with("failed to start bot"));
    assert_eq!(connector.attempts(), 1);
}
