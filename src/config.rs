//! Configuration loading and validation.
//!
//! Settings are layered: `relay.toml` (or `$RELAY_CONFIG_PATH`) < environment
//! variables. The raw [`Settings`] are then validated once into an immutable
//! [`RelayConfig`]; nothing downstream reads the environment.
//!
//! Environment variables:
//! - `DISCORD_TOKEN` — bot credential (required)
//! - `SOURCE_CHANNEL_ID` — channel to mirror (required, non-zero)
//! - `TARGET_CHANNEL_ID` — channel to post into (required, non-zero)
//! - `RELAY_QUEUE_CAPACITY` — buffered events between gateway and worker
//! - `RELAY_CONFIG_PATH` — alternative config file location

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::relay::ConduitId;

/// Environment variable holding the bot token.
pub const TOKEN_VAR: &str = "DISCORD_TOKEN";
/// Environment variable holding the source channel id.
pub const SOURCE_VAR: &str = "SOURCE_CHANNEL_ID";
/// Environment variable holding the target channel id.
pub const TARGET_VAR: &str = "TARGET_CHANNEL_ID";
/// Environment variable holding the relay queue capacity.
pub const QUEUE_CAPACITY_VAR: &str = "RELAY_QUEUE_CAPACITY";
/// Environment variable pointing at the config file.
pub const CONFIG_PATH_VAR: &str = "RELAY_CONFIG_PATH";

const DEFAULT_CONFIG_FILE: &str = "relay.toml";

/// Configuration problems that prevent startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No usable bot token.
    #[error("No Discord token found in environment variables")]
    MissingToken,
    /// Source channel id absent or zero.
    #[error("No source channel ID found in environment variables")]
    MissingSourceChannel,
    /// Target channel id absent or zero.
    #[error("No target channel ID found in environment variables")]
    MissingTargetChannel,
    /// A value was present but could not be parsed.
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue {
        /// Variable or key name.
        key: &'static str,
        /// Offending raw value.
        value: String,
    },
    /// The config file exists but could not be read.
    #[error("failed to read config at {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`Settings`].
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

// ---------------------------------------------------------------------------
// Raw settings
// ---------------------------------------------------------------------------

/// Unvalidated settings as read from file and environment.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bot token.
    pub token: Option<String>,
    /// Source channel id.
    pub source_channel_id: Option<u64>,
    /// Target channel id.
    pub target_channel_id: Option<u64>,
    /// Events buffered between the gateway handler and the relay worker.
    pub queue_capacity: Option<usize>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("source_channel_id", &self.source_channel_id)
            .field("target_channel_id", &self.target_channel_id)
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}

impl Settings {
    /// Load settings from the config file (if any) and the process environment.
    ///
    /// `explicit_path` wins over `$RELAY_CONFIG_PATH`, which wins over
    /// `./relay.toml`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or malformed, or if an
    /// environment value cannot be parsed.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();
        let path = match explicit_path {
            Some(p) => p.to_path_buf(),
            None => config_path_with(env),
        };
        let mut settings = Self::from_file(&path)?;
        settings.apply_env(env)?;
        Ok(settings)
    }

    /// Read settings from a TOML file; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loading config from file");
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Apply environment overrides (env > file > defaults).
    ///
    /// Takes a resolver function so tests never touch the real environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparseable numbers.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = env(TOKEN_VAR) {
            self.token = Some(v);
        }
        if let Some(v) = env(SOURCE_VAR) {
            self.source_channel_id = Some(parse_number(SOURCE_VAR, &v)?);
        }
        if let Some(v) = env(TARGET_VAR) {
            self.target_channel_id = Some(parse_number(TARGET_VAR, &v)?);
        }
        if let Some(v) = env(QUEUE_CAPACITY_VAR) {
            self.queue_capacity = Some(parse_number(QUEUE_CAPACITY_VAR, &v)?);
        }
        Ok(())
    }

    /// Check required values and build the immutable [`RelayConfig`].
    ///
    /// Checks run in order token, source, target; the first missing value
    /// is reported.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] naming the first missing value.
    pub fn validate(self) -> Result<RelayConfig, ConfigError> {
        let token = match self.token {
            Some(t) if !t.trim().is_empty() => SecretToken(t.trim().to_owned()),
            _ => return Err(ConfigError::MissingToken),
        };
        let source = match self.source_channel_id {
            Some(id) if id != 0 => ConduitId(id),
            _ => return Err(ConfigError::MissingSourceChannel),
        };
        let target = match self.target_channel_id {
            Some(id) if id != 0 => ConduitId(id),
            _ => return Err(ConfigError::MissingTargetChannel),
        };
        let queue_capacity = match self.queue_capacity {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "queue_capacity",
                    value: "0".to_owned(),
                })
            }
            Some(n) => n,
            None => default_queue_capacity(),
        };

        Ok(RelayConfig {
            token,
            source,
            target,
            queue_capacity,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    let trimmed = raw.trim();
    trimmed.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: trimmed.to_owned(),
    })
}

/// Resolve the config file path using a custom env resolver.
pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    env(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn default_queue_capacity() -> usize {
    256
}

// ---------------------------------------------------------------------------
// Validated config
// ---------------------------------------------------------------------------

/// Bot token that never prints itself.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    /// Wrap a raw token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token, for handing to the gateway client only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken([REDACTED])")
    }
}

/// Validated, immutable relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bot credential.
    pub token: SecretToken,
    /// Channel being mirrored.
    pub source: ConduitId,
    /// Channel receiving relayed messages.
    pub target: ConduitId,
    /// Bounded queue size between gateway handler and relay worker.
    pub queue_capacity: usize,
}
