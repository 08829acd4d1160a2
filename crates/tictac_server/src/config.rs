//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tictac_session::SessionConfig;
use tracing::{debug, info, instrument};

/// Configuration for the HTTP server, loadable from TOML.
///
/// Every field has a default, so a file only needs the values it changes:
///
/// ```toml
/// port = 9000
///
/// [session]
/// error_clear_ms = 1500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    #[setters(into)]
    host: String,

    /// Port to bind.
    port: u16,

    /// Lifetime of the player identity cookie, in seconds.
    cookie_max_age_secs: u64,

    /// Sessions idle this long are evicted, in seconds.
    session_ttl_secs: u64,

    /// How often the registry is swept, in seconds.
    sweep_interval_secs: u64,

    /// Settings passed to every game session.
    session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cookie_max_age_secs: 600,
            session_ttl_secs: 3_600,
            sweep_interval_secs: 60,
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Idle time after which a session is evicted.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Interval between registry sweeps.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
