//! Configuration management for the duel client

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::Level;
use crate::error::GameProtocolError;
use crate::error::logging::{LogFormat, LogOutput, LoggingConfig};

/// Main configuration for the duel client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuelConfig {
    /// Network configuration
    #[serde(default)]
    pub network: NetworkConfig,
    /// Game configuration
    #[serde(default)]
    pub game: GameConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LogSettings,
}

/// Network-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-read timeout in seconds
    pub request_timeout: u64,
    /// Read attempts per snapshot before giving up
    pub retry_attempts: u32,
    /// Delay between read attempts in milliseconds
    pub retry_backoff_ms: u64,
    /// Seconds between pulls when watching a game
    pub poll_interval: u64,
}

impl NetworkConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout: 10,
            retry_attempts: 3,
            retry_backoff_ms: 500,
            poll_interval: 5,
        }
    }
}

/// Game-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// How far (seconds) a snapshot's last action may lie ahead of the
    /// local clock before a warning is logged
    pub clock_skew_tolerance: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            clock_skew_tolerance: 30,
        }
    }
}

/// Logging settings as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// One of trace, debug, info, warn, error
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Human,
            output: LogOutput::Stderr,
        }
    }
}

impl LogSettings {
    /// Convert into the logging module's configuration
    pub fn to_logging_config(&self) -> Result<LoggingConfig, GameProtocolError> {
        let level = self.level.parse::<Level>().map_err(|_| GameProtocolError::Configuration {
            message: format!("Unknown log level: {}", self.level),
            field: "logging.level".to_string(),
        })?;

        Ok(LoggingConfig {
            level,
            format: self.format,
            output: self.output,
        })
    }
}

impl DuelConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GameProtocolError> {
        let content = fs::read_to_string(path).map_err(|e| {
            GameProtocolError::Configuration {
                message: format!("Failed to read config file: {}", e),
                field: "config_file".to_string(),
            }
        })?;

        let config: DuelConfig = toml::from_str(&content).map_err(|e| {
            GameProtocolError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                field: "config_format".to_string(),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GameProtocolError> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            GameProtocolError::Configuration {
                message: format!("Failed to serialize config: {}", e),
                field: "config_serialization".to_string(),
            }
        })?;

        fs::write(path, content).map_err(|e| {
            GameProtocolError::Configuration {
                message: format!("Failed to write config file: {}", e),
                field: "config_write".to_string(),
            }
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), GameProtocolError> {
        if self.network.request_timeout == 0 {
            return Err(GameProtocolError::Configuration {
                message: "Request timeout must be greater than 0".to_string(),
                field: "network.request_timeout".to_string(),
            });
        }

        if self.network.retry_attempts == 0 {
            return Err(GameProtocolError::Configuration {
                message: "Retry attempts must be at least 1".to_string(),
                field: "network.retry_attempts".to_string(),
            });
        }

        if self.network.poll_interval == 0 {
            return Err(GameProtocolError::Configuration {
                message: "Poll interval must be greater than 0".to_string(),
                field: "network.poll_interval".to_string(),
            });
        }

        self.logging.to_logging_config()?;

        Ok(())
    }

    /// Create a production-ready configuration
    pub fn production() -> Self {
        Self {
            network: NetworkConfig {
                request_timeout: 5,      // Fail fast, the retry layer covers blips
                retry_attempts: 5,
                retry_backoff_ms: 1000,
                poll_interval: 12,       // One block
            },
            game: GameConfig {
                clock_skew_tolerance: 15,
            },
            logging: LogSettings {
                level: "info".to_string(),
                format: LogFormat::Json,
                output: LogOutput::Stdout,
            },
        }
    }

    /// Create a development configuration with relaxed settings
    pub fn development() -> Self {
        Self {
            network: NetworkConfig {
                request_timeout: 30,
                retry_attempts: 1,
                retry_backoff_ms: 100,
                poll_interval: 2,
            },
            game: GameConfig {
                clock_skew_tolerance: 120,   // Local chains often run ahead
            },
            logging: LogSettings {
                level: "debug".to_string(),
                ..Default::default()
            },
        }
    }
}
