//! Error types for the duel client

use thiserror::Error;

/// Main error type for the duel client
#[derive(Debug, Clone, Error)]
pub enum GameProtocolError {
    #[error("Snapshot unavailable for contract {contract}: {source}")]
    SnapshotUnavailable {
        source: ReaderError,
        contract: String,
    },

    /// The snapshot matches none of the known phases. Never downgraded to a
    /// best-guess phase.
    #[error("Inconsistent game state: {reason}")]
    InconsistentState {
        reason: String,
        field: Option<String>,
    },

    #[error("Action {action} is not available in phase {phase}")]
    ActionNotAvailable {
        action: String,
        phase: String,
    },

    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: String,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Hex decoding error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid move code: {0}")]
    InvalidMove(u8),
}

impl GameProtocolError {
    /// Shorthand for the core's single failure path
    pub fn inconsistent(reason: impl Into<String>, field: Option<&str>) -> Self {
        GameProtocolError::InconsistentState {
            reason: reason.into(),
            field: field.map(str::to_string),
        }
    }

    /// True when the error came from the snapshot itself rather than the transport
    pub fn is_inconsistent_state(&self) -> bool {
        matches!(self, GameProtocolError::InconsistentState { .. })
    }
}

/// Failures reported by a chain reader
#[derive(Debug, Clone, Error)]
pub enum ReaderError {
    #[error("Network failure: {message}")]
    NetworkFailure { message: String },

    #[error("Read failure: {message}")]
    ReadFailure { message: String },
}

impl ReaderError {
    /// Transport failures are worth retrying, malformed reads are not
    pub fn is_transient(&self) -> bool {
        matches!(self, ReaderError::NetworkFailure { .. })
    }
}

impl From<serde_json::Error> for GameProtocolError {
    fn from(err: serde_json::Error) -> Self {
        GameProtocolError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Utility functions for hashing
pub mod utils {
    use sha2::{Sha256, Digest};

    /// Compute SHA256 hash of input data
    pub fn sha256(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    /// Compute SHA256 hash and return as hex string
    pub fn sha256_hex(data: &[u8]) -> String {
        hex::encode(sha256(data))
    }
}

/// Type alias for the main result type used throughout the library
pub type GameResult<T> = Result<T, GameProtocolError>;

/// Logging configuration and initialization
pub mod logging {
    use serde::{Deserialize, Serialize};
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    use std::env;

    /// Logging output format
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LogFormat {
        Human,
        Json,
    }

    /// Logging output destination
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LogOutput {
        Stdout,
        Stderr,
    }

    /// Logging configuration
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        pub level: Level,
        pub format: LogFormat,
        pub output: LogOutput,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                format: LogFormat::Human,
                output: LogOutput::Stderr,
            }
        }
    }

    /// Initialize structured logging with the given configuration
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = EnvFilter::builder()
            .with_default_directive(config.level.into())
            .from_env_lossy()
            .add_directive("tokio=info".parse()?);

        let registry = tracing_subscriber::registry()
            .with(env_filter);

        match config.format {
            LogFormat::Human => {
                let fmt_layer = fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).try_init()?,
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).try_init()?,
                }
            }
            LogFormat::Json => {
                let fmt_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).try_init()?,
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).try_init()?,
                }
            }
        }

        Ok(())
    }

    /// Build a logging configuration from `DUEL_LOG_*` environment variables
    pub fn config_from_env() -> LoggingConfig {
        let level = env::var("DUEL_LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .parse::<Level>()
            .unwrap_or(Level::INFO);

        let format = match env::var("DUEL_LOG_FORMAT").as_ref().map(|s| s.as_str()) {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };

        let output = match env::var("DUEL_LOG_OUTPUT").as_ref().map(|s| s.as_str()) {
            Ok("stdout") => LogOutput::Stdout,
            _ => LogOutput::Stderr,
        };

        LoggingConfig { level, format, output }
    }

    /// Initialize logging with environment-based configuration
    pub fn init_from_env() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        init_logging(config_from_env())
    }
}
