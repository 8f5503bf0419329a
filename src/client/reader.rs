//! Snapshot sources

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use async_trait::async_trait;
use tracing::{debug, warn};
use crate::config::NetworkConfig;
use crate::error::ReaderError;
use crate::game::{Address, GameStateSnapshot};

/// Produces atomic snapshots of a game contract
///
/// Implementations must read all seven fields at one block height, or mark
/// the snapshot provisional when they cannot.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn read(&self, contract: &Address) -> Result<GameStateSnapshot, ReaderError>;
}

/// Reads a JSON snapshot document from disk
///
/// With a directory, the file is `<dir>/<contract>.json`; with a file, that
/// file is returned for every contract.
#[derive(Debug, Clone)]
pub struct SnapshotFileReader {
    path: PathBuf,
}

impl SnapshotFileReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    fn resolve_path(&self, contract: &Address) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{}.json", contract))
        } else {
            self.path.clone()
        }
    }
}

#[async_trait]
impl ChainReader for SnapshotFileReader {
    async fn read(&self, contract: &Address) -> Result<GameStateSnapshot, ReaderError> {
        let path = self.resolve_path(contract);
        debug!(contract = %contract, path = %path.display(), "Reading snapshot file");

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReaderError::ReadFailure {
                message: format!("no snapshot at {}", path.display()),
            },
            ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock => ReaderError::NetworkFailure {
                message: format!("failed to read {}: {}", path.display(), e),
            },
            _ => ReaderError::ReadFailure {
                message: format!("unreadable snapshot {}: {}", path.display(), e),
            },
        })?;

        GameStateSnapshot::from_json(&content).map_err(|e| ReaderError::ReadFailure {
            message: format!("malformed snapshot {}: {}", path.display(), e),
        })
    }
}

/// Retries transient reader failures with a fixed backoff
///
/// With a request timeout set, an attempt that outlives it is abandoned and
/// counts as a transient `NetworkFailure`.
#[derive(Debug, Clone)]
pub struct RetryingReader<R> {
    inner: R,
    attempts: u32,
    backoff: Duration,
    request_timeout: Option<Duration>,
}

impl<R: ChainReader> RetryingReader<R> {
    pub fn new(inner: R, attempts: u32, backoff: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            backoff,
            request_timeout: None,
        }
    }

    pub fn from_config(inner: R, config: &NetworkConfig) -> Self {
        Self::new(inner, config.retry_attempts, Duration::from_millis(config.retry_backoff_ms))
            .with_request_timeout(Duration::from_secs(config.request_timeout))
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    async fn attempt(&self, contract: &Address) -> Result<GameStateSnapshot, ReaderError> {
        let Some(limit) = self.request_timeout else {
            return self.inner.read(contract).await;
        };

        tokio::time::timeout(limit, self.inner.read(contract))
            .await
            .unwrap_or_else(|_| {
                Err(ReaderError::NetworkFailure {
                    message: format!("read timed out after {}ms", limit.as_millis()),
                })
            })
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: ChainReader> ChainReader for RetryingReader<R> {
    async fn read(&self, contract: &Address) -> Result<GameStateSnapshot, ReaderError> {
        let mut attempt = 1;
        loop {
            match self.attempt(contract).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) if e.is_transient() && attempt < self.attempts => {
                    warn!(
                        contract = %contract,
                        attempt,
                        max_attempts = self.attempts,
                        error = %e,
                        "Snapshot read failed, retrying"
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
