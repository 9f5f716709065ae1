//! Running-configuration snapshot.
//!
//! The host network service persists the currently active networks and
//! bonds as a JSON document. Reconciliation reads that document fresh
//! at the start of every pass and treats it as immutable for the rest
//! of the pass; nothing is cached across passes.

use crate::attrs::AttrMap;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Currently active entities, keyed by name.
pub type RunningMap = BTreeMap<String, AttrMap>;

/// Snapshot read errors.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed running config: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReadError>;

/// Snapshot of the host's active network configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunningConfig {
    #[serde(default)]
    pub networks: RunningMap,
    #[serde(default)]
    pub bonds: RunningMap,
}

/// Read-only source of the running configuration.
#[async_trait]
pub trait RunningConfigSource: Send + Sync {
    /// Read the current snapshot. Called once per reconciliation pass.
    async fn read(&self) -> Result<RunningConfig>;
}

/// Reads the running config persisted by the host network service.
pub struct FileRunningConfig {
    path: PathBuf,
}

impl FileRunningConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RunningConfigSource for FileRunningConfig {
    async fn read(&self) -> Result<RunningConfig> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            // No persisted config yet means nothing is running.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no running config, assuming empty");
                Ok(RunningConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
