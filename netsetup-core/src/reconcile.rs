//! Reconciliation passes over desired and running network state.
//!
//! One pass reads the running config exactly once, diffs the desired
//! networks and bondings against it, and either applies the resulting
//! change-sets through the setup service (apply mode) or reports
//! whether anything would change (check mode). An already-converged
//! host is a successful no-op, never an error.

use crate::attrs::{AttrMap, EntryMap};
use crate::diff::{changed_entries, needs_action};
use crate::normalize::{self, StateError};
use crate::runstate::{ReadError, RunningConfigSource};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Reconciliation errors.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to read running config: {0}")]
    Read(#[from] ReadError),

    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),
}

/// Setup-service errors.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad response from setup service: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Options forwarded to the setup service, untouched by this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupOptions {
    pub connectivity_check: bool,
    pub connectivity_timeout: u32,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            connectivity_check: false,
            connectivity_timeout: 10,
        }
    }
}

/// Canonicalized desired configuration for one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredConfig {
    pub networks: EntryMap,
    pub bondings: EntryMap,
}

impl DesiredConfig {
    /// Build from raw caller-supplied entry maps.
    ///
    /// Normalizes the `status` field of every entry and fills in the
    /// default bond mode, so two bondings differing only in whether
    /// the mode was explicit compare equal from here on.
    pub fn from_raw(
        networks: BTreeMap<String, AttrMap>,
        bondings: BTreeMap<String, AttrMap>,
    ) -> std::result::Result<Self, StateError> {
        let networks = normalize::normalize_entries(networks)?;
        let mut bondings = normalize::normalize_entries(bondings)?;
        normalize::fill_bonding_defaults(&mut bondings);
        Ok(Self { networks, bondings })
    }
}

/// External service that applies network changes on the host.
///
/// All-or-nothing from this layer's perspective; rollback and
/// connectivity checking are the service's business.
#[async_trait]
pub trait SetupService: Send + Sync {
    async fn setup(
        &self,
        networks: &EntryMap,
        bondings: &EntryMap,
        options: &SetupOptions,
    ) -> std::result::Result<(), SetupError>;
}

/// Drives one reconciliation pass against the host.
pub struct Reconciler {
    running: Arc<dyn RunningConfigSource>,
    service: Arc<dyn SetupService>,
}

impl Reconciler {
    pub fn new(running: Arc<dyn RunningConfigSource>, service: Arc<dyn SetupService>) -> Self {
        Self { running, service }
    }

    /// Apply the desired configuration; returns whether anything changed.
    ///
    /// Only entities that actually differ are sent to the service. When
    /// both change-sets are empty no call is made at all, which is what
    /// makes repeated runs against a converged host safe.
    pub async fn apply(&self, desired: &DesiredConfig, options: &SetupOptions) -> Result<bool> {
        let running = self.running.read().await?;

        let networks = changed_entries(&desired.networks, &running.networks);
        let bondings = changed_entries(&desired.bondings, &running.bonds);

        if networks.is_empty() && bondings.is_empty() {
            debug!("already converged, nothing to apply");
            return Ok(false);
        }

        info!(
            networks = networks.len(),
            bondings = bondings.len(),
            "applying network changes"
        );
        self.service.setup(&networks, &bondings, options).await?;

        Ok(true)
    }

    /// Report whether an apply pass would change anything, without
    /// applying. Never touches the setup service.
    pub async fn check(&self, desired: &DesiredConfig) -> Result<bool> {
        let running = self.running.read().await?;

        for (name, attrs) in &desired.networks {
            if needs_action(name, attrs, &running.networks) {
                debug!(network = %name, "would change");
                return Ok(true);
            }
        }
        for (name, attrs) in &desired.bondings {
            if needs_action(name, attrs, &running.bonds) {
                debug!(bonding = %name, "would change");
                return Ok(true);
            }
        }

        Ok(false)
    }
}
