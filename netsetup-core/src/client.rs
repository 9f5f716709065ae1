//! Unix-socket client for the host network setup service.
//!
//! The service speaks newline-delimited JSON: one request object with
//! the change-sets and options, one response object reporting success
//! or a failure message. Connectivity checking and rollback happen on
//! the service side; this client only carries the verdict back.

use crate::attrs::EntryMap;
use crate::reconcile::{SetupError, SetupOptions, SetupService};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::debug;

#[derive(Serialize)]
struct SetupRequest<'a> {
    networks: &'a EntryMap,
    bondings: &'a EntryMap,
    options: &'a SetupOptions,
}

#[derive(Deserialize)]
struct SetupResponse {
    ok: bool,
    #[serde(default)]
    msg: String,
}

/// Setup-service client over a local unix socket.
pub struct UnixSetupClient {
    path: PathBuf,
}

impl UnixSetupClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SetupService for UnixSetupClient {
    async fn setup(
        &self,
        networks: &EntryMap,
        bondings: &EntryMap,
        options: &SetupOptions,
    ) -> Result<(), SetupError> {
        debug!(socket = %self.path.display(), "connecting to setup service");
        let stream = UnixStream::connect(&self.path).await?;
        let (read_half, mut write_half) = stream.into_split();

        let mut request = serde_json::to_vec(&SetupRequest {
            networks,
            bondings,
            options,
        })?;
        request.push(b'\n');
        write_half.write_all(&request).await?;
        write_half.shutdown().await?;

        let mut line = String::new();
        BufReader::new(read_half).read_line(&mut line).await?;
        let response: SetupResponse = serde_json::from_str(&line)?;

        if response.ok {
            Ok(())
        } else if response.msg.is_empty() {
            Err(SetupError::Rejected("setup rejected".to_string()))
        } else {
            Err(SetupError::Rejected(response.msg))
        }
    }
}
