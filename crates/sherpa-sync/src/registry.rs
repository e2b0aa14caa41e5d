//! Client for the CI artifact registry.

use std::io::Read;

use crate::artifact::{Artifact, Catalog};
use crate::http::{Transport, TransportResponse};
use crate::{Result, SyncError};

/// Lists and downloads the artifacts of one repository.
pub struct RegistryClient<T> {
    transport: T,
    artifacts_url: String,
}

impl<T: Transport> RegistryClient<T> {
    pub fn new(transport: T, artifacts_url: impl Into<String>) -> Self {
        Self {
            transport,
            artifacts_url: artifacts_url.into(),
        }
    }

    /// Fetch the first page of the artifact listing.
    pub fn list_artifacts(&self) -> Result<Catalog> {
        let url = self.artifacts_url.as_str();

        let body = {
            let mut response = self.transport.get(url)?;
            let mut body = Vec::new();
            response
                .read_to_end(&mut body)
                .map_err(|e| SyncError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
            body
        };

        let catalog: Catalog = serde_json::from_slice(&body).map_err(|e| SyncError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        log::debug!(
            "Registry reports {} artifacts, {} received",
            catalog.total_count(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Start downloading the archive backing `artifact`.
    pub fn open_download(&self, artifact: &Artifact) -> Result<TransportResponse> {
        self.transport.get(&artifact.archive_download_url)
    }

    pub fn artifacts_url(&self) -> &str {
        &self.artifacts_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
