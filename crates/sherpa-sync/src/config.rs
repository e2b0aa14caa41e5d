//! Updater configuration.
//!
//! All settings for one update run live in [`UpdaterConfig`], which is built
//! once by the caller and handed to [`crate::Updater::new`].

use std::path::{Path, PathBuf};

use crate::{Result, SyncError};

/// Name of the artifact the updater tracks.
pub const DEFAULT_ARTIFACT_NAME: &str = "sherpa4selfie";

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_ARCHIVE_PATH: &str = "dist.zip";
const DEFAULT_USER_AGENT: &str = concat!("sherpa-sync/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Repository identifier in `owner/name` form
    pub repository: String,
    /// Bearer token used for every registry request
    pub token: String,
    /// Directory kept in sync with the artifact contents
    pub target_dir: PathBuf,
    /// Where the downloaded archive is stored until extraction finishes
    pub archive_path: PathBuf,
    pub artifact_name: String,
    pub api_base: String,
    pub user_agent: String,
}

impl UpdaterConfig {
    pub fn new(
        repository: impl Into<String>,
        token: impl Into<String>,
        target_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository: repository.into(),
            token: token.into(),
            target_dir: target_dir.into(),
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_archive_path(mut self, archive_path: impl Into<PathBuf>) -> Self {
        self.archive_path = archive_path.into();
        self
    }

    pub fn with_artifact_name(mut self, name: impl Into<String>) -> Self {
        self.artifact_name = name.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check that every required setting is present.
    pub fn validate(&self) -> Result<()> {
        if self.repository.is_empty()
            || self.token.is_empty()
            || self.target_dir.as_os_str().is_empty()
        {
            return Err(SyncError::Config(
                "at least one of repository, token or directory is missing".to_string(),
            ));
        }

        match self.repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(())
            }
            _ => Err(SyncError::Config(format!(
                "repository must be in owner/name form, got `{}`",
                self.repository
            ))),
        }
    }

    /// Artifact listing endpoint for the configured repository.
    pub fn artifacts_url(&self) -> String {
        format!(
            "{}/repos/{}/actions/artifacts",
            self.api_base.trim_end_matches('/'),
            self.repository
        )
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }
}
