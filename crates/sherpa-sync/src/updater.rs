//! Download-verify-replace pipeline.
//!
//! An [`Updater`] run walks a fixed sequence of stages:
//!
//! ```text
//! Fetching -> Selecting -> Downloading -> PreparingTarget -> Extracting -> CleaningUp -> Done
//! ```
//!
//! The first error aborts the run. Nothing is retried and nothing is rolled
//! back: a failure while clearing the target directory can leave it partially
//! cleaned, and the downloaded archive is kept on disk after any failure.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::archive::ArchiveExtractor;
use crate::artifact::Artifact;
use crate::config::UpdaterConfig;
use crate::http::{HttpTransport, Transport};
use crate::registry::RegistryClient;
use crate::{Result, SyncError};

const DOWNLOAD_BUFFER_SIZE: usize = 64 * 1024;

/// Stages of an update run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpdateStage {
    Fetching,
    Selecting,
    Downloading,
    PreparingTarget,
    Extracting,
    CleaningUp,
    Done,
}

impl UpdateStage {
    pub fn description(&self) -> &'static str {
        match self {
            UpdateStage::Fetching => "fetching artifact list",
            UpdateStage::Selecting => "selecting artifact",
            UpdateStage::Downloading => "downloading archive",
            UpdateStage::PreparingTarget => "preparing target directory",
            UpdateStage::Extracting => "extracting archive",
            UpdateStage::CleaningUp => "removing archive",
            UpdateStage::Done => "done",
        }
    }
}

/// Result of a successful run
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The registry reported no artifacts at all
    NothingToDo,
    Updated(UpdateReport),
}

#[derive(Debug)]
pub struct UpdateReport {
    pub artifact: Artifact,
    pub downloaded_bytes: u64,
    /// Every path written into the target directory, in archive order
    pub extracted: Vec<PathBuf>,
}

/// Receives progress notifications during a run.
pub trait UpdateListener {
    fn stage_started(&self, _stage: UpdateStage) {}

    fn artifact_selected(&self, _artifact: &Artifact) {}

    /// Called after every chunk written to the archive file.
    fn download_progress(&self, _downloaded: u64, _total: Option<u64>) {}
}

/// Listener ignoring every notification
pub struct NoopListener;

impl UpdateListener for NoopListener {}

pub struct Updater<T> {
    config: UpdaterConfig,
    registry: RegistryClient<T>,
    stage: UpdateStage,
}

impl Updater<HttpTransport> {
    /// Create an updater talking to the registry over HTTP.
    pub fn from_config(config: UpdaterConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.token.clone(), &config.user_agent)?;
        Self::new(config, transport)
    }
}

impl<T: Transport> Updater<T> {
    pub fn new(config: UpdaterConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let registry = RegistryClient::new(transport, config.artifacts_url());

        Ok(Self {
            config,
            registry,
            stage: UpdateStage::Fetching,
        })
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Last stage entered. After a failed run this is the stage that failed.
    pub fn stage(&self) -> UpdateStage {
        self.stage
    }

    pub fn run(&mut self) -> Result<UpdateOutcome> {
        self.run_with_listener(&NoopListener)
    }

    pub fn run_with_listener(&mut self, listener: &dyn UpdateListener) -> Result<UpdateOutcome> {
        let result = self.execute(listener);

        if let Err(ref e) = result {
            log::debug!("Update failed while {}: {}", self.stage.description(), e);
            if self.stage >= UpdateStage::Downloading && self.config.archive_path().exists() {
                log::warn!(
                    "Archive left at {} for inspection",
                    self.config.archive_path().display()
                );
            }
        }

        result
    }

    fn execute(&mut self, listener: &dyn UpdateListener) -> Result<UpdateOutcome> {
        self.enter(UpdateStage::Fetching, listener);
        let catalog = self.registry.list_artifacts()?;

        self.enter(UpdateStage::Selecting, listener);
        if !catalog.has_artifacts() {
            log::info!("No artifacts found");
            self.enter(UpdateStage::Done, listener);
            return Ok(UpdateOutcome::NothingToDo);
        }
        let artifact = catalog
            .select_latest_active(&self.config.artifact_name)?
            .clone();
        log::info!(
            "Selected artifact `{}` #{} ({}) created at {}",
            artifact.name,
            artifact.id,
            artifact.size(),
            artifact.created_at
        );
        listener.artifact_selected(&artifact);

        self.enter(UpdateStage::Downloading, listener);
        let downloaded_bytes = self.download(&artifact, listener)?;

        self.enter(UpdateStage::PreparingTarget, listener);
        prepare_target_dir(self.config.target_dir())?;

        self.enter(UpdateStage::Extracting, listener);
        let extracted =
            ArchiveExtractor::extract(self.config.archive_path(), self.config.target_dir())?;
        log::info!(
            "Extracted {} entries into {}",
            extracted.len(),
            self.config.target_dir().display()
        );

        self.enter(UpdateStage::CleaningUp, listener);
        remove_archive(self.config.archive_path())?;

        self.enter(UpdateStage::Done, listener);
        Ok(UpdateOutcome::Updated(UpdateReport {
            artifact,
            downloaded_bytes,
            extracted,
        }))
    }

    fn enter(&mut self, stage: UpdateStage, listener: &dyn UpdateListener) {
        log::debug!("Stage: {:?}", stage);
        self.stage = stage;
        listener.stage_started(stage);
    }

    /// Stream the artifact archive into the configured archive file.
    fn download(&self, artifact: &Artifact, listener: &dyn UpdateListener) -> Result<u64> {
        let url = artifact.archive_download_url.as_str();
        let path = self.config.archive_path();

        let mut response = self.registry.open_download(artifact)?;
        let total = response.content_length();

        let mut file = File::create(path).map_err(|e| SyncError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut buffer = vec![0u8; DOWNLOAD_BUFFER_SIZE];
        let mut downloaded: u64 = 0;

        loop {
            let read = match response.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(SyncError::Transport {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })
                }
            };

            file.write_all(&buffer[..read]).map_err(|e| SyncError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
            downloaded += read as u64;
            listener.download_progress(downloaded, total);
        }

        file.flush().map_err(|e| SyncError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::debug!("Downloaded {} bytes to {}", downloaded, path.display());
        Ok(downloaded)
    }
}

/// Make sure `dir` exists and is empty.
///
/// A missing directory is created (parent directories are not). An existing
/// one keeps its own inode but loses every child; if a removal fails the
/// children removed so far stay removed.
pub fn prepare_target_dir(dir: &Path) -> Result<()> {
    match fs::symlink_metadata(dir) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("Directory {} doesn't exist, creating one", dir.display());
            match fs::create_dir(dir) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
                Err(e) => Err(SyncError::DirectoryCreate {
                    path: dir.to_path_buf(),
                    source: e,
                }),
            }
        }
        Err(e) => Err(SyncError::DirectoryClean {
            path: dir.to_path_buf(),
            source: e,
        }),
        Ok(_) => clear_dir(dir),
    }
}

fn clear_dir(dir: &Path) -> Result<()> {
    log::info!("Removing contents of {}", dir.display());

    let clean_error = |path: &Path, source: std::io::Error| SyncError::DirectoryClean {
        path: path.to_path_buf(),
        source,
    };

    let entries = fs::read_dir(dir)
        .map_err(|e| clean_error(dir, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| clean_error(dir, e))?;

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| clean_error(path.as_path(), e))?;

        let removed = if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };

        if let Err(e) = removed {
            log::warn!(
                "Failed to remove {}, {} is partially cleaned",
                path.display(),
                dir.display()
            );
            return Err(clean_error(path.as_path(), e));
        }
    }

    Ok(())
}

fn remove_archive(path: &Path) -> Result<()> {
    log::info!("Removing archive {}", path.display());
    fs::remove_file(path).map_err(|e| SyncError::Cleanup {
        path: path.to_path_buf(),
        source: e,
    })
}
