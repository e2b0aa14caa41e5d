//! Console reporting for an update run.

use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use sherpa_sync::{Artifact, UpdateListener, UpdateStage};

/// Prints stage messages and drives the download progress bar
pub struct ConsoleReporter {
    progress_enabled: bool,
    target_dir: PathBuf,
    bar: RefCell<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new(progress_enabled: bool, target_dir: PathBuf) -> Self {
        Self {
            progress_enabled,
            target_dir,
            bar: RefCell::new(None),
        }
    }

    /// Remove the progress bar, if one is showing.
    pub fn finish(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }

    fn create_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.progress_enabled {
            return ProgressBar::hidden();
        }

        let bar = match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("#>-"),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {bytes} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.set_message("dist.zip");
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

impl UpdateListener for ConsoleReporter {
    fn stage_started(&self, stage: UpdateStage) {
        match stage {
            UpdateStage::Fetching => println!("Downloading artifacts data, please wait ..."),
            UpdateStage::Downloading => println!("Please be patient ..."),
            UpdateStage::PreparingTarget => {
                self.finish();
                if self.target_dir.exists() {
                    println!("Removing contents of {}", self.target_dir.display());
                } else {
                    println!("Directory doesn't exist, creating one");
                }
            }
            UpdateStage::Extracting => println!("Extracting archive contents"),
            UpdateStage::CleaningUp => println!("Removing archive"),
            UpdateStage::Selecting | UpdateStage::Done => {}
        }
    }

    fn artifact_selected(&self, artifact: &Artifact) {
        println!(
            "Downloading artifact archive `{}` ({}) created at {}",
            style(&artifact.name).bold(),
            artifact.size(),
            artifact.created_at
        );
        println!("Artifact location URL: {}", artifact.archive_download_url);
    }

    fn download_progress(&self, downloaded: u64, total: Option<u64>) {
        let mut bar = self.bar.borrow_mut();
        bar.get_or_insert_with(|| self.create_bar(total))
            .set_position(downloaded);
    }
}
