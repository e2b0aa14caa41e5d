use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Network errors
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Received non 200 response code of {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    // Selection errors
    #[error("No suitable artifacts found with name `{name}`")]
    NotFound { name: String },

    // Filesystem errors
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove {} while cleaning the target directory: {source}", .path.display())]
    DirectoryClean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove archive {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Archive errors
    #[error("Failed to open archive {}: {reason}", .path.display())]
    ArchiveOpen { path: PathBuf, reason: String },

    #[error("{}: illegal file path", .path.display())]
    IllegalPath { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, SyncError>;
