pub mod archive;
pub mod artifact;
pub mod config;
pub mod error;
pub mod http;
pub mod registry;
pub mod updater;

pub use archive::ArchiveExtractor;
pub use artifact::{Artifact, ByteSize, Catalog, SizeUnit};
pub use config::{UpdaterConfig, DEFAULT_ARTIFACT_NAME};
pub use error::{Result, SyncError};
pub use http::{HttpTransport, Transport, TransportResponse};
pub use registry::RegistryClient;
pub use updater::{
    prepare_target_dir, NoopListener, UpdateListener, UpdateOutcome, UpdateReport, UpdateStage,
    Updater,
};
