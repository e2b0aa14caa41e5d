//! Build artifacts as reported by the CI registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, SyncError};

const KIB: f64 = 1024.0;

/// One build output listed by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: u64,
    pub node_id: String,
    pub name: String,
    pub size_in_bytes: u64,
    pub url: String,
    pub archive_download_url: String,
    pub expired: bool,
    pub created_at: String,
    pub updated_at: String,
    pub expires_at: String,
}

impl Artifact {
    /// Human-readable size of the archive
    pub fn size(&self) -> ByteSize {
        ByteSize::from_bytes(self.size_in_bytes)
    }

    /// Whether the artifact can still be downloaded under `name`.
    pub fn is_active(&self, name: &str) -> bool {
        self.name == name && !self.expired
    }
}

/// Listing of artifacts returned by a single registry query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "total_count")]
    count: u64,
    artifacts: Vec<Artifact>,
}

impl Catalog {
    pub fn new(count: u64, artifacts: Vec<Artifact>) -> Self {
        Self { count, artifacts }
    }

    /// True when the registry reports at least one artifact.
    ///
    /// This trusts `total_count` rather than the number of entries received,
    /// so a registry reporting zero while still sending entries yields `false`.
    pub fn has_artifacts(&self) -> bool {
        self.count > 0
    }

    /// First non-expired artifact named `name`, in the order the registry sent them.
    ///
    /// The registry lists newest artifacts first; that ordering is relied on
    /// and not re-checked against the timestamps.
    pub fn select_latest_active(&self, name: &str) -> Result<&Artifact> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.is_active(name))
            .ok_or_else(|| SyncError::NotFound {
                name: name.to_string(),
            })
    }

    /// Count reported by the registry
    pub fn total_count(&self) -> u64 {
        self.count
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Size units used when displaying artifact sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeUnit {
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
}

impl SizeUnit {
    pub fn label(&self) -> &'static str {
        match self {
            SizeUnit::Bytes => "bytes",
            SizeUnit::Kilobytes => "kilobytes",
            SizeUnit::Megabytes => "megabytes",
            SizeUnit::Gigabytes => "gigabytes",
            SizeUnit::Terabytes => "terabytes",
        }
    }

    /// Number of bytes in one unit
    pub fn factor(&self) -> f64 {
        match self {
            SizeUnit::Bytes => 1.0,
            SizeUnit::Kilobytes => KIB,
            SizeUnit::Megabytes => KIB * KIB,
            SizeUnit::Gigabytes => KIB * KIB * KIB,
            SizeUnit::Terabytes => KIB * KIB * KIB * KIB,
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A byte count scaled to the largest unit it exceeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByteSize {
    pub value: f64,
    pub unit: SizeUnit,
}

impl ByteSize {
    pub fn from_bytes(bytes: u64) -> Self {
        let unit = [
            SizeUnit::Terabytes,
            SizeUnit::Gigabytes,
            SizeUnit::Megabytes,
            SizeUnit::Kilobytes,
        ]
        .into_iter()
        .find(|unit| bytes as f64 > unit.factor())
        .unwrap_or(SizeUnit::Bytes);

        Self {
            value: bytes as f64 / unit.factor(),
            unit,
        }
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}
