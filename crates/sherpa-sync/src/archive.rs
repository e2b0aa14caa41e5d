//! Zip archive extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use crate::{Result, SyncError};

/// Archive extractor
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Extract a zip archive into `dest_dir`.
    ///
    /// Returns the destination path of every entry in archive order. An entry
    /// resolving outside `dest_dir` aborts the whole extraction; entries
    /// written before it are left in place.
    pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
        let file = File::open(archive_path).map_err(|e| SyncError::ArchiveOpen {
            path: archive_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| {
            SyncError::ArchiveOpen {
                path: archive_path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        let base = clean_path(dest_dir);
        let mut extracted = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| SyncError::ArchiveOpen {
                path: archive_path.to_path_buf(),
                reason: format!("failed to read entry {}: {}", i, e),
            })?;

            let outpath = clean_path(&dest_dir.join(entry.name()));
            if !is_within(&outpath, &base) {
                log::warn!(
                    "Rejecting archive entry `{}`, {} entries already extracted",
                    entry.name(),
                    extracted.len()
                );
                return Err(SyncError::IllegalPath { path: outpath });
            }

            extracted.push(outpath.clone());

            if entry.is_dir() {
                log::debug!("Creating directory {}", outpath.display());
                create_dir_all(&outpath)?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                create_dir_all(parent)?;
            }

            log::debug!("Extracting {} ({} bytes)", outpath.display(), entry.size());
            {
                // Closed at the end of this block, before the next entry is opened
                let mut outfile = File::create(&outpath).map_err(|e| write_error(&outpath, e))?;
                std::io::copy(&mut entry, &mut outfile).map_err(|e| write_error(&outpath, e))?;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode & 0o7777))
                        .map_err(|e| write_error(&outpath, e))?;
                }
            }
        }

        Ok(extracted)
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| SyncError::DirectoryCreate {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_error(path: &Path, source: std::io::Error) -> SyncError {
    SyncError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. The filesystem is never consulted.
pub(crate) fn clean_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Whether `path` lies strictly below `base`. Both must already be cleaned.
pub(crate) fn is_within(path: &Path, base: &Path) -> bool {
    if path == base {
        return false;
    }

    if base == Path::new(".") {
        return matches!(path.components().next(), Some(Component::Normal(_)));
    }

    path.starts_with(base)
}
