//! Photo storage path resolution.
//!
//! Photo rows store paths relative to a storage root on the local
//! filesystem. Resolution failures are non-fatal to callers: a photo
//! whose file has gone missing is simply omitted from a dispatch.

use std::path::{Path, PathBuf};

/// Default storage root when `PHOTO_STORAGE_ROOT` is not set.
const DEFAULT_ROOT: &str = "./photos";

/// Resolves stored relative photo paths to readable files.
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    root: PathBuf,
}

impl PhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Build from the `PHOTO_STORAGE_ROOT` env var, defaulting to
    /// `./photos`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("PHOTO_STORAGE_ROOT").unwrap_or_else(|_| DEFAULT_ROOT.to_string()))
    }

    /// The storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored relative path to an existing file.
    ///
    /// Returns `None` when the file does not exist or the stored path
    /// tries to escape the root; never an error.
    pub fn resolve(&self, rel_path: &str) -> Option<PathBuf> {
        let rel = Path::new(rel_path);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return None;
        }
        let full = self.root.join(rel);
        full.is_file().then_some(full)
    }
}
