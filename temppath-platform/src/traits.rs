//! Core trait for the host temporary-file boundary.
//!
//! Everything that actually touches the disk goes through [`TempPlatform`].
//! The scoped resource types never call `std::fs` themselves, so a platform
//! can be swapped out (or wrapped) without touching lifecycle logic.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Naming request for a uniquely-named temporary entry.
///
/// `parent` defaults to the platform temporary root when unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniqueName<'a> {
    pub parent: Option<&'a Path>,
    pub prefix: Option<&'a str>,
    pub suffix: Option<&'a str>,
}

impl<'a> UniqueName<'a> {
    /// Request a name directly inside `parent`.
    pub fn in_dir(parent: &'a Path) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Request a name inside `parent`, or the platform root when `None`.
    pub fn with_parent(mut self, parent: Option<&'a Path>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_prefix(mut self, prefix: Option<&'a str>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_suffix(mut self, suffix: Option<&'a str>) -> Self {
        self.suffix = suffix;
        self
    }
}

/// Host platform abstraction for temporary filesystem objects.
///
/// Implementations surface I/O failures unmodified; callers decide which
/// conditions (if any) are tolerated.
pub trait TempPlatform: Send + Sync {
    /// Get the platform name (e.g., "unix", "windows")
    fn name(&self) -> &'static str;

    /// Default parent directory for generated temporary paths
    fn temp_root(&self) -> PathBuf;

    /// Atomically create a new, uniquely-named directory and return its path.
    ///
    /// The returned directory is not cleaned up by the platform.
    fn create_unique_dir(&self, name: &UniqueName<'_>) -> io::Result<PathBuf>;

    /// Atomically create a new, uniquely-named file opened for reading and
    /// writing. `append` opens the file in append mode.
    fn create_unique_file(&self, name: &UniqueName<'_>, append: bool)
        -> io::Result<NamedTempFile>;

    /// Create `path` and any missing parents. An existing directory is not
    /// an error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory tree, or a single file if `path` is not a directory.
    fn remove_tree(&self, path: &Path) -> io::Result<()>;

    /// Check whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;
}
