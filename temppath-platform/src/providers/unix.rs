//! Unix platform provider implementation.

use crate::providers::shared::SharedTempOps;
use crate::traits::{TempPlatform, UniqueName};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Unix platform provider (Linux, macOS and other Unix-like systems)
pub struct UnixPlatform;

impl TempPlatform for UnixPlatform {
    fn name(&self) -> &'static str {
        "unix"
    }

    fn temp_root(&self) -> PathBuf {
        // TMPDIR (or /tmp) as resolved once for the process.
        self.default_temp_root()
    }

    fn create_unique_dir(&self, name: &UniqueName<'_>) -> io::Result<PathBuf> {
        self.default_create_unique_dir(name)
    }

    fn create_unique_file(
        &self,
        name: &UniqueName<'_>,
        append: bool,
    ) -> io::Result<NamedTempFile> {
        self.default_create_unique_file(name, append)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.default_create_dir_all(path)
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        self.default_remove_tree(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.default_exists(path)
    }
}
