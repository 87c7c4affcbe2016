//! Windows platform provider implementation.

use crate::providers::shared::SharedTempOps;
use crate::traits::{TempPlatform, UniqueName};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Windows platform provider
pub struct WindowsPlatform;

impl TempPlatform for WindowsPlatform {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn temp_root(&self) -> PathBuf {
        // GetTempPath2W (TMP, TEMP, USERPROFILE) as resolved once for the process.
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
        // Read-only entries refuse deletion on Windows, clear the flag first.
        clear_readonly(path)?;
        self.default_remove_tree(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.default_exists(path)
    }
}

fn clear_readonly(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions)?;
    }
    if metadata.is_dir() {
        for entry in fs::read_dir(path)? {
            clear_readonly(&entry?.path())?;
        }
    }
    Ok(())
}
