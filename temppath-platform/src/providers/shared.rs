//! Shared implementations for platform providers.
//!
//! This module contains default implementations of TempPlatform methods
//! that are identical across all platforms. Platform-specific implementations
//! can use these or override them as needed.

use crate::traits::{TempPlatform, UniqueName};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

/// Prefix used for generated names when the caller gives none
pub const DEFAULT_PREFIX: &str = "tmp";

/// Provides default implementations for common temp operations
pub trait SharedTempOps: TempPlatform {
    /// Default implementation for temp_root
    fn default_temp_root(&self) -> PathBuf {
        crate::default_temp_root().to_path_buf()
    }

    /// Default implementation for create_unique_dir
    fn default_create_unique_dir(&self, name: &UniqueName<'_>) -> io::Result<PathBuf> {
        let parent = resolve_parent(self, name);
        let dir = builder_for(name).tempdir_in(&parent)?;
        let path = dir.keep();
        debug!(path = %path.display(), "created unique directory");
        Ok(path)
    }

    /// Default implementation for create_unique_file
    fn default_create_unique_file(
        &self,
        name: &UniqueName<'_>,
        append: bool,
    ) -> io::Result<NamedTempFile> {
        let parent = resolve_parent(self, name);
        let file = builder_for(name).append(append).tempfile_in(&parent)?;
        debug!(path = %file.path().display(), append, "created unique file");
        Ok(file)
    }

    /// Default implementation for create_dir_all
    fn default_create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)?;
        debug!(path = %path.display(), "ensured directory");
        Ok(())
    }

    /// Default implementation for remove_tree
    fn default_remove_tree(&self, path: &Path) -> io::Result<()> {
        let metadata = fs::symlink_metadata(path)?;
        if metadata.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        debug!(path = %path.display(), "removed tree");
        Ok(())
    }

    /// Default implementation for exists
    fn default_exists(&self, path: &Path) -> bool {
        // Dangling symlinks still occupy the name, so don't follow them.
        fs::symlink_metadata(path).is_ok()
    }
}

impl<T: TempPlatform + ?Sized> SharedTempOps for T {}

fn resolve_parent<P: TempPlatform + ?Sized>(platform: &P, name: &UniqueName<'_>) -> PathBuf {
    match name.parent {
        Some(parent) => parent.to_path_buf(),
        None => platform.temp_root(),
    }
}

fn builder_for<'a>(name: &UniqueName<'a>) -> Builder<'a, 'a> {
    let mut builder = Builder::new();
    builder.prefix(name.prefix.unwrap_or(DEFAULT_PREFIX));
    if let Some(suffix) = name.suffix {
        builder.suffix(suffix);
    }
    builder
}
