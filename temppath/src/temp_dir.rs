//! Always-generated temporary directory with an idempotent close.

use crate::config::TempConfig;
use crate::error::{Result, TempPathError};
use crate::state::{Scope, ScopeState};
use crate::validation::{validate_affix, validate_optional_path};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use temppath_platform::{TempPlatform, UniqueName};
use tracing::{debug, trace, warn};

/// Builder for [`TempDirAllocator`].
#[derive(Default)]
pub struct TempDirBuilder {
    base_dir: Option<PathBuf>,
    prefix: Option<String>,
    dont_delete: bool,
    config: TempConfig,
    platform: Option<Arc<dyn TempPlatform>>,
}

impl TempDirBuilder {
    /// Parent of the generated directory (defaults to the platform temp root).
    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Keep the directory after close.
    pub fn dont_delete(mut self, dont_delete: bool) -> Self {
        self.dont_delete = dont_delete;
        self
    }

    pub fn with_config(mut self, config: TempConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_platform(mut self, platform: Arc<dyn TempPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn build(self) -> Result<TempDirAllocator> {
        let base_dir = validate_optional_path(
            "base_dir",
            self.base_dir.as_deref().or(self.config.base_dir.as_deref()),
        )?;
        let prefix = self.prefix.or(self.config.default_prefix);
        if let Some(prefix) = &prefix {
            validate_affix("prefix", prefix)?;
        }

        Ok(TempDirAllocator {
            base_dir,
            prefix,
            dont_delete: self.dont_delete || self.config.keep_generated,
            path: None,
            state: ScopeState::NotEntered,
            platform: self.platform.unwrap_or_else(temppath_platform::current),
        })
    }
}

/// Generates a fresh directory on enter and removes it on close.
///
/// The directory name is only chosen when the scope is entered.
pub struct TempDirAllocator {
    base_dir: Option<PathBuf>,
    prefix: Option<String>,
    dont_delete: bool,
    path: Option<PathBuf>,
    state: ScopeState,
    platform: Arc<dyn TempPlatform>,
}

impl TempDirAllocator {
    pub fn builder() -> TempDirBuilder {
        TempDirBuilder::default()
    }

    /// Allocator with no base dir, no prefix, deleting on close.
    pub fn new() -> Self {
        Self {
            base_dir: None,
            prefix: None,
            dont_delete: false,
            path: None,
            state: ScopeState::NotEntered,
            platform: temppath_platform::current(),
        }
    }

    /// The generated directory; only available once entered.
    pub fn path(&self) -> Result<&Path> {
        self.path
            .as_deref()
            .ok_or_else(|| TempPathError::invalid_state("read the path", self.state))
    }

    pub fn dont_delete(&self) -> bool {
        self.dont_delete
    }

    pub fn is_closed(&self) -> bool {
        self.state == ScopeState::Exited
    }

    /// Remove the directory unless deletion is suppressed.
    ///
    /// Only the first call does anything; later calls return `Ok(())`. Closing
    /// a never-entered allocator just marks it closed.
    pub fn close(&mut self) -> Result<()> {
        if self.state == ScopeState::Exited {
            trace!(path = ?self.path, "already closed");
            return Ok(());
        }

        if !self.dont_delete {
            if let Some(path) = &self.path {
                if self.platform.exists(path) {
                    self.platform.remove_tree(path)?;
                    debug!(path = %path.display(), "removed temporary directory");
                }
            }
        }

        self.state = ScopeState::Exited;
        Ok(())
    }
}

impl Default for TempDirAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope for TempDirAllocator {
    fn enter(&mut self) -> Result<&Path> {
        self.state.ensure_enterable()?;
        let name = UniqueName::default()
            .with_parent(self.base_dir.as_deref())
            .with_prefix(self.prefix.as_deref());
        let path = self.platform.create_unique_dir(&name)?;
        self.state = ScopeState::Entered;
        Ok(self.path.insert(path).as_path())
    }

    fn exit(&mut self) -> Result<()> {
        if self.state == ScopeState::NotEntered {
            return Err(TempPathError::invalid_state("exit", self.state));
        }
        self.close()
    }

    fn state(&self) -> ScopeState {
        self.state
    }
}

impl Drop for TempDirAllocator {
    fn drop(&mut self) {
        if self.state != ScopeState::Entered {
            return;
        }
        if let Err(e) = self.close() {
            warn!(path = ?self.path, error = %e, "failed to remove temporary directory");
        }
    }
}

impl fmt::Debug for TempDirAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TempDirAllocator")
            .field("path", &self.path)
            .field("base_dir", &self.base_dir)
            .field("prefix", &self.prefix)
            .field("dont_delete", &self.dont_delete)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestPlatform;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_that_it_works() {
        let base = TempDir::new().unwrap();
        let mut dir = TempDirAllocator::builder()
            .base_dir(base.path())
            .build()
            .unwrap();

        let path = dir.enter().unwrap().to_path_buf();
        assert!(path.is_dir());
        assert_eq!(path.parent(), Some(base.path()));

        dir.exit().unwrap();
        assert!(!path.exists());
        assert!(dir.is_closed());
    }

    #[test]
    fn test_with_prefix() {
        let mut dir = TempDirAllocator::builder().prefix("some-prefix").build().unwrap();
        let path = dir.enter().unwrap().to_path_buf();

        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("some-prefix"));
        dir.close().unwrap();
    }

    #[test]
    fn test_close_twice_removes_once() {
        let base = TempDir::new().unwrap();
        let platform = TestPlatform::counting();
        let mut dir = TempDirAllocator::builder()
            .base_dir(base.path())
            .with_platform(platform.clone())
            .build()
            .unwrap();

        let path = dir.enter().unwrap().to_path_buf();
        dir.close().unwrap();
        dir.close().unwrap();
        drop(dir);

        assert!(!path.exists());
        assert_eq!(platform.removals(), 1);
    }

    #[test]
    fn test_dont_delete_keeps_directory() {
        let base = TempDir::new().unwrap();
        let path = {
            let mut dir = TempDirAllocator::builder()
                .base_dir(base.path())
                .dont_delete(true)
                .build()
                .unwrap();
            dir.enter().unwrap().to_path_buf()
        };

        assert!(path.is_dir());
    }

    #[test]
    fn test_close_tolerates_externally_removed_dir() {
        let mut dir = TempDirAllocator::new();
        let path = dir.enter().unwrap().to_path_buf();
        std::fs::remove_dir(&path).unwrap();

        assert!(dir.close().is_ok());
    }

    #[test]
    fn test_close_before_enter_marks_closed() {
        let mut dir = TempDirAllocator::new();
        dir.close().unwrap();

        assert!(dir.is_closed());
        assert!(dir.path().unwrap_err().is_invalid_state());
        assert!(dir.enter().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_lifecycle_misuse() {
        let mut dir = TempDirAllocator::new();
        assert!(dir.path().unwrap_err().is_invalid_state());
        assert!(dir.exit().unwrap_err().is_invalid_state());

        dir.enter().unwrap();
        assert!(dir.enter().unwrap_err().is_invalid_state());
        dir.exit().unwrap();
        assert!(dir.enter().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_invalid_base_dir() {
        let err = TempDirAllocator::builder().base_dir("").build().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_generated_under_platform_root() {
        let root = TempDir::new().unwrap();
        let mut dir = TempDirAllocator::builder()
            .prefix("job-")
            .with_platform(TestPlatform::rooted_at(root.path()))
            .build()
            .unwrap();

        let path = dir.enter().unwrap().to_path_buf();
        assert_eq!(path.parent(), Some(root.path()));

        dir.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_close_propagates_and_can_retry() {
        let base = TempDir::new().unwrap();
        let platform = TestPlatform::refusing_removals();
        let mut dir = TempDirAllocator::builder()
            .base_dir(base.path())
            .with_platform(platform.clone())
            .build()
            .unwrap();

        let path = dir.enter().unwrap().to_path_buf();
        let err = dir.close().unwrap_err();

        assert_eq!(err.as_io().map(io::Error::kind), Some(io::ErrorKind::PermissionDenied));
        assert_eq!(dir.state(), ScopeState::Entered);
        assert!(!dir.is_closed());
        assert!(path.is_dir());

        assert!(dir.exit().is_err());
        assert_eq!(platform.removals(), 2);
    }
}
