//! Guard that removes an existing path when its scope ends.

use crate::error::Result;
use crate::state::{Scope, ScopeState};
use crate::validation::validate_path;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use temppath_platform::TempPlatform;
use tracing::{debug, trace, warn};

/// Removes a directory tree (or single file) on release if it still exists.
///
/// Entering has no side effect. A guard that is never entered never deletes
/// anything, even when dropped.
pub struct PathRemover {
    path: PathBuf,
    state: ScopeState,
    platform: Arc<dyn TempPlatform>,
}

impl PathRemover {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_platform(path, temppath_platform::current())
    }

    /// Like [`PathRemover::new`], removing through the given platform.
    pub fn with_platform(
        path: impl AsRef<Path>,
        platform: Arc<dyn TempPlatform>,
    ) -> Result<Self> {
        let path = path.as_ref();
        validate_path("path", path)?;
        Ok(Self {
            path: path.to_path_buf(),
            state: ScopeState::NotEntered,
            platform,
        })
    }

    /// The guarded path. Always available, since it is never generated.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Scope for PathRemover {
    fn enter(&mut self) -> Result<&Path> {
        self.state.ensure_enterable()?;
        self.state = ScopeState::Entered;
        Ok(self.path.as_path())
    }

    fn exit(&mut self) -> Result<()> {
        let path = &self.path;
        let platform = &self.platform;
        self.state.release(|| {
            if platform.exists(path) {
                platform.remove_tree(path)?;
                debug!(path = %path.display(), "removed guarded path");
            } else {
                trace!(path = %path.display(), "guarded path already gone");
            }
            Ok(())
        })
    }

    fn state(&self) -> ScopeState {
        self.state
    }
}

impl Drop for PathRemover {
    fn drop(&mut self) {
        if self.state != ScopeState::Entered {
            return;
        }
        if let Err(e) = self.exit() {
            warn!(path = %self.path.display(), error = %e, "failed to remove guarded path");
        }
    }
}

impl fmt::Debug for PathRemover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRemover")
            .field("path", &self.path)
            .field("state", &self.state)
            .field("platform", &self.platform.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestPlatform;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_removes_tree_on_exit() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("oioi");
        fs::create_dir(&target).unwrap();

        let mut guard = PathRemover::new(&target).unwrap();
        let entered = guard.enter().unwrap().to_path_buf();
        assert_eq!(entered, target);

        fs::write(target.join("oi.txt"), "hey!").unwrap();
        assert!(target.join("oi.txt").exists());

        guard.exit().unwrap();
        assert!(!target.exists());
        assert_eq!(guard.state(), ScopeState::Exited);
    }

    #[test]
    fn test_removes_single_file() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("lonely.txt");
        fs::write(&target, "x").unwrap();

        {
            let mut guard = PathRemover::new(&target).unwrap();
            guard.enter().unwrap();
        }

        assert!(!target.exists());
    }

    #[test]
    fn test_never_entered_does_not_delete() {
        let root = TempDir::new().unwrap();
        let dir1 = root.path().join("dir1");
        let dir2 = root.path().join("dir2");
        fs::create_dir(&dir1).unwrap();
        fs::create_dir(&dir2).unwrap();

        drop(PathRemover::new(&dir1).unwrap());
        assert!(dir1.exists());

        {
            let mut guard = PathRemover::new(&dir1).unwrap();
            guard.enter().unwrap();
        }

        let mut names: Vec<_> = fs::read_dir(root.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        names.sort();
        assert_eq!(names, vec!["dir2"]);
    }

    #[test]
    fn test_missing_path_is_not_an_error() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("gone");
        fs::create_dir(&target).unwrap();

        let mut guard = PathRemover::new(&target).unwrap();
        guard.enter().unwrap();
        fs::remove_dir(&target).unwrap();

        assert!(guard.exit().is_ok());
    }

    #[test]
    fn test_exit_is_idempotent() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("twice");
        fs::create_dir(&target).unwrap();

        let mut guard = PathRemover::new(&target).unwrap();
        guard.enter().unwrap();
        guard.exit().unwrap();
        fs::create_dir(&target).unwrap();
        guard.exit().unwrap();

        // The second exit must not touch a path recreated after the first.
        assert!(target.exists());
    }

    #[test]
    fn test_misuse_is_invalid_state() {
        let root = TempDir::new().unwrap();
        let mut guard = PathRemover::new(root.path().join("x")).unwrap();

        assert!(guard.exit().unwrap_err().is_invalid_state());

        guard.enter().unwrap();
        assert!(guard.enter().unwrap_err().is_invalid_state());

        guard.exit().unwrap();
        assert!(guard.enter().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_rejects_empty_path() {
        assert!(PathRemover::new("").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_failed_removal_propagates_and_stays_entered() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("stubborn");
        fs::create_dir(&target).unwrap();
        let platform = TestPlatform::refusing_removals();

        let mut guard = PathRemover::with_platform(&target, platform.clone()).unwrap();
        guard.enter().unwrap();
        let err = guard.exit().unwrap_err();

        assert_eq!(err.as_io().map(io::Error::kind), Some(io::ErrorKind::PermissionDenied));
        assert_eq!(guard.state(), ScopeState::Entered);
        assert!(target.is_dir());

        assert!(guard.exit().is_err());
        assert_eq!(platform.removals(), 2);
    }
}
