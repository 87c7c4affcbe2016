//! Platform wrapper for unit tests.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;
use temppath_platform::{TempPlatform, UniqueName};

/// Delegates to the real platform while counting calls.
///
/// Can report its own temp root and refuse every removal.
pub(crate) struct TestPlatform {
    inner: Arc<dyn TempPlatform>,
    root: Option<PathBuf>,
    refuse_removals: bool,
    dir_creations: AtomicUsize,
    removals: AtomicUsize,
}

impl TestPlatform {
    pub fn counting() -> Arc<Self> {
        Arc::new(Self::wrap(None, false))
    }

    /// Every `remove_tree` fails with `PermissionDenied`.
    pub fn refusing_removals() -> Arc<Self> {
        Arc::new(Self::wrap(None, true))
    }

    /// Reports `root` as the platform temp root.
    pub fn rooted_at(root: &Path) -> Arc<Self> {
        Arc::new(Self::wrap(Some(root.to_path_buf()), false))
    }

    fn wrap(root: Option<PathBuf>, refuse_removals: bool) -> Self {
        Self {
            inner: temppath_platform::current(),
            root,
            refuse_removals,
            dir_creations: AtomicUsize::new(0),
            removals: AtomicUsize::new(0),
        }
    }

    pub fn dir_creations(&self) -> usize {
        self.dir_creations.load(Ordering::SeqCst)
    }

    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

impl TempPlatform for TestPlatform {
    fn name(&self) -> &'static str {
        "test"
    }

    fn temp_root(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.clone(),
            None => self.inner.temp_root(),
        }
    }

    fn create_unique_dir(&self, name: &UniqueName<'_>) -> io::Result<PathBuf> {
        let parent = name.parent.map(Path::to_path_buf).unwrap_or_else(|| self.temp_root());
        self.inner
            .create_unique_dir(&name.with_parent(Some(parent.as_path())))
    }

    fn create_unique_file(
        &self,
        name: &UniqueName<'_>,
        append: bool,
    ) -> io::Result<NamedTempFile> {
        let parent = name.parent.map(Path::to_path_buf).unwrap_or_else(|| self.temp_root());
        self.inner
            .create_unique_file(&name.with_parent(Some(parent.as_path())), append)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.dir_creations.fetch_add(1, Ordering::SeqCst);
        self.inner.create_dir_all(path)
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        self.removals.fetch_add(1, Ordering::SeqCst);
        if self.refuse_removals {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "removal refused",
            ));
        }
        self.inner.remove_tree(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
}
