//! Host filesystem boundary for scoped temporary paths.
//!
//! This crate owns every call that creates or removes temporary entries on
//! disk. Platform differences are encapsulated in [`TempPlatform`]
//! implementations, selected at compile time by [`PlatformRegistry`].

pub mod providers;
pub mod registry;
pub mod traits;

// Re-export commonly used items
pub use registry::PlatformRegistry;
pub use traits::{TempPlatform, UniqueName};

use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;

static TEMP_ROOT: OnceCell<std::path::PathBuf> = OnceCell::new();

/// Get the current platform provider
pub fn current() -> Arc<dyn TempPlatform> {
    PlatformRegistry::current()
}

/// The platform's default temporary root.
///
/// Resolved once per process; later changes to `TMPDIR` and friends are not
/// observed, so every caller sees the same value. The built-in providers
/// report this path from [`TempPlatform::temp_root`].
pub fn default_temp_root() -> &'static Path {
    TEMP_ROOT.get_or_init(std::env::temp_dir)
}
