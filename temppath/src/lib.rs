//! Scoped temporary files and directories.
//!
//! Four guard types cover the common temporary-path lifecycles:
//!  * [`PathRemover`]: removes an existing path when its scope ends.
//!  * [`ConditionalTempDir`]: uses a supplied directory, or generates one and
//!    removes only what it generated.
//!  * [`TempDirAllocator`]: always generates a directory, removed on an
//!    idempotent [`close`](TempDirAllocator::close).
//!  * [`TempFileAllocator`]: a named temporary file with an open stream.
//!
//! Directory scopes resolve their path on [`Scope::enter`] and clean up on
//! [`Scope::exit`] or drop. Only an explicit exit reports cleanup failures;
//! drop logs them through `tracing`.
//!
//! ```no_run
//! use temppath::{Scope, TempDirAllocator};
//!
//! # fn main() -> temppath::Result<()> {
//! let mut dir = TempDirAllocator::builder().prefix("job-").build()?;
//! let path = dir.enter()?.to_path_buf();
//! std::fs::write(path.join("out.txt"), "done")?;
//! dir.exit()?;
//! assert!(!path.exists());
//! # Ok(())
//! # }
//! ```

pub mod conditional;
pub mod config;
pub mod error;
pub mod path_remover;
pub mod state;
pub mod temp_dir;
pub mod temp_file;
pub mod tracing_init;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use conditional::{ConditionalTempDir, ConditionalTempDirBuilder};
pub use config::TempConfig;
pub use error::{Result, TempPathError};
pub use path_remover::PathRemover;
pub use state::{with_scope, Scope, ScopeState};
pub use temp_dir::{TempDirAllocator, TempDirBuilder};
pub use temp_file::{Buffering, Newline, OpenMode, TempFileAllocator, TempFileOptions, TempStream};

// Re-export the platform boundary for callers supplying their own
pub use temppath_platform as platform;

/// The platform's default temporary root.
///
/// Has no side effects, and every call in a process returns the same path.
pub fn default_temp_root() -> &'static std::path::Path {
    temppath_platform::default_temp_root()
}
