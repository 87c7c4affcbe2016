//! Platform-specific provider implementations.

pub mod shared;

#[cfg(unix)]
pub mod unix;

#[cfg(windows)]
pub mod windows;

// Re-export platform providers
#[cfg(unix)]
pub use unix::UnixPlatform;

#[cfg(windows)]
pub use windows::WindowsPlatform;

pub use shared::{SharedTempOps, DEFAULT_PREFIX};
