//! Platform registry for detecting and providing platform implementations.

use crate::traits::TempPlatform;
use std::sync::Arc;

#[cfg(windows)]
use crate::providers::WindowsPlatform;

#[cfg(unix)]
use crate::providers::UnixPlatform;

/// Platform registry for detecting the current platform and creating providers.
pub struct PlatformRegistry;

impl PlatformRegistry {
    /// Get the platform provider for the current operating system.
    pub fn current() -> Arc<dyn TempPlatform> {
        #[cfg(windows)]
        return Arc::new(WindowsPlatform);

        #[cfg(unix)]
        return Arc::new(UnixPlatform);

        #[cfg(not(any(unix, windows)))]
        compile_error!("Unsupported platform - only Unix-like and Windows platforms are supported");
    }
}
