//! Directory that is either caller-supplied or generated on demand.
//!
//! A caller-supplied path is created if missing and never deleted. Without
//! one, a uniquely-named directory is generated on enter and removed on exit
//! unless deletion is suppressed.

use crate::config::TempConfig;
use crate::error::{Result, TempPathError};
use crate::state::{Scope, ScopeState};
use crate::validation::{validate_affix, validate_optional_path};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use temppath_platform::{TempPlatform, UniqueName};
use tracing::{debug, trace, warn};

/// Builder for [`ConditionalTempDir`].
#[derive(Default)]
pub struct ConditionalTempDirBuilder {
    path: Option<PathBuf>,
    base_dir: Option<PathBuf>,
    prefix: Option<String>,
    suffix: Option<String>,
    dont_delete: bool,
    config: TempConfig,
    platform: Option<Arc<dyn TempPlatform>>,
}

impl ConditionalTempDirBuilder {
    /// Use this directory instead of generating one.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Like [`path`](Self::path), but a `None` keeps generation enabled.
    pub fn maybe_path(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.path = path.map(Into::into);
        self
    }

    /// Parent of the generated directory. Ignored when a path is supplied.
    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Keep the generated directory after exit.
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

    /// Validate the arguments. Nothing touches the disk until `enter`.
    pub fn build(self) -> Result<ConditionalTempDir> {
        let explicit = validate_optional_path("path", self.path.as_deref())?;
        let base_dir = validate_optional_path(
            "base_dir",
            self.base_dir.as_deref().or(self.config.base_dir.as_deref()),
        )?;
        let prefix = self.prefix.or(self.config.default_prefix);
        if let Some(prefix) = &prefix {
            validate_affix("prefix", prefix)?;
        }
        if let Some(suffix) = &self.suffix {
            validate_affix("suffix", suffix)?;
        }

        Ok(ConditionalTempDir {
            used_generated_path: explicit.is_none(),
            resolved: None,
            explicit,
            base_dir,
            prefix,
            suffix: self.suffix,
            dont_delete: self.dont_delete || self.config.keep_generated,
            state: ScopeState::NotEntered,
            platform: self.platform.unwrap_or_else(temppath_platform::current),
        })
    }
}

/// Directory scope that only owns what it generated.
pub struct ConditionalTempDir {
    explicit: Option<PathBuf>,
    base_dir: Option<PathBuf>,
    prefix: Option<String>,
    suffix: Option<String>,
    dont_delete: bool,
    used_generated_path: bool,
    resolved: Option<PathBuf>,
    state: ScopeState,
    platform: Arc<dyn TempPlatform>,
}

impl ConditionalTempDir {
    pub fn builder() -> ConditionalTempDirBuilder {
        ConditionalTempDirBuilder::default()
    }

    /// Use `path` if given, otherwise generate under the default root.
    pub fn new(path: Option<impl Into<PathBuf>>) -> Result<Self> {
        Self::builder().maybe_path(path).build()
    }

    /// The resolved directory; only available once entered.
    pub fn path(&self) -> Result<&Path> {
        self.resolved
            .as_deref()
            .ok_or_else(|| TempPathError::invalid_state("read the path", self.state))
    }

    /// True when the directory is generated rather than caller-supplied.
    pub fn used_generated_path(&self) -> bool {
        self.used_generated_path
    }

    pub fn dont_delete(&self) -> bool {
        self.dont_delete
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    fn resolve(&self) -> Result<PathBuf> {
        if let Some(explicit) = &self.explicit {
            self.platform.create_dir_all(explicit)?;
            debug!(path = %explicit.display(), "using supplied directory");
            return Ok(explicit.clone());
        }

        // Without a base dir the platform picks its own temp root.
        let name = UniqueName::default()
            .with_parent(self.base_dir.as_deref())
            .with_prefix(self.prefix.as_deref())
            .with_suffix(self.suffix.as_deref());
        Ok(self.platform.create_unique_dir(&name)?)
    }
}

impl Scope for ConditionalTempDir {
    fn enter(&mut self) -> Result<&Path> {
        self.state.ensure_enterable()?;
        let path = self.resolve()?;
        self.state = ScopeState::Entered;
        Ok(self.resolved.insert(path).as_path())
    }

    fn exit(&mut self) -> Result<()> {
        let delete = self.used_generated_path && !self.dont_delete;
        let resolved = self.resolved.as_deref();
        let platform = &self.platform;
        self.state.release(|| {
            let Some(path) = resolved else {
                return Ok(());
            };
            if !delete {
                trace!(path = %path.display(), "keeping directory");
                return Ok(());
            }
            if platform.exists(path) {
                platform.remove_tree(path)?;
                debug!(path = %path.display(), "removed generated directory");
            }
            Ok(())
        })
    }

    fn state(&self) -> ScopeState {
        self.state
    }
}

impl Drop for ConditionalTempDir {
    fn drop(&mut self) {
        if self.state != ScopeState::Entered {
            return;
        }
        if let Err(e) = self.exit() {
            warn!(path = ?self.resolved, error = %e, "failed to clean up directory");
        }
    }
}

impl fmt::Debug for ConditionalTempDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalTempDir")
            .field("path", &self.resolved.as_ref().or(self.explicit.as_ref()))
            .field("used_generated_path", &self.used_generated_path)
            .field("dont_delete", &self.dont_delete)
            .field("state", &self.state)
            .finish()
    }
}
