//! Defaults applied to generated temporary directories.
//!
//! `TempConfig` can be embedded in a host application's YAML or JSON config,
//! or read from the environment:
//! - `TEMPPATH_PREFIX` - prefix for generated directory names
//! - `TEMPPATH_BASE_DIR` - parent directory for generated paths
//! - `TEMPPATH_KEEP` - keep generated directories after release (`1`, `true`, `yes`)

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TempConfig {
    /// Prefix for generated directory names when the builder sets none
    pub default_prefix: Option<String>,

    /// Parent for generated paths when the builder sets none
    pub base_dir: Option<PathBuf>,

    /// Never delete generated directories (useful when debugging a failure)
    pub keep_generated: bool,
}

impl TempConfig {
    pub fn from_env() -> Self {
        Self {
            default_prefix: std::env::var("TEMPPATH_PREFIX")
                .ok()
                .filter(|s| !s.is_empty()),
            base_dir: std::env::var_os("TEMPPATH_BASE_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            keep_generated: std::env::var("TEMPPATH_KEEP")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
