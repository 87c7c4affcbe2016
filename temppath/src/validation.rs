//! Construction-time validation of path and name arguments.
//!
//! Every check here runs before any filesystem work, so a bad argument fails
//! at `build()` rather than at `enter()`.

use std::path::{Path, PathBuf};

use crate::error::{Result, TempPathError};

/// Validate a caller-supplied path argument
///
/// # Arguments
/// * `name` - Argument name reported in the error
/// * `path` - The path to validate
///
/// # Returns
/// * `Ok(())` if the path can be handed to the platform
/// * `Err(TempPathError::InvalidArgument)` if it is empty or holds a NUL byte
pub fn validate_path(name: &'static str, path: &Path) -> Result<()> {
    let raw = path.as_os_str();
    if raw.is_empty() {
        return Err(TempPathError::invalid_argument(
            name,
            "path must not be empty",
        ));
    }

    if raw.as_encoded_bytes().contains(&0) {
        return Err(TempPathError::invalid_argument(
            name,
            format!("path contains a NUL byte: {:?}", path),
        ));
    }

    Ok(())
}

/// Validate an optional path argument, converting it to an owned path
pub fn validate_optional_path(
    name: &'static str,
    path: Option<&Path>,
) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            validate_path(name, path)?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(None),
    }
}

/// Validate a prefix or suffix for generated names
///
/// Affixes become part of a single file name, so separators and NUL bytes are
/// rejected. An empty affix is allowed.
pub fn validate_affix(name: &'static str, affix: &str) -> Result<()> {
    if affix.contains('\0') {
        return Err(TempPathError::invalid_argument(
            name,
            "name contains a NUL byte",
        ));
    }

    if affix.chars().any(std::path::is_separator) {
        return Err(TempPathError::invalid_argument(
            name,
            format!("'{}' contains a path separator", affix),
        ));
    }

    Ok(())
}
