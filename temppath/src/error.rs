//! Error taxonomy for scoped temporary paths.

use crate::state::ScopeState;
use std::io;
use thiserror::Error;

/// Errors raised by the scoped resource types.
#[derive(Error, Debug)]
pub enum TempPathError {
    /// A constructor argument was rejected before any filesystem work.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The resource was used out of its enter/exit order.
    #[error("Cannot {operation} while the scope is {state}")]
    InvalidState {
        operation: &'static str,
        state: ScopeState,
    },

    /// Filesystem failure, passed through from the platform unmodified.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl TempPathError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        TempPathError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_state(operation: &'static str, state: ScopeState) -> Self {
        TempPathError::InvalidState { operation, state }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, TempPathError::InvalidArgument { .. })
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, TempPathError::InvalidState { .. })
    }

    /// The underlying I/O error, if this is a filesystem failure
    pub fn as_io(&self) -> Option<&io::Error> {
        match self {
            TempPathError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TempPathError> for io::Error {
    fn from(err: TempPathError) -> Self {
        match err {
            TempPathError::Io(e) => e,
            TempPathError::InvalidArgument { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            TempPathError::InvalidState { .. } => io::Error::other(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, TempPathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message() {
        let err = TempPathError::invalid_state("enter", ScopeState::Exited);
        assert!(err.is_invalid_state());
        assert_eq!(err.to_string(), "Cannot enter while the scope is exited");
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = TempPathError::invalid_argument("base_dir", "path must not be empty");
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("`base_dir`"));
    }

    #[test]
    fn test_io_passes_through_unmodified() {
        let err: TempPathError =
            io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.to_string(), "denied");
        assert_eq!(
            err.as_io().map(io::Error::kind),
            Some(io::ErrorKind::PermissionDenied)
        );

        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_invalid_state_converts_to_io() {
        let err: io::Error = TempPathError::invalid_state("read", ScopeState::Exited).into();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
