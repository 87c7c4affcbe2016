//! Lifecycle shared by every scoped resource.
//!
//! A scope moves `NotEntered -> Entered -> Exited` exactly once. Entering is
//! only legal from `NotEntered`; releasing is only legal once entered, and a
//! second release is a no-op.

use crate::error::{Result, TempPathError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeState {
    #[default]
    NotEntered,
    Entered,
    Exited,
}

impl ScopeState {
    /// Fails unless the scope can still be entered.
    pub(crate) fn ensure_enterable(self) -> Result<()> {
        match self {
            ScopeState::NotEntered => Ok(()),
            state => Err(TempPathError::invalid_state("enter", state)),
        }
    }

    /// Runs `cleanup` on the first release of an entered scope.
    ///
    /// The scope only becomes `Exited` once `cleanup` succeeds, so a failed
    /// cleanup is retried by the next release (or by drop).
    pub(crate) fn release<F>(&mut self, cleanup: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        match *self {
            ScopeState::NotEntered => Err(TempPathError::invalid_state("exit", *self)),
            ScopeState::Exited => Ok(()),
            ScopeState::Entered => {
                cleanup()?;
                *self = ScopeState::Exited;
                Ok(())
            }
        }
    }
}

impl fmt::Display for ScopeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeState::NotEntered => write!(f, "not entered"),
            ScopeState::Entered => write!(f, "entered"),
            ScopeState::Exited => write!(f, "exited"),
        }
    }
}

/// A filesystem resource with an enter/exit lifetime.
///
/// Dropping an entered scope performs the exit; explicit [`Scope::exit`] is
/// the only way to observe cleanup failures.
pub trait Scope {
    /// Acquire the resource and return its path.
    fn enter(&mut self) -> Result<&std::path::Path>;

    /// Release the resource according to its deletion policy.
    fn exit(&mut self) -> Result<()>;

    /// Current lifecycle state
    fn state(&self) -> ScopeState;
}

/// Enter `scope`, run `f`, then exit, propagating cleanup errors.
///
/// If `f` panics the scope is dropped while entered and cleans up on unwind.
pub fn with_scope<S, F, T>(mut scope: S, f: F) -> Result<T>
where
    S: Scope,
    F: FnOnce(&mut S) -> T,
{
    scope.enter()?;
    let value = f(&mut scope);
    scope.exit()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_enterable_only_before_entering() {
        assert!(ScopeState::NotEntered.ensure_enterable().is_ok());
        assert!(ScopeState::Entered
            .ensure_enterable()
            .unwrap_err()
            .is_invalid_state());
        assert!(ScopeState::Exited
            .ensure_enterable()
            .unwrap_err()
            .is_invalid_state());
    }

    #[test]
    fn test_release_runs_cleanup_once() {
        let mut state = ScopeState::Entered;
        let mut calls = 0;

        state
            .release(|| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        state
            .release(|| {
                calls += 1;
                Ok(())
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(state, ScopeState::Exited);
    }

    #[test]
    fn test_release_before_enter_is_invalid() {
        let mut state = ScopeState::NotEntered;
        let err = state.release(|| Ok(())).unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(state, ScopeState::NotEntered);
    }

    #[test]
    fn test_failed_cleanup_stays_entered() {
        let mut state = ScopeState::Entered;
        let err = state
            .release(|| Err(io::Error::from(io::ErrorKind::PermissionDenied).into()))
            .unwrap_err();

        assert!(err.as_io().is_some());
        assert_eq!(state, ScopeState::Entered);
    }
}
