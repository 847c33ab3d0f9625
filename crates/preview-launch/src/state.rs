//! Launch attempt state machine
//!
//! One [`LaunchState`] value exists per preview attempt, owned exclusively
//! by the orchestrator for that attempt. `Ready` and `Failed` are terminal;
//! `Failed` hands control to the fallback embedder.

use crate::error::LaunchError;
use std::fmt;

/// State of one launch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchState {
    /// Nothing started yet
    Idle,
    /// Authenticating/initializing the primary runtime
    Activating,
    /// Booting the runtime instance and writing files into it
    Mounting,
    /// Selecting the start command from manifest scripts
    ResolvingCommand,
    /// Dependency installation process running
    Installing,
    /// Start command spawned, waiting for the readiness notification
    Starting,
    /// Server reachable, live frame displayed
    Ready,
    /// Attempt abandoned; fallback takes over
    Failed,
}

impl LaunchState {
    /// Stable identifier used in logs
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Activating => "activating",
            Self::Mounting => "mounting",
            Self::ResolvingCommand => "resolving-command",
            Self::Installing => "installing",
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    /// Whether the attempt is finished in this state
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// States reachable from `from`
///
/// Every non-terminal state may fail; forward progress is strictly linear.
#[must_use]
pub fn allowed_transitions(from: LaunchState) -> &'static [LaunchState] {
    use LaunchState::*;
    match from {
        Idle => &[Activating, Failed],
        Activating => &[Mounting, Failed],
        Mounting => &[ResolvingCommand, Failed],
        ResolvingCommand => &[Installing, Failed],
        Installing => &[Starting, Failed],
        Starting => &[Ready, Failed],
        Ready | Failed => &[],
    }
}

/// Validate a state transition
pub fn validate_transition(from: LaunchState, to: LaunchState) -> Result<(), LaunchError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(LaunchError::IllegalTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LaunchState::*;

    #[test]
    fn happy_path_is_legal() {
        let path = [Idle, Activating, Mounting, ResolvingCommand, Installing, Starting, Ready];
        for pair in path.windows(2) {
            validate_transition(pair[0], pair[1]).unwrap();
        }
    }

    #[test]
    fn every_non_terminal_state_may_fail() {
        for from in [Idle, Activating, Mounting, ResolvingCommand, Installing, Starting] {
            validate_transition(from, Failed).unwrap();
        }
    }

    #[test]
    fn skipping_stages_is_illegal() {
        assert!(matches!(
            validate_transition(Installing, Ready),
            Err(LaunchError::IllegalTransition { .. })
        ));
        assert!(matches!(
            validate_transition(Idle, Mounting),
            Err(LaunchError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(allowed_transitions(Ready).is_empty());
        assert!(allowed_transitions(Failed).is_empty());
        assert!(Ready.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Starting.is_terminal());
    }
}
