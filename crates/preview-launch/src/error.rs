//! Error types for launch orchestration and fallback embedding
//!
//! None of these are fatal to the preview as a whole: a [`LaunchError`]
//! delegates to the fallback embedder, an [`EmbedError`] delegates to the
//! textual escape hatch.

use crate::state::LaunchState;

/// Failures reported by the primary execution runtime
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Credential initialization rejected
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Runtime instance failed to boot
    #[error("boot failed: {0}")]
    BootFailed(String),

    /// File mount rejected
    #[error("mount failed: {0}")]
    MountFailed(String),

    /// Process could not be spawned
    #[error("spawn failed for `{command}`: {reason}")]
    SpawnFailed {
        /// Command that failed to spawn
        command: String,
        /// Runtime-reported reason
        reason: String,
    },

    /// Runtime not available in this environment at all
    #[error("runtime unavailable: {0}")]
    Unavailable(String),
}

/// Failures of one launch attempt
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// The runtime failed while the attempt was in `state`
    #[error("runtime failed while {state}: {source}")]
    Runtime {
        /// State the attempt was in when the runtime failed
        state: LaunchState,
        /// Underlying runtime failure
        source: RuntimeError,
    },

    /// Dependency installation exited non-zero
    #[error("dependency install exited with code {code}")]
    InstallFailed {
        /// Exit code of the install process
        code: i32,
    },

    /// No readiness notification arrived in time
    #[error("no readiness notification within {timeout_secs}s")]
    ReadyTimeout {
        /// Bound that expired
        timeout_secs: u64,
    },

    /// Programming error: transition not in the legal table
    #[error("illegal launch transition: {from} -> {to}")]
    IllegalTransition {
        /// State the attempt was in
        from: LaunchState,
        /// State that was requested
        to: LaunchState,
    },
}

/// Failures of the fallback embed widget
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// Widget script never loaded
    #[error("embed script failed to load: {0}")]
    ScriptLoadFailed(String),

    /// Widget rejected the project descriptor
    #[error("widget rejected project: {0}")]
    WidgetRejected(String),
}
