//! The consuming surface
//!
//! Rust rendition of the preview page's element handles: loading text,
//! live frame, failure banner. The orchestrator and embedder report here;
//! implementations decide how to render.

use crate::state::LaunchState;

/// Where launch progress and results are rendered
pub trait PreviewSurface: Send + Sync {
    /// A launch attempt moved to `state`; update the loading indicator
    fn stage_changed(&self, state: LaunchState);

    /// The primary runtime is serving; point the live frame at `url`
    fn show_primary(&self, url: &str);

    /// Everything failed; show a message and an actionable external link
    fn show_failure(&self, message: &str, open_url: &str);
}

/// User-facing loading text for a stage
#[must_use]
pub fn stage_message(state: LaunchState) -> &'static str {
    match state {
        LaunchState::Idle => "Preparing preview...",
        LaunchState::Activating => "Authenticating runtime...",
        LaunchState::Mounting => "Writing files...",
        LaunchState::ResolvingCommand => "Resolving start command...",
        LaunchState::Installing => "Installing dependencies...",
        LaunchState::Starting => "Starting dev server...",
        LaunchState::Ready => "Ready",
        LaunchState::Failed => "Preview runtime unavailable",
    }
}

/// Surface that only logs, for headless use and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSurface;

impl PreviewSurface for TracingSurface {
    fn stage_changed(&self, state: LaunchState) {
        tracing::info!(stage = %state, "{}", stage_message(state));
    }

    fn show_primary(&self, url: &str) {
        tracing::info!(url, "preview live");
    }

    fn show_failure(&self, message: &str, open_url: &str) {
        tracing::warn!(message, open_url, "preview degraded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stage_has_a_message() {
        use LaunchState::*;
        for state in [Idle, Activating, Mounting, ResolvingCommand, Installing, Starting, Ready, Failed] {
            assert!(!stage_message(state).is_empty());
        }
    }
}
