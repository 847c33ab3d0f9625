//! Per-load preview session
//!
//! Each preview load owns exactly one [`PreviewSession`]. A session on the
//! primary tier holds the launched runtime instance and its server process;
//! a new load must tear the previous session down so a superseded attempt
//! never keeps a server running in the background.

use crate::store::SessionId;
use preview_launch::LaunchOutcome;

/// One preview load's visible result and its resources
#[derive(Debug)]
pub struct PreviewSession {
    id: SessionId,
    outcome: Option<LaunchOutcome>,
}

impl PreviewSession {
    /// Session served by the primary runtime
    #[must_use]
    pub fn primary(id: SessionId, outcome: LaunchOutcome) -> Self {
        Self {
            id,
            outcome: Some(outcome),
        }
    }

    /// Session served by the fallback tier (nothing to tear down)
    #[must_use]
    pub fn fallback(id: SessionId) -> Self {
        Self { id, outcome: None }
    }

    /// Session id this preview was loaded from
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Whether the primary runtime is serving this session
    #[inline]
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.outcome.is_some()
    }

    /// URL the live frame points at, when on the primary tier
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.outcome.as_ref().map(|o| o.ready.url.as_str())
    }

    /// Release everything this session holds
    ///
    /// Aborts the diagnostic drain task and drops the runtime instance and
    /// server process handles, which ends the spawned server.
    pub fn teardown(self) {
        if let Some(outcome) = self.outcome {
            if let Some(drain) = outcome.output_drain {
                drain.abort();
            }
            drop(outcome.server_process);
            drop(outcome.instance);
            tracing::info!(id = %self.id, "tore down superseded preview session");
        }
    }
}
