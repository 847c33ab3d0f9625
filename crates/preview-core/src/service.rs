//! Preview service
//!
//! The single entry point the hosting page drives: resolve a session id to
//! its file set, classify, normalize, launch through the primary runtime,
//! and delegate to the fallback embedder when the launch fails. Session
//! resolution failures are the only errors surfaced to the caller; every
//! later failure degrades into a visible surface state instead.

use crate::error::{PreviewError, SessionError};
use crate::session::PreviewSession;
use crate::store::{SessionId, SessionStore};
use async_trait::async_trait;
use preview_fileset::FileSet;
use preview_launch::{FallbackEmbedder, LaunchOrchestrator, PreviewSurface};
use preview_pipeline::{classify, normalize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Where session file sets come from
///
/// The in-process [`SessionStore`] implements this; a remote HTTP surface
/// would implement it the same way.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Resolve a session id to its file set
    async fn fetch(&self, id: &SessionId) -> Result<FileSet, SessionError>;
}

#[async_trait]
impl SessionSource for SessionStore {
    async fn fetch(&self, id: &SessionId) -> Result<FileSet, SessionError> {
        self.get(id)
            .map(|entry| entry.files)
            .ok_or(SessionError::NotFound(*id))
    }
}

/// Which tier ended up presenting the preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// Primary runtime is serving at this URL
    Primary {
        /// Dev server URL shown in the live frame
        url: String,
    },
    /// Fallback tier took over (widget or escape hatch)
    Fallback,
}

/// Drives preview loads end to end
pub struct PreviewService {
    source: Arc<dyn SessionSource>,
    orchestrator: LaunchOrchestrator,
    embedder: FallbackEmbedder,
    surface: Arc<dyn PreviewSurface>,
    active: Mutex<Option<PreviewSession>>,
}

impl PreviewService {
    /// Wire the service together
    #[must_use]
    pub fn new(
        source: Arc<dyn SessionSource>,
        orchestrator: LaunchOrchestrator,
        embedder: FallbackEmbedder,
        surface: Arc<dyn PreviewSurface>,
    ) -> Self {
        Self {
            source,
            orchestrator,
            embedder,
            surface,
            active: Mutex::new(None),
        }
    }

    /// Load a session and present it
    ///
    /// A previous load's session is torn down before the new attempt
    /// starts. Launch failures delegate to the fallback embedder with the
    /// same normalized file set and still return `Ok`.
    pub async fn load_and_preview(&self, session_id: &str) -> Result<PreviewOutcome, PreviewError> {
        let id: SessionId = session_id.parse()?;
        let files = self.source.fetch(&id).await?;

        if let Some(previous) = self.active.lock().await.take() {
            previous.teardown();
        }

        let (kind, facts) = classify(&files);
        let normalized = normalize(&files, kind, &facts);
        tracing::info!(%id, kind = %kind, files = normalized.len(), "starting preview load");

        match self.orchestrator.launch(&normalized, self.surface.as_ref()).await {
            Ok(outcome) => {
                let url = outcome.ready.url.clone();
                *self.active.lock().await = Some(PreviewSession::primary(id, outcome));
                Ok(PreviewOutcome::Primary { url })
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "primary runtime failed, delegating to fallback");
                self.embedder
                    .embed(&normalized, kind, self.surface.as_ref())
                    .await;
                *self.active.lock().await = Some(PreviewSession::fallback(id));
                Ok(PreviewOutcome::Fallback)
            }
        }
    }

    /// Session currently presented, if any
    pub async fn active_session(&self) -> Option<SessionId> {
        self.active.lock().await.as_ref().map(PreviewSession::id)
    }
}
