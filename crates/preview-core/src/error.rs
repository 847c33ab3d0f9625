//! Error types for session handling and the preview service

use crate::store::SessionId;

/// Session lookup failures
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The id is not a well-formed session id
    #[error("invalid session id: {0}")]
    InvalidId(String),

    /// No session exists for the id (unknown, or expired and evicted)
    #[error("session not found: {0}")]
    NotFound(SessionId),
}

/// Failures the preview service surfaces to its caller
///
/// Launch and embed failures are not here: those degrade inside the
/// service and still produce a visible surface state.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The session could not be resolved to a file set
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinct_from_invalid() {
        let invalid = SessionError::InvalidId("nope".to_string());
        assert!(invalid.to_string().starts_with("invalid session id"));

        let id: SessionId = uuid::Uuid::nil().into();
        let missing = SessionError::NotFound(id);
        assert!(missing.to_string().starts_with("session not found"));
    }
}
