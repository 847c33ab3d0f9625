//! Short-lived session store
//!
//! Maps a random session id to an uploaded file set and its creation time.
//! Entries older than the retention window are purged by a periodic sweep
//! at the same interval; `get` additionally filters expired entries so a
//! caller never observes a stale session between sweeps.

use crate::error::SessionError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use preview_fileset::FileSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// How long a session stays retrievable
pub const RETENTION: Duration = Duration::from_secs(3600);

/// Opaque session handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Fresh random id
    #[inline]
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SessionError::InvalidId(s.to_string()))
    }
}

/// Stored file set plus its creation time
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// The uploaded file set
    pub files: FileSet,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

/// In-memory session store with time-based eviction
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<SessionId, SessionEntry>,
    retention: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Store with the standard retention window
    #[must_use]
    pub fn new() -> Self {
        Self::with_retention(RETENTION)
    }

    /// Store with a custom retention window
    #[must_use]
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            retention,
        }
    }

    /// Create a session for a file set
    pub fn create(&self, files: FileSet) -> SessionId {
        let id = SessionId::random();
        self.sessions.insert(
            id,
            SessionEntry {
                files,
                created_at: Utc::now(),
            },
        );
        tracing::debug!(%id, "created preview session");
        id
    }

    /// Fetch a session, `None` when unknown or expired
    #[must_use]
    pub fn get(&self, id: &SessionId) -> Option<SessionEntry> {
        let entry = self.sessions.get(id)?;
        if self.is_expired(&entry) {
            return None;
        }
        Some(entry.clone())
    }

    /// Purge expired entries, returning how many were removed
    ///
    /// Removals are counted inside the retain pass; `create` may run
    /// concurrently, so length snapshots around it would disagree.
    pub fn sweep(&self) -> usize {
        let mut removed = 0;
        self.sessions.retain(|_, entry| {
            let expired = self.is_expired(entry);
            if expired {
                removed += 1;
            }
            !expired
        });
        if removed > 0 {
            tracing::info!(removed, "swept expired preview sessions");
        }
        removed
    }

    /// Spawn the periodic sweep task
    ///
    /// Runs every retention interval until aborted.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        // interval panics on a zero period.
        let period = store.retention.max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick fires immediately and would sweep an empty store.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                store.sweep();
            }
        })
    }

    /// Number of entries, including expired ones awaiting the sweep
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no entries at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, entry: &SessionEntry) -> bool {
        let age = Utc::now().signed_duration_since(entry.created_at);
        age.to_std().map_or(false, |age| age >= self.retention)
    }
}
