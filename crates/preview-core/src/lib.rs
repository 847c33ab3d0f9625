//! Preview Core - session store and preview service
//!
//! Ties the pipeline together the way the hosting page consumes it:
//! - [`store`] - short-lived session handles mapping an id to an uploaded
//!   file set, with time-based eviction
//! - [`service`] - `load_and_preview`: fetch the file set for a session,
//!   classify, normalize, launch, and fall back
//! - [`session`] - the per-load `PreviewSession` owning the launched
//!   server's lifetime, torn down when a new load supersedes it
//!
//! # Example
//!
//! ```rust,ignore
//! use preview_core::{PreviewService, SessionStore};
//!
//! # async fn example(service: PreviewService, store: SessionStore) {
//! let id = store.create(files);
//! service.load_and_preview(&id.to_string()).await?;
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod service;
pub mod session;
pub mod store;

pub use error::{PreviewError, SessionError};
pub use service::{PreviewOutcome, PreviewService, SessionSource};
pub use session::PreviewSession;
pub use store::{SessionEntry, SessionId, SessionStore, RETENTION};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
