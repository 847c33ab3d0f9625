//! Preview Launch - two-tier launch strategy for prepared projects
//!
//! Drives a normalized file set through the primary in-browser execution
//! runtime, and delegates to a hosted embed widget when any step of the
//! primary chain fails:
//! - [`state`] - the per-attempt launch state machine
//! - [`runtime`] - the execution-runtime trait seam (init, boot, mount,
//!   spawn, readiness)
//! - [`orchestrator`] - activate → mount → resolve → install → start →
//!   ready, one attempt per preview load, no retry
//! - [`embedder`] - fallback embed widget plus the infallible external-open
//!   escape hatch
//! - [`surface`] - where stage text, the live frame, and failure banners go

#![warn(unreachable_pub)]

pub mod embedder;
pub mod error;
pub mod orchestrator;
pub mod runtime;
pub mod state;
pub mod surface;

pub use embedder::{EmbedHost, EmbedOptions, EmbedWidget, FallbackEmbedder, ProjectDescriptor};
pub use error::{EmbedError, LaunchError, RuntimeError};
pub use orchestrator::{LaunchConfig, LaunchOrchestrator, LaunchOutcome, StartCommand};
pub use runtime::{
    ExecutionRuntime, RuntimeCredentials, RuntimeInstance, RuntimeProcess, ServerReady,
    SpawnOptions,
};
pub use state::{allowed_transitions, validate_transition, LaunchState};
pub use surface::{PreviewSurface, TracingSurface};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
