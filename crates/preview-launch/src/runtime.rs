//! Execution runtime trait seam
//!
//! Mirrors the documented contract of the primary in-browser sandbox:
//! credential init, instance boot, file mount, process spawn with an output
//! stream and an awaitable exit code, and a one-shot readiness notification
//! carrying the dev server's URL. The orchestrator only depends on these
//! traits; tests script them.

use crate::error::RuntimeError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use preview_fileset::FileSet;

/// Credentials for runtime activation
#[derive(Debug, Clone, Default)]
pub struct RuntimeCredentials {
    /// API client id issued by the runtime vendor
    pub client_id: String,
}

impl RuntimeCredentials {
    /// Credentials for a client id
    #[inline]
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
        }
    }
}

/// The one-shot readiness notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerReady {
    /// Port the spawned server listens on
    pub port: u16,
    /// URL the consuming surface should display
    pub url: String,
}

/// Options for spawning a process inside the runtime
#[derive(Debug, Clone)]
pub struct SpawnOptions {
    /// Working directory inside the mounted file tree
    pub cwd: String,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self { cwd: "/".to_string() }
    }
}

/// The primary execution runtime
#[async_trait]
pub trait ExecutionRuntime: Send + Sync {
    /// Authenticate against the runtime service
    async fn init(&self, credentials: &RuntimeCredentials) -> Result<(), RuntimeError>;

    /// Boot a fresh instance
    async fn boot(&self) -> Result<Box<dyn RuntimeInstance>, RuntimeError>;
}

/// A booted runtime instance
#[async_trait]
pub trait RuntimeInstance: Send + Sync {
    /// Write the file set into the instance
    async fn mount(&self, files: &FileSet) -> Result<(), RuntimeError>;

    /// Spawn a process
    async fn spawn(
        &self,
        program: &str,
        args: &[String],
        options: SpawnOptions,
    ) -> Result<Box<dyn RuntimeProcess>, RuntimeError>;

    /// Wait for the spawned server to report it is listening
    ///
    /// Resolves at most once per instance. The orchestrator awaits this
    /// only after the start command has been spawned, so implementations
    /// must buffer a notification that fires before the wait begins and
    /// deliver it to the first caller. The wait itself is bounded by the
    /// orchestrator's readiness timeout.
    async fn server_ready(&self) -> Result<ServerReady, RuntimeError>;
}

/// A process running inside a runtime instance
#[async_trait]
pub trait RuntimeProcess: Send {
    /// Take the process output stream, `None` once taken
    ///
    /// The stream feeds the diagnostic sink only; it is never on the
    /// critical path.
    fn take_output(&mut self) -> Option<BoxStream<'static, String>>;

    /// Await the process exit code
    async fn wait(&mut self) -> Result<i32, RuntimeError>;
}
