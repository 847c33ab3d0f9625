//! Launch orchestrator
//!
//! Drives one attempt through the primary runtime: activate → mount →
//! resolve command → install → start → ready. A failure anywhere in the
//! chain moves the attempt to `Failed` and returns the error; the caller
//! delegates to the fallback embedder with the same normalized file set.
//! One attempt per preview load, never retried.

use crate::error::{LaunchError, RuntimeError};
use crate::runtime::{
    ExecutionRuntime, RuntimeCredentials, RuntimeInstance, RuntimeProcess, ServerReady,
    SpawnOptions,
};
use crate::state::{validate_transition, LaunchState};
use crate::surface::PreviewSurface;
use futures::StreamExt;
use preview_fileset::{FileSet, Manifest};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Start command resolved from manifest scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCommand {
    /// Program to spawn
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
}

impl StartCommand {
    fn npm(args: &[&str]) -> Self {
        Self {
            program: "npm".to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

impl fmt::Display for StartCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.args.join(" "))
    }
}

/// Select the start command for a file set
///
/// Manifest scripts are consulted in fixed priority order: `start`, `dev`,
/// `serve`. No match, or a missing/malformed manifest, defaults to the
/// dev-server invocation.
#[must_use]
pub fn resolve_start_command(files: &FileSet) -> StartCommand {
    let manifest = Manifest::from_files(files).unwrap_or_default();
    if manifest.script("start").is_some() {
        StartCommand::npm(&["start"])
    } else if manifest.script("dev").is_some() {
        StartCommand::npm(&["run", "dev"])
    } else if manifest.script("serve").is_some() {
        StartCommand::npm(&["run", "serve"])
    } else {
        StartCommand::npm(&["run", "dev"])
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Credentials for runtime activation
    pub credentials: RuntimeCredentials,
    /// Bound on the wait for the readiness notification
    pub ready_timeout: Duration,
}

impl LaunchConfig {
    /// Config for a client id with the default readiness bound
    #[inline]
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            credentials: RuntimeCredentials::new(client_id),
            ready_timeout: Duration::from_secs(120),
        }
    }

    /// Override the readiness bound
    #[inline]
    #[must_use]
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }
}

/// A successful launch
///
/// The instance and server process are kept alive here; dropping the
/// outcome is how a superseded preview tears its server down.
pub struct LaunchOutcome {
    /// Readiness notification from the runtime
    pub ready: ServerReady,
    /// The booted instance the server runs in
    pub instance: Box<dyn RuntimeInstance>,
    /// The long-running server process handle
    pub server_process: Box<dyn RuntimeProcess>,
    /// Background task draining diagnostic output, if any
    pub output_drain: Option<JoinHandle<()>>,
}

impl fmt::Debug for LaunchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchOutcome")
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

/// Per-load launch driver over an [`ExecutionRuntime`]
pub struct LaunchOrchestrator {
    runtime: Arc<dyn ExecutionRuntime>,
    config: LaunchConfig,
}

impl LaunchOrchestrator {
    /// New orchestrator over a runtime
    #[must_use]
    pub fn new(runtime: Arc<dyn ExecutionRuntime>, config: LaunchConfig) -> Self {
        Self { runtime, config }
    }

    /// Run one launch attempt for a normalized file set
    ///
    /// Errors leave the attempt in `Failed`; the caller is expected to
    /// delegate to the fallback embedder with the same file set.
    pub async fn launch(
        &self,
        files: &FileSet,
        surface: &dyn PreviewSurface,
    ) -> Result<LaunchOutcome, LaunchError> {
        let mut attempt = Attempt::new(surface);

        attempt.transition(LaunchState::Activating)?;
        self.runtime
            .init(&self.config.credentials)
            .await
            .map_err(|source| attempt.fail_runtime(source))?;

        attempt.transition(LaunchState::Mounting)?;
        let instance = self
            .runtime
            .boot()
            .await
            .map_err(|source| attempt.fail_runtime(source))?;
        instance
            .mount(files)
            .await
            .map_err(|source| attempt.fail_runtime(source))?;

        attempt.transition(LaunchState::ResolvingCommand)?;
        let command = resolve_start_command(files);
        tracing::info!(command = %command, "resolved start command");

        attempt.transition(LaunchState::Installing)?;
        let mut install = instance
            .spawn("npm", &["install".to_string()], SpawnOptions::default())
            .await
            .map_err(|source| attempt.fail_runtime(source))?;
        let code = install
            .wait()
            .await
            .map_err(|source| attempt.fail_runtime(source))?;
        if code != 0 {
            return Err(attempt.fail(LaunchError::InstallFailed { code }));
        }

        attempt.transition(LaunchState::Starting)?;
        let mut server_process = instance
            .spawn(&command.program, &command.args, SpawnOptions::default())
            .await
            .map_err(|source| attempt.fail_runtime(source))?;

        // Diagnostic sink only; losing output never fails the attempt.
        let output_drain = server_process.take_output().map(|mut stream| {
            tokio::spawn(async move {
                while let Some(chunk) = stream.next().await {
                    tracing::debug!(target: "preview_launch::server", "{}", chunk.trim_end());
                }
            })
        });

        let ready = match tokio::time::timeout(self.config.ready_timeout, instance.server_ready())
            .await
        {
            Ok(Ok(ready)) => ready,
            // A failed attempt must not leave the drain task detached.
            Ok(Err(source)) => {
                if let Some(drain) = output_drain {
                    drain.abort();
                }
                return Err(attempt.fail_runtime(source));
            }
            Err(_) => {
                if let Some(drain) = output_drain {
                    drain.abort();
                }
                return Err(attempt.fail(LaunchError::ReadyTimeout {
                    timeout_secs: self.config.ready_timeout.as_secs(),
                }));
            }
        };

        attempt.transition(LaunchState::Ready)?;
        surface.show_primary(&ready.url);
        tracing::info!(url = %ready.url, port = ready.port, "preview server ready");

        Ok(LaunchOutcome {
            ready,
            instance,
            server_process,
            output_drain,
        })
    }
}

/// State holder for one attempt
struct Attempt<'a> {
    state: LaunchState,
    surface: &'a dyn PreviewSurface,
}

impl<'a> Attempt<'a> {
    fn new(surface: &'a dyn PreviewSurface) -> Self {
        Self {
            state: LaunchState::Idle,
            surface,
        }
    }

    fn transition(&mut self, to: LaunchState) -> Result<(), LaunchError> {
        validate_transition(self.state, to)?;
        tracing::info!(from = %self.state, to = %to, "launch transition");
        self.state = to;
        self.surface.stage_changed(to);
        Ok(())
    }

    fn fail(&mut self, err: LaunchError) -> LaunchError {
        tracing::warn!(state = %self.state, error = %err, "launch attempt failed");
        // Failed is reachable from every non-terminal state.
        if validate_transition(self.state, LaunchState::Failed).is_ok() {
            self.state = LaunchState::Failed;
            self.surface.stage_changed(LaunchState::Failed);
        }
        err
    }

    fn fail_runtime(&mut self, source: RuntimeError) -> LaunchError {
        let state = self.state;
        self.fail(LaunchError::Runtime { state, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeProcess;
    use async_trait::async_trait;
    use futures::stream::BoxStream;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const DRAIN_NEVER: usize = 0;
    const DRAIN_OPEN: usize = 1;
    const DRAIN_DROPPED: usize = 2;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum FailPoint {
        Init,
        Boot,
        Mount,
        SpawnInstall,
    }

    #[derive(Clone, Default)]
    struct Script {
        fail_at: Option<FailPoint>,
        install_exit: i32,
        ready_never: bool,
        calls: Arc<Mutex<Vec<String>>>,
        drain_state: Arc<AtomicUsize>,
    }

    impl Script {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    struct ScriptedRuntime {
        script: Script,
    }

    #[async_trait]
    impl ExecutionRuntime for ScriptedRuntime {
        async fn init(&self, _credentials: &RuntimeCredentials) -> Result<(), RuntimeError> {
            self.script.record("init");
            if self.script.fail_at == Some(FailPoint::Init) {
                return Err(RuntimeError::AuthFailed("scripted".to_string()));
            }
            Ok(())
        }

        async fn boot(&self) -> Result<Box<dyn RuntimeInstance>, RuntimeError> {
            self.script.record("boot");
            if self.script.fail_at == Some(FailPoint::Boot) {
                return Err(RuntimeError::BootFailed("scripted".to_string()));
            }
            Ok(Box::new(ScriptedInstance {
                script: self.script.clone(),
            }))
        }
    }

    struct ScriptedInstance {
        script: Script,
    }

    #[async_trait]
    impl RuntimeInstance for ScriptedInstance {
        async fn mount(&self, files: &FileSet) -> Result<(), RuntimeError> {
            self.script.record(format!("mount {} files", files.len()));
            if self.script.fail_at == Some(FailPoint::Mount) {
                return Err(RuntimeError::MountFailed("scripted".to_string()));
            }
            Ok(())
        }

        async fn spawn(
            &self,
            program: &str,
            args: &[String],
            _options: SpawnOptions,
        ) -> Result<Box<dyn RuntimeProcess>, RuntimeError> {
            let command = format!("{program} {}", args.join(" "));
            self.script.record(format!("spawn {command}"));
            if self.script.fail_at == Some(FailPoint::SpawnInstall) {
                return Err(RuntimeError::SpawnFailed {
                    command,
                    reason: "scripted".to_string(),
                });
            }
            let exit = if command == "npm install" {
                self.script.install_exit
            } else {
                0
            };
            Ok(Box::new(ScriptedProcess {
                exit,
                drain_state: Arc::clone(&self.script.drain_state),
            }))
        }

        async fn server_ready(&self) -> Result<ServerReady, RuntimeError> {
            self.script.record("server_ready");
            if self.script.ready_never {
                futures::future::pending::<()>().await;
            }
            Ok(ServerReady {
                port: 5173,
                url: "http://localhost:5173".to_string(),
            })
        }
    }

    struct ScriptedProcess {
        exit: i32,
        drain_state: Arc<AtomicUsize>,
    }

    /// Marks the shared drain state when the output stream is dropped
    struct DrainGuard(Arc<AtomicUsize>);

    impl Drop for DrainGuard {
        fn drop(&mut self) {
            self.0.store(DRAIN_DROPPED, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl RuntimeProcess for ScriptedProcess {
        fn take_output(&mut self) -> Option<BoxStream<'static, String>> {
            self.drain_state.store(DRAIN_OPEN, Ordering::SeqCst);
            let guard = DrainGuard(Arc::clone(&self.drain_state));
            // One line, then open forever, like a real dev server.
            let stream = futures::stream::once(async { "compiled".to_string() })
                .chain(futures::stream::pending())
                .map(move |line: String| {
                    let _ = &guard;
                    line
                });
            Some(stream.boxed())
        }

        async fn wait(&mut self) -> Result<i32, RuntimeError> {
            Ok(self.exit)
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        stages: Mutex<Vec<LaunchState>>,
        primary: Mutex<Option<String>>,
    }

    impl PreviewSurface for RecordingSurface {
        fn stage_changed(&self, state: LaunchState) {
            self.stages.lock().unwrap().push(state);
        }

        fn show_primary(&self, url: &str) {
            *self.primary.lock().unwrap() = Some(url.to_string());
        }

        fn show_failure(&self, _message: &str, _open_url: &str) {}
    }

    fn orchestrator(script: Script) -> LaunchOrchestrator {
        LaunchOrchestrator::new(
            Arc::new(ScriptedRuntime { script }),
            LaunchConfig::new("wc_test").with_ready_timeout(Duration::from_secs(5)),
        )
    }

    fn react_files() -> FileSet {
        FileSet::from([(
            "package.json",
            r#"{"scripts":{"start":"react-scripts start"}}"#,
        )])
    }

    #[test]
    fn command_resolution_priority() {
        let start = FileSet::from([("package.json", r#"{"scripts":{"dev":"vite","start":"x"}}"#)]);
        assert_eq!(resolve_start_command(&start).args, vec!["start"]);

        let dev = FileSet::from([("package.json", r#"{"scripts":{"serve":"s","dev":"vite"}}"#)]);
        assert_eq!(resolve_start_command(&dev).args, vec!["run", "dev"]);

        let serve = FileSet::from([("package.json", r#"{"scripts":{"serve":"s"}}"#)]);
        assert_eq!(resolve_start_command(&serve).args, vec!["run", "serve"]);
    }

    #[test]
    fn command_resolution_defaults_to_dev() {
        assert_eq!(resolve_start_command(&FileSet::new()).to_string(), "npm run dev");

        let malformed = FileSet::from([("package.json", "{oops")]);
        assert_eq!(resolve_start_command(&malformed).to_string(), "npm run dev");
    }

    #[tokio::test]
    async fn happy_path_reaches_ready() {
        let script = Script::default();
        let surface = RecordingSurface::default();

        let outcome = orchestrator(script.clone())
            .launch(&react_files(), &surface)
            .await
            .unwrap();

        assert_eq!(outcome.ready.url, "http://localhost:5173");
        assert_eq!(
            surface.stages.lock().unwrap().as_slice(),
            &[
                LaunchState::Activating,
                LaunchState::Mounting,
                LaunchState::ResolvingCommand,
                LaunchState::Installing,
                LaunchState::Starting,
                LaunchState::Ready,
            ]
        );
        assert_eq!(
            surface.primary.lock().unwrap().as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(
            script.calls(),
            vec![
                "init",
                "boot",
                "mount 1 files",
                "spawn npm install",
                "spawn npm start",
                "server_ready",
            ]
        );
    }

    #[tokio::test]
    async fn activation_failure_stops_before_mount() {
        let script = Script {
            fail_at: Some(FailPoint::Init),
            ..Script::default()
        };
        let surface = RecordingSurface::default();

        let err = orchestrator(script.clone())
            .launch(&react_files(), &surface)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LaunchError::Runtime {
                state: LaunchState::Activating,
                source: RuntimeError::AuthFailed(_),
            }
        ));
        assert_eq!(script.calls(), vec!["init"]);
        assert_eq!(
            surface.stages.lock().unwrap().as_slice(),
            &[LaunchState::Activating, LaunchState::Failed]
        );
    }

    #[tokio::test]
    async fn mount_failure_never_installs() {
        let script = Script {
            fail_at: Some(FailPoint::Mount),
            ..Script::default()
        };
        let err = orchestrator(script.clone())
            .launch(&react_files(), &RecordingSurface::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LaunchError::Runtime {
                state: LaunchState::Mounting,
                ..
            }
        ));
        assert!(!script.calls().iter().any(|c| c.contains("install")));
    }

    #[tokio::test]
    async fn install_exit_code_delegates_before_start() {
        let script = Script {
            install_exit: 1,
            ..Script::default()
        };
        let err = orchestrator(script.clone())
            .launch(&react_files(), &RecordingSurface::default())
            .await
            .unwrap_err();

        assert!(matches!(err, LaunchError::InstallFailed { code: 1 }));
        // The start process must never be spawned, so no drain either.
        assert!(!script.calls().iter().any(|c| c == "spawn npm start"));
        assert_eq!(script.drain_state.load(Ordering::SeqCst), DRAIN_NEVER);
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_timeout_fails_the_attempt() {
        let script = Script {
            ready_never: true,
            ..Script::default()
        };
        let err = orchestrator(script)
            .launch(&react_files(), &RecordingSurface::default())
            .await
            .unwrap_err();

        assert!(matches!(err, LaunchError::ReadyTimeout { timeout_secs: 5 }));
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_timeout_aborts_the_output_drain() {
        let script = Script {
            ready_never: true,
            ..Script::default()
        };
        let err = orchestrator(script.clone())
            .launch(&react_files(), &RecordingSurface::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::ReadyTimeout { .. }));

        // The drain task holds its stream open forever; only an abort
        // releases it. Give the runtime a chance to process the abort.
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(script.drain_state.load(Ordering::SeqCst), DRAIN_DROPPED);
    }
}
