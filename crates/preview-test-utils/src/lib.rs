//! Testing utilities for the preview engine workspace
//!
//! Shared fixtures and scripted doubles for the runtime and embedder
//! seams.

#![allow(missing_docs)]

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use preview_fileset::FileSet;
use preview_launch::{
    EmbedError, EmbedHost, EmbedOptions, EmbedWidget, ExecutionRuntime, LaunchState,
    PreviewSurface, ProjectDescriptor, RuntimeCredentials, RuntimeError, RuntimeInstance,
    RuntimeProcess, ServerReady, SpawnOptions,
};
use std::sync::{Arc, Mutex};

pub fn react_project() -> FileSet {
    FileSet::from([
        ("package.json", r#"{"dependencies":{"react":"^18.2.0"}}"#),
        (
            "src/App.jsx",
            "export default function App() { return <h1>demo</h1>; }",
        ),
    ])
}

pub fn vite_project() -> FileSet {
    FileSet::from([
        ("vite.config.js", "export default {}"),
        (
            "src/App.jsx",
            "export default function App() { return <h1>demo</h1>; }",
        ),
    ])
}

pub fn static_site() -> FileSet {
    FileSet::from([("index.html", "<h1>static demo</h1>")])
}

/// Where a scripted runtime should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeFailure {
    Init,
    Boot,
    Mount,
    Spawn,
    InstallExit(i32),
    ReadyNever,
}

/// Scripted stand-in for the primary execution runtime
///
/// Records every call; optionally fails at one point in the chain.
#[derive(Clone, Default)]
pub struct ScriptedRuntime {
    pub failure: Option<RuntimeFailure>,
    calls: Arc<Mutex<Vec<String>>>,
    mounted: Arc<Mutex<Option<FileSet>>>,
}

impl ScriptedRuntime {
    pub fn working() -> Self {
        Self::default()
    }

    pub fn failing(failure: RuntimeFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// File set the last successful mount wrote
    pub fn mounted(&self) -> Option<FileSet> {
        self.mounted.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl ExecutionRuntime for ScriptedRuntime {
    async fn init(&self, _credentials: &RuntimeCredentials) -> Result<(), RuntimeError> {
        self.record("init");
        if self.failure == Some(RuntimeFailure::Init) {
            return Err(RuntimeError::AuthFailed("scripted".to_string()));
        }
        Ok(())
    }

    async fn boot(&self) -> Result<Box<dyn RuntimeInstance>, RuntimeError> {
        self.record("boot");
        if self.failure == Some(RuntimeFailure::Boot) {
            return Err(RuntimeError::BootFailed("scripted".to_string()));
        }
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl RuntimeInstance for ScriptedRuntime {
    async fn mount(&self, files: &FileSet) -> Result<(), RuntimeError> {
        self.record(format!("mount {} files", files.len()));
        if self.failure == Some(RuntimeFailure::Mount) {
            return Err(RuntimeError::MountFailed("scripted".to_string()));
        }
        *self.mounted.lock().unwrap() = Some(files.clone());
        Ok(())
    }

    async fn spawn(
        &self,
        program: &str,
        args: &[String],
        _options: SpawnOptions,
    ) -> Result<Box<dyn RuntimeProcess>, RuntimeError> {
        let command = format!("{program} {}", args.join(" "));
        self.record(format!("spawn {command}"));
        if self.failure == Some(RuntimeFailure::Spawn) {
            return Err(RuntimeError::SpawnFailed {
                command,
                reason: "scripted".to_string(),
            });
        }
        let exit = match self.failure {
            Some(RuntimeFailure::InstallExit(code)) if command == "npm install" => code,
            _ => 0,
        };
        Ok(Box::new(ScriptedProcess { exit }))
    }

    async fn server_ready(&self) -> Result<ServerReady, RuntimeError> {
        self.record("server_ready");
        if self.failure == Some(RuntimeFailure::ReadyNever) {
            futures::future::pending::<()>().await;
        }
        Ok(ServerReady {
            port: 5173,
            url: "http://localhost:5173".to_string(),
        })
    }
}

pub struct ScriptedProcess {
    exit: i32,
}

#[async_trait]
impl RuntimeProcess for ScriptedProcess {
    fn take_output(&mut self) -> Option<BoxStream<'static, String>> {
        Some(futures::stream::iter(vec!["ready in 120ms".to_string()]).boxed())
    }

    async fn wait(&mut self) -> Result<i32, RuntimeError> {
        Ok(self.exit)
    }
}

/// Scripted embed widget host, recording what gets embedded
#[derive(Clone, Default)]
pub struct ScriptedEmbedHost {
    pub load_fails: bool,
    pub widget_rejects: bool,
    embedded: Arc<Mutex<Vec<(ProjectDescriptor, EmbedOptions)>>>,
}

impl ScriptedEmbedHost {
    pub fn working() -> Self {
        Self::default()
    }

    pub fn failing_load() -> Self {
        Self {
            load_fails: true,
            ..Self::default()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            widget_rejects: true,
            ..Self::default()
        }
    }

    pub fn embedded(&self) -> Vec<(ProjectDescriptor, EmbedOptions)> {
        self.embedded.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbedHost for ScriptedEmbedHost {
    async fn load_widget(&self) -> Result<Box<dyn EmbedWidget>, EmbedError> {
        if self.load_fails {
            return Err(EmbedError::ScriptLoadFailed("scripted".to_string()));
        }
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl EmbedWidget for ScriptedEmbedHost {
    async fn embed_project(
        &self,
        project: &ProjectDescriptor,
        options: &EmbedOptions,
    ) -> Result<(), EmbedError> {
        if self.widget_rejects {
            return Err(EmbedError::WidgetRejected("scripted".to_string()));
        }
        self.embedded
            .lock()
            .unwrap()
            .push((project.clone(), options.clone()));
        Ok(())
    }
}

/// Surface double recording stages, frames, and failures
#[derive(Default)]
pub struct RecordingSurface {
    stages: Mutex<Vec<LaunchState>>,
    primary: Mutex<Option<String>>,
    failures: Mutex<Vec<(String, String)>>,
}

impl RecordingSurface {
    pub fn stages(&self) -> Vec<LaunchState> {
        self.stages.lock().unwrap().clone()
    }

    pub fn primary_url(&self) -> Option<String> {
        self.primary.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<(String, String)> {
        self.failures.lock().unwrap().clone()
    }
}

impl PreviewSurface for RecordingSurface {
    fn stage_changed(&self, state: LaunchState) {
        self.stages.lock().unwrap().push(state);
    }

    fn show_primary(&self, url: &str) {
        *self.primary.lock().unwrap() = Some(url.to_string());
    }

    fn show_failure(&self, message: &str, open_url: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((message.to_string(), open_url.to_string()));
    }
}
