//! End-to-end preview flow: session store → classify → normalize →
//! launch → fallback.

use preview_core::{PreviewError, PreviewOutcome, PreviewService, SessionError, SessionStore};
use preview_launch::{FallbackEmbedder, LaunchConfig, LaunchOrchestrator, LaunchState, PreviewSurface};
use preview_pipeline::{classify, normalize};
use preview_test_utils::{
    react_project, static_site, RecordingSurface, RuntimeFailure, ScriptedEmbedHost,
    ScriptedRuntime,
};
use std::sync::Arc;

struct Harness {
    store: Arc<SessionStore>,
    runtime: ScriptedRuntime,
    embed_host: ScriptedEmbedHost,
    surface: Arc<RecordingSurface>,
    service: PreviewService,
}

fn harness(runtime: ScriptedRuntime, embed_host: ScriptedEmbedHost) -> Harness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let store = Arc::new(SessionStore::new());
    let surface = Arc::new(RecordingSurface::default());
    let source: Arc<SessionStore> = Arc::clone(&store);
    let service = PreviewService::new(
        source,
        LaunchOrchestrator::new(Arc::new(runtime.clone()), LaunchConfig::new("wc_test")),
        FallbackEmbedder::new(Arc::new(embed_host.clone()), "https://stackblitz.com/edit"),
        Arc::clone(&surface) as Arc<dyn PreviewSurface>,
    );
    Harness {
        store,
        runtime,
        embed_host,
        surface,
        service,
    }
}

#[tokio::test]
async fn react_session_previews_on_the_primary_tier() {
    let h = harness(ScriptedRuntime::working(), ScriptedEmbedHost::working());
    let id = h.store.create(react_project());

    let outcome = h.service.load_and_preview(&id.to_string()).await.unwrap();

    assert_eq!(
        outcome,
        PreviewOutcome::Primary {
            url: "http://localhost:5173".to_string()
        }
    );
    assert_eq!(h.surface.primary_url().as_deref(), Some("http://localhost:5173"));
    assert_eq!(h.surface.stages().last(), Some(&LaunchState::Ready));

    // The runtime saw the normalized set, not the raw upload.
    let mounted = h.runtime.mounted().unwrap();
    assert!(mounted.contains("public/index.html"));
    assert!(mounted.contains("src/index.js"));
    assert!(h.embed_host.embedded().is_empty());
    assert_eq!(h.service.active_session().await, Some(id));
}

#[tokio::test]
async fn activation_failure_delegates_with_the_normalized_set() {
    let h = harness(
        ScriptedRuntime::failing(RuntimeFailure::Init),
        ScriptedEmbedHost::working(),
    );
    let id = h.store.create(react_project());

    let outcome = h.service.load_and_preview(&id.to_string()).await.unwrap();
    assert_eq!(outcome, PreviewOutcome::Fallback);

    // Nothing past activation ran.
    assert_eq!(h.runtime.calls(), vec!["init"]);
    assert_eq!(
        h.surface.stages(),
        vec![LaunchState::Activating, LaunchState::Failed]
    );

    // The embedder received exactly what would have been mounted.
    let raw = react_project();
    let (kind, facts) = classify(&raw);
    let expected = normalize(&raw, kind, &facts);
    let embedded = h.embed_host.embedded();
    assert_eq!(embedded.len(), 1);
    assert_eq!(embedded[0].0.files, expected);
    assert_eq!(embedded[0].0.template, "create-react-app");
}

#[tokio::test]
async fn failed_install_never_starts_the_server() {
    let h = harness(
        ScriptedRuntime::failing(RuntimeFailure::InstallExit(1)),
        ScriptedEmbedHost::working(),
    );
    let id = h.store.create(react_project());

    let outcome = h.service.load_and_preview(&id.to_string()).await.unwrap();
    assert_eq!(outcome, PreviewOutcome::Fallback);
    assert!(!h.runtime.calls().iter().any(|c| c == "spawn npm start"));
    assert_eq!(h.embed_host.embedded().len(), 1);
}

#[tokio::test]
async fn broken_widget_falls_through_to_the_escape_hatch() {
    let h = harness(
        ScriptedRuntime::failing(RuntimeFailure::Boot),
        ScriptedEmbedHost::rejecting(),
    );
    let id = h.store.create(static_site());

    let outcome = h.service.load_and_preview(&id.to_string()).await.unwrap();
    assert_eq!(outcome, PreviewOutcome::Fallback);

    let failures = h.surface.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].1.starts_with("https://stackblitz.com/edit?project="));
}

#[tokio::test]
async fn unknown_and_malformed_sessions_are_distinct_errors() {
    let h = harness(ScriptedRuntime::working(), ScriptedEmbedHost::working());

    let missing = uuid::Uuid::new_v4().to_string();
    let err = h.service.load_and_preview(&missing).await.unwrap_err();
    assert!(matches!(
        err,
        PreviewError::Session(SessionError::NotFound(_))
    ));

    let err = h.service.load_and_preview("not-a-session").await.unwrap_err();
    assert!(matches!(
        err,
        PreviewError::Session(SessionError::InvalidId(_))
    ));
}

#[tokio::test]
async fn new_load_supersedes_the_previous_session() {
    let h = harness(ScriptedRuntime::working(), ScriptedEmbedHost::working());
    let first = h.store.create(react_project());
    let second = h.store.create(static_site());

    h.service.load_and_preview(&first.to_string()).await.unwrap();
    assert_eq!(h.service.active_session().await, Some(first));

    h.service.load_and_preview(&second.to_string()).await.unwrap();
    assert_eq!(h.service.active_session().await, Some(second));
}
