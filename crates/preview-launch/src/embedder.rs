//! Fallback embedder
//!
//! When the primary runtime fails, the same normalized file set is handed
//! to a hosted embed widget. The widget gets a project descriptor derived
//! from classification and view-only chrome. If the widget script never
//! loads, or the widget rejects the descriptor, the embedder renders a
//! textual banner with an external-open link carrying the URL-encoded file
//! set. That last resort cannot fail.

use crate::error::EmbedError;
use crate::surface::PreviewSurface;
use async_trait::async_trait;
use preview_fileset::FileSet;
use preview_pipeline::ProjectKind;
use serde::Serialize;
use std::sync::Arc;

/// Root component candidates opened by default for framework kinds
const COMPONENT_CANDIDATES: &[&str] = &["src/App.tsx", "src/App.jsx", "src/App.ts", "src/App.js"];

/// Project descriptor handed to the embed widget
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDescriptor {
    /// The normalized file set
    pub files: FileSet,
    /// Widget title
    pub title: String,
    /// Widget description
    pub description: String,
    /// Template tag the embedding service should use
    pub template: &'static str,
}

/// View-only chrome for the embedded widget
///
/// Serializes with the camelCase field names the widget expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedOptions {
    /// Pane to show
    pub view: &'static str,
    /// Widget height
    pub height: &'static str,
    /// Hide the file explorer
    pub hide_explorer: bool,
    /// Hide navigation controls
    pub hide_navigation: bool,
    /// Force the embed layout even in small containers
    pub force_embed_layout: bool,
    /// File opened in the (hidden) editor pane
    pub open_file: Option<String>,
}

impl EmbedOptions {
    /// Preview-only chrome with a default open file
    #[must_use]
    pub fn view_only(open_file: Option<String>) -> Self {
        Self {
            view: "preview",
            height: "100%",
            hide_explorer: true,
            hide_navigation: true,
            force_embed_layout: true,
            open_file,
        }
    }
}

/// Loader for the embedding service's script
#[async_trait]
pub trait EmbedHost: Send + Sync {
    /// Load the widget factory, asynchronously
    async fn load_widget(&self) -> Result<Box<dyn EmbedWidget>, EmbedError>;
}

/// The loaded widget factory
#[async_trait]
pub trait EmbedWidget: Send + Sync {
    /// Render the project into the host's designated container
    async fn embed_project(
        &self,
        project: &ProjectDescriptor,
        options: &EmbedOptions,
    ) -> Result<(), EmbedError>;
}

/// Template tag for a classified kind
#[must_use]
pub fn derive_template(kind: ProjectKind) -> &'static str {
    match kind {
        ProjectKind::FrameworkToolchain => "create-react-app",
        ProjectKind::BundlerBased => "node",
        ProjectKind::StaticHtml => "html",
    }
}

/// Default file the widget should open
///
/// The root component for framework kinds when one exists, otherwise the
/// host page.
#[must_use]
pub fn default_open_file(files: &FileSet, kind: ProjectKind) -> Option<String> {
    if kind.has_entry_module() {
        if let Some(component) = files.first_present(COMPONENT_CANDIDATES) {
            return Some(component.to_string());
        }
    }
    files
        .first_present(&["index.html", "public/index.html"])
        .map(str::to_string)
}

/// Derive the widget descriptor for a file set
#[must_use]
pub fn derive_descriptor(files: &FileSet, kind: ProjectKind) -> ProjectDescriptor {
    ProjectDescriptor {
        files: files.clone(),
        title: "Preview".to_string(),
        description: "Generated app".to_string(),
        template: derive_template(kind),
    }
}

/// External-open URL carrying the file set as a query parameter
///
/// The guaranteed last-resort presentation. Serializing a string map and
/// percent-encoding the result cannot fail.
#[must_use]
pub fn external_open_url(base: &str, files: &FileSet) -> String {
    let encoded = serde_json::to_string(files)
        .map(|json| urlencoding::encode(&json).into_owned())
        .unwrap_or_default();
    format!("{base}?project={encoded}")
}

/// Secondary presentation tier
pub struct FallbackEmbedder {
    host: Arc<dyn EmbedHost>,
    external_base: String,
}

impl FallbackEmbedder {
    /// New embedder over a widget host
    ///
    /// `external_base` is the editor URL used for the escape-hatch link.
    #[must_use]
    pub fn new(host: Arc<dyn EmbedHost>, external_base: impl Into<String>) -> Self {
        Self {
            host,
            external_base: external_base.into(),
        }
    }

    /// Render the file set through the embed widget
    ///
    /// Never fails: widget problems degrade to a failure banner with the
    /// external-open link.
    pub async fn embed(&self, files: &FileSet, kind: ProjectKind, surface: &dyn PreviewSurface) {
        let descriptor = derive_descriptor(files, kind);
        let options = EmbedOptions::view_only(default_open_file(files, kind));

        match self.try_embed(&descriptor, &options).await {
            Ok(()) => {
                tracing::info!(template = descriptor.template, "embedded fallback widget");
            }
            Err(err) => {
                tracing::warn!(error = %err, "embed widget unavailable, rendering escape hatch");
                surface.show_failure(
                    "Preview runtime unavailable. Open the project externally:",
                    &external_open_url(&self.external_base, files),
                );
            }
        }
    }

    async fn try_embed(
        &self,
        descriptor: &ProjectDescriptor,
        options: &EmbedOptions,
    ) -> Result<(), EmbedError> {
        let widget = self.host.load_widget().await?;
        widget.embed_project(descriptor, options).await
    }
}
