//! Project classification
//!
//! Pure, total, priority-ordered: every file set classifies to exactly one
//! [`ProjectKind`], and nothing here can fail. A malformed manifest is
//! treated as absent; no signal at all means static HTML.

use crate::types::{ProjectFacts, ProjectKind};
use preview_fileset::{is_component_source, is_typed_source, stylesheet_path, FileSet, Manifest};

/// Recognized bundler configuration filenames
pub const BUNDLER_CONFIG_CANDIDATES: &[&str] =
    &["vite.config.ts", "vite.config.js", "vite.config.mjs"];

/// Entry-module candidates for bundler projects, in resolution order
pub const BUNDLER_ENTRY_CANDIDATES: &[&str] = &[
    "src/main.tsx",
    "src/main.jsx",
    "src/main.ts",
    "src/main.js",
    "src/index.tsx",
    "src/index.jsx",
    "src/index.ts",
    "src/index.js",
];

/// Entry-module candidates for framework-toolchain projects
pub const FRAMEWORK_ENTRY_CANDIDATES: &[&str] =
    &["src/index.tsx", "src/index.jsx", "src/index.ts", "src/index.js"];

/// Classify a file set
///
/// Priority order:
/// 1. bundler config file, or a parseable manifest depending on the
///    bundler → [`ProjectKind::BundlerBased`]
/// 2. manifest depending on the UI framework or its toolchain →
///    [`ProjectKind::FrameworkToolchain`]
/// 3. no manifest but component-syntax sources present →
///    [`ProjectKind::FrameworkToolchain`] (legacy toolchain assumed)
/// 4. otherwise [`ProjectKind::StaticHtml`]
#[must_use]
pub fn classify(files: &FileSet) -> (ProjectKind, ProjectFacts) {
    let manifest = Manifest::from_files(files);
    let kind = classify_kind(files, manifest.as_ref());

    let facts = ProjectFacts {
        uses_typed_variant: files.any_path(is_typed_source),
        has_stylesheet: stylesheet_path(files).is_some(),
        existing_entry_path: files
            .first_present(entry_candidates(kind))
            .map(str::to_string),
    };

    tracing::debug!(kind = %kind, ?facts, "classified project");
    (kind, facts)
}

/// Entry-module candidate paths for a kind, in resolution order
///
/// Static projects have no entry module, so their list is empty.
#[must_use]
pub fn entry_candidates(kind: ProjectKind) -> &'static [&'static str] {
    match kind {
        ProjectKind::BundlerBased => BUNDLER_ENTRY_CANDIDATES,
        ProjectKind::FrameworkToolchain => FRAMEWORK_ENTRY_CANDIDATES,
        ProjectKind::StaticHtml => &[],
    }
}

fn classify_kind(files: &FileSet, manifest: Option<&Manifest>) -> ProjectKind {
    let has_bundler_config = files.first_present(BUNDLER_CONFIG_CANDIDATES).is_some();
    if has_bundler_config || manifest.is_some_and(|m| m.has_dependency("vite")) {
        return ProjectKind::BundlerBased;
    }

    // The framework library alone is accepted as the toolchain signal; a
    // generated project frequently lists react without react-scripts.
    if manifest.is_some_and(|m| m.has_dependency("react") || m.has_dependency("react-scripts")) {
        return ProjectKind::FrameworkToolchain;
    }

    // "No manifest" includes a manifest that failed to parse.
    if manifest.is_none() && files.any_path(is_component_source) {
        return ProjectKind::FrameworkToolchain;
    }

    ProjectKind::StaticHtml
}
