//! Project normalization
//!
//! Synthesizes every file the classified project kind needs to run
//! standalone: manifest, host page, entry module, stylesheet wiring. Each
//! injection is guarded by a presence check, which makes the whole pass
//! idempotent and non-destructive of caller content. The only mutation of
//! an existing file is the stylesheet-import patch, and that only prepends.

use crate::classifier::entry_candidates;
use crate::types::{ProjectFacts, ProjectKind};
use preview_fileset::{relative_import, stylesheet_path, FileSet, MANIFEST_PATH};
use serde_json::json;

/// Normalize a file set for its classified kind
///
/// Returns a derived copy; the input is never mutated. Infallible: every
/// decision that reads the manifest substitutes defaults when it is
/// malformed or absent.
#[must_use]
pub fn normalize(files: &FileSet, kind: ProjectKind, facts: &ProjectFacts) -> FileSet {
    let mut out = files.clone();

    ensure_manifest(&mut out, kind, facts);
    ensure_host_page(&mut out, kind, facts);
    ensure_entry_module(&mut out, kind, facts);
    wire_stylesheet_import(&mut out, kind);
    wire_stylesheet_link(&mut out, kind);

    out
}

/// Entry path the pipeline will use: the existing one, or the canonical
/// path synthesis would create for this kind.
fn planned_entry_path(kind: ProjectKind, facts: &ProjectFacts) -> Option<String> {
    if let Some(existing) = &facts.existing_entry_path {
        return Some(existing.clone());
    }
    canonical_entry_path(kind, facts.uses_typed_variant).map(str::to_string)
}

fn canonical_entry_path(kind: ProjectKind, typed: bool) -> Option<&'static str> {
    match kind {
        ProjectKind::FrameworkToolchain => Some(if typed { "src/index.tsx" } else { "src/index.js" }),
        ProjectKind::BundlerBased => Some(if typed { "src/main.tsx" } else { "src/main.jsx" }),
        ProjectKind::StaticHtml => None,
    }
}

fn host_page_path(files: &FileSet, kind: ProjectKind) -> Option<&'static str> {
    let candidates: &[&str] = match kind {
        ProjectKind::FrameworkToolchain => &["public/index.html", "index.html"],
        _ => &["index.html", "public/index.html"],
    };
    files.first_present(candidates)
}

// Step 1: manifest synthesis. Static projects deliberately get none; an
// empty input must normalize to nothing but the placeholder host page.
fn ensure_manifest(out: &mut FileSet, kind: ProjectKind, facts: &ProjectFacts) {
    if out.contains(MANIFEST_PATH) || !kind.has_entry_module() {
        return;
    }
    let manifest = match kind {
        ProjectKind::FrameworkToolchain => framework_manifest(facts.uses_typed_variant),
        ProjectKind::BundlerBased => bundler_manifest(facts.uses_typed_variant),
        ProjectKind::StaticHtml => unreachable!("guarded by has_entry_module"),
    };
    tracing::debug!(kind = %kind, "synthesizing manifest");
    out.insert(MANIFEST_PATH, manifest);
}

// Step 2: host page synthesis.
fn ensure_host_page(out: &mut FileSet, kind: ProjectKind, facts: &ProjectFacts) {
    if out.contains("index.html") || out.contains("public/index.html") {
        return;
    }
    tracing::debug!(kind = %kind, "synthesizing host page");
    match kind {
        ProjectKind::StaticHtml => {
            out.insert("index.html", "<h1>Hello World</h1>");
        }
        ProjectKind::FrameworkToolchain => {
            out.insert("public/index.html", framework_host_page());
        }
        ProjectKind::BundlerBased => {
            let entry = planned_entry_path(kind, facts)
                .unwrap_or_else(|| "src/main.jsx".to_string());
            out.insert("index.html", bundler_host_page(&entry));
        }
    }
}

// Step 3: entry module synthesis.
fn ensure_entry_module(out: &mut FileSet, kind: ProjectKind, facts: &ProjectFacts) {
    if !kind.has_entry_module() || out.first_present(entry_candidates(kind)).is_some() {
        return;
    }
    let Some(path) = canonical_entry_path(kind, facts.uses_typed_variant) else {
        return;
    };
    let css_import = stylesheet_path(out).map(|css| relative_import(path, css));
    tracing::debug!(kind = %kind, path, "synthesizing entry module");
    out.insert(
        path,
        entry_module(facts.uses_typed_variant, css_import.as_deref()),
    );
}

// Step 4: prepend a stylesheet import to the resolved entry module when it
// does not already reference the stylesheet. Runs whether or not step 3
// fired; only ever prepends.
fn wire_stylesheet_import(out: &mut FileSet, kind: ProjectKind) {
    let Some(css) = stylesheet_path(out) else { return };
    let Some(entry) = out.first_present(entry_candidates(kind)) else {
        return;
    };
    let rel = relative_import(entry, css);
    let Some(text) = out.get(entry) else { return };
    if references_import(text, &rel) {
        return;
    }
    tracing::debug!(entry, stylesheet = css, "prepending stylesheet import");
    let patched = format!("import '{rel}';\n{text}");
    out.insert(entry, patched);
}

// Step 5: belt-and-suspenders link injection. Only fires when no entry
// artifact references the stylesheet after step 4, so the two mechanisms
// never both apply.
fn wire_stylesheet_link(out: &mut FileSet, kind: ProjectKind) {
    let Some(css) = stylesheet_path(out) else { return };

    let entry_covers = out
        .first_present(entry_candidates(kind))
        .and_then(|entry| {
            let rel = relative_import(entry, css);
            out.get(entry).map(|text| references_import(text, &rel))
        })
        .unwrap_or(false);
    if entry_covers {
        return;
    }

    let Some(host) = host_page_path(out, kind) else { return };
    let Some(page) = out.get(host) else { return };
    if page.contains(css) {
        return;
    }

    tracing::debug!(host, stylesheet = css, "injecting stylesheet link");
    let link = format!("<link rel=\"stylesheet\" href=\"/{css}\">");
    let patched = match page.find("</head>") {
        Some(at) => {
            let mut text = String::with_capacity(page.len() + link.len() + 1);
            text.push_str(&page[..at]);
            text.push_str(&link);
            text.push('\n');
            text.push_str(&page[at..]);
            text
        }
        // No head element to hang the link on; prepend so it still loads.
        None => format!("{link}\n{page}"),
    };
    out.insert(host, patched);
}

/// Whether module text already imports `rel` in either quote style
fn references_import(text: &str, rel: &str) -> bool {
    text.contains(&format!("import '{rel}'")) || text.contains(&format!("import \"{rel}\""))
}

fn framework_manifest(typed: bool) -> String {
    let mut manifest = json!({
        "name": "preview-app",
        "version": "0.1.0",
        "private": true,
        "dependencies": {
            "react": "^18.2.0",
            "react-dom": "^18.2.0",
            "react-router-dom": "^6.22.0",
            "react-scripts": "5.0.1"
        },
        "scripts": {
            "start": "react-scripts start",
            "build": "react-scripts build"
        }
    });
    if typed {
        if let Some(deps) = manifest["dependencies"].as_object_mut() {
            deps.insert("typescript".into(), json!("^5.4.0"));
            deps.insert("@types/react".into(), json!("^18.2.0"));
            deps.insert("@types/react-dom".into(), json!("^18.2.0"));
        }
    }
    serde_json::to_string_pretty(&manifest).unwrap_or_default()
}

fn bundler_manifest(typed: bool) -> String {
    let mut manifest = json!({
        "name": "preview-app",
        "version": "0.1.0",
        "private": true,
        "type": "module",
        "dependencies": {
            "react": "^18.2.0",
            "react-dom": "^18.2.0",
            "react-router-dom": "^6.22.0"
        },
        "devDependencies": {
            "vite": "^5.2.0",
            "@vitejs/plugin-react": "^4.2.0"
        },
        "scripts": {
            "dev": "vite",
            "build": "vite build",
            "preview": "vite preview"
        }
    });
    if typed {
        if let Some(dev) = manifest["devDependencies"].as_object_mut() {
            dev.insert("typescript".into(), json!("^5.4.0"));
        }
    }
    serde_json::to_string_pretty(&manifest).unwrap_or_default()
}

fn framework_host_page() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>React App</title>
</head>
<body>
  <div id="root"></div>
</body>
</html>"#
        .to_string()
}

fn bundler_host_page(entry: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Vite App</title>
</head>
<body>
  <div id="root"></div>
  <script type="module" src="/{entry}"></script>
</body>
</html>"#
    )
}

fn entry_module(typed: bool, css_import: Option<&str>) -> String {
    let mut text = String::new();
    if let Some(rel) = css_import {
        text.push_str(&format!("import '{rel}';\n"));
    }
    text.push_str(
        "import React from 'react';\n\
         import ReactDOM from 'react-dom/client';\n\
         import { BrowserRouter } from 'react-router-dom';\n\
         import App from './App';\n\n",
    );
    if typed {
        text.push_str(
            "ReactDOM.createRoot(document.getElementById('root')!).render(\n\
             \x20\x20<BrowserRouter>\n\
             \x20\x20\x20\x20<App />\n\
             \x20\x20</BrowserRouter>\n\
             );\n",
        );
    } else {
        text.push_str(
            "const root = ReactDOM.createRoot(document.getElementById('root'));\n\
             root.render(\n\
             \x20\x20<BrowserRouter>\n\
             \x20\x20\x20\x20<App />\n\
             \x20\x20</BrowserRouter>\n\
             );\n",
        );
    }
    text
}
