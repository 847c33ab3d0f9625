//! Path predicates and conventions used by classification and injection

use crate::FileSet;

/// Conventional stylesheet locations, in resolution order
pub const STYLESHEET_CANDIDATES: &[&str] = &[
    "src/index.css",
    "src/App.css",
    "src/styles.css",
    "src/style.css",
    "styles.css",
    "style.css",
    "index.css",
];

/// Whether the path carries a typed-source extension
#[inline]
#[must_use]
pub fn is_typed_source(path: &str) -> bool {
    path.ends_with(".ts") || path.ends_with(".tsx")
}

/// Whether the path is a component-syntax source file
#[inline]
#[must_use]
pub fn is_component_source(path: &str) -> bool {
    path.ends_with(".jsx") || path.ends_with(".tsx")
}

/// First conventional stylesheet present in the set
#[must_use]
pub fn stylesheet_path(files: &FileSet) -> Option<&'static str> {
    STYLESHEET_CANDIDATES.iter().copied().find(|p| files.contains(p))
}

/// Relative import specifier from one project file to another
///
/// Both arguments are project-relative paths. The result always starts
/// with `./` or `../` so module resolvers treat it as relative.
#[must_use]
pub fn relative_import(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let to_parts: Vec<&str> = to.split('/').collect();
    let (to_dirs, to_name) = to_parts.split_at(to_parts.len() - 1);

    let common = from_dir
        .iter()
        .zip(to_dirs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = String::new();
    let ups = from_dir.len() - common;
    if ups == 0 {
        out.push_str("./");
    } else {
        for _ in 0..ups {
            out.push_str("../");
        }
    }
    for dir in &to_dirs[common..] {
        out.push_str(dir);
        out.push('/');
    }
    out.push_str(to_name[0]);
    out
}
