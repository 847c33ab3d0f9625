//! The project file map
//!
//! A [`FileSet`] is the complete set of source files for one preview
//! attempt, keyed by project-relative path. Pipeline stages never mutate a
//! caller's set in place: a stage that needs to add or patch files clones
//! first and returns the derived copy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Project files keyed by relative path
///
/// Paths are forward-slash separated with no leading slash; insertion
/// normalizes both. Ordering of entries carries no meaning, but the map is
/// ordered so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSet {
    files: BTreeMap<String, String>,
}

impl FileSet {
    /// Create an empty file set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, normalizing the path
    ///
    /// Backslashes become forward slashes and any leading slash is
    /// stripped. Returns the previous contents when the path was already
    /// present.
    pub fn insert(&mut self, path: impl AsRef<str>, contents: impl Into<String>) -> Option<String> {
        self.files
            .insert(normalize_path(path.as_ref()), contents.into())
    }

    /// Contents at a path, if present
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Whether a path is present
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// First path from `candidates` that exists in the set
    #[must_use]
    pub fn first_present<'a>(&self, candidates: &'a [&'a str]) -> Option<&'a str> {
        candidates.iter().copied().find(|p| self.contains(p))
    }

    /// Whether any path satisfies the predicate
    pub fn any_path(&self, mut pred: impl FnMut(&str) -> bool) -> bool {
        self.files.keys().any(|p| pred(p))
    }

    /// Iterate over `(path, contents)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Iterate over paths
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl From<BTreeMap<String, String>> for FileSet {
    fn from(files: BTreeMap<String, String>) -> Self {
        let mut set = Self::new();
        for (path, contents) in files {
            set.insert(path, contents);
        }
        set
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FileSet {
    fn from(entries: [(&str, &str); N]) -> Self {
        let mut set = Self::new();
        for (path, contents) in entries {
            set.insert(path, contents);
        }
        set
    }
}

impl FromIterator<(String, String)> for FileSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (path, contents) in iter {
            set.insert(path, contents);
        }
        set
    }
}

fn normalize_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    forward.trim_start_matches('/').to_string()
}
