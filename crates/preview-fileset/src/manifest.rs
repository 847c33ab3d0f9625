//! Lenient `package.json` model
//!
//! Classification and command resolution both read the project manifest,
//! and both must degrade gracefully: a malformed manifest is treated as
//! absent, never as an error. [`Manifest::parse`] therefore returns an
//! `Option` and every lookup has a sensible zero value.

use crate::FileSet;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Conventional manifest path
pub const MANIFEST_PATH: &str = "package.json";

/// Parsed subset of a `package.json`
///
/// Only the fields the pipeline reads. Unknown fields are ignored rather
/// than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Package name, if declared
    #[serde(default)]
    pub name: Option<String>,
    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Development dependencies
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    /// npm scripts
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

impl Manifest {
    /// Parse manifest text, `None` on malformed JSON
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Parse the manifest out of a file set, `None` when absent or malformed
    #[must_use]
    pub fn from_files(files: &FileSet) -> Option<Self> {
        files.get(MANIFEST_PATH).and_then(Self::parse)
    }

    /// Whether `name` appears as a direct or development dependency
    #[inline]
    #[must_use]
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }

    /// Script body for `name`, if declared
    #[inline]
    #[must_use]
    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }
}
