//! Preview FileSet - the project file map every pipeline stage works on
//!
//! Provides:
//! - The [`FileSet`] value type (path → text contents)
//! - Path predicates used by classification (typed sources, component
//!   sources, stylesheets)
//! - A lenient `package.json` model that degrades to defaults instead of
//!   failing on malformed input

#![warn(unreachable_pub)]

pub mod fileset;
pub mod manifest;
pub mod paths;

pub use fileset::FileSet;
pub use manifest::{Manifest, MANIFEST_PATH};
pub use paths::{
    is_component_source, is_typed_source, relative_import, stylesheet_path, STYLESHEET_CANDIDATES,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
