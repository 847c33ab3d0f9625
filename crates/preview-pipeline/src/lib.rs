//! Preview Pipeline - project classification and normalization
//!
//! Turns an arbitrary uploaded file set into something runnable:
//! - [`classify`] infers what kind of project the files describe, without
//!   ever failing (no signal means static HTML)
//! - [`normalize`] synthesizes every file the classified kind requires to
//!   run standalone, without touching anything the caller supplied
//!
//! Classification is a pure function of the file set and is recomputed on
//! every preview load; normalized output is never persisted.
//!
//! # Example
//!
//! ```rust
//! use preview_fileset::FileSet;
//! use preview_pipeline::{classify, normalize, ProjectKind};
//!
//! let files = FileSet::from([
//!     ("package.json", r#"{"dependencies":{"react":"^18"}}"#),
//!     ("src/App.jsx", "export default function App() { return <p>hi</p>; }"),
//! ]);
//!
//! let (kind, facts) = classify(&files);
//! assert_eq!(kind, ProjectKind::FrameworkToolchain);
//!
//! let prepared = normalize(&files, kind, &facts);
//! assert!(prepared.contains("public/index.html"));
//! assert!(prepared.contains("src/index.js"));
//! ```

#![warn(unreachable_pub)]

pub mod classifier;
pub mod normalizer;
pub mod types;

pub use classifier::classify;
pub use normalizer::normalize;
pub use types::{ProjectFacts, ProjectKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
