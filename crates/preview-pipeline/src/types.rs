//! Classification outputs shared across the pipeline

use std::fmt;

/// What kind of project a file set describes
///
/// Derived, never stored: recomputed from the file set each time it is
/// needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectKind {
    /// Plain HTML, served as-is
    StaticHtml,
    /// Bundler-driven app (Vite signals)
    BundlerBased,
    /// Framework app on its own toolchain (react-scripts signals)
    FrameworkToolchain,
}

impl ProjectKind {
    /// Stable identifier used in logs
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StaticHtml => "static-html",
            Self::BundlerBased => "bundler-based",
            Self::FrameworkToolchain => "framework-toolchain-based",
        }
    }

    /// Whether the kind carries a scriptable entry module
    #[inline]
    #[must_use]
    pub fn has_entry_module(self) -> bool {
        !matches!(self, Self::StaticHtml)
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auxiliary facts derived alongside the kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFacts {
    /// Any path carries a typed-source extension
    pub uses_typed_variant: bool,
    /// A conventional stylesheet path exists
    pub has_stylesheet: bool,
    /// First entry-module candidate found, in kind-specific order
    pub existing_entry_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_matches_identifier() {
        assert_eq!(ProjectKind::StaticHtml.to_string(), "static-html");
        assert_eq!(ProjectKind::BundlerBased.to_string(), "bundler-based");
        assert_eq!(
            ProjectKind::FrameworkToolchain.to_string(),
            "framework-toolchain-based"
        );
    }

    #[test]
    fn static_kind_has_no_entry_module() {
        assert!(!ProjectKind::StaticHtml.has_entry_module());
        assert!(ProjectKind::BundlerBased.has_entry_module());
        assert!(ProjectKind::FrameworkToolchain.has_entry_module());
    }
}
