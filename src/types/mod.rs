//! Shared vocabulary types used across the project model, extractors and cache.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Kind of an exported symbol, decided from its syntax and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Component,
    Hook,
    Util,
    Type,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Component => "component",
            SymbolKind::Hook => "hook",
            SymbolKind::Util => "util",
            SymbolKind::Type => "type",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution status of a tracked source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    /// Read or parse failed; excluded from extraction until fixed.
    Unresolved,
    Resolved,
    /// Contents changed on disk but not yet re-resolved.
    Stale,
    /// Tombstone left by an unlink event.
    Removed,
}

impl FileStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, FileStatus::Resolved)
    }
}

/// What a tracked file is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRole {
    /// `.ts`/`.tsx` under a symbol root; parsed for exports.
    Declaration,
    /// Source inside an `examples/` directory; compiled, never parsed for exports.
    Example,
    /// `.md`/`.mdx` prose.
    Document,
    /// Routable file under the pages root.
    Page,
    /// File outside the roots that tracked files resolve against.
    Dependency,
}

/// Documentation category. Every extractor produces exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Components,
    Docs,
    Hooks,
    Utils,
    Pages,
}

impl Category {
    /// Categories in link-index order.
    pub const ALL: [Category; 5] = [
        Category::Components,
        Category::Docs,
        Category::Hooks,
        Category::Utils,
        Category::Pages,
    ];

    /// Key used in the link index.
    pub fn link_name(&self) -> &'static str {
        match self {
            Category::Components => "Components",
            Category::Docs => "Docs",
            Category::Hooks => "Hooks",
            Category::Utils => "Utils",
            Category::Pages => "Pages",
        }
    }

    /// Route prefix for link slugs.
    pub fn route_prefix(&self) -> &'static str {
        match self {
            Category::Components => "/components",
            Category::Docs => "/docs",
            Category::Hooks => "/hooks",
            Category::Utils => "/utils",
            Category::Pages => "",
        }
    }

    /// Generated module name, or `None` for link-only categories.
    pub fn module_name(&self) -> Option<&'static str> {
        match self {
            Category::Components => Some("components"),
            Category::Docs => Some("docs"),
            Category::Hooks => Some("hooks"),
            Category::Utils => Some("utils"),
            Category::Pages => None,
        }
    }

    pub fn route(&self, slug: &str) -> String {
        format!("{}/{slug}", self.route_prefix())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.link_name())
    }
}

/// SHA-256 of file contents, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn of(content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(ContentHash::of("a"), ContentHash::of("a"));
        assert_ne!(ContentHash::of("a"), ContentHash::of("a "));
        assert_eq!(ContentHash::of("").as_str().len(), 64);
    }

    #[test]
    fn test_category_routes() {
        assert_eq!(Category::Components.route("button"), "/components/button");
        assert_eq!(Category::Pages.route("playground"), "/playground");
        assert_eq!(Category::Pages.module_name(), None);
    }
}
