//! Directory discovery for the initial project scan.
//!
//! Respects `.gitignore` rules and the configured ignore patterns, and only
//! yields files with a tracked extension.

use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};
use std::path::{Path, PathBuf};

use crate::log_event;

/// Extensions the pipeline reads. Everything else is invisible to it.
pub const TRACKED_EXTENSIONS: [&str; 4] = ["ts", "tsx", "md", "mdx"];

pub fn has_tracked_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TRACKED_EXTENSIONS.contains(&ext))
}

/// Compiled `ignore_patterns`, anchored at the project root.
///
/// Shared by the initial scan and by every later add, so a path is ignored
/// the same way no matter how it was discovered.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    overrides: Override,
}

impl IgnoreRules {
    pub fn new(root: &Path, patterns: &[String]) -> Self {
        let mut builder = OverrideBuilder::new(root);
        for pattern in patterns {
            if let Err(e) = builder.add(&format!("!{pattern}")) {
                log_event!("project", "invalid ignore pattern", "'{pattern}': {e}");
            }
        }
        let overrides = builder.build().unwrap_or_else(|e| {
            log_event!("project", "ignore patterns disabled", "{e}");
            Override::empty()
        });
        Self { overrides }
    }

    /// True if a configured pattern excludes `path`.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.overrides.matched(path, false).is_ignore()
    }
}

/// Walks the watched roots to find files to register.
#[derive(Debug, Clone)]
pub struct FileScanner {
    rules: IgnoreRules,
}

impl FileScanner {
    pub fn new(rules: IgnoreRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    /// Tracked files under `root`, sorted for a deterministic registration order.
    pub fn scan(&self, root: &Path) -> Vec<PathBuf> {
        if !root.is_dir() {
            return Vec::new();
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .follow_links(false)
            .require_git(false)
            .overrides(self.rules.overrides.clone())
            .filter_entry(|entry| entry.file_name() != "node_modules");

        let mut files: Vec<PathBuf> = builder
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| has_tracked_extension(path))
            .collect();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_filters_extensions_and_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("Button/examples")).unwrap();
        fs::write(root.join("Button/Button.tsx"), "").unwrap();
        fs::write(root.join("Button/README.mdx"), "").unwrap();
        fs::write(root.join("Button/examples/basic.tsx"), "").unwrap();
        fs::write(root.join("Button/styles.css"), "").unwrap();
        fs::write(root.join("Button/Button.generated.ts"), "").unwrap();
        fs::write(root.join(".hidden.ts"), "").unwrap();
        fs::create_dir_all(root.join("Button/node_modules/x")).unwrap();
        fs::write(root.join("Button/node_modules/x/index.d.ts"), "").unwrap();

        let scanner = FileScanner::new(IgnoreRules::new(root, &["*.generated.*".to_string()]));
        let files: Vec<_> = scanner
            .scan(root)
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            files,
            vec![
                PathBuf::from("Button/Button.tsx"),
                PathBuf::from("Button/README.mdx"),
                PathBuf::from("Button/examples/basic.tsx"),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_empty() {
        let scanner = FileScanner::new(IgnoreRules::new(Path::new("/"), &[]));
        assert!(scanner.scan(Path::new("/definitely/not/here")).is_empty());
    }

    #[test]
    fn test_ignore_rules_are_anchored_at_project_root() {
        let root = Path::new("/p");
        let rules = IgnoreRules::new(
            root,
            &["*.generated.*".to_string(), ".data/**".to_string()],
        );
        assert!(rules.is_ignored(Path::new("/p/components/Card.generated.tsx")));
        assert!(rules.is_ignored(Path::new("/p/.data/components.ts")));
        assert!(!rules.is_ignored(Path::new("/p/components/Card.tsx")));
        assert!(!rules.is_ignored(Path::new("/p/components/.data/Card.tsx")));
    }
}
