//! Which filesystem paths the watcher reports.

use std::path::{Component, Path, PathBuf};

use crate::config::ProjectLayout;
use crate::project::{IgnoreRules, has_tracked_extension};

#[derive(Debug, Clone)]
pub struct PathFilter {
    roots: Vec<PathBuf>,
    output: PathBuf,
    rules: IgnoreRules,
}

impl PathFilter {
    pub fn new(layout: &ProjectLayout) -> Self {
        Self {
            roots: layout
                .watched_roots()
                .into_iter()
                .map(Path::to_path_buf)
                .collect(),
            output: layout.output.clone(),
            rules: IgnoreRules::new(&layout.root, &layout.ignore_patterns),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    /// Inside a watched root and outside the output directory, any
    /// `node_modules` or hidden directory and the configured ignore patterns.
    pub fn is_watched(&self, path: &Path) -> bool {
        if path.starts_with(&self.output) || self.rules.is_ignored(path) {
            return false;
        }
        let Some(root) = self.roots.iter().find(|root| path.starts_with(root)) else {
            return false;
        };
        path.strip_prefix(root).is_ok_and(|rest| {
            !rest.components().any(|c| match c {
                Component::Normal(name) => {
                    let name = name.to_string_lossy();
                    name == "node_modules" || name.starts_with('.')
                }
                _ => false,
            })
        })
    }

    /// A watched file the project model tracks.
    pub fn matches(&self, path: &Path) -> bool {
        self.is_watched(path) && has_tracked_extension(path)
    }
}
