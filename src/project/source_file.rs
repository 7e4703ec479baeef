use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::{ContentHash, FileStatus, SourceRole};

use super::symbols::{ExportedSymbol, ParsedModule};

/// One tracked (or dependency) file as last seen by the project model.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub role: SourceRole,
    pub status: FileStatus,
    pub text: Arc<str>,
    pub hash: Option<ContentHash>,
    /// Result of the most recent successful parse. Survives later syntax
    /// errors so declarations never reflect a half-typed edit.
    pub parsed: Option<Arc<ParsedModule>>,
    /// Why the file is unresolved.
    pub error: Option<String>,
}

impl SourceFile {
    pub fn new(path: PathBuf, role: SourceRole) -> Self {
        Self {
            path,
            role,
            status: FileStatus::Unresolved,
            text: Arc::from(""),
            hash: None,
            parsed: None,
            error: None,
        }
    }

    /// Tombstone left behind by [`super::ProjectModel::remove_file`].
    pub fn removed(path: PathBuf, role: SourceRole) -> Self {
        Self {
            status: FileStatus::Removed,
            ..Self::new(path, role)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Exported symbols, empty unless the file is currently resolved.
    pub fn symbols(&self) -> &[ExportedSymbol] {
        match (&self.parsed, self.status) {
            (Some(parsed), FileStatus::Resolved) => &parsed.symbols,
            _ => &[],
        }
    }

    /// Parsed module of the last successful resolve, even while unresolved.
    pub fn last_good(&self) -> Option<&ParsedModule> {
        match self.status {
            FileStatus::Removed => None,
            _ => self.parsed.as_deref(),
        }
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// File name without any extension (`Button.test.tsx` → `Button`).
    pub fn stem(&self) -> &str {
        self.file_name().split('.').next().unwrap_or_default()
    }
}
