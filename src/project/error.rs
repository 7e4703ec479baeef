//! Error types for the project model.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or resolving project files.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Syntax error in {path} at line {line}")]
    Syntax { path: PathBuf, line: usize },

    #[error("Parser unavailable: {reason}")]
    ParserInit { reason: String },

    #[error("Invalid project configuration {path}: {reason}\nSuggestion: {suggestion}")]
    Config {
        path: PathBuf,
        reason: String,
        suggestion: &'static str,
    },
}

impl ProjectError {
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ProjectError::Config {
            path: path.into(),
            reason: reason.into(),
            suggestion: "Check tsconfig.json syntax, extends targets and path patterns",
        }
    }
}

pub type ProjectResult<T> = Result<T, ProjectError>;
