//! Error types for documentation extraction.

use std::path::PathBuf;
use thiserror::Error;

use crate::compiler::CompileError;
use crate::types::Category;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// Two records of one category fold to the same slug. Fatal to the
    /// generation: publishing either would silently hide the other.
    #[error(
        "Duplicate slug '{slug}' in {category}: '{first}' and '{second}'\nSuggestion: rename one of the exports or move it to its own directory"
    )]
    SlugCollision {
        category: Category,
        slug: String,
        first: String,
        second: String,
    },

    /// Documentation content of a single record could not be used.
    #[error("Invalid documentation content in {path}: {reason}")]
    Content { path: PathBuf, reason: String },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl ExtractError {
    pub fn content(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ExtractError::Content {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Per-record errors are absorbed into an annotation; everything else
    /// fails the generation.
    pub fn is_record_level(&self) -> bool {
        matches!(self, ExtractError::Content { .. } | ExtractError::Compile(_))
    }
}

pub type ExtractResult<T> = Result<T, ExtractError>;
