//! Error types for the cache writer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to serialize module '{module}': {source}")]
    Serialize {
        module: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to prepare staging directory in {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Failed to publish snapshot to {path}: {source}\nSuggestion: check that nothing holds the output directory open"
    )]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type WriteResult<T> = Result<T, WriteError>;
