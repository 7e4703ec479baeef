pub mod cache;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod declarations;
pub mod extract;
pub mod generation;
pub mod links;
pub mod logging;
pub mod project;
pub mod types;
pub mod utils;
pub mod watcher;

pub use types::*;
pub use cache::{CacheWriter, WriteError, WriteOutcome};
pub use compiler::{CommandCompiler, CompileError, CompileInput, ContentCompiler, MarkdownCompiler};
pub use config::{ProjectLayout, Settings};
pub use declarations::{DeclarationFile, emit_declarations};
pub use extract::{DocumentationRecord, ExampleRecord, ExtractError, Extractor, PropRecord};
pub use generation::{GenerationError, GenerationOutput, GenerationReport, Generator};
pub use links::{Link, LinkIndex};
pub use project::{ProjectError, ProjectModel, ProjectSnapshot};
pub use watcher::{ChangeEvent, Controller, ControllerEvent, ControllerState, WatchError};
