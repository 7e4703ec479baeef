//! Content compiler boundary.
//!
//! The pipeline never interprets compiled output; it hands prose and example
//! sources to a [`ContentCompiler`] and stores whatever string comes back.
//! Two implementations ship with the crate:
//!
//! - [`MarkdownCompiler`]: renders documents to HTML with pulldown-cmark and
//!   passes example code through untouched.
//! - [`CommandCompiler`]: pipes each input through an external command, for
//!   projects that compile MDX with their own toolchain.

use async_trait::async_trait;
use pulldown_cmark::{Options, Parser, html};
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Failed to compile {path}: {reason}")]
    Failed { path: PathBuf, reason: String },

    #[error("Failed to run compiler '{command}' on {path}: {source}")]
    Spawn {
        command: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What is being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileKind {
    /// Markdown/MDX prose (READMEs, docs pages).
    Document,
    /// An example code block or example file.
    Example,
}

impl CompileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompileKind::Document => "document",
            CompileKind::Example => "example",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompileInput {
    pub kind: CompileKind,
    /// File the content came from; for embedded blocks, the enclosing file.
    pub path: PathBuf,
    pub source: String,
}

impl CompileInput {
    pub fn document(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            kind: CompileKind::Document,
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn example(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            kind: CompileKind::Example,
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Turns documentation content into an opaque compiled string.
#[async_trait]
pub trait ContentCompiler: Send + Sync {
    /// Compiler name for logging.
    fn name(&self) -> &str;

    async fn compile(&self, input: CompileInput) -> Result<String, CompileError>;
}

/// Built-in compiler: CommonMark + GFM tables to HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownCompiler;

impl MarkdownCompiler {
    pub fn render(markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let source = strip_mdx_statements(markdown);
        let parser = Parser::new_ext(&source, options);
        let mut output = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}

#[async_trait]
impl ContentCompiler for MarkdownCompiler {
    fn name(&self) -> &str {
        "markdown"
    }

    async fn compile(&self, input: CompileInput) -> Result<String, CompileError> {
        Ok(match input.kind {
            CompileKind::Document => Self::render(&input.source),
            CompileKind::Example => input.source.trim_end().to_string(),
        })
    }
}

/// Drop top-level MDX `import`/`export` lines, which are not markdown.
fn strip_mdx_statements(source: &str) -> String {
    let mut in_fence = false;
    let mut out = String::with_capacity(source.len());
    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }
        if !in_fence && (trimmed.starts_with("import ") || trimmed.starts_with("export ")) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Runs `program args...` once per input: source on stdin, compiled code on
/// stdout. The child sees `DOCGEN_COMPILE_KIND` and `DOCGEN_COMPILE_PATH`.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandCompiler {
    /// `None` for an empty command line.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl ContentCompiler for CommandCompiler {
    fn name(&self) -> &str {
        &self.program
    }

    async fn compile(&self, input: CompileInput) -> Result<String, CompileError> {
        let path = input.path.clone();
        let spawn_error = |source: std::io::Error| CompileError::Spawn {
            command: self.display(),
            path: path.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("DOCGEN_COMPILE_KIND", input.kind.as_str())
            .env("DOCGEN_COMPILE_PATH", &input.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        // feed stdin while stdout drains, or a large output would block the child
        let writer = child.stdin.take().map(|mut stdin| {
            let source = input.source.clone().into_bytes();
            tokio::spawn(async move { stdin.write_all(&source).await })
        });

        let output = child.wait_with_output().await.map_err(spawn_error)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CompileError::Failed {
                path: input.path,
                reason: format!("{} exited with {}: {}", self.display(), output.status, stderr.trim()),
            });
        }

        if let Some(writer) = writer {
            match writer.await {
                Ok(result) => result.map_err(spawn_error)?,
                Err(e) => {
                    return Err(CompileError::Failed {
                        path: input.path,
                        reason: format!("stdin writer panicked: {e}"),
                    });
                }
            }
        }

        String::from_utf8(output.stdout).map_err(|e| CompileError::Failed {
            path: input.path,
            reason: format!("compiler output is not UTF-8: {e}"),
        })
    }
}
