//! One generation: extract every category, emit declarations, publish.
//!
//! Extractors and the declaration emitter run concurrently over the same
//! [`ProjectSnapshot`]. The link index and the write wait for all of them, so
//! a published snapshot always comes from a single point-in-time view.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;

use crate::cache::{CacheWriter, SnapshotData, WriteError, WriteOutcome, render_snapshot};
use crate::compiler::ContentCompiler;
use crate::declarations::{DeclarationFile, emit_declarations};
use crate::extract::{DocumentationRecord, ExtractError, Extractor, default_extractors};
use crate::links::LinkIndex;
use crate::project::ProjectSnapshot;
use crate::types::Category;
use crate::{debug_event, log_event};

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("Generation task failed: {reason}")]
    Task { reason: String },
}

impl From<tokio::task::JoinError> for GenerationError {
    fn from(e: tokio::task::JoinError) -> Self {
        GenerationError::Task {
            reason: e.to_string(),
        }
    }
}

/// Everything a generation produced, before it is written.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    pub revision: u64,
    pub records: BTreeMap<Category, Vec<DocumentationRecord>>,
    pub links: LinkIndex,
    pub types: Vec<DeclarationFile>,
}

impl GenerationOutput {
    pub fn records(&self, category: Category) -> &[DocumentationRecord] {
        self.records.get(&category).map(Vec::as_slice).unwrap_or_default()
    }

    /// Records carrying a per-record error annotation.
    pub fn partial_records(&self) -> usize {
        self.records
            .values()
            .flatten()
            .filter(|r| r.error.is_some())
            .count()
    }
}

/// Summary of a completed generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub revision: u64,
    pub outcome: WriteOutcome,
    pub counts: Vec<(Category, usize)>,
    pub partial_records: usize,
    pub declarations: usize,
    pub elapsed: Duration,
}

/// Runs generations. Cheap to clone; shared between the controller and the
/// tasks it spawns.
#[derive(Clone)]
pub struct Generator {
    extractors: Arc<Vec<Arc<dyn Extractor>>>,
    compiler: Arc<dyn ContentCompiler>,
    writer: CacheWriter,
}

impl Generator {
    pub fn new(compiler: Arc<dyn ContentCompiler>, output: impl Into<PathBuf>) -> Self {
        Self::with_extractors(default_extractors(), compiler, output)
    }

    pub fn with_extractors(
        extractors: Vec<Arc<dyn Extractor>>,
        compiler: Arc<dyn ContentCompiler>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extractors: Arc::new(extractors),
            compiler,
            writer: CacheWriter::new(output),
        }
    }

    pub fn writer(&self) -> &CacheWriter {
        &self.writer
    }

    /// Extract and emit without writing.
    pub async fn build(&self, project: Arc<ProjectSnapshot>) -> Result<GenerationOutput, GenerationError> {
        let mut tasks = JoinSet::new();
        for extractor in self.extractors.iter() {
            let extractor = Arc::clone(extractor);
            let project = Arc::clone(&project);
            let compiler = Arc::clone(&self.compiler);
            tasks.spawn(async move {
                let category = extractor.category();
                let records = extractor.extract(&project, compiler.as_ref()).await;
                (category, records)
            });
        }

        let emitter = {
            let project = Arc::clone(&project);
            tokio::task::spawn_blocking(move || emit_declarations(&project))
        };

        let mut records = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (category, result) = joined?;
            // dropping the JoinSet on error aborts the remaining extractors
            records.insert(category, result?);
        }
        let types = emitter.await?;

        let links = LinkIndex::build(
            Category::ALL
                .iter()
                .map(|c| (*c, records.get(c).map(Vec::as_slice).unwrap_or_default())),
        );

        Ok(GenerationOutput {
            revision: project.revision(),
            records,
            links,
            types,
        })
    }

    /// Run one full generation and publish it.
    pub async fn run(&self, project: Arc<ProjectSnapshot>) -> Result<GenerationReport, GenerationError> {
        let start = Instant::now();
        debug_event!("generation", "start gathering data", "revision {}", project.revision());
        for file in project.unresolved() {
            debug_event!(
                "generation",
                "excluding unresolved",
                "{}: {}",
                project.relative(file.path()),
                file.error.as_deref().unwrap_or("not resolved")
            );
        }

        let output = self.build(project).await?;

        let counts: Vec<(Category, usize)> = Category::ALL
            .iter()
            .map(|c| (*c, output.records(*c).len()))
            .collect();
        for (category, count) in &counts {
            if let Some(module) = category.module_name() {
                debug_event!("generation", "writing", "{count} {module} to cache...");
            }
        }
        debug_event!("generation", "writing", "{} types to cache...", output.types.len());

        let outcome = {
            let writer = self.writer.clone();
            let output = output.clone();
            tokio::task::spawn_blocking(move || {
                let modules = render_snapshot(SnapshotData {
                    components: output.records(Category::Components),
                    hooks: output.records(Category::Hooks),
                    utils: output.records(Category::Utils),
                    docs: output.records(Category::Docs),
                    links: &output.links,
                    types: &output.types,
                })?;
                writer.write(&modules)
            })
            .await??
        };

        let elapsed = start.elapsed();
        let partial_records = output.partial_records();
        if partial_records > 0 {
            log_event!("generation", "partial records", "{partial_records} records carry errors");
        }
        debug_event!(
            "generation",
            "done",
            "finished gathering data in {:.2}s",
            elapsed.as_secs_f64()
        );

        Ok(GenerationReport {
            revision: output.revision,
            outcome,
            counts,
            partial_records,
            declarations: output.types.len(),
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::MarkdownCompiler;
    use crate::config::Settings;
    use crate::project::ProjectModel;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_collects_every_category() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("hooks")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(
            root.join("hooks/use-toggle.ts"),
            "/** Toggles a boolean. */\nexport function useToggle(initial = false) { return initial }\n",
        )
        .unwrap();
        fs::write(root.join("docs/getting-started.md"), "# Hi\n").unwrap();

        let mut settings = Settings::default();
        settings.root = root.to_path_buf();
        let mut model = ProjectModel::new(settings.layout()).unwrap();
        model.scan();

        let generator = Generator::new(Arc::new(MarkdownCompiler), root.join(".data"));
        let output = generator.build(model.snapshot()).await.unwrap();

        let hooks = output.records(Category::Hooks);
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0].slug, "use-toggle");
        assert_eq!(hooks[0].description.as_deref(), Some("Toggles a boolean."));
        assert_eq!(output.records(Category::Docs)[0].name, "Getting Started");
        assert_eq!(
            output.links.get(Category::Docs).unwrap()[0].slug,
            "/docs/getting-started"
        );
        assert_eq!(output.types.len(), 1);
        assert_eq!(output.types[0].path, "file:///node_modules/hooks/use-toggle.d.ts");
    }
}
