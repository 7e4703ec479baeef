//! Standalone `.md`/`.mdx` documents under the docs root.

use async_trait::async_trait;

use crate::compiler::{CompileInput, ContentCompiler};
use crate::log_event;
use crate::project::{ProjectSnapshot, SourceFile};
use crate::types::{Category, SourceRole};
use crate::utils::{slugify, title_case};

use super::document::{Document, fenced_examples};
use super::error::ExtractResult;
use super::record::DocumentationRecord;
use super::symbol::ExampleSet;
use super::{Extractor, ensure_unique_slugs};

#[derive(Debug, Default, Clone, Copy)]
pub struct DocExtractor;

#[async_trait]
impl Extractor for DocExtractor {
    fn category(&self) -> Category {
        Category::Docs
    }

    async fn extract(
        &self,
        project: &ProjectSnapshot,
        compiler: &dyn ContentCompiler,
    ) -> ExtractResult<Vec<DocumentationRecord>> {
        let mut records = Vec::new();
        for file in project
            .files_under(&project.layout().docs)
            .filter(|f| f.role == SourceRole::Document)
        {
            let mut record = match build(compiler, file).await {
                Ok(record) => record,
                Err(error) => {
                    log_event!("extract", "partial record", "Docs '{}': {error}", file.path().display());
                    let name = title_case(file.stem());
                    let slug = doc_slug(&name, file);
                    let mut record = DocumentationRecord::new(name, slug);
                    record.annotate_error(error.to_string());
                    record
                }
            };
            record.path = Some(project.relative(file.path()));
            records.push(record);
        }

        ensure_unique_slugs(self.category(), &records)?;
        Ok(records)
    }
}

/// Slug for a document titled `name`, falling back to the file stem when the
/// title has no letters or digits.
fn doc_slug(name: &str, file: &SourceFile) -> String {
    match slugify(name) {
        slug if slug.is_empty() => slugify(file.stem()),
        slug => slug,
    }
}

async fn build(
    compiler: &dyn ContentCompiler,
    file: &SourceFile,
) -> ExtractResult<DocumentationRecord> {
    let document = Document::parse(file.path(), &file.text)?;
    let name = document
        .front_matter
        .title
        .clone()
        .unwrap_or_else(|| title_case(file.stem()));
    let slug = doc_slug(&name, file);

    let mut examples = ExampleSet::new(&slug);
    for block in fenced_examples(file.path(), document.body)? {
        let compiled = compiler
            .compile(CompileInput::example(file.path(), block.code))
            .await?;
        examples.push(block.title, None, compiled);
    }

    let mut record = DocumentationRecord::new(name, slug);
    record.description = document.front_matter.description.clone();
    record.readme = Some(
        compiler
            .compile(CompileInput::document(file.path(), document.body))
            .await?,
    );
    record.examples = examples.finish();
    Ok(record)
}
