//! Record building shared by the component, hook and util extractors.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::compiler::{CompileInput, ContentCompiler};
use crate::log_event;
use crate::project::{ExportedSymbol, ProjectSnapshot, SourceFile, TypeChecker};
use crate::types::{Category, SourceRole, SymbolKind};
use crate::utils::{slugify, title_case};

use super::document::{Document, fenced_examples};
use super::error::ExtractResult;
use super::record::{DocumentationRecord, ExampleRecord, PropRecord};
use super::ensure_unique_slugs;

/// Which exports one extractor documents.
pub(super) struct SymbolQuery<'a> {
    pub category: Category,
    pub kind: SymbolKind,
    pub root: &'a Path,
    pub with_props: bool,
}

/// One exported symbol together with the file that declares it.
struct Candidate<'a> {
    file: &'a SourceFile,
    symbol: &'a ExportedSymbol,
    slug: String,
    /// The symbol may claim its directory's README and examples.
    owns_directory: bool,
    /// The symbol may claim a flat `<stem>.mdx` next to its file.
    owns_adjacent: bool,
}

/// Documentation content resolved for one record.
#[derive(Default)]
struct Content {
    description: Option<String>,
    readme: Option<String>,
    examples: Vec<ExampleRecord>,
}

pub(super) async fn extract_symbols(
    project: &ProjectSnapshot,
    compiler: &dyn ContentCompiler,
    query: SymbolQuery<'_>,
) -> ExtractResult<Vec<DocumentationRecord>> {
    let checker = project.type_checker();
    let candidates = collect_candidates(project, &checker, &query);

    let mut records = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        records.push(build_record(project, &checker, compiler, &query, candidate).await);
    }

    ensure_unique_slugs(query.category, &records)?;
    Ok(records)
}

fn collect_candidates<'a>(
    project: &'a ProjectSnapshot,
    checker: &TypeChecker<'a>,
    query: &SymbolQuery<'_>,
) -> Vec<Candidate<'a>> {
    let matching: Vec<(&SourceFile, &ExportedSymbol)> = project
        .files_under(query.root)
        .filter(|file| file.role == SourceRole::Declaration)
        .flat_map(|file| {
            checker
                .exported_symbols(&file.path)
                .iter()
                .filter(|symbol| symbol.kind == query.kind)
                .map(move |symbol| (file, symbol))
        })
        .collect();

    let mut per_directory: HashMap<&Path, usize> = HashMap::new();
    let mut per_file: HashMap<&Path, usize> = HashMap::new();
    for (file, _) in &matching {
        *per_file.entry(file.path()).or_default() += 1;
        if let Some(dir) = file.path().parent() {
            *per_directory.entry(dir).or_default() += 1;
        }
    }

    matching
        .into_iter()
        .map(|(file, symbol)| {
            let slug = slugify(&symbol.name);
            let dir = file.path().parent().unwrap_or(query.root);
            let nested = dir != query.root;
            let dir_slug = dir
                .file_name()
                .map(|n| slugify(&n.to_string_lossy()))
                .unwrap_or_default();

            let owns_directory =
                nested && (dir_slug == slug || per_directory.get(dir).copied() == Some(1));
            let owns_adjacent =
                !owns_directory && (slugify(file.stem()) == slug || per_file.get(file.path()).copied() == Some(1));

            Candidate {
                file,
                symbol,
                slug,
                owns_directory,
                owns_adjacent,
            }
        })
        .collect()
}

async fn build_record(
    project: &ProjectSnapshot,
    checker: &TypeChecker<'_>,
    compiler: &dyn ContentCompiler,
    query: &SymbolQuery<'_>,
    candidate: &Candidate<'_>,
) -> DocumentationRecord {
    let symbol = candidate.symbol;
    let mut record = DocumentationRecord::new(&symbol.name, &candidate.slug);
    record.path = Some(project.relative(candidate.file.path()));
    record.deprecated = symbol.doc.as_ref().and_then(|d| d.deprecated.clone());
    if query.with_props {
        record.props = props(checker, candidate);
    }

    match content(project, compiler, candidate).await {
        Ok(content) => {
            record.description = content.description;
            record.readme = content.readme;
            record.examples = content.examples;
        }
        Err(error) => {
            log_event!("extract", "partial record", "{} '{}': {error}", query.category, symbol.name);
            record.annotate_error(error.to_string());
        }
    }
    record
}

fn props(checker: &TypeChecker<'_>, candidate: &Candidate<'_>) -> Option<Vec<PropRecord>> {
    let symbol = candidate.symbol;
    let members = checker.resolve_type(candidate.file.path(), symbol.props.as_ref()?)?;

    Some(
        members
            .into_iter()
            .map(|member| {
                let default_value = symbol
                    .defaults
                    .iter()
                    .find(|(name, _)| *name == member.name)
                    .map(|(_, value)| value.clone())
                    .or_else(|| member.doc.as_ref().and_then(|d| d.default_value.clone()));
                PropRecord {
                    required: !member.optional && default_value.is_none(),
                    description: member
                        .doc
                        .as_ref()
                        .and_then(|d| d.description())
                        .map(str::to_string),
                    name: member.name,
                    type_text: member.type_text,
                    default_value,
                }
            })
            .collect(),
    )
}

async fn content(
    project: &ProjectSnapshot,
    compiler: &dyn ContentCompiler,
    candidate: &Candidate<'_>,
) -> ExtractResult<Content> {
    let symbol = candidate.symbol;
    let mut content = Content {
        description: symbol
            .doc
            .as_ref()
            .and_then(|d| d.description())
            .map(str::to_string),
        ..Content::default()
    };
    let mut examples = ExampleSet::new(&candidate.slug);

    if let Some(readme) = find_readme(project, candidate) {
        let document = Document::parse(readme.path(), &readme.text)?;
        if content.description.is_none() {
            content.description = document.front_matter.description.clone();
        }
        for block in fenced_examples(readme.path(), document.body)? {
            let compiled = compiler
                .compile(CompileInput::example(readme.path(), block.code))
                .await?;
            examples.push(block.title, None, compiled);
        }
        content.readme = Some(
            compiler
                .compile(CompileInput::document(readme.path(), document.body))
                .await?,
        );
    }

    if candidate.owns_directory
        && let Some(dir) = candidate.file.path().parent()
    {
        let examples_dir = dir.join("examples");
        for file in project
            .files_under(&examples_dir)
            .filter(|f| f.role == SourceRole::Example)
        {
            let compiled = compiler
                .compile(CompileInput::example(file.path(), file.text.to_string()))
                .await?;
            examples.push(
                Some(title_case(file.stem())),
                Some(project.relative(file.path())),
                compiled,
            );
        }
    }

    if let Some(doc) = &symbol.doc {
        for code in &doc.examples {
            let compiled = compiler
                .compile(CompileInput::example(candidate.file.path(), code.clone()))
                .await?;
            examples.push(None, None, compiled);
        }
    }

    content.examples = examples.finish();
    Ok(content)
}

/// README that documents the candidate: `README.mdx`/`README.md` in its own
/// directory, or `<stem>.mdx`/`<stem>.md` beside a flat file.
fn find_readme<'a>(project: &'a ProjectSnapshot, candidate: &Candidate<'_>) -> Option<&'a SourceFile> {
    let path = candidate.file.path();
    let dir = path.parent()?;
    let names: Vec<PathBuf> = if candidate.owns_directory {
        vec![dir.join("README.mdx"), dir.join("README.md")]
    } else if candidate.owns_adjacent {
        let stem = candidate.file.stem();
        vec![dir.join(format!("{stem}.mdx")), dir.join(format!("{stem}.md"))]
    } else {
        return None;
    };

    names
        .iter()
        .filter_map(|p| project.file(p))
        .find(|f| f.is_live() && f.role == SourceRole::Document)
}

/// Names and slugs examples of one record, keeping slugs unique.
pub(super) struct ExampleSet {
    parent_slug: String,
    records: Vec<ExampleRecord>,
    slugs: HashSet<String>,
    untitled: usize,
}

impl ExampleSet {
    pub(super) fn new(parent_slug: &str) -> Self {
        Self {
            parent_slug: parent_slug.to_string(),
            records: Vec::new(),
            slugs: HashSet::new(),
            untitled: 0,
        }
    }

    pub(super) fn push(&mut self, title: Option<String>, path: Option<String>, compiled_code: String) {
        let name = title.unwrap_or_else(|| {
            self.untitled += 1;
            format!("Example {}", self.untitled)
        });
        let base = match slugify(&name) {
            base if base.is_empty() => "example".to_string(),
            base => base,
        };
        let mut slug = base.clone();
        let mut n = 2;
        while !self.slugs.insert(slug.clone()) {
            slug = format!("{base}-{n}");
            n += 1;
        }
        self.records.push(ExampleRecord {
            name,
            slug,
            parent_slug: self.parent_slug.clone(),
            path,
            compiled_code,
        });
    }

    pub(super) fn finish(self) -> Vec<ExampleRecord> {
        self.records
    }
}
