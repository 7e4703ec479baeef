//! Navigation links for routable pages.
//!
//! Only top-level pages become links. Private (`_app`), `index` and dynamic
//! (`[slug]`) routes are skipped.

use async_trait::async_trait;

use crate::compiler::ContentCompiler;
use crate::project::ProjectSnapshot;
use crate::types::{Category, SourceRole};
use crate::utils::{slugify, title_case};

use super::error::ExtractResult;
use super::record::DocumentationRecord;
use super::{Extractor, ensure_unique_slugs};

#[derive(Debug, Default, Clone, Copy)]
pub struct PageLinkExtractor;

fn is_routable(stem: &str) -> bool {
    !(stem.is_empty() || stem.starts_with('_') || stem.starts_with('[') || stem == "index")
}

#[async_trait]
impl Extractor for PageLinkExtractor {
    fn category(&self) -> Category {
        Category::Pages
    }

    async fn extract(
        &self,
        project: &ProjectSnapshot,
        _compiler: &dyn ContentCompiler,
    ) -> ExtractResult<Vec<DocumentationRecord>> {
        let Some(pages) = project.layout().pages.as_deref() else {
            return Ok(Vec::new());
        };

        let records: Vec<DocumentationRecord> = project
            .files_under(pages)
            .filter(|f| f.role == SourceRole::Page)
            .filter(|f| f.path().parent() == Some(pages))
            .filter(|f| is_routable(f.stem()))
            .map(|f| {
                let mut record = DocumentationRecord::new(title_case(f.stem()), slugify(f.stem()));
                record.path = Some(project.relative(f.path()));
                record
            })
            .collect();

        ensure_unique_slugs(self.category(), &records)?;
        Ok(records)
    }
}
