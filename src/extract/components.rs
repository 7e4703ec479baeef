use async_trait::async_trait;

use crate::compiler::ContentCompiler;
use crate::project::ProjectSnapshot;
use crate::types::{Category, SymbolKind};

use super::error::ExtractResult;
use super::record::DocumentationRecord;
use super::symbol::{SymbolQuery, extract_symbols};
use super::Extractor;

/// Exported components under the components root, with resolved props.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentExtractor;

#[async_trait]
impl Extractor for ComponentExtractor {
    fn category(&self) -> Category {
        Category::Components
    }

    async fn extract(
        &self,
        project: &ProjectSnapshot,
        compiler: &dyn ContentCompiler,
    ) -> ExtractResult<Vec<DocumentationRecord>> {
        let query = SymbolQuery {
            category: self.category(),
            kind: SymbolKind::Component,
            root: &project.layout().components,
            with_props: true,
        };
        extract_symbols(project, compiler, query).await
    }
}
