use async_trait::async_trait;

use crate::compiler::ContentCompiler;
use crate::project::ProjectSnapshot;
use crate::types::{Category, SymbolKind};

use super::error::ExtractResult;
use super::record::DocumentationRecord;
use super::symbol::{SymbolQuery, extract_symbols};
use super::Extractor;

#[derive(Debug, Default, Clone, Copy)]
pub struct UtilExtractor;

#[async_trait]
impl Extractor for UtilExtractor {
    fn category(&self) -> Category {
        Category::Utils
    }

    async fn extract(
        &self,
        project: &ProjectSnapshot,
        compiler: &dyn ContentCompiler,
    ) -> ExtractResult<Vec<DocumentationRecord>> {
        let query = SymbolQuery {
            category: self.category(),
            kind: SymbolKind::Util,
            root: &project.layout().utils,
            with_props: false,
        };
        extract_symbols(project, compiler, query).await
    }
}
