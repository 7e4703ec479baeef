use async_trait::async_trait;

use crate::compiler::ContentCompiler;
use crate::project::ProjectSnapshot;
use crate::types::{Category, SymbolKind};

use super::error::ExtractResult;
use super::record::DocumentationRecord;
use super::symbol::{SymbolQuery, extract_symbols};
use super::Extractor;

/// Exported `use*` functions under the hooks root.
#[derive(Debug, Default, Clone, Copy)]
pub struct HookExtractor;

#[async_trait]
impl Extractor for HookExtractor {
    fn category(&self) -> Category {
        Category::Hooks
    }

    async fn extract(
        &self,
        project: &ProjectSnapshot,
        compiler: &dyn ContentCompiler,
    ) -> ExtractResult<Vec<DocumentationRecord>> {
        let query = SymbolQuery {
            category: self.category(),
            kind: SymbolKind::Hook,
            root: &project.layout().hooks,
            with_props: false,
        };
        extract_symbols(project, compiler, query).await
    }
}
