//! Extractors: pure transforms from a project snapshot to documentation records.
//!
//! Every extractor reads the same immutable [`ProjectSnapshot`] and shares no
//! mutable state with the others, so a generation may run them concurrently.
//! Per-record content problems are absorbed into an `error` annotation on the
//! record; a slug collision fails the whole category.

pub mod components;
pub mod docs;
pub mod document;
pub mod error;
pub mod hooks;
pub mod page_links;
pub mod record;
mod symbol;
pub mod utils;

pub use components::ComponentExtractor;
pub use docs::DocExtractor;
pub use error::{ExtractError, ExtractResult};
pub use hooks::HookExtractor;
pub use page_links::PageLinkExtractor;
pub use record::{DocumentationRecord, ExampleRecord, PropRecord};
pub use utils::UtilExtractor;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::compiler::ContentCompiler;
use crate::project::ProjectSnapshot;
use crate::types::Category;

/// Produces one category's records from a project snapshot.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn category(&self) -> Category;

    /// Records in deterministic (path, then source) order.
    async fn extract(
        &self,
        project: &ProjectSnapshot,
        compiler: &dyn ContentCompiler,
    ) -> ExtractResult<Vec<DocumentationRecord>>;
}

/// The standard extractor set, one per category, in link-index order.
pub fn default_extractors() -> Vec<Arc<dyn Extractor>> {
    vec![
        Arc::new(ComponentExtractor),
        Arc::new(DocExtractor),
        Arc::new(HookExtractor),
        Arc::new(UtilExtractor),
        Arc::new(PageLinkExtractor),
    ]
}

/// Fail with [`ExtractError::SlugCollision`] on the first repeated slug.
pub fn ensure_unique_slugs(category: Category, records: &[DocumentationRecord]) -> ExtractResult<()> {
    let mut seen: HashMap<&str, &DocumentationRecord> = HashMap::with_capacity(records.len());
    for record in records {
        if let Some(first) = seen.insert(record.slug.as_str(), record) {
            return Err(ExtractError::SlugCollision {
                category,
                slug: record.slug.clone(),
                first: describe(first),
                second: describe(record),
            });
        }
    }
    Ok(())
}

fn describe(record: &DocumentationRecord) -> String {
    match &record.path {
        Some(path) => format!("{} ({path})", record.name),
        None => record.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_slugs() {
        let records = vec![
            DocumentationRecord::new("Button", "button"),
            DocumentationRecord::new("ButtonGroup", "button-group"),
        ];
        assert!(ensure_unique_slugs(Category::Components, &records).is_ok());
    }

    #[test]
    fn test_slug_collision_names_both_sources() {
        let mut first = DocumentationRecord::new("Button", "button");
        first.path = Some("components/Button/Button.tsx".into());
        let mut second = DocumentationRecord::new("button", "button");
        second.path = Some("components/legacy/button.tsx".into());

        let err = ensure_unique_slugs(Category::Components, &[first, second]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Duplicate slug 'button' in Components"));
        assert!(message.contains("components/Button/Button.tsx"));
        assert!(message.contains("components/legacy/button.tsx"));
        assert!(!err.is_record_level());
    }

    #[test]
    fn test_default_extractors_cover_every_category() {
        let categories: Vec<_> = default_extractors().iter().map(|e| e.category()).collect();
        assert_eq!(categories, Category::ALL.to_vec());
    }
}
