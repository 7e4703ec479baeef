//! Cross-category link index.

use indexmap::IndexMap;
use serde::Serialize;

use crate::extract::DocumentationRecord;
use crate::types::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub name: String,
    /// Site route, e.g. `/components/button`.
    pub slug: String,
}

/// Category name → ordered links, serialized in category order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkIndex(IndexMap<String, Vec<Link>>);

impl LinkIndex {
    /// Build from one generation's outputs. Categories are emitted in
    /// [`Category::ALL`] order; the link-only `Pages` category only when it
    /// has entries.
    pub fn build<'a>(outputs: impl IntoIterator<Item = (Category, &'a [DocumentationRecord])>) -> Self {
        let mut by_category: Vec<(Category, &[DocumentationRecord])> = outputs.into_iter().collect();
        by_category.sort_by_key(|(category, _)| *category);

        let mut index = IndexMap::new();
        for (category, records) in by_category {
            if category.module_name().is_none() && records.is_empty() {
                continue;
            }
            let links = records
                .iter()
                .map(|record| Link {
                    name: record.name.clone(),
                    slug: category.route(&record.slug),
                })
                .collect();
            index.insert(category.link_name().to_string(), links);
        }
        Self(index)
    }

    pub fn get(&self, category: Category) -> Option<&[Link]> {
        self.0.get(category.link_name()).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
