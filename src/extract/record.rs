//! Serialized documentation records.
//!
//! Field names are camelCase because the records are consumed as
//! JavaScript objects by the site.

use serde::Serialize;

/// Common shape produced by every extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationRecord {
    pub name: String,
    pub slug: String,
    /// Source file relative to the project root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Compiled adjacent README (or, for docs, the compiled body).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    pub examples: Vec<ExampleRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<PropRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    /// Set when this record's documentation content failed to parse or compile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentationRecord {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            path: None,
            description: None,
            readme: None,
            examples: Vec::new(),
            props: None,
            deprecated: None,
            error: None,
        }
    }

    /// Drop documentation content and keep the identity, noting why.
    pub fn annotate_error(&mut self, error: impl Into<String>) {
        self.description = None;
        self.readme = None;
        self.examples.clear();
        self.error = Some(error.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleRecord {
    pub name: String,
    pub slug: String,
    pub parent_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub compiled_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}
