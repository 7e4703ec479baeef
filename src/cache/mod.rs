//! Cache writer: renders one generation into data modules and publishes them
//! atomically.

pub mod error;
pub mod module;
pub mod writer;

pub use error::{WriteError, WriteResult};
pub use module::{BARREL_NAME, MODULE_EXTENSION, RenderedModule, render_barrel, render_data};
pub use writer::{CacheWriter, WriteOutcome};

use crate::declarations::DeclarationFile;
use crate::extract::DocumentationRecord;
use crate::links::LinkIndex;

/// Everything one generation publishes.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotData<'a> {
    pub components: &'a [DocumentationRecord],
    pub hooks: &'a [DocumentationRecord],
    pub utils: &'a [DocumentationRecord],
    pub docs: &'a [DocumentationRecord],
    pub links: &'a LinkIndex,
    pub types: &'a [DeclarationFile],
}

/// Render the six data modules and the barrel, in barrel order.
pub fn render_snapshot(data: SnapshotData<'_>) -> WriteResult<Vec<RenderedModule>> {
    let mut modules = vec![
        render_data("components", "allComponents", data.components)?,
        render_data("hooks", "allHooks", data.hooks)?,
        render_data("utils", "allUtils", data.utils)?,
        render_data("docs", "allDocs", data.docs)?,
        render_data("links", "allLinks", data.links)?,
        render_data("types", "allTypes", data.types)?,
    ];
    let names: Vec<&'static str> = modules.iter().map(|m| m.name).collect();
    modules.push(render_barrel(&names));
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_snapshot_barrel_lists_all_modules() {
        let links = LinkIndex::default();
        let modules = render_snapshot(SnapshotData {
            components: &[],
            hooks: &[],
            utils: &[],
            docs: &[],
            links: &links,
            types: &[],
        })
        .unwrap();

        assert_eq!(modules.len(), 7);
        let barrel = modules.last().unwrap();
        assert_eq!(barrel.name, BARREL_NAME);
        for name in ["components", "hooks", "utils", "docs", "links", "types"] {
            assert!(barrel.contents.contains(&format!("export * from './{name}'")));
        }
        assert_eq!(modules[0].contents, "export const allComponents = []\n");
    }
}
