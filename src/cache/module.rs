//! Rendering of generated data modules.

use serde::Serialize;

use super::error::{WriteError, WriteResult};

/// File extension of every generated module.
pub const MODULE_EXTENSION: &str = "ts";

/// Name of the barrel module re-exporting all others.
pub const BARREL_NAME: &str = "index";

/// One generated module, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedModule {
    /// Module name without extension, e.g. `components`.
    pub name: &'static str,
    pub contents: String,
}

impl RenderedModule {
    pub fn file_name(&self) -> String {
        format!("{}.{MODULE_EXTENSION}", self.name)
    }
}

/// `export const <binding> = <pretty JSON>`
pub fn render_data<T: Serialize + ?Sized>(
    name: &'static str,
    binding: &str,
    value: &T,
) -> WriteResult<RenderedModule> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| WriteError::Serialize { module: name, source })?;
    Ok(RenderedModule {
        name,
        contents: format!("export const {binding} = {json}\n"),
    })
}

/// `export * from './<name>'` for each module.
pub fn render_barrel(names: &[&'static str]) -> RenderedModule {
    let mut contents = names
        .iter()
        .map(|name| format!("export * from './{name}'"))
        .collect::<Vec<_>>()
        .join("\n");
    contents.push('\n');
    RenderedModule {
        name: BARREL_NAME,
        contents,
    }
}
