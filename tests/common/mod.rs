//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docgen::compiler::{ContentCompiler, MarkdownCompiler};
use docgen::config::Settings;
use docgen::generation::Generator;
use docgen::project::ProjectModel;
use serde_json::Value;
use tempfile::TempDir;

pub const BUTTON_TSX: &str = r#"import * as React from 'react'

export type ButtonProps = {
  /** Visual style. */
  variant?: 'primary' | 'secondary'
  /** Called when the button is pressed. */
  onClick: () => void
  children?: React.ReactNode
}

/** A clickable button. */
export function Button({ variant = 'primary', onClick, children }: ButtonProps) {
  return <button data-variant={variant} onClick={onClick}>{children}</button>
}
"#;

pub const BUTTON_README: &str = r#"# Button

Buttons trigger actions.

```tsx example Basic
<Button onClick={() => {}}>Save</Button>
```
"#;

pub const MODULES: [&str; 7] = ["components", "hooks", "utils", "docs", "links", "types", "index"];

/// A throwaway project root with the default layout.
pub struct Fixture {
    temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    /// Fixture containing the documented `Button` component.
    pub fn with_button() -> Self {
        let fixture = Self::new();
        fixture.write("components/Button/Button.tsx", BUTTON_TSX);
        fixture.write("components/Button/README.mdx", BUTTON_README);
        fixture
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn remove(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::remove_file(&path).unwrap();
        path
    }

    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.root = self.root().to_path_buf();
        settings
    }

    pub fn output_dir(&self) -> PathBuf {
        self.settings().layout().output
    }

    /// A scanned project model.
    pub fn model(&self) -> ProjectModel {
        let settings = self.settings();
        let mut model = ProjectModel::new(settings.layout()).unwrap();
        model.scan();
        model
    }

    pub fn generator(&self) -> Generator {
        self.generator_with(Arc::new(MarkdownCompiler))
    }

    pub fn generator_with(&self, compiler: Arc<dyn ContentCompiler>) -> Generator {
        Generator::new(compiler, self.output_dir())
    }

    /// Raw text of a generated module.
    pub fn module(&self, name: &str) -> String {
        fs::read_to_string(self.output_dir().join(format!("{name}.ts"))).unwrap()
    }

    /// Every generated module's text, in barrel order.
    pub fn all_modules(&self) -> Vec<(String, String)> {
        MODULES
            .iter()
            .map(|name| (name.to_string(), self.module(name)))
            .collect()
    }

    /// The JSON value exported by a data module.
    pub fn data(&self, name: &str) -> Value {
        parse_module(&self.module(name))
    }
}

/// Parse `export const <binding> = <json>`.
pub fn parse_module(text: &str) -> Value {
    let (_, json) = text
        .split_once(" = ")
        .unwrap_or_else(|| panic!("not a data module: {text}"));
    serde_json::from_str(json).unwrap()
}

/// Names of the records in a data module.
pub fn names(data: &Value) -> Vec<String> {
    data.as_array()
        .unwrap()
        .iter()
        .map(|record| record["name"].as_str().unwrap().to_string())
        .collect()
}
