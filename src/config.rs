//! Configuration module for the documentation generator.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - A `docgen.toml` file in the project root (or an explicit `--config` path)
//! - Environment variable overrides
//! - CLI argument overrides (applied by the caller)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `DOCGEN_` and use double
//! underscores to separate nested levels:
//! - `DOCGEN_OUTPUT_DIR=dist/data` sets `output_dir`
//! - `DOCGEN_WATCH__DEBOUNCE_MS=200` sets `watch.debounce_ms`
//! - `DOCGEN_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the optional configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "docgen.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Project root; every other relative path is resolved against it.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Root directory of exported components.
    #[serde(default = "default_components_dir")]
    pub components_dir: PathBuf,

    /// Root directory of exported hooks.
    #[serde(default = "default_hooks_dir")]
    pub hooks_dir: PathBuf,

    /// Root directory of exported utilities.
    #[serde(default = "default_utils_dir")]
    pub utils_dir: PathBuf,

    /// Root directory of standalone `.md`/`.mdx` documents.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// Optional routable pages directory used for extra navigation links.
    #[serde(default = "default_pages_dir")]
    pub pages_dir: Option<PathBuf>,

    /// Where generated data modules are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Project configuration file describing module resolution.
    #[serde(default = "default_tsconfig")]
    pub tsconfig: PathBuf,

    /// Gitignore-style patterns excluded from the initial scan.
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Verbose progress and timing output.
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WatchConfig {
    /// How long a modified file must be quiet before it is refreshed.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CompilerConfig {
    /// External content compiler command. Empty selects the built-in
    /// markdown compiler.
    #[serde(default)]
    pub command: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for every target.
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `watcher = "debug"`.
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_components_dir() -> PathBuf {
    PathBuf::from("components")
}
fn default_hooks_dir() -> PathBuf {
    PathBuf::from("hooks")
}
fn default_utils_dir() -> PathBuf {
    PathBuf::from("utils")
}
fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}
fn default_pages_dir() -> Option<PathBuf> {
    Some(PathBuf::from("pages"))
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".data")
}
fn default_tsconfig() -> PathBuf {
    PathBuf::from("tsconfig.json")
}
fn default_ignore_patterns() -> Vec<String> {
    vec![
        "node_modules/**".to_string(),
        ".data/**".to_string(),
        ".git/**".to_string(),
        "*.generated.*".to_string(),
    ]
}
fn default_debounce_ms() -> u64 {
    50
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: default_root(),
            components_dir: default_components_dir(),
            hooks_dir: default_hooks_dir(),
            utils_dir: default_utils_dir(),
            docs_dir: default_docs_dir(),
            pages_dir: default_pages_dir(),
            output_dir: default_output_dir(),
            tsconfig: default_tsconfig(),
            ignore_patterns: default_ignore_patterns(),
            debug: false,
            watch: WatchConfig::default(),
            compiler: CompilerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

/// Absolute locations of every root the pipeline reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub components: PathBuf,
    pub hooks: PathBuf,
    pub utils: PathBuf,
    pub docs: PathBuf,
    pub pages: Option<PathBuf>,
    pub output: PathBuf,
    pub tsconfig: PathBuf,
    /// Globs relative to `root` that exclude files from the project.
    pub ignore_patterns: Vec<String>,
}

impl ProjectLayout {
    /// The three roots whose exports become documentation records.
    pub fn symbol_roots(&self) -> [&Path; 3] {
        [&self.components, &self.hooks, &self.utils]
    }

    /// Every directory the watcher and the initial scan cover.
    pub fn watched_roots(&self) -> Vec<&Path> {
        let mut roots: Vec<&Path> = self.symbol_roots().to_vec();
        roots.push(&self.docs);
        if let Some(pages) = &self.pages {
            roots.push(pages);
        }
        roots
    }

    /// True if `path` lives under one of the watched roots.
    pub fn is_tracked_location(&self, path: &Path) -> bool {
        self.watched_roots().iter().any(|root| path.starts_with(root))
    }
}

impl Settings {
    /// Load configuration for the project rooted at `root`.
    ///
    /// `config_path` overrides the default `<root>/docgen.toml` lookup.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.join(CONFIG_FILE_NAME));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels, single underscore
            // stays inside field names.
            .merge(
                Env::prefixed("DOCGEN_")
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.root == default_root() {
                    settings.root = root.to_path_buf();
                } else if settings.root.is_relative() {
                    settings.root = root.join(&settings.root);
                }
                settings
            })
    }

    /// Load configuration from a specific file, ignoring the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Resolve every configured path against the project root.
    pub fn layout(&self) -> ProjectLayout {
        let root = absolutize(&self.root);
        let at = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };

        ProjectLayout {
            components: at(&self.components_dir),
            hooks: at(&self.hooks_dir),
            utils: at(&self.utils_dir),
            docs: at(&self.docs_dir),
            pages: self.pages_dir.as_deref().map(at),
            output: at(&self.output_dir),
            tsconfig: at(&self.tsconfig),
            ignore_patterns: self.ignore_patterns.clone(),
            root,
        }
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => {
            let joined = cwd.join(path);
            joined.canonicalize().unwrap_or(joined)
        }
        Err(_) => path.to_path_buf(),
    }
}
