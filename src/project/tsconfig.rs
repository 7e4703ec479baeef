//! `tsconfig.json` loading and path alias compilation.
//!
//! Only the module-resolution subset is read: `extends`,
//! `compilerOptions.baseUrl` and `compilerOptions.paths`. Files are JSONC,
//! so comments and trailing commas are accepted.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::error::{ProjectError, ProjectResult};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub base_url: Option<String>,
    #[serde(default)]
    pub paths: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    pub extends: Option<String>,
    #[serde(default)]
    pub compiler_options: CompilerOptions,
}

impl TsConfig {
    pub fn parse(path: &Path, content: &str) -> ProjectResult<Self> {
        serde_json5::from_str(content).map_err(|e| ProjectError::config(path, e.to_string()))
    }

    /// Read `path` and fold its `extends` chain, child values winning.
    pub fn load(path: &Path) -> ProjectResult<Self> {
        let mut visited = HashSet::new();
        Self::load_chain(path, &mut visited)
    }

    fn load_chain(path: &Path, visited: &mut HashSet<PathBuf>) -> ProjectResult<Self> {
        let canonical = path.canonicalize().map_err(|e| ProjectError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if !visited.insert(canonical.clone()) {
            return Err(ProjectError::config(
                &canonical,
                "circular extends chain",
            ));
        }

        let content = std::fs::read_to_string(&canonical).map_err(|e| ProjectError::FileRead {
            path: canonical.clone(),
            source: e,
        })?;
        let mut config = Self::parse(&canonical, &content)?;

        // baseUrl is relative to the file that declares it
        let dir = canonical.parent().unwrap_or(Path::new("/")).to_path_buf();
        if let Some(base) = config.compiler_options.base_url.take() {
            config.compiler_options.base_url = Some(dir.join(base).to_string_lossy().into_owned());
        }

        if let Some(extends) = config.extends.take() {
            let mut parent_path = dir.join(&extends);
            if parent_path.extension().is_none() {
                parent_path.set_extension("json");
            }
            // Package-style extends (e.g. "@tsconfig/next") are not followed
            if extends.starts_with('.') || Path::new(&extends).is_absolute() {
                let parent = Self::load_chain(&parent_path, visited)?;
                config = Self::merge(parent, config);
            } else {
                tracing::debug!("[project] skipping package extends '{extends}'");
            }
        }

        Ok(config)
    }

    fn merge(parent: TsConfig, child: TsConfig) -> TsConfig {
        let mut paths = parent.compiler_options.paths;
        paths.extend(child.compiler_options.paths);
        TsConfig {
            extends: None,
            compiler_options: CompilerOptions {
                base_url: child
                    .compiler_options
                    .base_url
                    .or(parent.compiler_options.base_url),
                paths,
            },
        }
    }
}

/// A compiled `paths` entry, e.g. `"components/*": ["src/components/*"]`.
#[derive(Debug)]
pub struct PathRule {
    pub pattern: String,
    regex: regex::Regex,
    targets: Vec<String>,
}

impl PathRule {
    pub fn new(pattern: &str, targets: Vec<String>) -> ProjectResult<Self> {
        let escaped = regex::escape(pattern).replace("\\*", "(.*)");
        let regex = regex::Regex::new(&format!("^{escaped}$")).map_err(|e| {
            ProjectError::config(PathBuf::from("tsconfig.json"), format!("path pattern '{pattern}': {e}"))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            targets,
        })
    }

    /// Substituted targets for `specifier`, empty when the rule does not match.
    pub fn apply(&self, specifier: &str) -> Vec<String> {
        let Some(captures) = self.regex.captures(specifier) else {
            return Vec::new();
        };
        let wildcard = captures.get(1).map(|m| m.as_str()).unwrap_or("");
        self.targets
            .iter()
            .map(|target| target.replacen('*', wildcard, 1))
            .collect()
    }
}

/// Path aliases compiled in specificity order (longest pattern first).
#[derive(Debug, Default)]
pub struct PathAliases {
    pub base_url: Option<PathBuf>,
    rules: Vec<PathRule>,
}

impl PathAliases {
    pub fn from_config(config: &TsConfig, root: &Path) -> ProjectResult<Self> {
        let mut entries: Vec<_> = config.compiler_options.paths.iter().collect();
        entries.sort_by_key(|(pattern, _)| (std::cmp::Reverse(pattern.len()), pattern.matches('*').count()));

        let rules = entries
            .into_iter()
            .map(|(pattern, targets)| PathRule::new(pattern, targets.clone()))
            .collect::<ProjectResult<Vec<_>>>()?;

        Ok(Self {
            base_url: config.compiler_options.base_url.as_ref().map(PathBuf::from),
            rules,
        }
        .rooted_at(root))
    }

    fn rooted_at(mut self, root: &Path) -> Self {
        if self.base_url.is_none() && !self.rules.is_empty() {
            // paths without baseUrl resolve against the config directory
            self.base_url = Some(root.to_path_buf());
        }
        self
    }

    /// Candidate base paths (without extension probing) for a bare specifier.
    pub fn candidates(&self, specifier: &str) -> Vec<PathBuf> {
        let base = self.base_url.clone().unwrap_or_default();
        let mut out: Vec<PathBuf> = self
            .rules
            .iter()
            .flat_map(|rule| rule.apply(specifier))
            .map(|target| base.join(target))
            .collect();

        if let Some(base_url) = &self.base_url {
            out.push(base_url.join(specifier));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_jsonc() {
        let content = r#"{
            // comment
            "compilerOptions": {
                "baseUrl": ".",
                "paths": { "components/*": ["components/*"], },
            },
        }"#;
        let config = TsConfig::parse(Path::new("tsconfig.json"), content).unwrap();
        assert_eq!(config.compiler_options.base_url.as_deref(), Some("."));
        assert_eq!(config.compiler_options.paths["components/*"], vec!["components/*"]);
    }

    #[test]
    fn test_extends_chain_merges_child_over_parent() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("base.json"),
            r#"{ "compilerOptions": { "baseUrl": "src", "paths": { "a/*": ["x/*"], "b": ["y"] } } }"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("tsconfig.json"),
            r#"{ "extends": "./base", "compilerOptions": { "paths": { "a/*": ["z/*"] } } }"#,
        )
        .unwrap();

        let config = TsConfig::load(&temp.path().join("tsconfig.json")).unwrap();
        let root = temp.path().canonicalize().unwrap();

        assert_eq!(config.compiler_options.paths["a/*"], vec!["z/*"]);
        assert_eq!(config.compiler_options.paths["b"], vec!["y"]);
        assert_eq!(
            config.compiler_options.base_url.map(PathBuf::from),
            Some(root.join("src"))
        );
    }

    #[test]
    fn test_circular_extends_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.json"), r#"{ "extends": "./b.json" }"#).unwrap();
        fs::write(temp.path().join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();

        let err = TsConfig::load(&temp.path().join("a.json")).unwrap_err();
        assert!(err.to_string().contains("circular"));
    }

    #[test]
    fn test_alias_candidates_prefer_specific_patterns() {
        let mut config = TsConfig::default();
        config.compiler_options.base_url = Some("/p".into());
        config
            .compiler_options
            .paths
            .insert("*".into(), vec!["vendor/*".into()]);
        config
            .compiler_options
            .paths
            .insert("hooks/*".into(), vec!["src/hooks/*".into()]);

        let aliases = PathAliases::from_config(&config, Path::new("/p")).unwrap();
        let candidates = aliases.candidates("hooks/use-x");

        assert_eq!(candidates[0], PathBuf::from("/p/src/hooks/use-x"));
        assert_eq!(candidates[1], PathBuf::from("/p/vendor/hooks/use-x"));
        assert_eq!(candidates[2], PathBuf::from("/p/hooks/use-x"));
    }
}
