//! Module specifier resolution.
//!
//! Resolves `import ... from '<specifier>'` to a file on disk the way the
//! TypeScript compiler does for the subset the pipeline needs: relative
//! paths, `tsconfig` `paths`/`baseUrl` aliases, and type declarations shipped
//! in `node_modules` (package `types`/`typings`, `index.d.ts`, `@types/*`).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::tsconfig::PathAliases;

/// Extensions probed, in order, for an extension-less specifier.
const PROBE_EXTENSIONS: [&str; 3] = ["ts", "tsx", "d.ts"];

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    types: Option<String>,
    typings: Option<String>,
}

#[derive(Debug)]
pub struct ModuleResolver {
    root: PathBuf,
    aliases: PathAliases,
}

impl ModuleResolver {
    pub fn new(root: PathBuf, aliases: PathAliases) -> Self {
        Self { root, aliases }
    }

    /// Resolve `specifier` imported from the file at `from`.
    pub fn resolve(&self, from: &Path, specifier: &str) -> Option<PathBuf> {
        if specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".." {
            let dir = from.parent()?;
            return probe(&normalize(&dir.join(specifier)));
        }
        if Path::new(specifier).is_absolute() {
            return probe(Path::new(specifier));
        }

        self.aliases
            .candidates(specifier)
            .iter()
            .find_map(|candidate| probe(&normalize(candidate)))
            .or_else(|| self.resolve_package(from, specifier))
    }

    fn resolve_package(&self, from: &Path, specifier: &str) -> Option<PathBuf> {
        let (package, subpath) = split_package(specifier)?;
        let types_package = match package.strip_prefix('@') {
            Some(scoped) => format!("@types/{}", scoped.replacen('/', "__", 1)),
            None => format!("@types/{package}"),
        };

        let mut dir = from.parent();
        while let Some(current) = dir {
            let node_modules = current.join("node_modules");
            if node_modules.is_dir() {
                for name in [package, types_package.as_str()] {
                    let package_dir = node_modules.join(name);
                    if !package_dir.is_dir() {
                        continue;
                    }
                    let found = match subpath {
                        Some(sub) => probe(&package_dir.join(sub)),
                        None => package_entry(&package_dir),
                    };
                    if found.is_some() {
                        return found;
                    }
                }
            }
            if current == self.root {
                break;
            }
            dir = current.parent();
        }
        None
    }
}

/// `@scope/name/sub/path` → (`@scope/name`, `Some("sub/path")`).
fn split_package(specifier: &str) -> Option<(&str, Option<&str>)> {
    let split_at = if specifier.starts_with('@') {
        let first = specifier.find('/')?;
        specifier[first + 1..].find('/').map(|i| first + 1 + i)
    } else {
        specifier.find('/')
    };
    Some(match split_at {
        Some(i) => (&specifier[..i], Some(&specifier[i + 1..])),
        None => (specifier, None),
    })
}

fn package_entry(package_dir: &Path) -> Option<PathBuf> {
    let manifest = std::fs::read_to_string(package_dir.join("package.json"))
        .ok()
        .and_then(|content| serde_json::from_str::<PackageManifest>(&content).ok())
        .unwrap_or_default();

    manifest
        .types
        .or(manifest.typings)
        .and_then(|entry| probe(&normalize(&package_dir.join(entry))))
        .or_else(|| probe(&package_dir.join("index")))
}

/// Try `path` itself, then each extension, then `path/index.*`.
fn probe(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    let is_source = |p: &Path| p.is_file() && has_source_extension(p);

    if is_source(path) {
        return Some(path.to_path_buf());
    }
    // `./button.js` in ESM-style imports points at `./button.ts`
    let base = name
        .strip_suffix(".js")
        .or_else(|| name.strip_suffix(".jsx"))
        .unwrap_or(&name);

    PROBE_EXTENSIONS
        .iter()
        .map(|ext| path.with_file_name(format!("{base}.{ext}")))
        .chain(PROBE_EXTENSIONS.iter().map(|ext| path.join(format!("index.{ext}"))))
        .find(|candidate| is_source(candidate))
}

fn has_source_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts") | Some("tsx")
    )
}

/// Lexically collapse `.` and `..` segments.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::tsconfig::TsConfig;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_relative_and_index_resolution() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("components/Box/index.tsx"), "");
        touch(&root.join("components/Button/Button.tsx"), "");
        touch(&root.join("utils/theme.ts"), "");

        let resolver = ModuleResolver::new(root.to_path_buf(), PathAliases::default());
        let from = root.join("components/Button/Button.tsx");

        assert_eq!(
            resolver.resolve(&from, "../Box"),
            Some(root.join("components/Box/index.tsx"))
        );
        assert_eq!(
            resolver.resolve(&from, "../../utils/theme.js"),
            Some(root.join("utils/theme.ts"))
        );
        assert_eq!(resolver.resolve(&from, "./missing"), None);
    }

    #[test]
    fn test_alias_resolution() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("src/hooks/use-x.ts"), "");

        let mut config = TsConfig::default();
        config
            .compiler_options
            .paths
            .insert("hooks/*".into(), vec!["src/hooks/*".into()]);
        let aliases = PathAliases::from_config(&config, root).unwrap();
        let resolver = ModuleResolver::new(root.to_path_buf(), aliases);

        assert_eq!(
            resolver.resolve(&root.join("a.ts"), "hooks/use-x"),
            Some(root.join("src/hooks/use-x.ts"))
        );
    }

    #[test]
    fn test_node_modules_types() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(
            &root.join("node_modules/theme-ui/package.json"),
            r#"{ "name": "theme-ui", "types": "dist/index.d.ts" }"#,
        );
        touch(&root.join("node_modules/theme-ui/dist/index.d.ts"), "");
        touch(&root.join("node_modules/@types/react/index.d.ts"), "");
        touch(&root.join("node_modules/@types/scope__pkg/index.d.ts"), "");

        let resolver = ModuleResolver::new(root.to_path_buf(), PathAliases::default());
        let from = root.join("components/Button.tsx");

        assert_eq!(
            resolver.resolve(&from, "theme-ui"),
            Some(root.join("node_modules/theme-ui/dist/index.d.ts"))
        );
        assert_eq!(
            resolver.resolve(&from, "react"),
            Some(root.join("node_modules/@types/react/index.d.ts"))
        );
        assert_eq!(
            resolver.resolve(&from, "@scope/pkg"),
            Some(root.join("node_modules/@types/scope__pkg/index.d.ts"))
        );
    }

    #[test]
    fn test_split_package() {
        assert_eq!(split_package("react"), Some(("react", None)));
        assert_eq!(split_package("react/jsx-runtime"), Some(("react", Some("jsx-runtime"))));
        assert_eq!(split_package("@scope/pkg/sub"), Some(("@scope/pkg", Some("sub"))));
        assert_eq!(split_package("@scope"), None);
    }
}
