//! Type declaration emitter.
//!
//! Produces the `.d.ts` text the embedded editor loads for type-aware
//! editing: one entry per resolvable declaration file plus every dependency
//! the project resolves against. Independent of the extractors.

use std::path::{Component, Path};

use serde::Serialize;

use crate::log_event;
use crate::project::ProjectSnapshot;

/// Virtual root the editor mounts declarations under.
pub const VIRTUAL_ROOT: &str = "file:///node_modules";

/// Stands in for each `..` of a dependency that lives above the project root.
const PARENT_SEGMENT: &str = "__parent__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationFile {
    pub path: String,
    pub code: String,
}

/// Emit declarations for `project`, sorted by virtual path.
///
/// Files currently failing to parse contribute the declaration of their last
/// successful resolve.
pub fn emit_declarations(project: &ProjectSnapshot) -> Vec<DeclarationFile> {
    let root = &project.layout().root;
    let candidates = project
        .declaration_sources()
        .filter(|(_, parsed)| !parsed.declaration.trim().is_empty())
        .map(|(file, parsed)| Candidate {
            declaration: DeclarationFile {
                path: virtual_path(root, file.path()),
                code: parsed.declaration.clone(),
            },
            hand_written: is_declaration_file(file.path()),
            source: project.relative(file.path()),
        })
        .collect();
    resolve_collisions(candidates)
}

struct Candidate {
    declaration: DeclarationFile,
    hand_written: bool,
    source: String,
}

/// Sort by virtual path and keep one declaration per path. A hand-written
/// `.d.ts` wins over a source that maps to the same path (`lib/x.ts` and
/// `lib/x.d.ts`); otherwise the first source in path order wins.
fn resolve_collisions(mut candidates: Vec<Candidate>) -> Vec<DeclarationFile> {
    candidates.sort_by(|a, b| {
        a.declaration
            .path
            .cmp(&b.declaration.path)
            .then(b.hand_written.cmp(&a.hand_written))
            .then(a.source.cmp(&b.source))
    });

    let mut files: Vec<DeclarationFile> = Vec::with_capacity(candidates.len());
    let mut kept_source = String::new();
    for candidate in candidates {
        if files.last().is_some_and(|last| last.path == candidate.declaration.path) {
            log_event!(
                "declarations",
                "path collision",
                "{} shadows {} at {}",
                kept_source,
                candidate.source,
                candidate.declaration.path
            );
            continue;
        }
        kept_source = candidate.source;
        files.push(candidate.declaration);
    }
    files
}

fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".d.ts"))
}

/// `components/Button.tsx` → `file:///node_modules/components/Button.d.ts`
///
/// Anything inside a `node_modules` directory is mounted by its package
/// path. Files above the project root keep their position relative to it,
/// with each `..` spelled [`PARENT_SEGMENT`].
fn virtual_path(root: &Path, path: &Path) -> String {
    let path = normalize(path);
    let segments: Vec<String> = match path.iter().rposition(|s| s == "node_modules") {
        Some(index) => path[index + 1..].to_vec(),
        None => relative_segments(&normalize(root), &path),
    };
    let relative = segments.join("/");
    let stem = relative
        .strip_suffix(".d.ts")
        .or_else(|| relative.strip_suffix(".tsx"))
        .or_else(|| relative.strip_suffix(".ts"))
        .unwrap_or(&relative);
    format!("{VIRTUAL_ROOT}/{stem}.d.ts")
}

/// Lexically resolve `.` and `..`, keeping only named segments.
fn normalize(path: &Path) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                segments.pop();
            }
            _ => {}
        }
    }
    segments
}

fn relative_segments(root: &[String], path: &[String]) -> Vec<String> {
    let shared = root
        .iter()
        .zip(path)
        .take_while(|(a, b)| a == b)
        .count();
    std::iter::repeat_n(PARENT_SEGMENT.to_string(), root.len() - shared)
        .chain(path[shared..].iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_virtual_path() {
        let root = Path::new("/p/app");
        let at = |p: &str| virtual_path(root, Path::new(p));

        assert_eq!(
            at("/p/app/components/Button/Button.tsx"),
            "file:///node_modules/components/Button/Button.d.ts"
        );
        assert_eq!(at("/p/app/hooks/index.ts"), "file:///node_modules/hooks/index.d.ts");
        assert_eq!(
            at("/p/app/node_modules/@types/react/index.d.ts"),
            "file:///node_modules/@types/react/index.d.ts"
        );
        assert_eq!(
            at("/p/app/components/../lib/theme.ts"),
            "file:///node_modules/lib/theme.d.ts"
        );
        assert_eq!(
            at("/p/shared/tokens.ts"),
            "file:///node_modules/__parent__/shared/tokens.d.ts"
        );
        assert_eq!(
            at("/p/node_modules/csstype/index.d.ts"),
            "file:///node_modules/csstype/index.d.ts"
        );
    }

    #[test]
    fn test_hand_written_declaration_wins_collision() {
        let candidate = |source: &str, code: &str| Candidate {
            declaration: DeclarationFile {
                path: virtual_path(Path::new("/p"), &Path::new("/p").join(source)),
                code: code.to_string(),
            },
            hand_written: is_declaration_file(Path::new(source)),
            source: source.to_string(),
        };

        let files = resolve_collisions(vec![
            candidate("lib/x.ts", "export declare const x: number;\n"),
            candidate("hooks/use-a.ts", "export declare function useA(): void;\n"),
            candidate("lib/x.d.ts", "export declare const x: 1;\n"),
        ]);
        assert_eq!(
            files,
            vec![
                DeclarationFile {
                    path: "file:///node_modules/hooks/use-a.d.ts".to_string(),
                    code: "export declare function useA(): void;\n".to_string(),
                },
                DeclarationFile {
                    path: "file:///node_modules/lib/x.d.ts".to_string(),
                    code: "export declare const x: 1;\n".to_string(),
                },
            ]
        );
    }
}
