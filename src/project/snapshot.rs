//! Immutable point-in-time view of the project model.
//!
//! A generation reads exclusively from one [`ProjectSnapshot`], so mutations
//! applied by the controller while it runs are never observed half-way.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ProjectLayout;
use crate::types::SourceRole;
use crate::utils::relative_display;

use super::source_file::SourceFile;
use super::symbols::{ExportedSymbol, ParsedModule, TypeDeclaration, TypeMember, TypeRef};

/// Bound on alias/re-export hops followed while resolving a type.
const MAX_RESOLVE_DEPTH: usize = 16;

#[derive(Debug)]
pub struct ProjectSnapshot {
    pub(super) revision: u64,
    pub(super) layout: Arc<ProjectLayout>,
    /// Tracked files that are not removed, including unresolved ones.
    pub(super) files: BTreeMap<PathBuf, Arc<SourceFile>>,
    /// Files outside the roots reached through imports of live files.
    pub(super) dependencies: BTreeMap<PathBuf, Arc<SourceFile>>,
    /// `(importing file, specifier)` → resolved file.
    pub(super) edges: HashMap<(PathBuf, String), PathBuf>,
}

impl ProjectSnapshot {
    /// Model revision this snapshot was taken at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Path relative to the project root, with forward slashes.
    pub fn relative(&self, path: &Path) -> String {
        relative_display(&self.layout.root, path)
    }

    pub fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.files
            .get(path)
            .or_else(|| self.dependencies.get(path))
            .map(Arc::as_ref)
    }

    /// Resolved tracked files under `root`, in path order.
    pub fn files_under(&self, root: &Path) -> impl Iterator<Item = &SourceFile> + use<'_> {
        let root = root.to_path_buf();
        self.files
            .range(root.clone()..)
            .take_while(move |(path, _)| path.starts_with(&root))
            .map(|(_, file)| file.as_ref())
            .filter(|file| file.is_live())
    }

    /// Tracked files that failed to resolve, with the reason.
    pub fn unresolved(&self) -> impl Iterator<Item = &SourceFile> {
        self.files
            .values()
            .map(Arc::as_ref)
            .filter(|f| !f.is_live())
    }

    /// Every tracked file that has a declaration to emit, then every dependency.
    pub fn declaration_sources(&self) -> impl Iterator<Item = (&SourceFile, &ParsedModule)> {
        self.files
            .values()
            .filter(|f| f.role == SourceRole::Declaration)
            .chain(self.dependencies.values())
            .filter_map(|f| f.last_good().map(|parsed| (&**f, parsed)))
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    pub fn type_checker(&self) -> TypeChecker<'_> {
        TypeChecker { snapshot: self }
    }
}

/// Side-effect-free symbol and type queries over one snapshot.
#[derive(Clone, Copy)]
pub struct TypeChecker<'a> {
    snapshot: &'a ProjectSnapshot,
}

impl<'a> TypeChecker<'a> {
    /// Exported declarations of a live file.
    pub fn exported_symbols(&self, path: &Path) -> &'a [ExportedSymbol] {
        self.snapshot
            .files
            .get(path)
            .map(|f| f.symbols())
            .unwrap_or_default()
    }

    /// File that `specifier` resolves to when imported from `from`.
    pub fn resolve_import(&self, from: &Path, specifier: &str) -> Option<&'a Path> {
        self.snapshot
            .edges
            .get(&(from.to_path_buf(), specifier.to_string()))
            .map(PathBuf::as_path)
    }

    /// Flatten `ty`, as written in `from`, into object members.
    ///
    /// Intersections and interface `extends` are merged with later members
    /// overriding earlier ones. Parts that cannot be followed (unions, mapped
    /// types, unresolvable imports) are skipped. Returns `None` when nothing
    /// at all could be resolved.
    pub fn resolve_type(&self, from: &Path, ty: &TypeRef) -> Option<Vec<TypeMember>> {
        let mut members: Vec<TypeMember> = Vec::new();
        let resolved = self.collect_members(from, ty, 0, &mut members);
        resolved.then_some(members)
    }

    fn collect_members(&self, from: &Path, ty: &TypeRef, depth: usize, out: &mut Vec<TypeMember>) -> bool {
        if depth > MAX_RESOLVE_DEPTH {
            return false;
        }
        match ty {
            TypeRef::Inline(members) => {
                for member in members {
                    merge_member(out, member.clone());
                }
                true
            }
            TypeRef::Intersection(parts) => {
                let mut any = false;
                for part in parts {
                    any |= self.collect_members(from, part, depth + 1, out);
                }
                any
            }
            TypeRef::Named(name) => match self.lookup_type(from, name, depth + 1) {
                Some((owner, declaration)) => {
                    self.collect_members(&owner, &declaration.shape, depth + 1, out)
                }
                None => false,
            },
            TypeRef::Opaque(_) => false,
        }
    }

    /// Find the declaration a type name refers to in the scope of `from`.
    fn lookup_type(&self, from: &Path, name: &str, depth: usize) -> Option<(PathBuf, &'a TypeDeclaration)> {
        if depth > MAX_RESOLVE_DEPTH {
            return None;
        }
        let module = self.snapshot.file(from)?.last_good()?;

        if let Some(local) = module.local_type(name) {
            return Some((from.to_path_buf(), local));
        }

        // `React.ButtonHTMLAttributes` style names resolve through namespace imports
        let (head, tail) = match name.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (name, None),
        };
        let (import, imported) = module.import_for(head)?;
        let target = self.resolve_import(from, &import.source)?;
        let exported = match (imported, tail) {
            ("*", Some(tail)) => tail,
            (_, None) => imported,
            _ => return None,
        };
        self.exported_type(target, exported, depth + 1)
    }

    /// Follow `exported` out of the module at `path`, through re-exports.
    fn exported_type(&self, path: &Path, exported: &str, depth: usize) -> Option<(PathBuf, &'a TypeDeclaration)> {
        if depth > MAX_RESOLVE_DEPTH {
            return None;
        }
        let module = self.snapshot.file(path)?.last_good()?;

        if let Some(local) = module.types.iter().find(|t| t.name == exported && t.exported) {
            return Some((path.to_path_buf(), local));
        }
        module.reexports.iter().find_map(|reexport| {
            let source_name = reexport.source_name_for(exported)?;
            let target = self.resolve_import(path, &reexport.source)?;
            self.exported_type(target, &source_name, depth + 1)
        })
    }
}

fn merge_member(out: &mut Vec<TypeMember>, member: TypeMember) {
    match out.iter_mut().find(|m| m.name == member.name) {
        Some(existing) => *existing = member,
        None => out.push(member),
    }
}
