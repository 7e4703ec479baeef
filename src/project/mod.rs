//! Project model: the semantically-resolved view of the tracked source tree.
//!
//! The model owns every [`SourceFile`] under the watched roots. It is mutated
//! only through [`ProjectModel::add_file`], [`ProjectModel::remove_file`] and
//! [`ProjectModel::refresh_file`], and read through immutable
//! [`ProjectSnapshot`]s taken once per generation.

pub mod error;
pub mod jsdoc;
pub mod parser;
pub mod resolver;
pub mod scan;
pub mod snapshot;
pub mod source_file;
pub mod symbols;
pub mod tsconfig;

pub use error::{ProjectError, ProjectResult};
pub use jsdoc::DocComment;
pub use parser::TypeScriptParser;
pub use resolver::ModuleResolver;
pub use scan::{FileScanner, IgnoreRules, TRACKED_EXTENSIONS, has_tracked_extension};
pub use snapshot::{ProjectSnapshot, TypeChecker};
pub use source_file::SourceFile;
pub use symbols::{
    ExportedSymbol, ParsedModule, Parameter, TypeDeclaration, TypeMember, TypeRef, TypeSignature,
};

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::config::ProjectLayout;
use crate::types::{ContentHash, FileStatus, SourceRole};
use crate::{debug_event, log_event};

use tsconfig::{PathAliases, TsConfig};

/// Outcome of the initial scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub discovered: usize,
    pub unresolved: usize,
}

struct CachedDependency {
    modified: Option<SystemTime>,
    file: Arc<SourceFile>,
}

pub struct ProjectModel {
    layout: Arc<ProjectLayout>,
    parser: TypeScriptParser,
    resolver: ModuleResolver,
    scanner: FileScanner,
    files: BTreeMap<PathBuf, Arc<SourceFile>>,
    dependencies: HashMap<PathBuf, CachedDependency>,
    revision: u64,
}

impl ProjectModel {
    /// Create an empty model. Loads module resolution settings from the
    /// project's `tsconfig.json` when it exists.
    pub fn new(layout: ProjectLayout) -> ProjectResult<Self> {
        let config = if layout.tsconfig.is_file() {
            TsConfig::load(&layout.tsconfig)?
        } else {
            debug_event!("project", "no tsconfig", "{}", layout.tsconfig.display());
            TsConfig::default()
        };
        let config_dir = layout
            .tsconfig
            .parent()
            .unwrap_or(&layout.root)
            .to_path_buf();
        let aliases = PathAliases::from_config(&config, &config_dir)?;

        Ok(Self {
            resolver: ModuleResolver::new(layout.root.clone(), aliases),
            parser: TypeScriptParser::new()?,
            scanner: FileScanner::new(IgnoreRules::new(&layout.root, &layout.ignore_patterns)),
            layout: Arc::new(layout),
            files: BTreeMap::new(),
            dependencies: HashMap::new(),
            revision: 0,
        })
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Incremented on every mutation that changes what a snapshot would see.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.files
            .get(path)
            .map(Arc::as_ref)
            .filter(|f| f.status != FileStatus::Removed)
    }

    /// Role a path would have in this project, `None` if it is not tracked
    /// or an ignore pattern excludes it.
    pub fn classify(&self, path: &Path) -> Option<SourceRole> {
        if self.scanner.rules().is_ignored(path) {
            return None;
        }
        classify_role(&self.layout, path)
    }

    /// Discover and register every tracked file under the watched roots.
    pub fn scan(&mut self) -> ScanSummary {
        let roots: Vec<PathBuf> = self
            .layout
            .watched_roots()
            .into_iter()
            .map(Path::to_path_buf)
            .collect();

        let mut summary = ScanSummary::default();
        for root in roots {
            for path in self.scanner.scan(&root) {
                match self.add_file(&path) {
                    Some(FileStatus::Resolved) => summary.discovered += 1,
                    Some(_) => {
                        summary.discovered += 1;
                        summary.unresolved += 1;
                    }
                    None => {}
                }
            }
        }
        debug_event!(
            "project",
            "scanned",
            "{} files ({} unresolved)",
            summary.discovered,
            summary.unresolved
        );
        summary
    }

    /// Register `path`, read and resolve it.
    ///
    /// Returns the resulting status, or `None` when the path is outside the
    /// tracked roots. Resolution failures are logged and leave the file
    /// `Unresolved`; adding a removed path revives it.
    pub fn add_file(&mut self, path: &Path) -> Option<FileStatus> {
        let role = self.classify(path)?;
        let previous = self
            .files
            .get(path)
            .filter(|f| f.status != FileStatus::Removed)
            .cloned();
        let file = self.load(path, role, previous.as_deref());
        Some(self.store(file))
    }

    /// Tombstone `path` and drop its symbols. Returns `false` if it was not
    /// tracked (or already removed).
    pub fn remove_file(&mut self, path: &Path) -> bool {
        let Some(existing) = self.files.get(path) else {
            return false;
        };
        if existing.status == FileStatus::Removed {
            return false;
        }
        let tombstone = SourceFile::removed(path.to_path_buf(), existing.role);
        self.files.insert(path.to_path_buf(), Arc::new(tombstone));
        self.revision += 1;
        debug_event!("project", "removed", "{}", path.display());
        true
    }

    /// Tombstone every live file under `dir`, for a deleted or renamed
    /// directory. Returns how many files were removed.
    pub fn remove_tree(&mut self, dir: &Path) -> usize {
        let doomed: Vec<PathBuf> = self
            .files
            .range(dir.to_path_buf()..)
            .take_while(|(path, _)| path.starts_with(dir))
            .filter(|(_, file)| file.status != FileStatus::Removed)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &doomed {
            self.remove_file(path);
        }
        doomed.len()
    }

    /// Re-read and re-resolve a tracked file. No-op for untracked paths and
    /// for content identical to the last successful resolve.
    pub fn refresh_file(&mut self, path: &Path) -> Option<FileStatus> {
        let existing = self
            .files
            .get(path)
            .filter(|f| f.status != FileStatus::Removed)
            .cloned()?;

        let mut stale = (*existing).clone();
        stale.status = FileStatus::Stale;
        let file = self.load(path, existing.role, Some(&stale));

        if file.status == FileStatus::Resolved
            && existing.status == FileStatus::Resolved
            && file.hash == existing.hash
        {
            return Some(FileStatus::Resolved);
        }
        Some(self.store(file))
    }

    fn store(&mut self, file: SourceFile) -> FileStatus {
        let status = file.status;
        self.files.insert(file.path.clone(), Arc::new(file));
        self.revision += 1;
        status
    }

    /// Read and parse `path`. `previous` supplies the last good parse kept
    /// across failures.
    fn load(&mut self, path: &Path, role: SourceRole, previous: Option<&SourceFile>) -> SourceFile {
        let mut file = SourceFile::new(path.to_path_buf(), role);
        file.parsed = previous.and_then(|p| p.parsed.clone());

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                let error = ProjectError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                };
                log_event!("project", "unresolved", "{error}");
                file.error = Some(error.to_string());
                return file;
            }
        };
        file.hash = Some(ContentHash::of(&text));

        let unchanged = previous
            .is_some_and(|p| p.error.is_none() && p.hash == file.hash && p.parsed.is_some());
        if needs_parse(role) && !unchanged {
            match self.parser.parse(path, &text) {
                Ok(parsed) => file.parsed = Some(Arc::new(parsed)),
                Err(error) => {
                    log_event!("project", "unresolved", "{error}");
                    file.error = Some(error.to_string());
                    file.text = Arc::from(text);
                    return file;
                }
            }
        }

        file.text = Arc::from(text);
        file.status = FileStatus::Resolved;
        file
    }

    /// Freeze the current state for one generation.
    ///
    /// Walks the import graph of live declaration files to collect the
    /// dependency closure. Dependencies are cached by modification time.
    pub fn snapshot(&mut self) -> Arc<ProjectSnapshot> {
        let files: BTreeMap<PathBuf, Arc<SourceFile>> = self
            .files
            .iter()
            .filter(|(_, f)| f.status != FileStatus::Removed)
            .map(|(p, f)| (p.clone(), Arc::clone(f)))
            .collect();

        let mut dependencies = BTreeMap::new();
        let mut edges = HashMap::new();
        let mut queue: VecDeque<Arc<SourceFile>> = files
            .values()
            .filter(|f| f.is_live() && f.role == SourceRole::Declaration)
            .cloned()
            .collect();

        while let Some(file) = queue.pop_front() {
            let Some(parsed) = file.parsed.as_deref() else {
                continue;
            };
            for specifier in parsed.specifiers() {
                let Some(target) = self.resolver.resolve(&file.path, specifier) else {
                    debug_event!(
                        "project",
                        "unresolved import",
                        "'{specifier}' from {}",
                        file.path.display()
                    );
                    continue;
                };
                edges.insert((file.path.clone(), specifier.to_string()), target.clone());

                if files.contains_key(&target) || dependencies.contains_key(&target) {
                    continue;
                }
                if self.classify(&target).is_some() {
                    // tracked but removed or never added
                    continue;
                }
                if let Some(dependency) = self.dependency(&target) {
                    queue.push_back(Arc::clone(&dependency));
                    dependencies.insert(target, dependency);
                }
            }
        }

        // forget dependencies no live file reaches any more
        self.dependencies.retain(|path, _| dependencies.contains_key(path));

        Arc::new(ProjectSnapshot {
            revision: self.revision,
            layout: Arc::clone(&self.layout),
            files,
            dependencies,
            edges,
        })
    }

    fn dependency(&mut self, path: &Path) -> Option<Arc<SourceFile>> {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        if let Some(cached) = self.dependencies.get(path)
            && cached.modified == modified
        {
            return Some(Arc::clone(&cached.file));
        }

        let file = self.load(path, SourceRole::Dependency, None);
        if !file.is_live() {
            return None;
        }
        let file = Arc::new(file);
        self.dependencies.insert(
            path.to_path_buf(),
            CachedDependency {
                modified,
                file: Arc::clone(&file),
            },
        );
        Some(file)
    }
}

fn needs_parse(role: SourceRole) -> bool {
    matches!(role, SourceRole::Declaration | SourceRole::Dependency)
}

/// Decide what a path under the project is used for.
///
/// `.md`/`.mdx` anywhere under a root are documents; `.ts`/`.tsx` inside an
/// `examples` directory are examples; other `.ts`/`.tsx` under the symbol
/// roots are declarations. Pages are decided by the pages root alone.
pub fn classify_role(layout: &ProjectLayout, path: &Path) -> Option<SourceRole> {
    if !has_tracked_extension(path) || !layout.is_tracked_location(path) {
        return None;
    }
    if layout.pages.as_deref().is_some_and(|pages| path.starts_with(pages)) {
        return Some(SourceRole::Page);
    }

    let is_markdown = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("mdx")
    );
    if is_markdown {
        return Some(SourceRole::Document);
    }

    let relative = path.strip_prefix(&layout.root).unwrap_or(path);
    if relative.components().any(|c| c.as_os_str() == "examples") {
        return Some(SourceRole::Example);
    }
    if layout.symbol_roots().iter().any(|root| path.starts_with(root)) {
        Some(SourceRole::Declaration)
    } else {
        // demo sources living next to docs
        Some(SourceRole::Example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::types::SymbolKind;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn model(root: &Path) -> ProjectModel {
        let mut settings = Settings::default();
        settings.root = root.to_path_buf();
        ProjectModel::new(settings.layout()).unwrap()
    }

    #[test]
    fn test_classify_role() {
        let mut settings = Settings::default();
        settings.root = PathBuf::from("/p");
        let layout = settings.layout();
        let role = |p: &str| classify_role(&layout, Path::new(p));

        assert_eq!(role("/p/components/Button/Button.tsx"), Some(SourceRole::Declaration));
        assert_eq!(role("/p/components/Button/README.mdx"), Some(SourceRole::Document));
        assert_eq!(
            role("/p/components/Button/examples/basic.tsx"),
            Some(SourceRole::Example)
        );
        assert_eq!(role("/p/docs/intro.mdx"), Some(SourceRole::Document));
        assert_eq!(role("/p/pages/playground.tsx"), Some(SourceRole::Page));
        assert_eq!(role("/p/lib/x.ts"), None);
        assert_eq!(role("/p/components/Button/button.css"), None);
    }

    #[test]
    fn test_add_refresh_remove() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let path = write(root, "hooks/use-toggle.ts", "export const useToggle = () => true\n");
        let mut model = model(root);

        assert_eq!(model.add_file(&path), Some(FileStatus::Resolved));
        let snapshot = model.snapshot();
        let symbols = snapshot.type_checker().exported_symbols(&path);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].kind, SymbolKind::Hook);

        // syntax error keeps the last good parse but hides the symbols
        fs::write(&path, "export const useToggle = (\n").unwrap();
        assert_eq!(model.refresh_file(&path), Some(FileStatus::Unresolved));
        let file = model.file(&path).unwrap();
        assert!(file.symbols().is_empty());
        assert!(file.last_good().is_some());
        assert!(file.error.as_deref().unwrap().contains("Syntax error"));

        assert!(model.remove_file(&path));
        assert!(!model.remove_file(&path));
        assert!(model.file(&path).is_none());
        assert!(model.snapshot().file(&path).is_none());

        // refresh is a no-op for removed and unknown paths
        assert_eq!(model.refresh_file(&path), None);
        assert_eq!(model.refresh_file(&root.join("hooks/other.ts")), None);
    }

    #[test]
    fn test_unchanged_refresh_keeps_revision() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "utils/sum.ts", "export function sum(a: number, b: number) { return a + b }\n");
        let mut model = model(temp.path());
        model.add_file(&path);
        let revision = model.revision();

        assert_eq!(model.refresh_file(&path), Some(FileStatus::Resolved));
        assert_eq!(model.revision(), revision);
    }

    #[test]
    fn test_resolve_type_across_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(
            root,
            "components/Box/Box.tsx",
            "export interface BoxProps {\n  /** Element to render. */\n  as?: string\n}\nexport const Box = (props: BoxProps) => null\n",
        );
        write(root, "components/Box/index.ts", "export * from './Box'\n");
        write(
            root,
            "lib/theme.ts",
            "export type Themed = { sx?: object }\n",
        );
        let button = write(
            root,
            "components/Button/Button.tsx",
            "import { BoxProps } from '../Box'\nimport type { Themed } from '../../lib/theme'\ntype ButtonProps = BoxProps & Themed & { size: number }\nexport function Button(props: ButtonProps) { return null }\n",
        );

        let mut model = model(root);
        let summary = model.scan();
        assert_eq!(summary, ScanSummary { discovered: 3, unresolved: 0 });

        let snapshot = model.snapshot();
        assert_eq!(snapshot.dependency_count(), 1);

        let checker = snapshot.type_checker();
        let symbol = &checker.exported_symbols(&button)[0];
        let members = checker
            .resolve_type(&button, symbol.props.as_ref().unwrap())
            .unwrap();
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["as", "sx", "size"]);
        assert_eq!(
            members[0].doc.as_ref().map(|d| d.description.as_str()),
            Some("Element to render.")
        );
    }

    #[test]
    fn test_removed_file_leaves_no_dependency_residue() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "lib/shared.ts", "export type Shared = { a: string }\n");
        let util = write(root, "utils/x.ts", "import { Shared } from '../lib/shared'\nexport const x = 1\n");

        let mut model = model(root);
        model.scan();
        assert_eq!(model.snapshot().dependency_count(), 1);

        model.remove_file(&util);
        assert_eq!(model.snapshot().dependency_count(), 0);
    }

    #[test]
    fn test_remove_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "components/Button/Button.tsx", "export function Button() { return null }\n");
        write(root, "components/Button/README.mdx", "# Button\n");
        let badge = write(root, "components/Badge.tsx", "export function Badge() { return null }\n");

        let mut model = model(root);
        model.scan();
        assert_eq!(model.remove_tree(&root.join("components/Button")), 2);
        assert_eq!(model.remove_tree(&root.join("components/Button")), 0);
        assert!(model.file(&badge).is_some());
    }

    #[test]
    fn test_ignore_patterns_apply_after_scan() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "components/Button.tsx", "export function Button() { return null }\n");
        let generated = write(
            root,
            "components/Card.generated.tsx",
            "export function Card() { return null }\n",
        );

        let mut model = model(root);
        assert_eq!(model.scan().discovered, 1);
        assert_eq!(model.classify(&generated), None);
        assert_eq!(model.add_file(&generated), None);
        assert!(model.file(&generated).is_none());

        let revision = model.revision();
        assert_eq!(model.refresh_file(&generated), None);
        assert_eq!(model.revision(), revision);
    }
}
