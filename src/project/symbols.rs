//! Structured results of parsing one source file.

use crate::types::SymbolKind;

use super::jsdoc::DocComment;

/// Everything the pipeline needs from one resolved `.ts`/`.tsx` file.
#[derive(Debug, Clone, Default)]
pub struct ParsedModule {
    /// Exported declarations, in source order.
    pub symbols: Vec<ExportedSymbol>,
    /// Top-level type aliases and interfaces, exported or not.
    pub types: Vec<TypeDeclaration>,
    pub imports: Vec<ImportDecl>,
    pub reexports: Vec<ReExport>,
    /// Declaration (`.d.ts`) text for the editor.
    pub declaration: String,
}

impl ParsedModule {
    pub fn symbols_of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &ExportedSymbol> {
        self.symbols.iter().filter(move |s| s.kind == kind)
    }

    pub fn local_type(&self, name: &str) -> Option<&TypeDeclaration> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Import that binds `local` in this module, with the imported name.
    pub fn import_for(&self, local: &str) -> Option<(&ImportDecl, &str)> {
        self.imports.iter().find_map(|import| {
            import
                .bindings
                .iter()
                .find(|b| b.local == local)
                .map(|b| (import, b.imported.as_str()))
        })
    }

    /// Every module specifier this file depends on.
    pub fn specifiers(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .map(|i| i.source.as_str())
            .chain(self.reexports.iter().map(|r| r.source.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub signature: TypeSignature,
    pub doc: Option<DocComment>,
    /// Type describing the props of a component, when one can be named.
    pub props: Option<TypeRef>,
    /// Destructuring defaults of the first parameter (`{ size = 16 }`).
    pub defaults: Vec<(String, String)>,
    /// Zero-based line of the declaration.
    pub line: usize,
    pub is_default: bool,
}

/// Resolved shape of an exported symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSignature {
    Function {
        type_parameters: Option<String>,
        parameters: Vec<Parameter>,
        return_type: Option<String>,
    },
    Value {
        annotation: Option<String>,
    },
    Class {
        heritage: Option<String>,
    },
    Type {
        shape: TypeRef,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Identifier, or `props` for destructuring patterns.
    pub name: String,
    pub type_text: Option<String>,
    pub optional: bool,
    pub rest: bool,
}

/// A type reference precise enough to enumerate object members.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// A (possibly qualified) type name to look up.
    Named(String),
    /// An object literal type.
    Inline(Vec<TypeMember>),
    /// `A & B`, interface `extends`, or `PropsWithChildren<A>`.
    Intersection(Vec<TypeRef>),
    /// Anything the model cannot enumerate (unions, mapped types, ...).
    Opaque(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeMember {
    pub name: String,
    pub type_text: String,
    pub optional: bool,
    pub doc: Option<DocComment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub name: String,
    pub exported: bool,
    pub shape: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub source: String,
    pub bindings: Vec<ImportBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportBinding {
    /// Name in the source module; `default` for default imports.
    pub imported: String,
    pub local: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReExport {
    pub source: String,
    /// `None` for `export * from`, else `(imported, exported)` pairs.
    pub names: Option<Vec<(String, String)>>,
}

impl ReExport {
    /// Name in `source` that this re-export publishes as `exported`.
    pub fn source_name_for(&self, exported: &str) -> Option<String> {
        match &self.names {
            None => Some(exported.to_string()),
            Some(names) => names
                .iter()
                .find(|(_, alias)| alias == exported)
                .map(|(original, _)| original.clone()),
        }
    }
}
