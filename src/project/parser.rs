//! TypeScript/TSX parser
//!
//! **Tree-sitter grammar**: tree-sitter-typescript 0.23 (`typescript` and `tsx`)
//!
//! Walks the top-level statements of a module and produces a [`ParsedModule`]:
//! exported symbols with structured signatures, local type declarations,
//! imports/re-exports for module resolution, and the declaration text used by
//! the editor. Nested scopes are never entered; documentation only cares about
//! what a module exports.

use std::collections::HashMap;
use std::path::Path;
use tree_sitter::{Language, Node, Parser};

use crate::types::SymbolKind;
use crate::utils::{is_hook_name, is_pascal_case};

use super::error::{ProjectError, ProjectResult};
use super::jsdoc::DocComment;
use super::symbols::{
    ExportedSymbol, ImportBinding, ImportDecl, Parameter, ParsedModule, ReExport, TypeDeclaration,
    TypeMember, TypeRef, TypeSignature,
};

/// Maximum nesting followed when building type references.
const MAX_TYPE_DEPTH: usize = 32;

/// TypeScript parser holding one tree-sitter parser per dialect.
pub struct TypeScriptParser {
    typescript: Parser,
    tsx: Parser,
}

fn make_parser(language: Language, name: &str) -> ProjectResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ProjectError::ParserInit {
            reason: format!("failed to set {name} language: {e}"),
        })?;
    Ok(parser)
}

impl TypeScriptParser {
    pub fn new() -> ProjectResult<Self> {
        Ok(Self {
            typescript: make_parser(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), "TypeScript")?,
            tsx: make_parser(tree_sitter_typescript::LANGUAGE_TSX.into(), "TSX")?,
        })
    }

    /// Parse `code` read from `path`.
    ///
    /// Any syntax error fails the whole file; a partially parsed module would
    /// silently drop exports.
    pub fn parse(&mut self, path: &Path, code: &str) -> ProjectResult<ParsedModule> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_tsx = file_name.ends_with(".tsx") || file_name.ends_with(".jsx");
        let parser = if is_tsx { &mut self.tsx } else { &mut self.typescript };

        let tree = parser.parse(code, None).ok_or_else(|| ProjectError::Syntax {
            path: path.to_path_buf(),
            line: 1,
        })?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(ProjectError::Syntax {
                path: path.to_path_buf(),
                line: first_error_line(root).unwrap_or(1),
            });
        }

        let default_name = file_name
            .split('.')
            .next()
            .unwrap_or("default")
            .to_string();
        let mut walker = ModuleWalker::new(code, default_name);
        walker.walk(root);
        let mut module = walker.finish();

        if file_name.ends_with(".d.ts") {
            module.declaration = code.to_string();
        }
        Ok(module)
    }
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error_line)
}

fn first_named(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let first = node
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment");
    first
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == token);
    found
}

fn is_function_like(node: Node) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportMode {
    None,
    Inline,
    Default,
}

/// A top-level item waiting for export information to be complete.
enum Item {
    Verbatim(String),
    Value {
        symbol: ExportedSymbol,
        declare: String,
        doc_raw: Option<String>,
        mode: ExportMode,
    },
    Type {
        symbol: ExportedSymbol,
        declaration: TypeDeclaration,
        text: String,
        doc_raw: Option<String>,
        mode: ExportMode,
    },
}

struct ModuleWalker<'a> {
    code: &'a str,
    default_name: String,
    items: Vec<Item>,
    imports: Vec<ImportDecl>,
    reexports: Vec<ReExport>,
    /// `export { local as exported }` without a source.
    clause_exports: HashMap<String, String>,
    /// `export default identifier`.
    default_export: Option<String>,
}

impl<'a> ModuleWalker<'a> {
    fn new(code: &'a str, default_name: String) -> Self {
        Self {
            code,
            default_name,
            items: Vec::new(),
            imports: Vec::new(),
            reexports: Vec::new(),
            clause_exports: HashMap::new(),
            default_export: None,
        }
    }

    fn text(&self, node: Node) -> &'a str {
        &self.code[node.byte_range()]
    }

    fn field_text(&self, node: Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
    }

    fn string_value(&self, node: Node) -> String {
        self.text(node)
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .to_string()
    }

    /// Raw `/** */` comment directly preceding `node`.
    fn doc_raw(&self, node: Node) -> Option<String> {
        let prev = node.prev_named_sibling()?;
        if prev.kind() != "comment" {
            return None;
        }
        let raw = self.text(prev);
        raw.starts_with("/**").then(|| raw.to_string())
    }

    fn walk(&mut self, root: Node) {
        let mut cursor = root.walk();
        let statements: Vec<Node> = root.named_children(&mut cursor).collect();

        for statement in statements {
            match statement.kind() {
                "comment" => {}
                "import_statement" => self.import(statement),
                "export_statement" => self.export(statement),
                _ => {
                    let doc = self.doc_raw(statement);
                    self.declaration(statement, None, ExportMode::None, doc);
                }
            }
        }
    }

    fn import(&mut self, node: Node) {
        let Some(source) = node.child_by_field_name("source") else {
            return;
        };
        let source = self.string_value(source);
        let mut bindings = Vec::new();

        let mut cursor = node.walk();
        let clause = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "import_clause");

        if let Some(clause) = clause {
            for part in named_children(clause) {
                match part.kind() {
                    "identifier" => bindings.push(ImportBinding {
                        imported: "default".to_string(),
                        local: self.text(part).to_string(),
                    }),
                    "namespace_import" => {
                        if let Some(local) = first_named(part) {
                            bindings.push(ImportBinding {
                                imported: "*".to_string(),
                                local: self.text(local).to_string(),
                            });
                        }
                    }
                    "named_imports" => {
                        for specifier in named_children(part) {
                            if specifier.kind() != "import_specifier" {
                                continue;
                            }
                            let Some(imported) = self.field_text(specifier, "name") else {
                                continue;
                            };
                            let local = self
                                .field_text(specifier, "alias")
                                .unwrap_or_else(|| imported.clone());
                            bindings.push(ImportBinding { imported, local });
                        }
                    }
                    _ => {}
                }
            }
            self.items.push(Item::Verbatim(self.text(node).to_string()));
        }

        self.imports.push(ImportDecl { source, bindings });
    }

    fn export(&mut self, node: Node) {
        let doc = self.doc_raw(node);
        let is_default = has_token(node, "default");

        if let Some(declaration) = node.child_by_field_name("declaration") {
            let mode = if is_default {
                ExportMode::Default
            } else {
                ExportMode::Inline
            };
            self.declaration(declaration, Some(node), mode, doc);
            return;
        }

        let mut cursor = node.walk();
        let clause = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "export_clause");
        let specifiers: Option<Vec<(String, String)>> = clause.map(|clause| {
            named_children(clause)
                .into_iter()
                .filter(|s| s.kind() == "export_specifier")
                .filter_map(|s| {
                    let name = self.field_text(s, "name")?;
                    let alias = self.field_text(s, "alias").unwrap_or_else(|| name.clone());
                    Some((name, alias))
                })
                .collect()
        });

        if let Some(source) = node.child_by_field_name("source") {
            self.reexports.push(ReExport {
                source: self.string_value(source),
                names: specifiers,
            });
            self.items.push(Item::Verbatim(self.text(node).to_string()));
            return;
        }

        if let Some(specifiers) = specifiers {
            for (local, exported) in specifiers {
                self.clause_exports.entry(local).or_insert(exported);
            }
            self.items.push(Item::Verbatim(self.text(node).to_string()));
            return;
        }

        if is_default && let Some(value) = node.child_by_field_name("value") {
            if value.kind() == "identifier" {
                self.default_export = Some(self.text(value).to_string());
                self.items.push(Item::Verbatim(self.text(node).to_string()));
            } else {
                let name = self.default_name.clone();
                self.value(&name, Some(value), None, ExportMode::Default, doc);
            }
        }
    }

    fn declaration(&mut self, node: Node, outer: Option<Node>, mode: ExportMode, doc: Option<String>) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                self.function(node, mode, doc)
            }
            "lexical_declaration" | "variable_declaration" => {
                for declarator in named_children(node) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    if name.kind() != "identifier" {
                        continue;
                    }
                    let name = self.text(name).to_string();
                    let annotation = declarator
                        .child_by_field_name("type")
                        .and_then(first_named);
                    let value = declarator.child_by_field_name("value");
                    self.value(&name, value, annotation, mode, doc.clone());
                }
            }
            "class_declaration" | "abstract_class_declaration" => self.class(node, mode, doc),
            "type_alias_declaration" | "interface_declaration" | "enum_declaration" => {
                self.type_declaration(node, outer, mode, doc)
            }
            "ambient_declaration" => {
                let text = self.text(outer.unwrap_or(node)).to_string();
                self.items.push(Item::Verbatim(text));
            }
            _ => {}
        }
    }

    fn function(&mut self, node: Node, mode: ExportMode, doc: Option<String>) {
        let name = self
            .field_text(node, "name")
            .unwrap_or_else(|| self.default_name.clone());
        let kind = classify(&name, true);
        let parsed = node
            .child_by_field_name("parameters")
            .map(|p| self.parameters(p))
            .unwrap_or_default();
        let type_parameters = self.field_text(node, "type_parameters");
        let return_type = self.annotation_text(node.child_by_field_name("return_type"));

        let declare = format!(
            "declare function {name}{}({}){};",
            type_parameters.as_deref().unwrap_or(""),
            render_parameters(&parsed.parameters),
            return_type.as_deref().map(|r| format!(": {r}")).unwrap_or_default(),
        );

        let symbol = ExportedSymbol {
            name,
            kind,
            signature: TypeSignature::Function {
                type_parameters,
                parameters: parsed.parameters,
                return_type,
            },
            doc: doc.as_deref().and_then(DocComment::parse),
            props: if kind == SymbolKind::Component { parsed.first_type } else { None },
            defaults: parsed.defaults,
            line: node.start_position().row,
            is_default: mode == ExportMode::Default,
        };
        self.items.push(Item::Value {
            symbol,
            declare,
            doc_raw: doc,
            mode,
        });
    }

    fn value(
        &mut self,
        name: &str,
        value: Option<Node>,
        annotation: Option<Node>,
        mode: ExportMode,
        doc: Option<String>,
    ) {
        let function_like = value.is_some_and(is_function_like);
        let is_call = value.is_some_and(|v| v.kind() == "call_expression");
        let annotated_component = annotation.is_some_and(|a| self.component_annotation(a).is_some());
        let kind = if annotated_component && is_pascal_case(name) {
            SymbolKind::Component
        } else {
            classify(name, function_like || is_call)
        };

        let parsed = match value {
            Some(v) if function_like => self.function_parameters(v),
            Some(v) if is_call => self.call_parameters(v, 0),
            _ => ParsedParameters::default(),
        };

        let annotation_text = annotation.map(|a| self.text(a).to_string());
        let (signature, type_text) = match value {
            Some(v) if function_like => {
                let return_type = self.annotation_text(v.child_by_field_name("return_type"));
                let type_text = annotation_text.clone().unwrap_or_else(|| {
                    format!(
                        "({}) => {}",
                        render_parameters(&parsed.parameters),
                        return_type.as_deref().unwrap_or("any")
                    )
                });
                (
                    TypeSignature::Function {
                        type_parameters: self.field_text(v, "type_parameters"),
                        parameters: parsed.parameters.clone(),
                        return_type,
                    },
                    type_text,
                )
            }
            _ => {
                let type_text = annotation_text
                    .clone()
                    .unwrap_or_else(|| infer_literal_type(value).to_string());
                (
                    TypeSignature::Value {
                        annotation: annotation_text.clone(),
                    },
                    type_text,
                )
            }
        };

        let props = if kind == SymbolKind::Component {
            annotation
                .and_then(|a| self.component_annotation(a))
                .or(parsed.first_type)
        } else {
            None
        };

        let symbol = ExportedSymbol {
            name: name.to_string(),
            kind,
            signature,
            doc: doc.as_deref().and_then(DocComment::parse),
            props,
            defaults: parsed.defaults,
            line: value.map(|v| v.start_position().row).unwrap_or_default(),
            is_default: mode == ExportMode::Default,
        };
        self.items.push(Item::Value {
            symbol,
            declare: format!("declare const {name}: {type_text};"),
            doc_raw: doc,
            mode,
        });
    }

    fn class(&mut self, node: Node, mode: ExportMode, doc: Option<String>) {
        let name = self
            .field_text(node, "name")
            .unwrap_or_else(|| self.default_name.clone());
        let mut cursor = node.walk();
        let heritage = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "class_heritage")
            .map(|h| self.text(h).to_string());
        let kind = if is_pascal_case(&name) && heritage.as_deref().is_some_and(|h| h.contains("Component")) {
            SymbolKind::Component
        } else {
            SymbolKind::Util
        };
        let declare = match &heritage {
            Some(h) => format!("declare class {name} {h} {{}}"),
            None => format!("declare class {name} {{}}"),
        };

        let symbol = ExportedSymbol {
            name,
            kind,
            signature: TypeSignature::Class { heritage },
            doc: doc.as_deref().and_then(DocComment::parse),
            props: None,
            defaults: Vec::new(),
            line: node.start_position().row,
            is_default: mode == ExportMode::Default,
        };
        self.items.push(Item::Value {
            symbol,
            declare,
            doc_raw: doc,
            mode,
        });
    }

    fn type_declaration(&mut self, node: Node, outer: Option<Node>, mode: ExportMode, doc: Option<String>) {
        let Some(name) = self.field_text(node, "name") else {
            return;
        };
        let shape = match node.kind() {
            "type_alias_declaration" => node
                .child_by_field_name("value")
                .map(|v| self.type_ref(v, 0))
                .unwrap_or_else(|| TypeRef::Opaque(name.clone())),
            "interface_declaration" => self.interface_shape(node),
            _ => TypeRef::Opaque(name.clone()),
        };

        let symbol = ExportedSymbol {
            name: name.clone(),
            kind: SymbolKind::Type,
            signature: TypeSignature::Type {
                shape: shape.clone(),
            },
            doc: doc.as_deref().and_then(DocComment::parse),
            props: None,
            defaults: Vec::new(),
            line: node.start_position().row,
            is_default: mode == ExportMode::Default,
        };
        self.items.push(Item::Type {
            symbol,
            declaration: TypeDeclaration {
                name,
                exported: mode != ExportMode::None,
                shape,
            },
            text: self.text(outer.unwrap_or(node)).to_string(),
            doc_raw: doc,
            mode,
        });
    }

    fn interface_shape(&self, node: Node) -> TypeRef {
        let mut parts: Vec<TypeRef> = Vec::new();
        let mut cursor = node.walk();
        let extends = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "extends_type_clause");
        if let Some(extends) = extends {
            parts.extend(named_children(extends).into_iter().map(|t| self.type_ref(t, 1)));
        }
        let members = node
            .child_by_field_name("body")
            .map(|body| self.members(body))
            .unwrap_or_default();

        if parts.is_empty() {
            TypeRef::Inline(members)
        } else {
            parts.push(TypeRef::Inline(members));
            TypeRef::Intersection(parts)
        }
    }

    fn type_ref(&self, node: Node, depth: usize) -> TypeRef {
        if depth > MAX_TYPE_DEPTH {
            return TypeRef::Opaque(self.text(node).to_string());
        }
        match node.kind() {
            "type_identifier" | "nested_type_identifier" | "identifier" => {
                TypeRef::Named(self.text(node).to_string())
            }
            "object_type" => TypeRef::Inline(self.members(node)),
            "intersection_type" => TypeRef::Intersection(
                named_children(node)
                    .into_iter()
                    .map(|part| self.type_ref(part, depth + 1))
                    .collect(),
            ),
            "parenthesized_type" => match first_named(node) {
                Some(inner) => self.type_ref(inner, depth + 1),
                None => TypeRef::Opaque(self.text(node).to_string()),
            },
            "generic_type" => {
                let name = self.field_text(node, "name").unwrap_or_default();
                let args = self.type_arguments(node);
                if name.ends_with("PropsWithChildren") && let Some(first) = args.first() {
                    TypeRef::Intersection(vec![
                        self.type_ref(*first, depth + 1),
                        TypeRef::Inline(vec![TypeMember {
                            name: "children".to_string(),
                            type_text: "React.ReactNode".to_string(),
                            optional: true,
                            doc: None,
                        }]),
                    ])
                } else {
                    TypeRef::Opaque(self.text(node).to_string())
                }
            }
            _ => TypeRef::Opaque(self.text(node).to_string()),
        }
    }

    fn type_arguments<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let arguments = node.child_by_field_name("type_arguments").or_else(|| {
            let mut cursor = node.walk();
            let found = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "type_arguments");
            found
        });
        arguments.map(named_children).unwrap_or_default()
    }

    fn members(&self, body: Node) -> Vec<TypeMember> {
        let mut members = Vec::new();
        for member in named_children(body) {
            let doc = self.doc_raw(member).as_deref().and_then(DocComment::parse);
            match member.kind() {
                "property_signature" => {
                    let Some(name) = member.child_by_field_name("name") else {
                        continue;
                    };
                    members.push(TypeMember {
                        name: self.string_value(name),
                        type_text: self
                            .annotation_text(member.child_by_field_name("type"))
                            .unwrap_or_else(|| "any".to_string()),
                        optional: has_token(member, "?"),
                        doc,
                    });
                }
                "method_signature" => {
                    let Some(name) = member.child_by_field_name("name") else {
                        continue;
                    };
                    let params = self
                        .field_text(member, "parameters")
                        .unwrap_or_else(|| "()".to_string());
                    let ret = self
                        .annotation_text(member.child_by_field_name("return_type"))
                        .unwrap_or_else(|| "void".to_string());
                    members.push(TypeMember {
                        name: self.string_value(name),
                        type_text: format!("{params} => {ret}"),
                        optional: has_token(member, "?"),
                        doc,
                    });
                }
                _ => {}
            }
        }
        members
    }

    /// Text of the type inside a `: T` annotation node.
    fn annotation_text(&self, annotation: Option<Node>) -> Option<String> {
        let annotation = annotation?;
        match first_named(annotation) {
            Some(inner) => Some(self.text(inner).to_string()),
            None => Some(self.text(annotation).trim_start_matches(':').trim().to_string()),
        }
    }

    /// Props type named by a `FC<P>`-style annotation.
    fn component_annotation(&self, annotation: Node) -> Option<TypeRef> {
        if annotation.kind() != "generic_type" {
            return None;
        }
        let name = self.field_text(annotation, "name")?;
        let short = name.rsplit('.').next().unwrap_or(&name);
        if !matches!(short, "FC" | "FunctionComponent" | "VFC" | "ComponentType") {
            return None;
        }
        let args = self.type_arguments(annotation);
        args.first().map(|arg| self.type_ref(*arg, 1))
    }

    fn function_parameters(&self, function: Node) -> ParsedParameters {
        if let Some(params) = function.child_by_field_name("parameters") {
            return self.parameters(params);
        }
        // `x => ...` arrow with a single bare parameter
        match function.child_by_field_name("parameter") {
            Some(param) => ParsedParameters {
                parameters: vec![Parameter {
                    name: self.text(param).to_string(),
                    type_text: None,
                    optional: false,
                    rest: false,
                }],
                first_type: None,
                defaults: Vec::new(),
            },
            None => ParsedParameters::default(),
        }
    }

    /// Parameters of the component wrapped by `forwardRef(...)`, `memo(...)`, etc.
    fn call_parameters(&self, call: Node, depth: usize) -> ParsedParameters {
        if depth > MAX_TYPE_DEPTH {
            return ParsedParameters::default();
        }
        let callee = self.field_text(call, "function").unwrap_or_default();
        let type_args = self.type_arguments(call);

        let mut parsed = ParsedParameters::default();
        if let Some(arguments) = call.child_by_field_name("arguments") {
            for argument in named_children(arguments) {
                if is_function_like(argument) {
                    parsed = self.function_parameters(argument);
                    break;
                }
                if argument.kind() == "call_expression" {
                    parsed = self.call_parameters(argument, depth + 1);
                    break;
                }
            }
        }

        if callee.ends_with("forwardRef") && let Some(props) = type_args.last() {
            parsed.first_type = Some(self.type_ref(*props, 1));
        }
        parsed
    }

    fn parameters(&self, params: Node) -> ParsedParameters {
        let mut parsed = ParsedParameters::default();

        for (index, param) in named_children(params).into_iter().enumerate() {
            if !matches!(param.kind(), "required_parameter" | "optional_parameter") {
                continue;
            }
            let Some(pattern) = param.child_by_field_name("pattern") else {
                continue;
            };
            let type_node = param.child_by_field_name("type").and_then(first_named);
            let has_default = param.child_by_field_name("value").is_some();

            let (name, rest) = match pattern.kind() {
                "this" => continue,
                "identifier" => (self.text(pattern).to_string(), false),
                "rest_pattern" => (
                    first_named(pattern)
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_else(|| "args".to_string()),
                    true,
                ),
                "object_pattern" => {
                    if index == 0 {
                        parsed.defaults = self.pattern_defaults(pattern);
                    }
                    ("props".to_string(), false)
                }
                "array_pattern" => ("items".to_string(), false),
                _ => (self.text(pattern).to_string(), false),
            };

            if parsed.parameters.is_empty() {
                parsed.first_type = type_node.map(|t| self.type_ref(t, 0));
            }
            parsed.parameters.push(Parameter {
                name,
                type_text: type_node.map(|t| self.text(t).to_string()),
                optional: param.kind() == "optional_parameter" || has_default,
                rest,
            });
        }
        parsed
    }

    fn pattern_defaults(&self, pattern: Node) -> Vec<(String, String)> {
        let mut defaults = Vec::new();
        for property in named_children(pattern) {
            match property.kind() {
                "object_assignment_pattern" => {
                    if let (Some(left), Some(right)) = (
                        property.child_by_field_name("left"),
                        property.child_by_field_name("right"),
                    ) {
                        defaults.push((self.text(left).to_string(), self.text(right).to_string()));
                    }
                }
                "pair_pattern" => {
                    let key = property.child_by_field_name("key");
                    let value = property.child_by_field_name("value");
                    if let (Some(key), Some(value)) = (key, value)
                        && value.kind() == "assignment_pattern"
                        && let Some(right) = value.child_by_field_name("right")
                    {
                        defaults.push((self.string_value(key), self.text(right).to_string()));
                    }
                }
                _ => {}
            }
        }
        defaults
    }

    fn finish(self) -> ParsedModule {
        let mut module = ParsedModule {
            imports: self.imports,
            reexports: self.reexports,
            ..ParsedModule::default()
        };
        let mut declaration = Vec::new();

        for item in self.items {
            match item {
                Item::Verbatim(text) => declaration.push(text),
                Item::Value {
                    mut symbol,
                    declare,
                    doc_raw,
                    mode,
                } => {
                    let clause_name = self.clause_exports.get(&symbol.name).cloned();
                    let default_ident = self.default_export.as_deref() == Some(symbol.name.as_str());
                    if mode == ExportMode::None && clause_name.is_none() && !default_ident {
                        continue;
                    }

                    let mut text = doc_raw.map(|d| format!("{d}\n")).unwrap_or_default();
                    match mode {
                        ExportMode::Inline => text.push_str(&format!("export {declare}")),
                        ExportMode::Default => {
                            text.push_str(&format!("{declare}\nexport default {};", symbol.name))
                        }
                        ExportMode::None => text.push_str(&declare),
                    }
                    declaration.push(text);

                    symbol.is_default |= default_ident;
                    if let Some(exported) = clause_name {
                        symbol.name = exported;
                    }
                    module.symbols.push(symbol);
                }
                Item::Type {
                    mut symbol,
                    declaration: mut type_decl,
                    text,
                    doc_raw,
                    mode,
                } => {
                    let clause_name = self.clause_exports.get(&symbol.name).cloned();
                    declaration.push(match doc_raw {
                        Some(doc) => format!("{doc}\n{text}"),
                        None => text,
                    });

                    if mode != ExportMode::None || clause_name.is_some() {
                        type_decl.exported = true;
                        if let Some(exported) = clause_name {
                            symbol.name = exported;
                        }
                        module.symbols.push(symbol);
                    }
                    module.types.push(type_decl);
                }
            }
        }

        if !declaration.is_empty() {
            module.declaration = declaration.join("\n") + "\n";
        }
        module
    }
}

#[derive(Debug, Default)]
struct ParsedParameters {
    parameters: Vec<Parameter>,
    /// Type of the first parameter, used as a component's props.
    first_type: Option<TypeRef>,
    defaults: Vec<(String, String)>,
}

fn classify(name: &str, function_like: bool) -> SymbolKind {
    if function_like && is_hook_name(name) {
        SymbolKind::Hook
    } else if function_like && is_pascal_case(name) {
        SymbolKind::Component
    } else {
        SymbolKind::Util
    }
}

fn render_parameters(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| {
            let ty = p
                .type_text
                .clone()
                .unwrap_or_else(|| if p.rest { "any[]" } else { "any" }.to_string());
            if p.rest {
                format!("...{}: {ty}", p.name)
            } else if p.optional {
                format!("{}?: {ty}", p.name)
            } else {
                format!("{}: {ty}", p.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn infer_literal_type(value: Option<Node>) -> &'static str {
    match value.map(|v| v.kind()) {
        Some("string") | Some("template_string") => "string",
        Some("number") => "number",
        Some("true") | Some("false") => "boolean",
        Some("null") => "null",
        _ => "any",
    }
}
