use rowan::TextRange;

use crate::syntax::ast::{self, AstNode};
use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::kind::SyntaxKind;

use super::types::{SymbolEntry, SymbolKind};

/// Collect the file-level declarations of a translation unit.
///
/// Function bodies are not entered, so locals never reach the index.
pub(crate) fn build_symbols(root: &SyntaxNode) -> Vec<SymbolEntry> {
    let mut symbols = Vec::new();
    visit_items(root.children(), None, &mut symbols);
    symbols
}

fn visit_items(
    items: impl Iterator<Item = SyntaxNode>,
    container: Option<&str>,
    out: &mut Vec<SymbolEntry>,
) {
    for item in items {
        visit_item(&item, container, out);
    }
}

fn visit_item(
    node: &SyntaxNode,
    container: Option<&str>,
    out: &mut Vec<SymbolEntry>,
) {
    match node.kind() {
        SyntaxKind::FunctionDef => {
            let Some(func) = ast::FunctionDef::cast(node.clone()) else {
                return;
            };
            let Some(name) = func.name_token() else {
                return;
            };
            let qualifier = func.qualifier();
            let container = match (container, qualifier.as_deref()) {
                (Some(outer), Some(inner)) => Some(format!("{outer}::{inner}")),
                (Some(outer), None) => Some(outer.to_string()),
                (None, inner) => inner.map(str::to_string),
            };
            out.push(SymbolEntry {
                name: name.text().to_string(),
                kind: SymbolKind::Function,
                name_range: name.text_range(),
                full_range: node.text_range(),
                container,
                is_declaration: func.is_declaration_only(),
            });
        },
        SyntaxKind::StructDef | SyntaxKind::ClassDef => {
            let kind = match node.kind() {
                SyntaxKind::ClassDef => SymbolKind::Class,
                _ if ast::StructDef::cast(node.clone()).is_some_and(|def| def.is_union()) => {
                    SymbolKind::Union
                },
                _ => SymbolKind::Struct,
            };
            let has_body = node
                .children()
                .any(|child| child.kind() == SyntaxKind::FieldList);
            let name = tag_name(node);
            if let Some(name) = &name {
                push(out, name, kind, node.text_range(), container, !has_body);
            }
            let Some(name) = name else {
                return;
            };
            let nested = join(container, name.text());
            for list in node.children().filter(|child| child.kind() == SyntaxKind::FieldList) {
                for member in list.children() {
                    visit_member(&member, &nested, out);
                }
            }
        },
        SyntaxKind::EnumDef => {
            let Some(def) = ast::EnumDef::cast(node.clone()) else {
                return;
            };
            let name = tag_name(node);
            if let Some(name) = &name {
                let has_body = node
                    .children()
                    .any(|child| child.kind() == SyntaxKind::EnumeratorList);
                push(out, name, SymbolKind::Enum, node.text_range(), container, !has_body);
            }
            // Unscoped enumerators live in the enclosing scope.
            let enumerator_scope = match (&name, def.is_scoped()) {
                (Some(name), true) => Some(join(container, name.text())),
                _ => container.map(str::to_string),
            };
            for enumerator in def.enumerators() {
                if let Some(token) = enumerator.name_token() {
                    push(
                        out,
                        &token,
                        SymbolKind::Enumerator,
                        enumerator.syntax().text_range(),
                        enumerator_scope.as_deref(),
                        false,
                    );
                }
            }
        },
        SyntaxKind::NamespaceDef => {
            let Some(def) = ast::NamespaceDef::cast(node.clone()) else {
                return;
            };
            match def.name_token() {
                Some(name) => {
                    push(out, &name, SymbolKind::Namespace, node.text_range(), container, false);
                    let nested = join(container, name.text());
                    visit_items(def.items(), Some(&nested), out);
                },
                None => visit_items(def.items(), container, out),
            }
        },
        SyntaxKind::LinkageSpec => {
            for child in node.children() {
                if child.kind() == SyntaxKind::ItemList {
                    visit_items(child.children(), container, out);
                } else {
                    visit_item(&child, container, out);
                }
            }
        },
        SyntaxKind::TemplateDef => {
            for child in node.children() {
                if child.kind() != SyntaxKind::TemplateParameterList {
                    visit_item(&child, container, out);
                }
            }
        },
        SyntaxKind::TypedefDef => {
            for child in node.children() {
                visit_item(&child, container, out);
            }
            if let Some(name) = last_direct_ident(node) {
                push(out, &name, SymbolKind::Typedef, node.text_range(), container, false);
            }
        },
        SyntaxKind::UsingDef => {
            // Only alias declarations introduce a name: `using Id = int;`
            let tokens: Vec<SyntaxToken> = direct_significant_tokens(node).collect();
            if let [_, name, eq, ..] = tokens.as_slice()
                && name.kind() == SyntaxKind::Ident
                && eq.kind() == SyntaxKind::Equal
            {
                push(out, name, SymbolKind::Typedef, node.text_range(), container, false);
            }
        },
        SyntaxKind::PreprocDefine => {
            if let Some(name) = ast::PreprocDefine::cast(node.clone()).and_then(|def| def.name_token()) {
                push(out, &name, SymbolKind::Macro, node.text_range(), None, false);
            }
        },
        SyntaxKind::VariableDef => {
            let is_extern = node
                .children()
                .find(|child| child.kind() == SyntaxKind::TypeRef)
                .is_some_and(|ty| {
                    ty.children_with_tokens()
                        .any(|element| element.kind() == SyntaxKind::KwExtern)
                });
            let Some(def) = ast::VariableDef::cast(node.clone()) else {
                return;
            };
            for name in def.names() {
                push(out, &name, SymbolKind::Variable, node.text_range(), container, is_extern);
            }
        },
        _ => {},
    }
}

fn visit_member(
    node: &SyntaxNode,
    container: &str,
    out: &mut Vec<SymbolEntry>,
) {
    match node.kind() {
        SyntaxKind::FieldDef => {
            let Some(def) = ast::FieldDef::cast(node.clone()) else {
                return;
            };
            for name in def.names() {
                push(out, &name, SymbolKind::Field, node.text_range(), Some(container), false);
            }
        },
        _ => visit_item(node, Some(container), out),
    }
}

fn push(
    out: &mut Vec<SymbolEntry>,
    name: &SyntaxToken,
    kind: SymbolKind,
    full_range: TextRange,
    container: Option<&str>,
    is_declaration: bool,
) {
    out.push(SymbolEntry {
        name: name.text().to_string(),
        kind,
        name_range: name.text_range(),
        full_range,
        container: container.map(str::to_string),
        is_declaration,
    });
}

fn join(
    container: Option<&str>,
    name: &str,
) -> String {
    match container {
        Some(container) => format!("{container}::{name}"),
        None => name.to_string(),
    }
}

fn direct_significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
}

/// Name right after `struct`, `class`, `union`, `enum` or `enum class`; `None` when anonymous.
fn tag_name(node: &SyntaxNode) -> Option<SyntaxToken> {
    direct_significant_tokens(node)
        .find(|token| !token.kind().is_keyword())
        .filter(|token| token.kind() == SyntaxKind::Ident)
}

fn last_direct_ident(node: &SyntaxNode) -> Option<SyntaxToken> {
    direct_significant_tokens(node)
        .filter(|token| token.kind() == SyntaxKind::Ident)
        .last()
}

#[cfg(test)]
#[path = "../../tests/src/symbols/scanner_tests.rs"]
mod tests;
