//! Top-level declaration extraction using tree-sitter AST parsing.
//!
//! Walks a PHP parse tree collecting class-like declarations, free functions
//! and constants, each qualified with the enclosing namespace prefix. The
//! prefix is threaded down the traversal as a parameter, never mutated in
//! place.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Parser};

/// Declarations found in one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub classes: Vec<String>,
    pub functions: Vec<String>,
    pub constants: Vec<String>,
    /// Set when the file calls `define()` with a non-literal name. The
    /// constant cannot be recorded by name, but it still only exists once
    /// the file has run.
    #[serde(default)]
    pub dynamic_defines: bool,
}

impl ParsedFile {
    /// Functions and constants cannot be resolved by the autoloader's
    /// name-keyed class map, so any file declaring them must be loaded
    /// unconditionally.
    pub fn loads_eagerly(&self) -> bool {
        !self.functions.is_empty() || !self.constants.is_empty() || self.dynamic_defines
    }
}

/// Extracts all top-level declarations from PHP source text.
///
/// Returns `None` if tree-sitter cannot produce a tree or the tree contains
/// error nodes; callers treat that as a fatal parse failure for the file.
pub fn extract_declarations(source: &str) -> Option<ParsedFile> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
        .ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }

    let mut parsed = ParsedFile::default();
    walk_statements(&root, "", source.as_bytes(), &mut parsed);
    Some(parsed)
}

/// Walks a statement sequence in which an unbraced `namespace Foo;`
/// rebinds the prefix for everything that follows it.
fn walk_statements(node: &Node, prefix: &str, source: &[u8], out: &mut ParsedFile) {
    let mut prefix = prefix.to_string();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "namespace_definition" {
            let name = child
                .child_by_field_name("name")
                .map(|n| node_text(&n, source).to_string())
                .unwrap_or_default();
            match child.child_by_field_name("body") {
                Some(body) => {
                    let inner = if name.is_empty() {
                        prefix.clone()
                    } else {
                        format!("{prefix}{name}\\")
                    };
                    walk_statements(&body, &inner, source, out);
                }
                None => {
                    prefix = if name.is_empty() {
                        String::new()
                    } else {
                        format!("{name}\\")
                    };
                }
            }
            continue;
        }
        walk_node(&child, &prefix, source, out);
    }
}

fn walk_node(node: &Node, prefix: &str, source: &[u8], out: &mut ParsedFile) {
    match node.kind() {
        "class_declaration"
        | "interface_declaration"
        | "trait_declaration"
        | "enum_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.classes.push(format!("{prefix}{}", node_text(&name, source)));
            }
            // Keep walking method bodies for define() calls, but a `const`
            // directly inside a class body is a class constant, not a free
            // one, and must not make the file eager.
            if let Some(body) = node.child_by_field_name("body") {
                let mut cursor = body.walk();
                for member in body.named_children(&mut cursor) {
                    if member.kind() == "const_declaration" {
                        continue;
                    }
                    walk_node(&member, prefix, source, out);
                }
            }
        }
        "function_definition" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.functions
                    .push(format!("{prefix}{}", node_text(&name, source)));
            }
            if let Some(body) = node.child_by_field_name("body") {
                walk_children(&body, prefix, source, out);
            }
        }
        "const_declaration" => {
            let mut cursor = node.walk();
            for element in node.named_children(&mut cursor) {
                if element.kind() != "const_element" {
                    continue;
                }
                if let Some(name) = element.named_child(0)
                    && name.kind() == "name"
                {
                    out.constants
                        .push(format!("{prefix}{}", node_text(&name, source)));
                }
            }
        }
        "function_call_expression" => {
            if let Some(callee) = node.child_by_field_name("function") {
                let callee = node_text(&callee, source);
                // define() registers a global name exactly as written; no
                // namespace prefix applies.
                if callee == "define" || callee == "\\define" {
                    match define_name(node, source) {
                        Some(name) => out.constants.push(name),
                        None => out.dynamic_defines = true,
                    }
                }
            }
            walk_children(node, prefix, source, out);
        }
        _ => walk_children(node, prefix, source, out),
    }
}

fn walk_children(node: &Node, prefix: &str, source: &[u8], out: &mut ParsedFile) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk_node(&child, prefix, source, out);
    }
}

fn define_name(call: &Node, source: &[u8]) -> Option<String> {
    let args = call.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let first = args
        .named_children(&mut cursor)
        .find(|n| n.kind() == "argument")?;
    string_literal(&first.named_child(0)?, source)
}

/// Returns the value of a string literal node, or `None` for anything
/// dynamic (interpolation, concatenation, non-string expressions).
fn string_literal(node: &Node, source: &[u8]) -> Option<String> {
    if node.kind() != "string" && node.kind() != "encapsed_string" {
        return None;
    }

    let mut value = String::new();
    let mut cursor = node.walk();
    for part in node.named_children(&mut cursor) {
        match part.kind() {
            "string_content" => value.push_str(node_text(&part, source)),
            "escape_sequence" => value.push_str(&decode_escape(node_text(&part, source))),
            _ => return None,
        }
    }

    if value.is_empty() { None } else { Some(value) }
}

fn decode_escape(escape: &str) -> String {
    match escape {
        "\\\\" => "\\".to_string(),
        "\\'" => "'".to_string(),
        "\\\"" => "\"".to_string(),
        "\\n" => "\n".to_string(),
        "\\r" => "\r".to_string(),
        "\\t" => "\t".to_string(),
        "\\0" => "\0".to_string(),
        other => other.to_string(),
    }
}

fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}
