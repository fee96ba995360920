// ABOUTME: Helpers shared by every per-language strategy module.

use crate::extraction::AnalysisContext;
use codemapper_core::{file_node_id, LanguageTag, Node, NodeType};

pub fn basename(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Every strategy MUST emit a File node for the analyzed path (§4.A).
pub fn file_node(ctx: &AnalysisContext) -> Node {
    Node::new(
        file_node_id(ctx.file_path),
        NodeType::File,
        basename(ctx.file_path),
        ctx.file_path.to_string(),
        ctx.language.clone(),
    )
}

/// Derive the "enclosing declaration" snippet by walking up from `node`
/// until the next parent would be the tree root (the open question in §9,
/// resolved uniformly across languages rather than per-language depth).
pub fn enclosing_declaration_text<'a>(node: tree_sitter::Node<'a>, source: &'a str) -> &'a str {
    let mut current = node;
    loop {
        match current.parent() {
            Some(parent) if parent.parent().is_some() => {
                current = parent;
            }
            _ => break,
        }
    }
    current.utf8_text(source.as_bytes()).unwrap_or("")
}

pub fn node_text<'a>(node: tree_sitter::Node<'a>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// A bounded window of `source` starting at byte offset `start`, snapped to a
/// char boundary, for route-emitting strategies that only have a regex match
/// position (no tree-sitter node) to hang a code snippet off of.
pub fn bounded_snippet(source: &str, start: usize, max_len: usize) -> String {
    let start = start.min(source.len());
    let mut end = (start + max_len).min(source.len());
    while end > start && !source.is_char_boundary(end) {
        end -= 1;
    }
    source[start..end].to_string()
}

/// First child of `node` matching any of `kinds`, text-extracted.
pub fn child_text_by_kinds(node: tree_sitter::Node, source: &str, kinds: &[&str]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if kinds.contains(&child.kind()) {
            return Some(node_text(child, source).to_string());
        }
    }
    None
}

/// Route param normalization shared by the interaction analyzer's API_CALL
/// matcher (":name" / "{name}" -> "[^/]+") lives in codemapper-analysis, not
/// here -- strategies only need to record the raw route label.
pub fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

pub fn language_is_react_flavoured(ctx: &AnalysisContext) -> bool {
    if ctx.file_path.ends_with(".tsx") || ctx.file_path.ends_with(".jsx") {
        return true;
    }
    let src = ctx.source;
    src.contains("from \"react\"")
        || src.contains("from 'react'")
        || src.contains("require(\"react\")")
        || src.contains("require('react')")
        || src.contains("@react")
        || src.contains("react-")
}

/// Walks a full tree-sitter tree top-down, yielding every node. Used by
/// strategies that collect multiple declaration kinds in one pass.
pub fn walk_all<'a>(root: tree_sitter::Node<'a>, mut visit: impl FnMut(tree_sitter::Node<'a>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}
