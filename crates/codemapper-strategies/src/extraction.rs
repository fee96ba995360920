// ABOUTME: The per-file result shape a strategy returns (§4.A): partial
// ABOUTME: nodes/edges plus an export map and a best-effort call-site list.

use codemapper_core::{CallSite, Edge, Node};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// name -> node id, populated by TS/JS strategies for later import resolution.
    pub exports: HashMap<String, String>,
    pub calls: Vec<CallSite>,
}

impl ExtractionResult {
    pub fn merge(&mut self, other: ExtractionResult) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
        self.exports.extend(other.exports);
        self.calls.extend(other.calls);
    }
}

/// Context a strategy analyzes. `tree` is `None` for languages with no
/// tree-sitter grammar in this workspace and for a real grammar that failed
/// to parse the file -- the fallback path in both cases is identical: the
/// strategy only sees `source`.
pub struct AnalysisContext<'a> {
    pub file_path: &'a str,
    pub language: codemapper_core::LanguageTag,
    pub source: &'a str,
    pub tree: Option<&'a tree_sitter::Tree>,
}
