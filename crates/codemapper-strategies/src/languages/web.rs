// ABOUTME: CSS/HTML strategy (§4.A). CSS selectors are recorded even when
// ABOUTME: duplicated within a file (§9 open question, resolved: keep duplicates).

use crate::common::file_node;
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, Edge, EdgeType, LanguageTag, Node, NodeType};
use once_cell::sync::Lazy;
use regex::Regex;

static CSS_SELECTOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*([.#][\w\-]+(?:[ ,>+~.#:\w\-\[\]="'()]*)?)\s*\{").unwrap());
static HTML_SCRIPT_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<script[^>]*\ssrc\s*=\s*["']([^"']+)["']"#).unwrap());
static HTML_LINK_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<link[^>]*\shref\s*=\s*["']([^"']+\.css)["']"#).unwrap());

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    match ctx.language {
        LanguageTag::Css => extract_css_selectors(ctx, &file_id, &mut result),
        LanguageTag::Html => extract_html_references(ctx, &file_id, &mut result),
        _ => {}
    }

    result
}

fn extract_css_selectors(ctx: &AnalysisContext, file_id: &str, result: &mut ExtractionResult) {
    for (offset, caps) in CSS_SELECTOR.captures_iter(ctx.source).enumerate() {
        let selector = caps[1].trim().to_string();
        if selector.is_empty() {
            continue;
        }
        // Offset-qualified id: the same selector repeated in one file is kept,
        // not deduplicated, so each occurrence needs a distinct node id.
        let id = node_id("css-selector", &selector, ctx.file_path, Some(offset as u64));
        result.nodes.push(Node::new(id.clone(), NodeType::Class, selector, ctx.file_path, ctx.language.clone()));
        result.edges.push(Edge::new(file_id.to_string(), id, EdgeType::References));
    }
}

fn extract_html_references(ctx: &AnalysisContext, file_id: &str, result: &mut ExtractionResult) {
    for caps in HTML_SCRIPT_SRC.captures_iter(ctx.source) {
        result.edges.push(Edge::new(file_id.to_string(), caps[1].to_string(), EdgeType::Imports));
    }
    for caps in HTML_LINK_HREF.captures_iter(ctx.source) {
        result.edges.push(Edge::new(file_id.to_string(), caps[1].to_string(), EdgeType::Imports));
    }
}
