// ABOUTME: Python strategy: function defs, Flask/FastAPI/Django/DRF routes, imports (§4.A).

use crate::common::{enclosing_declaration_text, file_node, node_text, walk_all};
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, Edge, EdgeType, Metadata, Node, NodeType, RouteMeta};
use once_cell::sync::Lazy;
use regex::Regex;

static FLASK_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\.route\s*\(\s*["']([^"']*)["']"#).unwrap());
static FASTAPI_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(?:app|router)\.(get|post|put|delete|patch|options|head)\s*\(\s*["']([^"']*)["']"#).unwrap()
});
static DJANGO_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bpath\s*\(\s*["']([^"']*)["']"#).unwrap());
static DRF_REGISTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"router\.register\s*\(\s*["']([^"']*)["']\s*,\s*([A-Za-z_][A-Za-z0-9_]*)"#).unwrap()
});
static DRF_VIEWSET_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+([A-Za-z_][A-Za-z0-9_]*)\s*\([^)]*ViewSet[^)]*\)").unwrap());

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    if let Some(tree) = ctx.tree {
        walk_all(tree.root_node(), |node| match node.kind() {
            "function_definition" => {
                if let Some(name) = node.child_by_field_name("name").map(|n| node_text(n, ctx.source).to_string()) {
                    let snippet = enclosing_declaration_text(node, ctx.source).to_string();
                    let id = node_id("function", &name, ctx.file_path, None);
                    result.exports.insert(name.clone(), id.clone());
                    result
                        .nodes
                        .push(Node::new(id, NodeType::Function, name, ctx.file_path, ctx.language.clone()).with_snippet(snippet));
                }
            }
            "class_definition" => {
                if let Some(name) = node.child_by_field_name("name").map(|n| node_text(n, ctx.source).to_string()) {
                    let snippet = enclosing_declaration_text(node, ctx.source).to_string();
                    let id = node_id("class", &name, ctx.file_path, None);
                    result.exports.insert(name.clone(), id.clone());
                    result
                        .nodes
                        .push(Node::new(id, NodeType::Class, name, ctx.file_path, ctx.language.clone()).with_snippet(snippet));
                }
            }
            "import_statement" | "import_from_statement" => {
                if let Some(spec) = python_import_spec(node_text(node, ctx.source)) {
                    result.edges.push(Edge::new(file_id.clone(), spec, EdgeType::Imports));
                }
            }
            _ => {}
        });
    } else {
        return result;
    }

    extract_routes(ctx, &file_id, &mut result);
    result
}

fn python_import_spec(text: &str) -> Option<String> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix("from ") {
        return rest.split_whitespace().next().map(|s| s.to_string());
    }
    if let Some(rest) = text.strip_prefix("import ") {
        return rest.split(',').next().map(|s| s.trim().split_whitespace().next().unwrap_or("").to_string());
    }
    None
}

fn extract_routes(ctx: &AnalysisContext, file_id: &str, result: &mut ExtractionResult) {
    let is_urls_file = ctx.file_path.ends_with("urls.py");

    for caps in FLASK_ROUTE.captures_iter(ctx.source) {
        let start = caps.get(0).unwrap().start();
        emit_route(result, ctx, file_id, &caps[1], "Flask", "ANY", start);
    }
    for caps in FASTAPI_ROUTE.captures_iter(ctx.source) {
        let start = caps.get(0).unwrap().start();
        emit_route(result, ctx, file_id, &caps[2], "FastAPI", &caps[1].to_uppercase(), start);
    }
    if is_urls_file {
        for caps in DJANGO_PATH.captures_iter(ctx.source) {
            let start = caps.get(0).unwrap().start();
            emit_route(result, ctx, file_id, &caps[1], "Django", "ANY", start);
        }
        for caps in DRF_REGISTER.captures_iter(ctx.source) {
            let path = format!("/{}", caps[1].trim_matches('/'));
            let start = caps.get(0).unwrap().start();
            emit_route(result, ctx, file_id, &path, "DRF", "ANY", start);
        }
    }
    for caps in DRF_VIEWSET_CLASS.captures_iter(ctx.source) {
        let path = format!("/{}", caps[1].to_lowercase());
        let start = caps.get(0).unwrap().start();
        emit_route(result, ctx, file_id, &path, "DRF", "ANY", start);
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_route(result: &mut ExtractionResult, ctx: &AnalysisContext, file_id: &str, path: &str, framework: &str, method: &str, start: usize) {
    let id = node_id("apiroute", &format!("{path}:{method}"), ctx.file_path, None);
    let meta = Metadata::Route(RouteMeta {
        framework: framework.to_string(),
        http_method: Some(method.to_string()),
        extra: Default::default(),
    });
    let snippet = crate::common::bounded_snippet(ctx.source, start, 300);
    result.nodes.push(
        Node::new(id.clone(), NodeType::ApiRoute, path.to_string(), ctx.file_path, ctx.language.clone())
            .with_metadata(meta)
            .with_snippet(snippet),
    );
    result.edges.push(Edge::new(file_id.to_string(), id, EdgeType::References));
}
