// ABOUTME: TypeScript/JavaScript strategy: functions/classes/components, Express/NestJS/Next.js
// ABOUTME: route extraction, imports, and a best-effort exports/call-site map (§4.A).

use crate::common::{enclosing_declaration_text, file_node, language_is_react_flavoured, node_text, walk_all};
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, CallSite, Edge, EdgeType, Metadata, MetadataValue, Node, NodeType, RouteMeta};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static EXPRESS_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(?:app|router)\.(get|post|put|delete|patch|options|head)\s*\(\s*[`'"]([^`'"]*)[`'"]"#).unwrap()
});
static NEST_CONTROLLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@Controller\s*\(\s*[`'"]?([^`'")]*)[`'"]?\s*\)"#).unwrap());
static NEST_VERB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@(Get|Post|Put|Delete|Patch|Options|Head)\s*\(\s*[`'"]?([^`'")]*)[`'"]?\s*\)"#).unwrap());
static NEXT_METHOD_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"export\s+(?:async\s+)?function\s+(GET|POST|PUT|DELETE|PATCH|OPTIONS|HEAD)\b"#).unwrap()
});
static IMPORT_SPEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:import\s+[^;'"]*from\s*|import\s*|require\s*\(\s*)[`'"]([^`'"]+)[`'"]"#).unwrap()
});
static HOOK_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^use[A-Z]").unwrap());

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    let Some(tree) = ctx.tree else {
        return result;
    };

    let react_flavoured = language_is_react_flavoured(ctx);
    let root = tree.root_node();

    walk_all(root, |node| match node.kind() {
        "function_declaration" => {
            if let Some(name) = function_name(node, ctx.source) {
                push_function_or_component(&mut result, ctx, node, &name, react_flavoured, false, &file_id);
            }
        }
        "class_declaration" => {
            if let Some(name) = class_name(node, ctx.source) {
                let is_component = react_flavoured
                    && name.chars().next().is_some_and(|c| c.is_uppercase())
                    && extends_react_component(node, ctx.source);
                let node_type = if is_component { NodeType::Component } else { NodeType::Class };
                let snippet = enclosing_declaration_text(node, ctx.source);
                let id = node_id(&kind_key(node_type), &name, ctx.file_path, None);
                result.exports.insert(name.clone(), id.clone());
                result
                    .nodes
                    .push(Node::new(id, node_type, name, ctx.file_path, ctx.language.clone()).with_snippet(snippet));
            }
        }
        "variable_declarator" if is_arrow_or_function_value(node) => {
            if let Some(name) = child_identifier(node, ctx.source) {
                let is_hook = HOOK_NAME.is_match(&name);
                push_function_or_component(&mut result, ctx, node, &name, react_flavoured, is_hook, &file_id);
            }
        }
        "import_statement" => {
            let text = node_text(node, ctx.source);
            if let Some(caps) = IMPORT_SPEC.captures(text) {
                result.edges.push(Edge::new(file_id.clone(), caps[1].to_string(), EdgeType::Imports));
            }
        }
        "call_expression" => {
            if let Some(raw) = node_text(node, ctx.source).get(..120.min(node_text(node, ctx.source).len())) {
                result.calls.push(CallSite {
                    caller_id: file_id.clone(),
                    raw: raw.to_string(),
                    qualifier: None,
                    caller_file: ctx.file_path.to_string(),
                });
            }
        }
        _ => {}
    });

    extract_routes(ctx, &file_id, &mut result);
    result
}

fn kind_key(node_type: NodeType) -> String {
    match node_type {
        NodeType::Function => "function".into(),
        NodeType::Class => "class".into(),
        NodeType::Component => "component".into(),
        _ => "node".into(),
    }
}

fn push_function_or_component(
    result: &mut ExtractionResult,
    ctx: &AnalysisContext,
    node: tree_sitter::Node,
    name: &str,
    react_flavoured: bool,
    is_hook: bool,
    _file_id: &str,
) {
    let snippet = enclosing_declaration_text(node, ctx.source).to_string();
    let is_component = react_flavoured
        && name.chars().next().is_some_and(|c| c.is_uppercase())
        && (snippet.contains("return <") || snippet.contains("jsx") || snippet.contains("createElement"));
    let node_type = if is_component { NodeType::Component } else { NodeType::Function };
    let id = node_id(&kind_key(node_type), name, ctx.file_path, None);
    result.exports.insert(name.to_string(), id.clone());
    let mut built = Node::new(id, node_type, name.to_string(), ctx.file_path, ctx.language.clone()).with_snippet(snippet);
    if is_hook {
        let mut extra = BTreeMap::new();
        extra.insert("isHook".to_string(), MetadataValue::Scalar("true".to_string()));
        built = built.with_metadata(Metadata::Generic(extra));
    }
    result.nodes.push(built);
}

fn function_name(node: tree_sitter::Node, source: &str) -> Option<String> {
    node.child_by_field_name("name").map(|n| node_text(n, source).to_string())
}

fn class_name(node: tree_sitter::Node, source: &str) -> Option<String> {
    node.child_by_field_name("name").map(|n| node_text(n, source).to_string())
}

fn child_identifier(node: tree_sitter::Node, source: &str) -> Option<String> {
    node.child_by_field_name("name").map(|n| node_text(n, source).to_string())
}

fn is_arrow_or_function_value(node: tree_sitter::Node) -> bool {
    node.child_by_field_name("value")
        .map(|v| matches!(v.kind(), "arrow_function" | "function" | "function_expression"))
        .unwrap_or(false)
}

fn extends_react_component(node: tree_sitter::Node, source: &str) -> bool {
    let text = node_text(node, source);
    text.contains("extends React.Component") || text.contains("extends Component")
}

fn extract_routes(ctx: &AnalysisContext, file_id: &str, result: &mut ExtractionResult) {
    // Express
    for caps in EXPRESS_ROUTE.captures_iter(ctx.source) {
        let method = caps[1].to_uppercase();
        let path = caps[2].to_string();
        let start = caps.get(0).unwrap().start();
        emit_route(result, ctx, file_id, &path, "Express", &method, start);
    }

    // NestJS: controller base + verb-decorated handlers within the same class body.
    if let Some(controller) = NEST_CONTROLLER.captures(ctx.source) {
        let base = controller[1].trim_matches('/').to_string();
        for caps in NEST_VERB.captures_iter(ctx.source) {
            let method = caps[1].to_uppercase();
            let sub = caps[2].trim_matches('/');
            let path = if sub.is_empty() {
                format!("/{base}")
            } else {
                format!("/{base}/{sub}")
            };
            let start = caps.get(0).unwrap().start();
            emit_route(result, ctx, file_id, &path, "NestJS", &method, start);
        }
    }

    // Next.js pages/api/*
    if ctx.file_path.contains("pages/api/") {
        let after = ctx.file_path.splitn(2, "pages/api/").nth(1).unwrap_or("");
        let trimmed = after.trim_end_matches(".ts").trim_end_matches(".tsx").trim_end_matches(".js").trim_end_matches(".jsx");
        let trimmed = trimmed.trim_end_matches("/index");
        let path = format!("/api/{trimmed}");
        emit_route(result, ctx, file_id, &path, "Next.js", "ANY", 0);
    }

    // Next.js app router: app/api/**/route.ts exporting HTTP method handlers.
    if ctx.file_path.contains("app/api/")
        && (ctx.file_path.ends_with("route.ts")
            || ctx.file_path.ends_with("route.tsx")
            || ctx.file_path.ends_with("route.js")
            || ctx.file_path.ends_with("route.jsx"))
    {
        if let Some(after) = ctx.file_path.splitn(2, "app/api/").nth(1) {
            let dir = after.rsplitn(2, '/').nth(1).unwrap_or("");
            let path = format!("/{dir}");
            for caps in NEXT_METHOD_EXPORT.captures_iter(ctx.source) {
                let start = caps.get(0).unwrap().start();
                emit_route(result, ctx, file_id, &path, "Next.js", &caps[1], start);
            }
        }
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
