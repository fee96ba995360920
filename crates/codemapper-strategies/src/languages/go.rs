// ABOUTME: Go strategy: functions/methods/structs/interfaces, Gin/Echo/Fiber/Chi routes,
// ABOUTME: http.ResponseWriter handlers, quoted-import IMPORTS edges (§4.A).

use crate::common::{enclosing_declaration_text, file_node, node_text, walk_all};
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, Edge, EdgeType, Metadata, Node, NodeType, RouteMeta};
use once_cell::sync::Lazy;
use regex::Regex;

static ROUTER_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b\w+\.(GET|POST|PUT|DELETE|PATCH|Get|Post|Put|Delete|Patch)\s*\(\s*"([^"]*)""#).unwrap()
});
static IMPORT_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    let Some(tree) = ctx.tree else {
        return result;
    };

    walk_all(tree.root_node(), |node| match node.kind() {
        "function_declaration" => {
            if let Some(name) = node.child_by_field_name("name").map(|n| node_text(n, ctx.source).to_string()) {
                push_node(&mut result, ctx, node, &name, NodeType::Function);
                let handler_text = node_text(node, ctx.source);
                if handler_text.contains("http.ResponseWriter") {
                    emit_handler_route(&mut result, ctx, &file_id, &name, handler_text);
                }
            }
        }
        "method_declaration" => {
            if let Some(name) = node.child_by_field_name("name").map(|n| node_text(n, ctx.source).to_string()) {
                push_node(&mut result, ctx, node, &name, NodeType::Function);
            }
        }
        "type_spec" => {
            if let Some(name) = node.child_by_field_name("name").map(|n| node_text(n, ctx.source).to_string()) {
                if let Some(type_node) = node.child_by_field_name("type") {
                    let node_type = match type_node.kind() {
                        "struct_type" => Some(NodeType::Class),
                        "interface_type" => Some(NodeType::Class),
                        _ => None,
                    };
                    if let Some(nt) = node_type {
                        push_node(&mut result, ctx, node, &name, nt);
                    }
                }
            }
        }
        "import_spec" => {
            let text = node_text(node, ctx.source);
            if let Some(caps) = IMPORT_PATH.captures(text) {
                result.edges.push(Edge::new(file_id.clone(), caps[1].to_string(), EdgeType::Imports));
            }
        }
        _ => {}
    });

    for caps in ROUTER_ROUTE.captures_iter(ctx.source) {
        let method = caps[1].to_uppercase();
        let path = caps[2].to_string();
        let id = node_id("apiroute", &format!("{path}:{method}"), ctx.file_path, None);
        let meta = Metadata::Route(RouteMeta {
            framework: "Gin/Echo/Fiber/Chi".into(),
            http_method: Some(method),
            extra: Default::default(),
        });
        let snippet = crate::common::bounded_snippet(ctx.source, caps.get(0).unwrap().start(), 300);
        result.nodes.push(
            Node::new(id.clone(), NodeType::ApiRoute, path, ctx.file_path, ctx.language.clone())
                .with_metadata(meta)
                .with_snippet(snippet),
        );
        result.edges.push(Edge::new(file_id.clone(), id, EdgeType::References));
    }

    result
}

fn push_node(result: &mut ExtractionResult, ctx: &AnalysisContext, node: tree_sitter::Node, name: &str, node_type: NodeType) {
    let snippet = enclosing_declaration_text(node, ctx.source).to_string();
    let kind_key = match node_type {
        NodeType::Function => "function",
        NodeType::Class => "class",
        _ => "node",
    };
    let id = node_id(kind_key, name, ctx.file_path, None);
    result.exports.insert(name.to_string(), id.clone());
    result
        .nodes
        .push(Node::new(id, node_type, name.to_string(), ctx.file_path, ctx.language.clone()).with_snippet(snippet));
}

fn emit_handler_route(result: &mut ExtractionResult, ctx: &AnalysisContext, file_id: &str, handler_name: &str, handler_text: &str) {
    let path = format!("/{}", handler_name.to_lowercase());
    let id = node_id("apiroute", &format!("{path}:ANY"), ctx.file_path, None);
    let meta = Metadata::Route(RouteMeta {
        framework: "net/http".into(),
        http_method: Some("ANY".into()),
        extra: Default::default(),
    });
    result.nodes.push(
        Node::new(id.clone(), NodeType::ApiRoute, path, ctx.file_path, ctx.language.clone())
            .with_metadata(meta)
            .with_snippet(handler_text.to_string()),
    );
    result.edges.push(Edge::new(file_id.to_string(), id, EdgeType::References));
}
