// ABOUTME: Java strategy: methods/classes/interfaces, Spring REST endpoints, imports (§4.A).

use crate::common::{enclosing_declaration_text, file_node, node_text, walk_all};
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, Edge, EdgeType, Metadata, Node, NodeType, RouteMeta};
use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT_STMT: Lazy<Regex> = Lazy::new(|| Regex::new(r"import\s+(?:static\s+)?([\w.]+)\s*;").unwrap());
static MAPPING_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@(RequestMapping|GetMapping|PostMapping|PutMapping|DeleteMapping|PatchMapping)\s*\(\s*(?:value\s*=\s*)?["']([^"']*)["']"#).unwrap()
});

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    let Some(tree) = ctx.tree else {
        return result;
    };

    walk_all(tree.root_node(), |node| match node.kind() {
        "method_declaration" => {
            if let Some(name) = node.child_by_field_name("name").map(|n| node_text(n, ctx.source).to_string()) {
                push_node(&mut result, ctx, node, &name, NodeType::Function);
            }
        }
        "class_declaration" => {
            if let Some(name) = node.child_by_field_name("name").map(|n| node_text(n, ctx.source).to_string()) {
                push_node(&mut result, ctx, node, &name, NodeType::Class);
            }
        }
        "interface_declaration" => {
            if let Some(name) = node.child_by_field_name("name").map(|n| node_text(n, ctx.source).to_string()) {
                push_node(&mut result, ctx, node, &name, NodeType::Class);
            }
        }
        "import_declaration" => {
            let text = node_text(node, ctx.source);
            if let Some(caps) = IMPORT_STMT.captures(text) {
                result.edges.push(Edge::new(file_id.clone(), caps[1].to_string(), EdgeType::Imports));
            }
        }
        _ => {}
    });

    for caps in MAPPING_ANNOTATION.captures_iter(ctx.source) {
        let method = match &caps[1] {
            "RequestMapping" => "ANY",
            "GetMapping" => "GET",
            "PostMapping" => "POST",
            "PutMapping" => "PUT",
            "DeleteMapping" => "DELETE",
            "PatchMapping" => "PATCH",
            _ => "ANY",
        };
        let path = format!("/{}", caps[2].trim_matches('/'));
        let id = node_id("apiroute", &format!("{path}:{method}"), ctx.file_path, None);
        let meta = Metadata::Route(RouteMeta {
            framework: "Spring".into(),
            http_method: Some(method.to_string()),
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
