// ABOUTME: JSON strategy (§4.A): OpenAPI/Swagger specs get a synthetic node per
// ABOUTME: path+method pair; every other JSON file only gets a File node.

use crate::common::file_node;
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, Edge, EdgeType, Node, NodeType, OpenApiMeta};
use serde_json::Value;

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    let Ok(parsed) = serde_json::from_str::<Value>(ctx.source) else {
        return result;
    };

    let is_openapi = parsed.get("openapi").is_some() || parsed.get("swagger").is_some();
    if !is_openapi {
        return result;
    }

    let Some(paths) = parsed.get("paths").and_then(Value::as_object) else {
        return result;
    };

    for (path, methods) in paths {
        let Some(methods) = methods.as_object() else {
            continue;
        };
        for method in methods.keys() {
            let upper = method.to_uppercase();
            if !matches!(upper.as_str(), "GET" | "POST" | "PUT" | "DELETE" | "PATCH" | "OPTIONS" | "HEAD") {
                continue;
            }
            let meta = OpenApiMeta {
                path: path.clone(),
                http_method: upper.clone(),
                extra: Default::default(),
            };
            let id = node_id("apiroute", &format!("{path}:{upper}"), ctx.file_path, None);
            result.nodes.push(
                Node::new(id.clone(), NodeType::ApiRoute, path.clone(), ctx.file_path, ctx.language.clone())
                    .with_metadata(codemapper_core::Metadata::OpenApi(meta)),
            );
            result.edges.push(Edge::new(file_id.clone(), id, EdgeType::References));
        }
    }

    result
}
