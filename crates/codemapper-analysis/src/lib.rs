// ABOUTME: Entry point for the interaction analyzer and code quality analyzer
// ABOUTME: (§4.C steps 4-6): turns a parser RawCodeMap into the final CodeMap.

pub mod config;
pub mod interactions;
pub mod quality;

pub use config::{AnalysisConfig, InteractionRule};

use codemapper_core::{CodeMap, Edge, Node, NodeType};
use codemapper_parser::RawCodeMap;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Runs every interaction-analyzer pass (§4.D a-h) over `raw`, deduplicates
/// APIRoute nodes, sorts the final node/edge lists deterministically, then
/// computes the code quality statistics (§4.E) over the finalized graph.
pub fn finalize(raw: RawCodeMap, root: &Path, config: &AnalysisConfig) -> CodeMap {
    let RawCodeMap {
        mut nodes,
        mut edges,
        exports_by_file,
        calls,
        degraded_files,
        commit,
    } = raw;

    let ctx = interactions::LinkContext {
        root,
        exports_by_file: &exports_by_file,
        calls: &calls,
        config,
    };

    interactions::imports::resolve(&nodes, &mut edges, &ctx);
    interactions::api_call::synthesize(&mut nodes, &mut edges, &ctx);
    interactions::db::link_generic(&mut nodes, &mut edges);
    interactions::orm::link(&mut nodes, &mut edges);
    interactions::k8s::link(&nodes, &mut edges);
    interactions::helm_kustomize::link_kustomize(&nodes, &mut edges, &ctx);
    interactions::helm_kustomize::link_helm(&nodes, &mut edges);
    interactions::terraform::link(&nodes, &mut edges, &ctx);
    interactions::graphql::link(&mut nodes, &mut edges);

    dedupe_api_routes(&mut nodes, &mut edges);

    nodes.sort_by(|a, b| (a.node_type as u8, &a.file_path, &a.label).cmp(&(b.node_type as u8, &b.file_path, &b.label)));
    edges.sort_by(|a, b| (a.edge_type as u8, &a.source_id, &a.target_id).cmp(&(b.edge_type as u8, &b.source_id, &b.target_id)));

    if degraded_files > 0 {
        info!("{degraded_files} file(s) were degraded during extraction");
    }

    let statistics = quality::compute(&nodes, &edges);

    CodeMap {
        version: "1.0".to_string(),
        generated_at: chrono::Utc::now(),
        generator: format!("codemapper/{}", env!("CARGO_PKG_VERSION")),
        commit,
        nodes,
        edges,
        statistics,
    }
}

/// Resolves the I2/scenario-6 contradiction: two APIRoute nodes sharing a
/// `(filePath, label)` pair but distinguished by http method (a Next.js App
/// Router `route.ts` exporting both `GET` and `POST`) must both survive, so
/// the effective dedup key used here is `(filePath, label, httpMethod)`
/// rather than the `(filePath, label)` pair the invariant names in isolation
/// -- see DESIGN.md for the full writeup.
fn dedupe_api_routes(nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) {
    let mut survivors: HashMap<(String, String, String), String> = HashMap::new();
    let mut replaced: HashMap<String, String> = HashMap::new();
    let mut kept = Vec::with_capacity(nodes.len());

    for node in nodes.drain(..) {
        if node.node_type != NodeType::ApiRoute {
            kept.push(node);
            continue;
        }
        let method = node
            .metadata
            .as_ref()
            .and_then(|m| m.route())
            .and_then(|r| r.http_method.clone())
            .unwrap_or_else(|| "ANY".to_string());
        let key = (node.file_path.clone(), node.label.clone(), method);
        match survivors.get(&key) {
            Some(existing_id) => {
                replaced.insert(node.id.clone(), existing_id.clone());
            }
            None => {
                survivors.insert(key, node.id.clone());
                kept.push(node);
            }
        }
    }
    *nodes = kept;

    if replaced.is_empty() {
        return;
    }
    for edge in edges.iter_mut() {
        if let Some(canonical) = replaced.get(&edge.target_id) {
            edge.target_id = canonical.clone();
        }
        if let Some(canonical) = replaced.get(&edge.source_id) {
            edge.source_id = canonical.clone();
        }
    }
    edges.retain(|e| e.source_id != e.target_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::{node_id, Edge, EdgeType, Metadata, NodeType, RouteMeta};

    fn route(file: &str, label: &str, method: &str) -> Node {
        let id = node_id("apiroute", &format!("{label}:{method}"), file, None);
        Node::new(id, NodeType::ApiRoute, label, file, codemapper_core::LanguageTag::TypeScript).with_metadata(
            Metadata::Route(RouteMeta { framework: "Next.js".into(), http_method: Some(method.into()), extra: Default::default() }),
        )
    }

    #[test]
    fn dedup_keeps_distinct_http_methods_on_the_same_route() {
        let mut nodes = vec![route("app/api/users/route.ts", "/users", "GET"), route("app/api/users/route.ts", "/users", "POST")];
        let mut edges: Vec<Edge> = Vec::new();
        dedupe_api_routes(&mut nodes, &mut edges);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn dedup_merges_true_duplicates() {
        let a = route("app/api/users/route.ts", "/users", "GET");
        let b = route("app/api/users/route.ts", "/users", "GET");
        let dup_id = b.id.clone();
        let mut nodes = vec![a, b];
        let mut edges = vec![Edge::new("caller", dup_id, EdgeType::References)];
        dedupe_api_routes(&mut nodes, &mut edges);
        assert_eq!(nodes.len(), 1);
        assert_eq!(edges[0].target_id, nodes[0].id);
    }
}
