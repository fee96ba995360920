// ABOUTME: Terraform inter-resource linkage (§4.D.g): `depends_on` entries and
// ABOUTME: module `source = "./..."` lines are resolved against the `type.name`
// ABOUTME: / `module.name` export keys every Terraform file contributed.

use super::LinkContext;
use codemapper_core::{Edge, EdgeType, Node};
use std::collections::HashMap;

pub fn link(nodes: &[Node], edges: &mut Vec<Edge>, ctx: &LinkContext) {
    let flat: HashMap<&str, &str> = ctx
        .exports_by_file
        .values()
        .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .collect();

    for call in ctx.calls {
        let Some(qualifier) = &call.qualifier else {
            continue;
        };
        let target = match qualifier.as_str() {
            "depends_on" | "inline_reference" => flat.get(call.raw.as_str()).copied(),
            "module_source" => resolve_module_source(&call.raw, nodes),
            _ => None,
        };
        if let Some(target_id) = target {
            edges.push(Edge::new(call.caller_id.clone(), target_id.to_string(), EdgeType::References));
        }
    }
}

fn resolve_module_source<'a>(source: &str, nodes: &'a [Node]) -> Option<&'a str> {
    let candidate = source.trim_start_matches("./").trim_end_matches('/');
    nodes.iter().find(|n| n.file_path.starts_with(candidate)).map(|n| n.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use codemapper_core::{node_id, CallSite, LanguageTag, NodeType};
    use std::collections::HashMap as Map;

    #[test]
    fn resolves_depends_on_via_the_resource_export_key() {
        let target_id = node_id("tf-resource", "aws_instance.web", "main.tf", None);
        let nodes = vec![Node::new(target_id.clone(), NodeType::File, "aws_instance.web", "main.tf", LanguageTag::Terraform)];
        let mut edges = Vec::new();
        let mut exports: Map<String, Map<String, String>> = Map::new();
        exports.insert("main.tf".to_string(), Map::from([("aws_instance.web".to_string(), target_id.clone())]));
        let calls = vec![CallSite {
            caller_id: "caller".to_string(),
            raw: "aws_instance.web".to_string(),
            qualifier: Some("depends_on".to_string()),
            caller_file: "main.tf".to_string(),
        }];
        let config = AnalysisConfig::default();
        let ctx = LinkContext { root: std::path::Path::new("."), exports_by_file: &exports, calls: &calls, config: &config };

        link(&nodes, &mut edges, &ctx);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target_id, target_id);
    }

    #[test]
    fn resolves_an_inline_type_name_reference() {
        let target_id = node_id("tf-resource", "aws_vpc.main", "main.tf", None);
        let nodes = vec![Node::new(target_id.clone(), NodeType::Component, "aws_vpc.main", "main.tf", LanguageTag::Terraform)];
        let mut edges = Vec::new();
        let mut exports: Map<String, Map<String, String>> = Map::new();
        exports.insert("main.tf".to_string(), Map::from([("aws_vpc.main".to_string(), target_id.clone())]));
        let calls = vec![CallSite {
            caller_id: "aws_instance.web".to_string(),
            raw: "aws_vpc.main".to_string(),
            qualifier: Some("inline_reference".to_string()),
            caller_file: "main.tf".to_string(),
        }];
        let config = AnalysisConfig::default();
        let ctx = LinkContext { root: std::path::Path::new("."), exports_by_file: &exports, calls: &calls, config: &config };

        link(&nodes, &mut edges, &ctx);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target_id, target_id);
    }
}
