// ABOUTME: Helm and Kustomize linkage (§4.D.f). Kustomize `resources:` entries
// ABOUTME: resolve against sibling files, trying the bare name, `.yaml`/`.yml`
// ABOUTME: suffixes, and a `deployment.yaml` inside a referenced directory in
// ABOUTME: that order. Helm Chart nodes reference every template-doc node and
// ABOUTME: every values.yaml node sharing their chart root.

use super::LinkContext;
use codemapper_core::{Edge, EdgeType, Node, NodeType};
use std::collections::HashMap;

pub fn link_kustomize(nodes: &[Node], edges: &mut Vec<Edge>, ctx: &LinkContext) {
    let file_by_path: HashMap<&str, &str> = nodes
        .iter()
        .filter(|n| n.node_type == NodeType::File)
        .map(|n| (n.file_path.as_str(), n.id.as_str()))
        .collect();

    for node in nodes {
        let Some(kustomize) = node.metadata.as_ref().and_then(|m| m.kustomize()) else {
            continue;
        };
        let dir = node.file_path.rsplit_once('/').map(|(d, _)| d).unwrap_or("");
        for resource in &kustomize.resources {
            if let Some(target_id) = resolve_neighbour(dir, resource, &file_by_path) {
                edges.push(Edge::new(node.id.clone(), target_id.to_string(), EdgeType::References));
            }
        }
    }
    let _ = ctx.root;
}

/// Links each Helm Chart node (tagged by `yaml.rs` from a chart's `Chart.yaml`)
/// to every node sharing its chart root: template docs (other `Helm` metadata
/// under the same root) and the chart's `values.yaml` File node.
pub fn link_helm(nodes: &[Node], edges: &mut Vec<Edge>) {
    let charts: Vec<&Node> = nodes
        .iter()
        .filter(|n| n.metadata.as_ref().and_then(|m| m.helm()).map(|h| h.resource_kind.as_deref() == Some("Chart")).unwrap_or(false))
        .collect();
    if charts.is_empty() {
        return;
    }

    for chart in &charts {
        let Some(chart_root) = chart.metadata.as_ref().and_then(|m| m.helm()).map(|h| h.chart_root.clone()) else {
            continue;
        };
        for node in nodes {
            if node.id == chart.id {
                continue;
            }
            let is_template_doc = node
                .metadata
                .as_ref()
                .and_then(|m| m.helm())
                .map(|h| h.resource_kind.as_deref() != Some("Chart") && h.chart_root == chart_root)
                .unwrap_or(false);
            let is_values_file = node.node_type == NodeType::File
                && node.file_path.rsplit('/').next() == Some("values.yaml")
                && node.file_path.starts_with(&format!("{chart_root}/"));
            if is_template_doc || is_values_file {
                edges.push(Edge::new(chart.id.clone(), node.id.clone(), EdgeType::References));
            }
        }
    }
}

fn resolve_neighbour<'a>(dir: &str, resource: &str, file_by_path: &HashMap<&str, &'a str>) -> Option<&'a str> {
    let joined = normalize(&join(dir, resource));
    for suffix in ["", ".yaml", ".yml"] {
        let candidate = format!("{joined}{suffix}");
        if let Some(id) = file_by_path.get(candidate.as_str()) {
            return Some(id);
        }
    }
    let dir_deployment = format!("{joined}/deployment.yaml");
    file_by_path.get(dir_deployment.as_str()).copied()
}

fn join(dir: &str, resource: &str) -> String {
    if dir.is_empty() {
        resource.to_string()
    } else {
        format!("{dir}/{resource}")
    }
}

fn normalize(path: &str) -> String {
    let mut parts = Vec::new();
    for seg in path.split('/') {
        match seg {
            "." | "" => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::{node_id, KustomizeMeta, LanguageTag, Metadata};
    use std::collections::HashMap;

    #[test]
    fn resolves_a_bare_resource_entry_against_a_sibling_file() {
        let kustomization = Node::new(node_id("file", "overlays/prod/kustomization.yaml", "overlays/prod/kustomization.yaml", None), NodeType::File, "kustomization.yaml", "overlays/prod/kustomization.yaml", LanguageTag::Yaml)
            .with_metadata(Metadata::Kustomize(KustomizeMeta { resources: vec!["deployment".to_string()], extra: Default::default() }));
        let deployment = Node::new(node_id("file", "overlays/prod/deployment.yaml", "overlays/prod/deployment.yaml", None), NodeType::File, "deployment.yaml", "overlays/prod/deployment.yaml", LanguageTag::Yaml);

        let nodes = vec![kustomization.clone(), deployment.clone()];
        let mut edges = Vec::new();
        let config = crate::AnalysisConfig::default();
        let ctx = LinkContext { root: std::path::Path::new("."), exports_by_file: &HashMap::new(), calls: &[], config: &config };

        link_kustomize(&nodes, &mut edges, &ctx);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source_id, kustomization.id);
        assert_eq!(edges[0].target_id, deployment.id);
        assert_eq!(edges[0].edge_type, EdgeType::References);
    }

    #[test]
    fn links_a_chart_to_its_template_docs_and_values_file() {
        use codemapper_core::HelmMeta;

        let chart = Node::new(node_id("helm-chart", "charts/app", "charts/app/Chart.yaml", None), NodeType::Component, "Chart", "charts/app/Chart.yaml", LanguageTag::Yaml)
            .with_metadata(Metadata::Helm(HelmMeta { chart_root: "charts/app".to_string(), resource_kind: Some("Chart".to_string()), extra: Default::default() }));
        let template = Node::new(node_id("k8s", "Deployment:app", "charts/app/templates/deployment.yaml", None), NodeType::Component, "Deployment/app", "charts/app/templates/deployment.yaml", LanguageTag::Yaml)
            .with_metadata(Metadata::Helm(HelmMeta { chart_root: "charts/app".to_string(), resource_kind: Some("Deployment".to_string()), extra: Default::default() }));
        let values = Node::new(node_id("file", "charts/app/values.yaml", "charts/app/values.yaml", None), NodeType::File, "values.yaml", "charts/app/values.yaml", LanguageTag::Yaml);
        let unrelated = Node::new(node_id("file", "charts/other/values.yaml", "charts/other/values.yaml", None), NodeType::File, "values.yaml", "charts/other/values.yaml", LanguageTag::Yaml);

        let nodes = vec![chart.clone(), template.clone(), values.clone(), unrelated];
        let mut edges = Vec::new();
        link_helm(&nodes, &mut edges);

        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.source_id == chart.id));
        assert!(edges.iter().any(|e| e.target_id == template.id));
        assert!(edges.iter().any(|e| e.target_id == values.id));
    }
}
