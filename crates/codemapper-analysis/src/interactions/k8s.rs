// ABOUTME: Kubernetes linkage (§4.D.e): a Service's selector, when a subset
// ABOUTME: of a Deployment/Pod/StatefulSet/DaemonSet's labels, gets a
// ABOUTME: REFERENCES edge to that workload. Per-image edges are already
// ABOUTME: emitted by the YAML strategy itself, not this pass.

use codemapper_core::{Edge, EdgeType, Node};

pub fn link(nodes: &[Node], edges: &mut Vec<Edge>) {
    let workloads: Vec<_> = nodes
        .iter()
        .filter_map(|n| {
            let k8s = n.metadata.as_ref()?.kubernetes()?;
            matches!(k8s.resource_kind.as_str(), "Deployment" | "Pod" | "StatefulSet" | "DaemonSet").then_some((n, &k8s.labels))
        })
        .collect();

    let services: Vec<_> = nodes
        .iter()
        .filter_map(|n| {
            let k8s = n.metadata.as_ref()?.kubernetes()?;
            (k8s.resource_kind == "Service").then_some((n, &k8s.selectors))
        })
        .collect();

    for (service, selector) in &services {
        if selector.is_empty() {
            continue;
        }
        for (workload, labels) in &workloads {
            if selector.iter().all(|(k, v)| labels.get(k) == Some(v)) {
                edges.push(Edge::new(service.id.clone(), workload.id.clone(), EdgeType::References));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::{node_id, KubernetesMeta, LanguageTag, Metadata, NodeType};
    use std::collections::BTreeMap;

    fn k8s_node(kind: &str, name: &str, labels: BTreeMap<String, String>, selectors: BTreeMap<String, String>) -> Node {
        let id = node_id("k8s", name, "manifest.yaml", None);
        Node::new(id, NodeType::File, name, "manifest.yaml", LanguageTag::Yaml).with_metadata(Metadata::Kubernetes(KubernetesMeta {
            resource_kind: kind.to_string(),
            resource_name: name.to_string(),
            labels,
            selectors,
            images: vec![],
            extra: Default::default(),
        }))
    }

    #[test]
    fn links_service_to_matching_deployment() {
        let mut labels = BTreeMap::new();
        labels.insert("app".to_string(), "web".to_string());
        let deployment = k8s_node("Deployment", "web", labels.clone(), BTreeMap::new());
        let mut selector = BTreeMap::new();
        selector.insert("app".to_string(), "web".to_string());
        let service = k8s_node("Service", "web-svc", BTreeMap::new(), selector);

        let nodes = vec![deployment.clone(), service.clone()];
        let mut edges = Vec::new();
        link(&nodes, &mut edges);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source_id, service.id);
        assert_eq!(edges[0].target_id, deployment.id);
    }
}
