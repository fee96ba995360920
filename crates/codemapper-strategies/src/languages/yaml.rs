// ABOUTME: YAML strategy (§4.A): Kubernetes manifests (multi-doc, `---`-separated),
// ABOUTME: Helm templates (under templates/), Kustomize overlays, and OpenAPI YAML specs.

use crate::common::{basename, file_node};
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, Edge, EdgeType, KubernetesMeta, KustomizeMeta, Metadata, Node, NodeType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static KIND_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^kind:\s*(\S+)").unwrap());
static NAME_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*name:\s*(\S+)").unwrap());
static IMAGE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*-?\s*image:\s*(\S+)").unwrap());
static LABEL_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s+([\w.\-/]+):\s*(\S+)").unwrap());
static RESOURCES_ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*-\s*(\S+\.ya?ml)\s*$").unwrap());
static OPENAPI_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(openapi|swagger):\s*").unwrap());

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    if basename(ctx.file_path) == "kustomization.yaml" || basename(ctx.file_path) == "kustomization.yml" {
        analyze_kustomize(ctx, &file_id, &mut result);
        return result;
    }

    if basename(ctx.file_path) == "Chart.yaml" {
        analyze_helm_chart(ctx, &file_id, &mut result);
        return result;
    }

    if OPENAPI_VERSION.is_match(ctx.source) {
        // File node carries enough signal; per-path OpenAPI route synthesis is
        // an interaction-analyzer job once paths are resolved against source trees.
        return result;
    }

    for doc in ctx.source.split("\n---") {
        if !doc.trim().is_empty() {
            analyze_k8s_document(ctx, &file_id, doc, &mut result);
        }
    }

    result
}

fn analyze_k8s_document(ctx: &AnalysisContext, file_id: &str, doc: &str, result: &mut ExtractionResult) {
    let Some(kind_caps) = KIND_LINE.captures(doc) else {
        return;
    };
    let kind = kind_caps[1].to_string();
    let name = NAME_LINE.captures(doc).map(|c| c[1].to_string()).unwrap_or_default();
    if name.is_empty() {
        return;
    }

    let images: Vec<String> = IMAGE_LINE.captures_iter(doc).map(|c| c[1].trim_matches('"').to_string()).collect();
    let is_helm_template = ctx.file_path.contains("templates/") && doc.contains("{{");

    let labels = section_map(doc, "labels");
    let selectors = section_map(doc, "selector").into_iter().chain(section_map(doc, "matchLabels")).collect();

    let meta = if is_helm_template {
        Metadata::Helm(codemapper_core::HelmMeta {
            chart_root: chart_root(ctx.file_path),
            resource_kind: Some(kind.clone()),
            extra: Default::default(),
        })
    } else {
        Metadata::Kubernetes(KubernetesMeta {
            resource_kind: kind.clone(),
            resource_name: name.clone(),
            labels,
            selectors,
            images: images.clone(),
            extra: Default::default(),
        })
    };

    let id = node_id("k8s", &format!("{kind}:{name}"), ctx.file_path, None);
    result.nodes.push(
        Node::new(id.clone(), NodeType::Component, format!("{kind}/{name}"), ctx.file_path, ctx.language.clone())
            .with_metadata(meta),
    );
    result.edges.push(Edge::new(file_id.to_string(), id.clone(), EdgeType::References));

    for image in images {
        let image_node_id = codemapper_core::image_id(&image);
        result.edges.push(Edge::new(id.clone(), image_node_id, EdgeType::References));
    }
}

fn analyze_helm_chart(ctx: &AnalysisContext, file_id: &str, result: &mut ExtractionResult) {
    let chart_root = dirname(ctx.file_path);
    let meta = Metadata::Helm(codemapper_core::HelmMeta {
        chart_root: chart_root.clone(),
        resource_kind: Some("Chart".to_string()),
        extra: Default::default(),
    });
    let id = node_id("helm-chart", &chart_root, ctx.file_path, None);
    result.nodes.push(
        Node::new(id.clone(), NodeType::Component, "Chart".to_string(), ctx.file_path, ctx.language.clone())
            .with_metadata(meta),
    );
    result.edges.push(Edge::new(file_id.to_string(), id, EdgeType::References));
}

fn dirname(file_path: &str) -> String {
    file_path.rsplit_once('/').map(|(dir, _)| dir.to_string()).unwrap_or_default()
}

fn analyze_kustomize(ctx: &AnalysisContext, file_id: &str, result: &mut ExtractionResult) {
    let resources: Vec<String> = RESOURCES_ENTRY.captures_iter(ctx.source).map(|c| c[1].to_string()).collect();
    let meta = Metadata::Kustomize(KustomizeMeta {
        resources: resources.clone(),
        extra: Default::default(),
    });
    let id = node_id("kustomize", ctx.file_path, ctx.file_path, None);
    result.nodes.push(
        Node::new(id.clone(), NodeType::File, basename(ctx.file_path), ctx.file_path, ctx.language.clone())
            .with_metadata(meta),
    );
    result.edges.push(Edge::new(file_id.to_string(), id, EdgeType::References));
    // Neighbour-file resolution (base/overlay `resources:` entries -> sibling
    // kustomization/manifest files) happens in the interaction analyzer, which
    // has visibility into the full file set; this strategy only records the names.
    let _ = resources;
}

fn section_map(doc: &str, section: &str) -> BTreeMap<String, String> {
    let marker = format!("{section}:");
    let mut map = BTreeMap::new();
    if let Some(start) = doc.find(&marker) {
        let rest = &doc[start + marker.len()..];
        for caps in LABEL_LINE.captures_iter(rest) {
            map.insert(caps[1].to_string(), caps[2].trim_matches('"').to_string());
            if map.len() > 32 {
                break;
            }
        }
    }
    map
}

fn chart_root(file_path: &str) -> String {
    file_path
        .splitn(2, "/templates/")
        .next()
        .unwrap_or(file_path)
        .to_string()
}
