// ABOUTME: Terraform strategy (§4.A): regex-extracted provider/resource/module
// ABOUTME: blocks; inter-resource `depends_on` linkage is an interaction-analyzer job.

use crate::common::file_node;
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, Edge, EdgeType, Node, NodeType, TerraformMeta};
use once_cell::sync::Lazy;
use regex::Regex;

static RESOURCE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^resource\s+"([^"]+)"\s+"([^"]+)"\s*\{"#).unwrap());
static MODULE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?m)^module\s+"([^"]+)"\s*\{"#).unwrap());
static PROVIDER_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?m)^provider\s+"([^"]+)"\s*\{"#).unwrap());
static DEPENDS_ON: Lazy<Regex> = Lazy::new(|| Regex::new(r"depends_on\s*=\s*\[([^\]]*)\]").unwrap());
static SOURCE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"source\s*=\s*"([^"]+)""#).unwrap());
static INLINE_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([a-z][a-z0-9_]*)\.([a-z][a-z0-9_]*)\b").unwrap());
const RESERVED_REFERENCE_PREFIXES: &[&str] = &["var", "local", "data", "module", "each", "count", "self", "path", "terraform"];

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    for caps in RESOURCE_BLOCK.captures_iter(ctx.source) {
        let resource_type = caps[1].to_string();
        let resource_name = caps[2].to_string();
        let self_ref = format!("{resource_type}.{resource_name}");
        let meta = TerraformMeta {
            resource_type: resource_type.clone(),
            resource_name: resource_name.clone(),
            extra: Default::default(),
        };
        let id = node_id("tf-resource", &self_ref, ctx.file_path, None);
        result.exports.insert(self_ref.clone(), id.clone());
        result.nodes.push(
            Node::new(id.clone(), NodeType::Component, self_ref.clone(), ctx.file_path, ctx.language.clone())
                .with_metadata(codemapper_core::Metadata::Terraform(meta)),
        );
        result.edges.push(Edge::new(file_id.clone(), id.clone(), EdgeType::References));

        let body = resource_body(ctx.source, caps.get(0).unwrap().end());
        for reference in INLINE_REFERENCE.captures_iter(body) {
            let raw = format!("{}.{}", &reference[1], &reference[2]);
            if raw == self_ref || RESERVED_REFERENCE_PREFIXES.contains(&&reference[1]) {
                continue;
            }
            result.calls.push(codemapper_core::CallSite {
                caller_id: id.clone(),
                raw,
                qualifier: Some("inline_reference".to_string()),
                caller_file: ctx.file_path.to_string(),
            });
        }
    }

    for caps in MODULE_BLOCK.captures_iter(ctx.source) {
        let name = caps[1].to_string();
        let id = node_id("tf-module", &name, ctx.file_path, None);
        result.exports.insert(format!("module.{name}"), id.clone());
        result
            .nodes
            .push(Node::new(id.clone(), NodeType::Component, format!("module.{name}"), ctx.file_path, ctx.language.clone()));
        result.edges.push(Edge::new(file_id.clone(), id, EdgeType::References));
    }

    for caps in PROVIDER_BLOCK.captures_iter(ctx.source) {
        let name = caps[1].to_string();
        let id = node_id("tf-provider", &name, ctx.file_path, None);
        result
            .nodes
            .push(Node::new(id.clone(), NodeType::Component, format!("provider.{name}"), ctx.file_path, ctx.language.clone()));
        result.edges.push(Edge::new(file_id.clone(), id, EdgeType::References));
    }

    // depends_on and module `source = "./..."` references are recorded as raw
    // strings on call sites; resolving them into concrete node ids requires
    // seeing every Terraform file at once, so the linkage pass owns that.
    for caps in DEPENDS_ON.captures_iter(ctx.source) {
        for reference in caps[1].split(',') {
            let reference = reference.trim().trim_matches('"');
            if reference.is_empty() {
                continue;
            }
            result.calls.push(codemapper_core::CallSite {
                caller_id: file_id.clone(),
                raw: reference.to_string(),
                qualifier: Some("depends_on".to_string()),
                caller_file: ctx.file_path.to_string(),
            });
        }
    }
    for caps in SOURCE_LINE.captures_iter(ctx.source) {
        result.calls.push(codemapper_core::CallSite {
            caller_id: file_id.clone(),
            raw: caps[1].to_string(),
            qualifier: Some("module_source".to_string()),
            caller_file: ctx.file_path.to_string(),
        });
    }

    result
}

/// Brace-balanced slice of `source` starting right after a resource block's
/// opening `{` (already consumed by `RESOURCE_BLOCK`'s match), so inline
/// `type.name` references are only scanned within that one resource's body.
fn resource_body(source: &str, after_open_brace: usize) -> &str {
    let bytes = source.as_bytes();
    let mut depth = 1i32;
    let mut in_string = false;
    let mut i = after_open_brace;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return &source[after_open_brace..i];
                }
            }
            _ => {}
        }
        i += 1;
    }
    &source[after_open_brace..]
}
