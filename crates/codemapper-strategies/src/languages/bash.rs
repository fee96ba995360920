// ABOUTME: Bash strategy (§4.A): raw-text function definitions and CLI command
// ABOUTME: invocations (used elsewhere for infra-reference linkage, e.g. `kubectl`/`docker`).

use crate::common::file_node;
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, Node, NodeType};
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:function\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*\(\)\s*\{").unwrap());
static CLI_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(kubectl|docker|helm|terraform|aws|gcloud|az)\s+(\S+)").unwrap());

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    for caps in FUNCTION_DEF.captures_iter(ctx.source) {
        let name = caps[1].to_string();
        let id = node_id("function", &name, ctx.file_path, None);
        result.exports.insert(name.clone(), id.clone());
        result.nodes.push(Node::new(id, NodeType::Function, name, ctx.file_path, ctx.language.clone()));
    }

    for caps in CLI_COMMAND.captures_iter(ctx.source) {
        let tool = caps[1].to_string();
        let subcommand = caps[2].to_string();
        result.calls.push(codemapper_core::CallSite {
            caller_id: file_id.clone(),
            raw: format!("{tool} {subcommand}"),
            qualifier: Some(tool),
            caller_file: ctx.file_path.to_string(),
        });
    }

    result
}
