// ABOUTME: SQL strategy (§4.A): raw-text CREATE TABLE/INDEX/FUNCTION/TRIGGER
// ABOUTME: extraction plus a best-effort dialect guess from syntax fingerprints.

use crate::common::file_node;
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, table_id, Edge, EdgeType, Node, NodeType};
use once_cell::sync::Lazy;
use regex::Regex;

static CREATE_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)create\s+table\s+(?:if\s+not\s+exists\s+)?[`"\[]?([\w.]+)[`"\]]?"#).unwrap());
static CREATE_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)create\s+(?:unique\s+)?index\s+(?:if\s+not\s+exists\s+)?[`"\[]?(\w+)[`"\]]?\s+on\s+[`"\[]?([\w.]+)[`"\]]?"#).unwrap());
static CREATE_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)create\s+(?:or\s+replace\s+)?function\s+[`"\[]?([\w.]+)[`"\]]?"#).unwrap());
static CREATE_TRIGGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)create\s+trigger\s+[`"\[]?(\w+)[`"\]]?"#).unwrap());

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    for caps in CREATE_TABLE.captures_iter(ctx.source) {
        let table = caps[1].to_string();
        let id = node_id("sql-table", &table, ctx.file_path, None);
        result.exports.insert(table.clone(), id.clone());
        result.nodes.push(Node::new(id.clone(), NodeType::File, table.clone(), ctx.file_path, ctx.language.clone()));
        result.edges.push(Edge::new(file_id.clone(), id.clone(), EdgeType::References));
        result.edges.push(Edge::new(id, table_id(&table), EdgeType::References));
    }

    for caps in CREATE_INDEX.captures_iter(ctx.source) {
        let index_name = caps[1].to_string();
        let table = caps[2].to_string();
        let id = node_id("sql-index", &index_name, ctx.file_path, None);
        result.nodes.push(Node::new(id.clone(), NodeType::File, index_name, ctx.file_path, ctx.language.clone()));
        result.edges.push(Edge::new(id, table_id(&table), EdgeType::References));
    }

    for caps in CREATE_FUNCTION.captures_iter(ctx.source) {
        let name = caps[1].to_string();
        let id = node_id("function", &name, ctx.file_path, None);
        result.exports.insert(name.clone(), id.clone());
        result.nodes.push(Node::new(id.clone(), NodeType::Function, name, ctx.file_path, ctx.language.clone()));
        result.edges.push(Edge::new(file_id.clone(), id, EdgeType::References));
    }

    for caps in CREATE_TRIGGER.captures_iter(ctx.source) {
        let name = caps[1].to_string();
        let id = node_id("sql-trigger", &name, ctx.file_path, None);
        result.nodes.push(Node::new(id.clone(), NodeType::File, name, ctx.file_path, ctx.language.clone()));
        result.edges.push(Edge::new(file_id.clone(), id, EdgeType::References));
    }

    result
}

/// Best-effort dialect fingerprint, exposed for the quality analyzer's
/// N+1/loop-query scanner which treats dialects slightly differently.
pub fn guess_dialect(source: &str) -> &'static str {
    let lower = source.to_ascii_lowercase();
    if lower.contains("auto_increment") || lower.contains("engine=innodb") {
        "MySQL"
    } else if lower.contains("serial primary key") || lower.contains("::text") {
        "PostgreSQL"
    } else if lower.contains("autoincrement") {
        "SQLite"
    } else {
        "Generic"
    }
}
