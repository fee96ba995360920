// ABOUTME: Dead-code detection (§4.E): graph reachability (zero incoming
// ABOUTME: API_CALL/CALLS edges) for routes and public methods, plus textual
// ABOUTME: signals (large commented-out blocks, backup-pattern filenames).

use codemapper_core::{DeadCodeCategory, DeadCodeStats, Edge, EdgeType, Issue, Node, NodeType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static COMMENT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(//|#)").unwrap());
static BACKUP_FILENAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\.bak$|\.old$|_backup\.|~$|\.orig$)").unwrap());
const EXCLUDED_METHOD_NAMES: [&str; 6] = ["main", "index", "entry", "constructor", "init", "startup"];

pub fn compute(nodes: &[Node], edges: &[Edge]) -> DeadCodeStats {
    let mut out = DeadCodeStats::default();

    let incoming_call: HashSet<&str> = edges
        .iter()
        .filter(|e| matches!(e.edge_type, EdgeType::Calls | EdgeType::ApiCall))
        .map(|e| e.target_id.as_str())
        .collect();

    for node in nodes {
        match node.node_type {
            NodeType::ApiRoute => {
                if !incoming_call.contains(node.id.as_str()) {
                    out.push(DeadCodeCategory::UnusedController, issue(node, "route has no recorded caller"));
                }
            }
            NodeType::Function => {
                let is_excluded = EXCLUDED_METHOD_NAMES.iter().any(|n| node.label.eq_ignore_ascii_case(n));
                if !is_excluded && !incoming_call.contains(node.id.as_str()) {
                    out.push(DeadCodeCategory::UnusedMethod, issue(node, "method has no recorded caller"));
                }
            }
            _ => {}
        }

        if let Some(snippet) = &node.code_snippet {
            if let Some(run) = longest_comment_run(snippet) {
                if run > 5 {
                    out.push(DeadCodeCategory::CommentedBlock, issue(node, &format!("{run}-line commented-out block")));
                }
            }
        }

        if node.node_type == NodeType::File && BACKUP_FILENAME.is_match(&node.file_path) {
            out.push(DeadCodeCategory::BackupFile, issue(node, "filename matches a backup pattern"));
        }
    }

    out
}

fn longest_comment_run(snippet: &str) -> Option<usize> {
    let mut longest = 0usize;
    let mut current = 0usize;
    for line in snippet.lines() {
        if COMMENT_LINE.is_match(line) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    (longest > 0).then_some(longest)
}

fn issue(node: &Node, detail: &str) -> Issue {
    Issue { file_path: node.file_path.clone(), function_name: node.label.clone(), line: None, detail: detail.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::{node_id, LanguageTag};

    #[test]
    fn flags_a_route_with_no_incoming_call() {
        let nodes = vec![Node::new(node_id("apiroute", "/orphan:GET", "routes.ts", None), NodeType::ApiRoute, "/orphan", "routes.ts", LanguageTag::TypeScript)];
        let stats = compute(&nodes, &[]);
        assert_eq!(stats.unused_controllers, 1);
    }

    #[test]
    fn excludes_conventional_entry_points() {
        let nodes = vec![Node::new(node_id("function", "main", "main.go", None), NodeType::Function, "main", "main.go", LanguageTag::Go)];
        let stats = compute(&nodes, &[]);
        assert_eq!(stats.unused_methods, 0);
    }
}
