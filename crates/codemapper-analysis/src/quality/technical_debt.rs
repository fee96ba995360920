// ABOUTME: Technical-debt comment scan (§4.E): TODO/FIXME/hacky-kludge-workaround
// ABOUTME: and temporarily-removed-functionality comments, scoped to `Service` code.

use codemapper_core::{DebtCategory, Issue, Node, TechnicalDebtStats};
use once_cell::sync::Lazy;
use regex::Regex;

static TODO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?://|#|/\*)\s*TODO\b").unwrap());
static FIXME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?://|#|/\*)\s*FIXME\b").unwrap());
static HACKY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?://|#).*\b(hacky|kludge|workaround)\b").unwrap());
static TEMP_REMOVAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?://|#).*\btemporarily removed\b").unwrap());

pub fn compute(nodes: &[Node]) -> TechnicalDebtStats {
    let mut out = TechnicalDebtStats::default();
    for node in nodes {
        if !node.file_path.contains("Service") && !node.label.contains("Service") {
            continue;
        }
        let Some(snippet) = &node.code_snippet else {
            continue;
        };
        for _ in TODO.find_iter(snippet) {
            out.push(DebtCategory::Todo, issue(node, "TODO comment"));
        }
        for _ in FIXME.find_iter(snippet) {
            out.push(DebtCategory::Fixme, issue(node, "FIXME comment"));
        }
        for _ in HACKY.find_iter(snippet) {
            out.push(DebtCategory::Hacky, issue(node, "comment flags hacky/kludge/workaround code"));
        }
        for _ in TEMP_REMOVAL.find_iter(snippet) {
            out.push(DebtCategory::TemporaryRemoval, issue(node, "comment notes temporarily removed functionality"));
        }
    }
    out
}

fn issue(node: &Node, detail: &str) -> Issue {
    Issue { file_path: node.file_path.clone(), function_name: node.label.clone(), line: None, detail: detail.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::{node_id, LanguageTag, NodeType};

    #[test]
    fn counts_a_todo_in_service_scoped_code() {
        let nodes = vec![Node::new(node_id("function", "Save", "OrderService.cs", None), NodeType::Function, "Save", "OrderService.cs", LanguageTag::CSharp)
            .with_snippet("// TODO: handle retries\npublic void Save() {}")];
        let stats = compute(&nodes);
        assert_eq!(stats.todo, 1);
        assert_eq!(stats.count, 1);
    }
}
