// ABOUTME: Anomaly detection (§4.E), scoped to Service/Controller code: five
// ABOUTME: patterns that each signal a likely runtime bug rather than style --
// ABOUTME: unawaited SaveChangesAsync, async-method-blocks-on-.Result,
// ABOUTME: a commented-out .Include beside an active query, a suspiciously low
// ABOUTME: DB timeout literal, and a fire-and-forget Task.Run.

use codemapper_core::{CountedIssues, Issue, Node};
use once_cell::sync::Lazy;
use regex::Regex;

static SAVE_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bSaveChangesAsync\s*\(").unwrap());
static ASYNC_RESULT_AWAIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\basync\b[^{]*\{[^}]*\.Result\b").unwrap());
static COMMENTED_INCLUDE_NEAR_QUERY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//\s*\.Include\([^\n]*\n[^\n]*\.(Where|FirstOrDefault|ToList)\(").unwrap());
static LOW_TIMEOUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:CommandTimeout|ConnectionTimeout)\s*=\s*(\d+)").unwrap());
static TASK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bTask\.Run\s*\(").unwrap());

pub fn compute(nodes: &[Node]) -> CountedIssues {
    let mut out = CountedIssues::default();
    for node in nodes {
        if !node.in_service_or_controller_scope() {
            continue;
        }
        let Some(snippet) = &node.code_snippet else {
            continue;
        };

        if has_unawaited_save(snippet) {
            out.push(issue(node, "SaveChangesAsync is called without await"));
        }
        if ASYNC_RESULT_AWAIT.is_match(snippet) {
            out.push(issue(node, "async method blocks on .Result instead of awaiting"));
        }
        if COMMENTED_INCLUDE_NEAR_QUERY.is_match(snippet) {
            out.push(issue(node, "a commented-out .Include sits beside an active query, likely a missing eager-load"));
        }
        for caps in LOW_TIMEOUT.captures_iter(snippet) {
            if let Ok(value) = caps[1].parse::<u32>() {
                if value < 5 {
                    out.push(issue(node, &format!("suspiciously low DB timeout literal: {value}")));
                }
            }
        }
        if has_fire_and_forget(snippet) {
            out.push(issue(node, "Task.Run is fired without awaiting or observing its result"));
        }
    }
    out
}

fn has_unawaited_save(snippet: &str) -> bool {
    SAVE_CALL.find_iter(snippet).any(|m| !snippet[..m.start()].trim_end().ends_with("await"))
}

fn has_fire_and_forget(snippet: &str) -> bool {
    TASK_RUN.find_iter(snippet).any(|m| {
        let rest = &snippet[m.end()..];
        match rest.find(';') {
            Some(semi) => {
                let after = rest[semi + 1..].trim_start();
                !after.starts_with(".Wait") && !after.starts_with(".GetAwaiter")
            }
            None => false,
        }
    })
}

fn issue(node: &Node, detail: &str) -> Issue {
    Issue { file_path: node.file_path.clone(), function_name: node.label.clone(), line: None, detail: detail.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::{node_id, LanguageTag, NodeType};

    #[test]
    fn flags_an_unawaited_save_call() {
        let nodes = vec![Node::new(node_id("function", "Update", "OrderService.cs", None), NodeType::Function, "Update", "OrderService.cs", LanguageTag::CSharp)
            .with_snippet("public void Update() { _db.SaveChangesAsync(); }")];
        assert_eq!(compute(&nodes).count, 1);
    }

    #[test]
    fn does_not_flag_an_awaited_save_call() {
        let nodes = vec![Node::new(node_id("function", "Update", "OrderService.cs", None), NodeType::Function, "Update", "OrderService.cs", LanguageTag::CSharp)
            .with_snippet("public async Task Update() { await _db.SaveChangesAsync(); }")];
        assert_eq!(compute(&nodes).count, 0);
    }
}
