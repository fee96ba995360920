// ABOUTME: Blocking-async detection (§4.E): `.Result` / `.Wait()` /
// ABOUTME: `.GetAwaiter().GetResult(` inside Service/Controller-scoped code,
// ABOUTME: skipping test fixtures. Dedups by `(filePath, label, matchedText)`.

use codemapper_core::{CountedIssues, Issue, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static BLOCKING_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.Result\b|\.Wait\s*\(\)|\.GetAwaiter\(\)\.GetResult\(").unwrap());

pub fn compute(nodes: &[Node]) -> CountedIssues {
    let mut out = CountedIssues::default();
    let mut seen = HashSet::new();
    for node in nodes {
        if !node.in_service_or_controller_scope() || node.is_test_fixture() {
            continue;
        }
        let Some(snippet) = &node.code_snippet else {
            continue;
        };
        for m in BLOCKING_PATTERN.find_iter(snippet) {
            let key = (node.file_path.clone(), node.label.clone(), m.as_str().to_string());
            if seen.insert(key) {
                out.push(Issue {
                    file_path: node.file_path.clone(),
                    function_name: node.label.clone(),
                    line: None,
                    detail: format!("blocks on async work via `{}`", m.as_str()),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::{node_id, LanguageTag, NodeType};

    #[test]
    fn flags_blocking_result_access_in_a_service() {
        let nodes = vec![Node::new(node_id("function", "Get", "UserService.cs", None), NodeType::Function, "Get", "UserService.cs", LanguageTag::CSharp)
            .with_snippet("public User Get(int id) { return _repo.GetAsync(id).Result; }")];
        assert_eq!(compute(&nodes).count, 1);
    }

    #[test]
    fn ignores_test_fixtures() {
        let nodes = vec![Node::new(node_id("function", "Get", "UserServiceTests.cs", None), NodeType::Function, "Get", "UserServiceTests.cs", LanguageTag::CSharp)
            .with_snippet("public void Get() { var r = _svc.GetAsync(1).Result; }")];
        assert_eq!(compute(&nodes).count, 0);
    }
}
