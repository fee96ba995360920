// ABOUTME: Code smell heuristics (§4.E), scoped to Service/Controller code:
// ABOUTME: try-without-catch, magic numbers, magic strings, oversized
// ABOUTME: methods (>80 lines), and excessive casting (>10 casts).

use codemapper_core::{CountedIssues, Issue, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static TRY_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btry\s*\{").unwrap());
static CATCH_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcatch\s*[({]").unwrap());
static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{3,}\b").unwrap());
static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).unwrap());
static SCREAMING_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_]{8,}$").unwrap());
static CAST_EXPR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*[A-Z]\w*\s*\)\s*\w|\bas\s+[A-Z]\w*").unwrap());

const EXCLUDED_NUMBERS: [&str; 5] = ["200", "201", "400", "404", "500"];
const CONTENT_TYPE_TOKENS: [&str; 3] = ["APPLICATION_JSON", "TEXT_PLAIN", "MULTIPART_FORM_DATA"];

pub fn compute(nodes: &[Node]) -> CountedIssues {
    let mut out = CountedIssues::default();
    for node in nodes {
        if !node.in_service_or_controller_scope() {
            continue;
        }
        let Some(snippet) = &node.code_snippet else {
            continue;
        };

        if TRY_BLOCK.is_match(snippet) && !CATCH_BLOCK.is_match(snippet) {
            out.push(issue(node, "try block with no matching catch"));
        }

        let magic_numbers: Vec<&str> = NUMERIC_LITERAL
            .find_iter(snippet)
            .map(|m| m.as_str())
            .filter(|n| !EXCLUDED_NUMBERS.contains(n) && !looks_like_a_year(n))
            .collect();
        if !magic_numbers.is_empty() {
            out.push(issue(node, &format!("magic number literal(s): {}", magic_numbers.join(", "))));
        }

        let mut string_counts: HashMap<&str, usize> = HashMap::new();
        for caps in STRING_LITERAL.captures_iter(snippet) {
            let text = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or("");
            let is_long = text.len() >= 15;
            let is_screaming = SCREAMING_TOKEN.is_match(text);
            if (is_long || is_screaming) && !CONTENT_TYPE_TOKENS.contains(&text) {
                *string_counts.entry(text).or_default() += 1;
            }
        }
        for (text, count) in string_counts {
            if count > 5 {
                out.push(issue(node, &format!("magic string `{text}` repeated {count} times")));
            }
        }

        if snippet.lines().count() > 80 {
            out.push(issue(node, "method body exceeds 80 lines"));
        }

        if CAST_EXPR.find_iter(snippet).count() > 10 {
            out.push(issue(node, "excessive casting (more than 10 casts)"));
        }
    }
    out
}

fn looks_like_a_year(n: &str) -> bool {
    n.len() == 4 && n.parse::<u32>().map(|v| (1900..=2100).contains(&v)).unwrap_or(false)
}

fn issue(node: &Node, detail: &str) -> Issue {
    Issue { file_path: node.file_path.clone(), function_name: node.label.clone(), line: None, detail: detail.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::{node_id, LanguageTag, NodeType};

    #[test]
    fn flags_try_without_catch() {
        let nodes = vec![Node::new(node_id("function", "Save", "OrderService.cs", None), NodeType::Function, "Save", "OrderService.cs", LanguageTag::CSharp)
            .with_snippet("public void Save() { try { DoWork(); } finally { Cleanup(); } }")];
        assert!(compute(&nodes).issues.iter().any(|i| i.detail.contains("try block")));
    }

    #[test]
    fn excludes_http_status_codes_from_magic_numbers() {
        let nodes = vec![Node::new(node_id("function", "Handle", "OrderController.cs", None), NodeType::Function, "Handle", "OrderController.cs", LanguageTag::CSharp)
            .with_snippet("public IActionResult Handle() { return StatusCode(404); }")];
        assert!(compute(&nodes).issues.iter().all(|i| !i.detail.contains("magic number")));
    }
}
