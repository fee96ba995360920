// ABOUTME: Shared loop-body scanner for DB-queries-in-loops and N+1 detection
// ABOUTME: (§4.E): finds loop openings, brace-balances (string-literal aware)
// ABOUTME: to the loop body, then checks the body for query-shaped calls. A
// ABOUTME: body containing an eager-load marker is skipped entirely. Both
// ABOUTME: buckets dedup by `(filePath, label, loopStart)`.

use codemapper_core::{CountedIssues, Issue, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static LOOP_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfor\s*\(|\bwhile\s*\(").unwrap());
static PER_ITEM_LOOP_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(forEach|map)\s*\(|\bfor\s*\(\s*(?:const|let|var)\s+\w+\s+of\s+").unwrap());
static QUERY_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(query|find|findOne|findAll|findMany|select|exec)\s*\(").unwrap());
static EAGER_LOAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.Include\(|\.ThenInclude\(|\.With\(|\.Join\(|eager|preload|\.Load\(").unwrap());

struct LoopBody<'a> {
    start: usize,
    text: &'a str,
}

fn loop_bodies<'a>(source: &'a str, open_re: &Regex) -> Vec<LoopBody<'a>> {
    let mut bodies = Vec::new();
    for m in open_re.find_iter(source) {
        let Some(open_offset) = source[m.end()..].find('{') else {
            continue;
        };
        let brace_start = m.end() + open_offset;
        if let Some(text) = balanced_body(source, brace_start) {
            bodies.push(LoopBody { start: m.start(), text });
        }
    }
    bodies
}

/// Walks forward from an opening `{` to its matching `}`, treating characters
/// inside string/char/template literals as inert so a brace in a literal
/// doesn't unbalance the scan.
fn balanced_body(source: &str, brace_start: usize) -> Option<&str> {
    let bytes = source.as_bytes();
    let mut depth = 0i32;
    let mut in_string: Option<u8> = None;
    let mut i = brace_start;
    while i < bytes.len() {
        let c = bytes[i];
        match in_string {
            Some(q) => {
                if c == b'\\' {
                    i += 1;
                } else if c == q {
                    in_string = None;
                }
            }
            None => match c {
                b'"' | b'\'' | b'`' => in_string = Some(c),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&source[brace_start + 1..i]);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

pub fn db_queries_in_loops(nodes: &[&Node]) -> CountedIssues {
    scan(nodes, &LOOP_OPEN, "a database query runs inside a loop body")
}

pub fn n_plus_one_queries(nodes: &[&Node]) -> CountedIssues {
    scan(nodes, &PER_ITEM_LOOP_OPEN, "query issued once per iterated item, an N+1 pattern")
}

fn scan(nodes: &[&Node], open_re: &Regex, detail: &str) -> CountedIssues {
    let mut out = CountedIssues::default();
    let mut seen = HashSet::new();
    for node in nodes {
        let Some(snippet) = &node.code_snippet else {
            continue;
        };
        for body in loop_bodies(snippet, open_re) {
            if EAGER_LOAD.is_match(body.text) {
                continue;
            }
            if QUERY_CALL.is_match(body.text) {
                let key = (node.file_path.clone(), node.label.clone(), body.start);
                if seen.insert(key) {
                    out.push(Issue {
                        file_path: node.file_path.clone(),
                        function_name: node.label.clone(),
                        line: None,
                        detail: detail.to_string(),
                    });
                }
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
    fn flags_a_query_inside_a_for_of_loop() {
        let nodes = vec![Node::new(node_id("function", "sync", "svc.ts", None), NodeType::Function, "sync", "svc.ts", LanguageTag::TypeScript)
            .with_snippet("function sync(items) { for (const item of items) { db.query(item.id); } }")];
        let refs: Vec<&Node> = nodes.iter().collect();
        let stats = n_plus_one_queries(&refs);
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn does_not_flag_a_loop_without_a_query_call() {
        let nodes = vec![Node::new(node_id("function", "sum", "svc.ts", None), NodeType::Function, "sum", "svc.ts", LanguageTag::TypeScript)
            .with_snippet("function sum(items) { for (const item of items) { total += item; } }")];
        let refs: Vec<&Node> = nodes.iter().collect();
        assert_eq!(db_queries_in_loops(&refs).count, 0);
    }

    #[test]
    fn does_not_flag_a_loop_guarded_by_an_eager_load() {
        let nodes = vec![Node::new(node_id("function", "listOrders", "svc.cs", None), NodeType::Function, "listOrders", "svc.cs", LanguageTag::CSharp)
            .with_snippet("void listOrders() { for (int i = 0; i < 10; i++) { var rows = db.Include(x).Query(); } }")];
        let refs: Vec<&Node> = nodes.iter().collect();
        assert_eq!(db_queries_in_loops(&refs).count, 0);
    }
}
