// ABOUTME: Repeated-code detection (§4.E): normalized fragments (validation
// ABOUTME: guard clauses, address-field groupings, SQL CREATE/ALTER
// ABOUTME: statements, ORM include chains) counted across the whole codebase;
// ABOUTME: fragments above a per-category threshold are reported once per site.

use codemapper_core::{CountedIssues, Issue, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static VALIDATION_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)if\s*\([^)]*\.(?:length|isEmpty|IsNullOrEmpty)\([^)]*\)[^;{}]*(?:throw|return)").unwrap());
static ADDRESS_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(street|city|state|zip|postal_?code|country)\b").unwrap());
static SQL_DDL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(CREATE|ALTER)\s+TABLE\s+\w+").unwrap());
static ORM_INCLUDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.include\s*\(\s*\[[^\]]*]\s*\)").unwrap());

pub fn compute(nodes: &[Node]) -> CountedIssues {
    let mut out = CountedIssues::default();
    count_fragment(nodes, &VALIDATION_FRAGMENT, 1, "validation", &mut out);
    count_address_groupings(nodes, &mut out);
    count_fragment(nodes, &SQL_DDL, 1, "SQL CREATE/ALTER", &mut out);
    count_fragment(nodes, &ORM_INCLUDE, 1, "ORM include chain", &mut out);
    out
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn count_fragment(nodes: &[Node], pattern: &Regex, threshold: usize, label: &str, out: &mut CountedIssues) {
    let mut seen: HashMap<String, Vec<&Node>> = HashMap::new();
    for node in nodes {
        let Some(snippet) = &node.code_snippet else {
            continue;
        };
        for m in pattern.find_iter(snippet) {
            seen.entry(normalize(m.as_str())).or_default().push(node);
        }
    }
    for (fragment, occurrences) in seen {
        if occurrences.len() > threshold {
            for node in &occurrences {
                out.push(Issue {
                    file_path: node.file_path.clone(),
                    function_name: node.label.clone(),
                    line: None,
                    detail: format!("{label} fragment repeated {} times: `{fragment}`", occurrences.len()),
                });
            }
        }
    }
}

fn count_address_groupings(nodes: &[Node], out: &mut CountedIssues) {
    let mut seen: HashMap<String, Vec<&Node>> = HashMap::new();
    for node in nodes {
        let Some(snippet) = &node.code_snippet else {
            continue;
        };
        let mut fields: Vec<String> = ADDRESS_FIELD.find_iter(snippet).map(|m| m.as_str().to_lowercase()).collect();
        fields.sort();
        fields.dedup();
        if fields.len() >= 3 {
            seen.entry(fields.join(",")).or_default().push(node);
        }
    }
    for (fragment, occurrences) in seen {
        if occurrences.len() > 3 {
            for node in &occurrences {
                out.push(Issue {
                    file_path: node.file_path.clone(),
                    function_name: node.label.clone(),
                    line: None,
                    detail: format!("address field grouping repeated {} times: {fragment}", occurrences.len()),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::{node_id, LanguageTag, NodeType};

    #[test]
    fn flags_the_same_sql_ddl_statement_repeated_across_files() {
        let nodes = vec![
            Node::new(node_id("table", "users", "a.sql", None), NodeType::File, "users", "a.sql", LanguageTag::Sql).with_snippet("CREATE TABLE users (id int);"),
            Node::new(node_id("table", "users", "b.sql", None), NodeType::File, "users", "b.sql", LanguageTag::Sql).with_snippet("CREATE TABLE users (id int);"),
        ];
        let stats = compute(&nodes);
        assert!(stats.count >= 2);
    }
}
