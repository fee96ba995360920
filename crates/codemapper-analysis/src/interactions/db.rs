// ABOUTME: Generic DB lineage heuristic (§4.D.c): a function whose snippet
// ABOUTME: contains a quoted SQL verb gets a DB_QUERY edge to the single
// ABOUTME: synthetic `db:generic` node, created at most once (invariant 5).

use codemapper_core::{Edge, EdgeType, LanguageTag, Node, NodeType, DB_GENERIC_ID};
use once_cell::sync::Lazy;
use regex::Regex;

static SQL_VERB: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)["'`]\s*(SELECT|INSERT\s+INTO|UPDATE|DELETE\s+FROM)\b"#).unwrap());

pub fn link_generic(nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) {
    let mut new_edges = Vec::new();
    for node in nodes.iter() {
        if node.node_type != NodeType::Function {
            continue;
        }
        let Some(snippet) = &node.code_snippet else {
            continue;
        };
        if SQL_VERB.is_match(snippet) {
            new_edges.push(Edge::new(node.id.clone(), DB_GENERIC_ID.to_string(), EdgeType::DbQuery));
        }
    }
    if !new_edges.is_empty() && !nodes.iter().any(|n| n.id == DB_GENERIC_ID) {
        nodes.push(Node::new(DB_GENERIC_ID, NodeType::Component, "db", "", LanguageTag::NotApplicable));
    }
    edges.extend(new_edges);
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::node_id;

    #[test]
    fn links_a_raw_sql_literal_to_the_generic_db_node() {
        let mut nodes = vec![Node::new(node_id("function", "listUsers", "svc.ts", None), NodeType::Function, "listUsers", "svc.ts", LanguageTag::TypeScript)
            .with_snippet("function listUsers() { return db.query(\"SELECT * FROM users\"); }")];
        let mut edges = Vec::new();
        link_generic(&mut nodes, &mut edges);
        assert_eq!(edges.len(), 1);
        assert!(nodes.iter().any(|n| n.id == DB_GENERIC_ID));
    }
}
