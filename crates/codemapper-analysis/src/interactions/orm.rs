// ABOUTME: ORM lineage heuristic (§4.D.d): Prisma query call sites and
// ABOUTME: Sequelize/SQLAlchemy model *definition* sites resolve to synthetic
// ABOUTME: `table:<name>` nodes, typed READS_FROM/WRITES_TO rather than the
// ABOUTME: generic DB_QUERY edge.

use codemapper_core::{table_id, Edge, EdgeType, LanguageTag, Node, NodeType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static PRISMA_READ: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bprisma\.(\w+)\.(findMany|findUnique|findFirst|count|aggregate)\b").unwrap());
static PRISMA_WRITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bprisma\.(\w+)\.(create|update|delete|upsert|createMany|updateMany|deleteMany)\b").unwrap());
static SEQUELIZE_DEFINE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\.define\(\s*['"](\w+)['"]"#).unwrap());
static SQLALCHEMY_TABLENAME: Lazy<Regex> = Lazy::new(|| Regex::new(r#"__tablename__\s*=\s*['"](\w+)['"]"#).unwrap());

pub fn link(nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) {
    let existing: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
    let mut to_create: HashSet<String> = HashSet::new();
    let mut new_edges = Vec::new();

    for node in nodes.iter() {
        if !matches!(node.language, LanguageTag::TypeScript | LanguageTag::JavaScript | LanguageTag::Python) {
            continue;
        }
        let Some(snippet) = &node.code_snippet else {
            continue;
        };
        for caps in PRISMA_READ.captures_iter(snippet) {
            emit(&caps[1], node, EdgeType::ReadsFrom, &existing, &mut to_create, &mut new_edges);
        }
        for caps in PRISMA_WRITE.captures_iter(snippet) {
            emit(&caps[1], node, EdgeType::WritesTo, &existing, &mut to_create, &mut new_edges);
        }
        for caps in SEQUELIZE_DEFINE.captures_iter(snippet) {
            emit(&caps[1], node, EdgeType::WritesTo, &existing, &mut to_create, &mut new_edges);
        }
        for caps in SQLALCHEMY_TABLENAME.captures_iter(snippet) {
            emit(&caps[1], node, EdgeType::WritesTo, &existing, &mut to_create, &mut new_edges);
        }
    }

    for table in to_create {
        let label = table.trim_start_matches("table:").to_string();
        nodes.push(Node::new(table, NodeType::Component, label, "", LanguageTag::NotApplicable));
    }
    edges.extend(new_edges);
}

fn emit(model: &str, caller: &Node, edge_type: EdgeType, existing: &HashSet<String>, to_create: &mut HashSet<String>, edges: &mut Vec<Edge>) {
    let id = table_id(&model.to_lowercase());
    if !existing.contains(&id) {
        to_create.insert(id.clone());
    }
    edges.push(Edge::new(caller.id.clone(), id, edge_type));
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::node_id;

    #[test]
    fn links_a_prisma_read_to_a_synthetic_table_node() {
        let mut nodes = vec![Node::new(node_id("function", "getUser", "svc.ts", None), NodeType::Function, "getUser", "svc.ts", LanguageTag::TypeScript)
            .with_snippet("async function getUser(id) { return prisma.user.findUnique({ where: { id } }); }")];
        let mut edges = Vec::new();
        link(&mut nodes, &mut edges);
        assert_eq!(edges.len(), 1);
        assert!(matches!(edges[0].edge_type, EdgeType::ReadsFrom));
        assert!(nodes.iter().any(|n| n.id == table_id("user")));
    }

    #[test]
    fn links_a_sequelize_model_definition_to_a_synthetic_table_node() {
        let mut nodes = vec![Node::new(node_id("class", "User", "models/user.js", None), NodeType::Class, "User", "models/user.js", LanguageTag::JavaScript)
            .with_snippet("const User = sequelize.define('users', { name: DataTypes.STRING });")];
        let mut edges = Vec::new();
        link(&mut nodes, &mut edges);
        assert_eq!(edges.len(), 1);
        assert!(matches!(edges[0].edge_type, EdgeType::WritesTo));
        assert!(nodes.iter().any(|n| n.id == table_id("users")));
    }

    #[test]
    fn links_a_sqlalchemy_tablename_to_a_synthetic_table_node() {
        let mut nodes = vec![Node::new(node_id("class", "User", "models/user.py", None), NodeType::Class, "User", "models/user.py", LanguageTag::Python)
            .with_snippet("class User(Base):\n    __tablename__ = 'users'\n")];
        let mut edges = Vec::new();
        link(&mut nodes, &mut edges);
        assert_eq!(edges.len(), 1);
        assert!(matches!(edges[0].edge_type, EdgeType::WritesTo));
        assert!(nodes.iter().any(|n| n.id == table_id("users")));
    }
}
