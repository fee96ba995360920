// ABOUTME: GraphQL SDL linkage (§4.D.h): every `.graphql`/`.gql` file gets a
// ABOUTME: REFERENCES edge to a single synthetic `graphql:schema` node.

use codemapper_core::{Edge, EdgeType, LanguageTag, Node, NodeType, GRAPHQL_SCHEMA_ID};

pub fn link(nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) {
    let schema_files: Vec<String> = nodes
        .iter()
        .filter(|n| n.language == LanguageTag::GraphQl && n.node_type == NodeType::File)
        .map(|n| n.id.clone())
        .collect();
    if schema_files.is_empty() {
        return;
    }
    if !nodes.iter().any(|n| n.id == GRAPHQL_SCHEMA_ID) {
        nodes.push(Node::new(GRAPHQL_SCHEMA_ID, NodeType::Component, "graphql-schema", "", LanguageTag::NotApplicable));
    }
    for id in schema_files {
        edges.push(Edge::new(id, GRAPHQL_SCHEMA_ID.to_string(), EdgeType::References));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::file_node_id;

    #[test]
    fn creates_the_schema_node_once_for_many_files() {
        let mut nodes = vec![
            Node::new(file_node_id("a.graphql"), NodeType::File, "a.graphql", "a.graphql", LanguageTag::GraphQl),
            Node::new(file_node_id("b.graphql"), NodeType::File, "b.graphql", "b.graphql", LanguageTag::GraphQl),
        ];
        let mut edges = Vec::new();
        link(&mut nodes, &mut edges);
        assert_eq!(edges.len(), 2);
        assert_eq!(nodes.iter().filter(|n| n.id == GRAPHQL_SCHEMA_ID).count(), 1);
    }
}
