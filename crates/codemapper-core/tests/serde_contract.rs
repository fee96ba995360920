use codemapper_core::{CodeMap, Edge, EdgeType, LanguageTag, Node, NodeType};
use codemapper_core::statistics::Statistics;

#[test]
fn node_serializes_with_camel_case_fields_and_api_route_type() {
    let node = Node::new(
        "abc123",
        NodeType::ApiRoute,
        "/api/users",
        "src/server.js",
        LanguageTag::JavaScript,
    );
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["filePath"], "src/server.js");
    assert_eq!(json["type"], "APIRoute");
    assert_eq!(json["language"], "JavaScript");
    assert!(json.get("codeSnippet").is_none());
}

#[test]
fn edge_serializes_type_as_screaming_snake_case() {
    let edge = Edge::new("a", "b", EdgeType::ApiCall);
    let json = serde_json::to_value(&edge).unwrap();
    assert_eq!(json["sourceId"], "a");
    assert_eq!(json["targetId"], "b");
    assert_eq!(json["type"], "API_CALL");
}

#[test]
fn code_map_round_trips_through_json() {
    let map = CodeMap {
        version: "1".into(),
        generated_at: chrono::Utc::now(),
        generator: "codemapper".into(),
        commit: None,
        nodes: vec![Node::new(
            "n1",
            NodeType::File,
            "main.rs",
            "src/main.rs",
            LanguageTag::Rust,
        )],
        edges: vec![],
        statistics: Statistics::default(),
    };
    let json = serde_json::to_string(&map).unwrap();
    let parsed: CodeMap = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(parsed.nodes[0].file_path, "src/main.rs");
}
