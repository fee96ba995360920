// ABOUTME: Code quality analyzer (§4.E): read-only heuristics over the
// ABOUTME: finalized node/edge graph, producing the eight statistics buckets.

pub mod anomalies;
pub mod blocking_async;
pub mod code_smells;
pub mod dead_code;
pub mod loops;
pub mod repeated_code;
pub mod technical_debt;

use codemapper_core::{Edge, Node, NodeType, Statistics};

pub fn compute(nodes: &[Node], edges: &[Edge]) -> Statistics {
    let loop_scope: Vec<&Node> = nodes.iter().filter(|n| matches!(n.node_type, NodeType::Function | NodeType::ApiRoute)).collect();
    Statistics {
        db_queries_in_loops: loops::db_queries_in_loops(&loop_scope),
        n_plus_one_queries: loops::n_plus_one_queries(&loop_scope),
        dead_code: dead_code::compute(nodes, edges),
        technical_debt: technical_debt::compute(nodes),
        code_smells: code_smells::compute(nodes),
        repeated_code: repeated_code::compute(nodes),
        anomalies: anomalies::compute(nodes),
        blocking_async: blocking_async::compute(nodes),
    }
}
