// ABOUTME: GraphQL SDL strategy (§4.A): emits only the File node. Synthesizing
// ABOUTME: the schema REFERENCES edge requires seeing resolver files too, so
// ABOUTME: that linkage is the interaction analyzer's job, not this strategy's.

use crate::common::file_node;
use crate::extraction::{AnalysisContext, ExtractionResult};

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    ExtractionResult {
        nodes: vec![file_node(ctx)],
        ..Default::default()
    }
}
