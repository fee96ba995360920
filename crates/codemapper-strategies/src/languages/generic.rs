// ABOUTME: Fallback strategy for languages with no dedicated extraction logic
// ABOUTME: (Kotlin, Swift, Scala, Lua, Proto, Dockerfile) and for any AST-only
// ABOUTME: strategy handed a stub tree it cannot operate on (B2).

use crate::common::file_node;
use crate::extraction::{AnalysisContext, ExtractionResult};

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    ExtractionResult {
        nodes: vec![file_node(ctx)],
        ..Default::default()
    }
}
