// ABOUTME: Interaction analyzer (§4.D): cross-file linkage passes that resolve
// ABOUTME: the raw nodes/edges/calls the parser produced into final edges.

pub mod api_call;
pub mod db;
pub mod graphql;
pub mod helm_kustomize;
pub mod imports;
pub mod k8s;
pub mod orm;
pub mod terraform;

use crate::config::AnalysisConfig;
use codemapper_core::CallSite;
use std::collections::HashMap;
use std::path::Path;

/// Read-only context threaded through every linkage pass.
pub struct LinkContext<'a> {
    pub root: &'a Path,
    pub exports_by_file: &'a HashMap<String, HashMap<String, String>>,
    pub calls: &'a [CallSite],
    pub config: &'a AnalysisConfig,
}
