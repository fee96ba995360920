// ABOUTME: Analysis-time configuration consumed by the interaction analyzer (§6):
// ABOUTME: the rules that scope API_CALL synthesis to a frontend/backend root pair.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default)]
    pub interaction_rules: Vec<InteractionRule>,
}

/// Pairs a frontend root with a backend root for API_CALL synthesis: only
/// calls whose caller file sits under `frontend.path` are matched against
/// routes whose file sits under `backend.path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRule {
    #[serde(rename = "type", default = "default_rule_type")]
    pub rule_type: String,
    pub frontend: FrontendRoot,
    pub backend: BackendRoot,
}

fn default_rule_type() -> String {
    "API_CALL".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendRoot {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendRoot {
    pub path: String,
}
