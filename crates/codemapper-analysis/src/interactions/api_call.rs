// ABOUTME: API_CALL synthesis (§4.D.b): for each configured frontend/backend
// ABOUTME: rule, matches fetch/axios call sites under the frontend root against
// ABOUTME: APIRoute nodes under the backend root, substituting `.env` values and
// ABOUTME: normalizing `:name`/`{name}` route params to `[^/]+` before matching.

use super::LinkContext;
use codemapper_core::{Edge, EdgeType, Node, NodeType};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

static FETCH_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"fetch\s*\(\s*(`|'|\x22)(.*?)\1").unwrap());
static AXIOS_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"axios(?:\.(get|post|put|delete|patch))?\s*\(\s*(`|'|\x22)(.*?)\2").unwrap());
static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"process\.env\.([A-Z0-9_]+)").unwrap());
static INTERP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").unwrap());
static SCHEME_HOST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^/]*").unwrap());

pub fn synthesize(nodes: &mut [Node], edges: &mut Vec<Edge>, ctx: &LinkContext) {
    if ctx.config.interaction_rules.is_empty() {
        return;
    }
    let routes: Vec<(String, String, String)> = nodes
        .iter()
        .filter(|n| n.node_type == NodeType::ApiRoute)
        .map(|n| (n.file_path.clone(), n.label.clone(), n.id.clone()))
        .collect();
    if routes.is_empty() {
        return;
    }
    let env = read_dotenv(ctx.root);

    for rule in &ctx.config.interaction_rules {
        let backend_routes: Vec<(String, String)> = routes
            .iter()
            .filter(|(file, _, _)| under_root(file, &rule.backend.path))
            .map(|(_, label, id)| (label.clone(), id.clone()))
            .collect();
        if backend_routes.is_empty() {
            continue;
        }

        for call in ctx.calls {
            if !under_root(&call.caller_file, &rule.frontend.path) {
                continue;
            }
            let Some(raw_path) = extract_call_path(&call.raw) else {
                continue;
            };
            let substituted = substitute(&raw_path, &env);
            let mut normalized = normalize_call_path(&substituted);
            if let Some(prefix) = &rule.frontend.url_prefix {
                normalized = normalize_call_path(&format!("{}{}", prefix.trim_end_matches('/'), normalized));
            }
            if let Some(route_id) = match_route(&normalized, &backend_routes) {
                edges.push(Edge::new(call.caller_id.clone(), route_id, EdgeType::ApiCall));
            }
        }
    }
}

/// Whether `path` sits at or under `root`. An empty root matches everything,
/// so a rule can scope a frontend/backend pair to the whole project tree.
fn under_root(path: &str, root: &str) -> bool {
    let root = root.trim_matches('/');
    if root.is_empty() {
        return true;
    }
    path == root || path.starts_with(&format!("{root}/"))
}

fn extract_call_path(raw: &str) -> Option<String> {
    if let Some(caps) = FETCH_CALL.captures(raw) {
        return Some(caps[2].to_string());
    }
    if let Some(caps) = AXIOS_CALL.captures(raw) {
        return Some(caps[3].to_string());
    }
    None
}

fn substitute(path: &str, env: &HashMap<String, String>) -> String {
    INTERP
        .replace_all(path, |caps: &Captures| {
            let expr = caps[1].trim();
            if let Some(env_caps) = ENV_VAR.captures(expr) {
                if let Some(value) = env.get(&env_caps[1]) {
                    return value.clone();
                }
            }
            String::new()
        })
        .to_string()
}

/// Strips a URL's scheme+host down to its path component, collapses duplicate
/// slashes, forces a leading slash, and strips any trailing slash.
fn normalize_call_path(path: &str) -> String {
    let without_host = SCHEME_HOST.replace(path, "");
    let mut collapsed = String::with_capacity(without_host.len());
    let mut last_was_slash = false;
    for c in without_host.chars() {
        if c == '/' {
            if last_was_slash {
                continue;
            }
            last_was_slash = true;
        } else {
            last_was_slash = false;
        }
        collapsed.push(c);
    }
    let collapsed = if collapsed.starts_with('/') { collapsed } else { format!("/{collapsed}") };
    if collapsed.len() > 1 {
        collapsed.trim_end_matches('/').to_string()
    } else {
        collapsed
    }
}

fn match_route(path: &str, routes: &[(String, String)]) -> Option<String> {
    routes.iter().find_map(|(label, id)| {
        let pattern = route_pattern(label);
        Regex::new(&pattern).ok().filter(|re| re.is_match(path)).map(|_| id.clone())
    })
}

fn route_pattern(label: &str) -> String {
    let mut out = String::from("^");
    for seg in label.split('/') {
        if seg.is_empty() {
            continue;
        }
        out.push('/');
        if seg.starts_with(':') || (seg.starts_with('{') && seg.ends_with('}')) {
            out.push_str("[^/]+");
        } else {
            out.push_str(&regex::escape(seg));
        }
    }
    out.push('$');
    out
}

fn read_dotenv(root: &Path) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if let Ok(text) = fs::read_to_string(root.join(".env")) {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                map.insert(key.trim().to_string(), value.trim().trim_matches('"').trim_matches('\'').to_string());
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, BackendRoot, FrontendRoot, InteractionRule};
    use codemapper_core::{node_id, CallSite, LanguageTag, Metadata, RouteMeta};

    fn rule(frontend_path: &str, url_prefix: Option<&str>, backend_path: &str) -> InteractionRule {
        InteractionRule {
            rule_type: "API_CALL".to_string(),
            frontend: FrontendRoot { path: frontend_path.to_string(), url_prefix: url_prefix.map(str::to_string) },
            backend: BackendRoot { path: backend_path.to_string() },
        }
    }

    #[test]
    fn matches_a_fetch_call_against_a_parameterized_route() {
        let dir = tempfile::tempdir().unwrap();
        let route_id = node_id("apiroute", "/users/:id:GET", "server/routes.ts", None);
        let mut nodes = vec![Node::new(route_id.clone(), NodeType::ApiRoute, "/users/:id", "server/routes.ts", LanguageTag::TypeScript)
            .with_metadata(Metadata::Route(RouteMeta { framework: "Express".into(), http_method: Some("GET".into()), extra: Default::default() }))];
        let mut edges = Vec::new();
        let calls = vec![CallSite {
            caller_id: "caller".to_string(),
            raw: "fetch(`/users/42`)".to_string(),
            qualifier: None,
            caller_file: "client/app.ts".to_string(),
        }];
        let config = AnalysisConfig { interaction_rules: vec![rule("client", None, "server")] };
        let ctx = LinkContext { root: dir.path(), exports_by_file: &HashMap::new(), calls: &calls, config: &config };

        synthesize(&mut nodes, &mut edges, &ctx);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target_id, route_id);
    }

    #[test]
    fn ignores_calls_outside_the_configured_frontend_root() {
        let dir = tempfile::tempdir().unwrap();
        let route_id = node_id("apiroute", "/users:GET", "server/routes.ts", None);
        let mut nodes = vec![Node::new(route_id, NodeType::ApiRoute, "/users", "server/routes.ts", LanguageTag::TypeScript)
            .with_metadata(Metadata::Route(RouteMeta { framework: "Express".into(), http_method: Some("GET".into()), extra: Default::default() }))];
        let mut edges = Vec::new();
        let calls = vec![CallSite {
            caller_id: "caller".to_string(),
            raw: "fetch(`/users`)".to_string(),
            qualifier: None,
            caller_file: "scripts/seed.ts".to_string(),
        }];
        let config = AnalysisConfig { interaction_rules: vec![rule("client", None, "server")] };
        let ctx = LinkContext { root: dir.path(), exports_by_file: &HashMap::new(), calls: &calls, config: &config };

        synthesize(&mut nodes, &mut edges, &ctx);
        assert!(edges.is_empty());
    }

    #[test]
    fn applies_a_configured_url_prefix_before_matching() {
        let dir = tempfile::tempdir().unwrap();
        let route_id = node_id("apiroute", "/api/users:GET", "server/routes.ts", None);
        let mut nodes = vec![Node::new(route_id.clone(), NodeType::ApiRoute, "/api/users", "server/routes.ts", LanguageTag::TypeScript)
            .with_metadata(Metadata::Route(RouteMeta { framework: "Express".into(), http_method: Some("GET".into()), extra: Default::default() }))];
        let mut edges = Vec::new();
        let calls = vec![CallSite {
            caller_id: "caller".to_string(),
            raw: "fetch(`/users`)".to_string(),
            qualifier: None,
            caller_file: "client/app.ts".to_string(),
        }];
        let config = AnalysisConfig { interaction_rules: vec![rule("client", Some("/api"), "server")] };
        let ctx = LinkContext { root: dir.path(), exports_by_file: &HashMap::new(), calls: &calls, config: &config };

        synthesize(&mut nodes, &mut edges, &ctx);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target_id, route_id);
    }

    #[test]
    fn strips_scheme_and_host_before_matching() {
        let dir = tempfile::tempdir().unwrap();
        let route_id = node_id("apiroute", "/users:GET", "server/routes.ts", None);
        let mut nodes = vec![Node::new(route_id.clone(), NodeType::ApiRoute, "/users", "server/routes.ts", LanguageTag::TypeScript)
            .with_metadata(Metadata::Route(RouteMeta { framework: "Express".into(), http_method: Some("GET".into()), extra: Default::default() }))];
        let mut edges = Vec::new();
        let calls = vec![CallSite {
            caller_id: "caller".to_string(),
            raw: "fetch(\"https://api.example.com/users\")".to_string(),
            qualifier: None,
            caller_file: "client/app.ts".to_string(),
        }];
        let config = AnalysisConfig { interaction_rules: vec![rule("client", None, "server")] };
        let ctx = LinkContext { root: dir.path(), exports_by_file: &HashMap::new(), calls: &calls, config: &config };

        synthesize(&mut nodes, &mut edges, &ctx);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target_id, route_id);
    }

    #[test]
    fn substitutes_a_dotenv_value_before_matching() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "API_BASE_URL=\n").unwrap();
        let route_id = node_id("apiroute", "/status:GET", "server/routes.ts", None);
        let mut nodes = vec![Node::new(route_id, NodeType::ApiRoute, "/status", "server/routes.ts", LanguageTag::TypeScript)
            .with_metadata(Metadata::Route(RouteMeta { framework: "Express".into(), http_method: Some("GET".into()), extra: Default::default() }))];
        let mut edges = Vec::new();
        let calls = vec![CallSite {
            caller_id: "caller".to_string(),
            raw: "fetch(`${process.env.API_BASE_URL}/status`)".to_string(),
            qualifier: None,
            caller_file: "client/app.ts".to_string(),
        }];
        let config = AnalysisConfig { interaction_rules: vec![rule("client", None, "server")] };
        let ctx = LinkContext { root: dir.path(), exports_by_file: &HashMap::new(), calls: &calls, config: &config };

        synthesize(&mut nodes, &mut edges, &ctx);
        assert_eq!(edges.len(), 1);
    }
}
