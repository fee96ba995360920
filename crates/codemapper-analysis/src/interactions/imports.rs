// ABOUTME: IMPORTS resolution (§4.D.a): rewrites the raw specifier string a
// ABOUTME: strategy left as an edge's targetId into a resolved File node id.
// ABOUTME: Specifiers that resolve to nothing discovered (external packages,
// ABOUTME: stdlib, venv-only modules) drop their edge rather than dangle.

use super::LinkContext;
use codemapper_core::{Edge, EdgeType, LanguageTag, Node, NodeType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

struct FileIndex {
    by_path: HashMap<String, String>,
}

impl FileIndex {
    fn from_nodes(nodes: &[Node]) -> Self {
        let by_path = nodes
            .iter()
            .filter(|n| n.node_type == NodeType::File)
            .map(|n| (n.file_path.clone(), n.id.clone()))
            .collect();
        Self { by_path }
    }

    fn find(&self, candidates: &[String]) -> Option<String> {
        candidates.iter().find_map(|c| self.by_path.get(c).cloned())
    }

    fn find_under_dir(&self, dirs: &[String]) -> Option<String> {
        for dir in dirs {
            let prefix = format!("{dir}/");
            if let Some(id) = self.by_path.iter().find(|(p, _)| p.starts_with(&prefix) && p.ends_with(".go")).map(|(_, id)| id.clone()) {
                return Some(id);
            }
        }
        None
    }
}

pub fn resolve(nodes: &[Node], edges: &mut Vec<Edge>, ctx: &LinkContext) {
    let file_index = FileIndex::from_nodes(nodes);
    let node_by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let ts_paths = tsconfig_paths(ctx.root);
    let go_module = read_go_mod(ctx.root);

    edges.retain_mut(|edge| {
        if edge.edge_type != EdgeType::Imports {
            return true;
        }
        let Some(source) = node_by_id.get(edge.source_id.as_str()) else {
            return false;
        };
        let dir = parent_dir(&source.file_path);
        let specifier = edge.target_id.clone();

        let resolved = match source.language {
            LanguageTag::TypeScript | LanguageTag::JavaScript => resolve_js(&specifier, &dir, &ts_paths, &file_index),
            LanguageTag::Python => file_index.find(&python_candidates(&specifier)),
            LanguageTag::Java => file_index.find(&java_candidates(&specifier, &file_index)),
            LanguageTag::Go => go_module.as_ref().and_then(|m| file_index.find_under_dir(&go_candidates(&specifier, m))),
            _ => None,
        };

        match resolved {
            Some(target) => {
                edge.target_id = target;
                true
            }
            None => false,
        }
    });
}

fn resolve_js(specifier: &str, dir: &str, ts_paths: &HashMap<String, String>, file_index: &FileIndex) -> Option<String> {
    if specifier.starts_with('.') {
        return file_index.find(&js_candidates(dir, specifier));
    }
    for (alias, target) in ts_paths {
        if let Some(rest) = specifier.strip_prefix(alias.as_str()) {
            let joined = format!("{}{}", target.trim_end_matches('/'), rest);
            if let Some(found) = file_index.find(&js_candidates("", &format!("./{joined}"))) {
                return Some(found);
            }
        }
    }
    None
}

fn js_candidates(dir: &str, specifier: &str) -> Vec<String> {
    let joined = normalize_join(dir, specifier);
    let mut out = Vec::with_capacity(9);
    for ext in ["", ".ts", ".tsx", ".js", ".jsx"] {
        out.push(format!("{joined}{ext}"));
    }
    for ext in ["ts", "tsx", "js", "jsx"] {
        out.push(format!("{joined}/index.{ext}"));
    }
    out
}

fn python_candidates(specifier: &str) -> Vec<String> {
    let path = specifier.replace('.', "/");
    vec![format!("{path}.py"), format!("{path}/__init__.py")]
}

fn java_candidates(specifier: &str, file_index: &FileIndex) -> Vec<String> {
    let path = specifier.replace('.', "/");
    let mut out = vec![format!("src/main/java/{path}.java"), format!("src/test/java/{path}.java")];
    let suffix = format!("/{path}.java");
    if let Some(found) = file_index.by_path.keys().find(|p| p.ends_with(&suffix)) {
        out.push(found.clone());
    }
    out
}

struct GoModule {
    name: String,
    replace: HashMap<String, String>,
}

static GO_MODULE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^module\s+(\S+)").unwrap());
static GO_REPLACE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*(\S+)\s*=>\s*(\S+)").unwrap());

fn read_go_mod(root: &Path) -> Option<GoModule> {
    let text = fs::read_to_string(root.join("go.mod")).ok()?;
    let name = GO_MODULE_LINE.captures(&text)?[1].to_string();
    let replace = GO_REPLACE_LINE
        .captures_iter(&text)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect();
    Some(GoModule { name, replace })
}

fn go_candidates(specifier: &str, module: &GoModule) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(rest) = specifier.strip_prefix(module.name.as_str()) {
        out.push(rest.trim_start_matches('/').to_string());
    }
    for (from, to) in &module.replace {
        if let Some(rest) = specifier.strip_prefix(from.as_str()) {
            let rest = rest.trim_start_matches('/');
            let target = to.trim_start_matches("./");
            out.push(if rest.is_empty() { target.to_string() } else { format!("{target}/{rest}") });
        }
    }
    out
}

/// tsconfig.json `compilerOptions.paths` alias table, first target only.
fn tsconfig_paths(root: &Path) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(text) = fs::read_to_string(root.join("tsconfig.json")) else {
        return map;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
        return map;
    };
    let Some(paths) = value.get("compilerOptions").and_then(|c| c.get("paths")).and_then(|p| p.as_object()) else {
        return map;
    };
    for (alias, targets) in paths {
        if let Some(first) = targets.as_array().and_then(|a| a.first()).and_then(|v| v.as_str()) {
            map.insert(alias.trim_end_matches("/*").to_string(), first.trim_end_matches("/*").to_string());
        }
    }
    map
}

fn normalize_join(dir: &str, specifier: &str) -> String {
    let mut parts: Vec<&str> = if dir.is_empty() { vec![] } else { dir.split('/').collect() };
    for seg in specifier.split('/') {
        match seg {
            "." | "" => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

fn parent_dir(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use codemapper_core::{file_node_id, LanguageTag};

    fn file_node(path: &str, language: LanguageTag) -> Node {
        Node::new(file_node_id(path), NodeType::File, path, path, language)
    }

    #[test]
    fn resolves_a_relative_typescript_import() {
        let dir = tempfile::tempdir().unwrap();
        let a = file_node("src/app.ts", LanguageTag::TypeScript);
        let b = file_node("src/util.ts", LanguageTag::TypeScript);
        let nodes = vec![a.clone(), b.clone()];
        let mut edges = vec![Edge::new(a.id.clone(), "./util".to_string(), EdgeType::Imports)];
        let calls = Vec::new();
        let config = AnalysisConfig::default();
        let ctx = LinkContext { root: dir.path(), exports_by_file: &HashMap::new(), calls: &calls, config: &config };

        resolve(&nodes, &mut edges, &ctx);
        assert_eq!(edges[0].target_id, b.id);
    }

    #[test]
    fn drops_unresolvable_external_package_imports() {
        let dir = tempfile::tempdir().unwrap();
        let a = file_node("src/app.ts", LanguageTag::TypeScript);
        let nodes = vec![a.clone()];
        let mut edges = vec![Edge::new(a.id.clone(), "react".to_string(), EdgeType::Imports)];
        let calls = Vec::new();
        let config = AnalysisConfig::default();
        let ctx = LinkContext { root: dir.path(), exports_by_file: &HashMap::new(), calls: &calls, config: &config };

        resolve(&nodes, &mut edges, &ctx);
        assert!(edges.is_empty());
    }
}
