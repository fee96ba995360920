// ABOUTME: Shared strategy for C++ / C# / Rust / PHP / Ruby / Dart (§4.A): declarations via
// ABOUTME: tree-sitter where a grammar exists, framework route detection via regex on raw text.

use crate::common::{enclosing_declaration_text, file_node, node_text, walk_all};
use crate::extraction::{AnalysisContext, ExtractionResult};
use codemapper_core::{node_id, Edge, EdgeType, LanguageTag, Metadata, Node, NodeType, RouteMeta};
use once_cell::sync::Lazy;
use regex::Regex;

struct DeclKind {
    kind: &'static str,
    node_type: NodeType,
}

fn decl_kinds(language: &LanguageTag) -> &'static [DeclKind] {
    match language {
        LanguageTag::Rust => &[
            DeclKind { kind: "struct_item", node_type: NodeType::Class },
            DeclKind { kind: "enum_item", node_type: NodeType::Class },
            DeclKind { kind: "trait_item", node_type: NodeType::Class },
            DeclKind { kind: "function_item", node_type: NodeType::Function },
        ],
        LanguageTag::Cpp => &[
            DeclKind { kind: "class_specifier", node_type: NodeType::Class },
            DeclKind { kind: "struct_specifier", node_type: NodeType::Class },
            DeclKind { kind: "enum_specifier", node_type: NodeType::Class },
            DeclKind { kind: "function_definition", node_type: NodeType::Function },
            DeclKind { kind: "namespace_definition", node_type: NodeType::Class },
        ],
        LanguageTag::CSharp => &[
            DeclKind { kind: "class_declaration", node_type: NodeType::Class },
            DeclKind { kind: "struct_declaration", node_type: NodeType::Class },
            DeclKind { kind: "interface_declaration", node_type: NodeType::Class },
            DeclKind { kind: "enum_declaration", node_type: NodeType::Class },
            DeclKind { kind: "method_declaration", node_type: NodeType::Function },
        ],
        LanguageTag::Php => &[
            DeclKind { kind: "class_declaration", node_type: NodeType::Class },
            DeclKind { kind: "interface_declaration", node_type: NodeType::Class },
            DeclKind { kind: "trait_declaration", node_type: NodeType::Class },
            DeclKind { kind: "function_definition", node_type: NodeType::Function },
            DeclKind { kind: "method_declaration", node_type: NodeType::Function },
        ],
        LanguageTag::Ruby => &[
            DeclKind { kind: "class", node_type: NodeType::Class },
            DeclKind { kind: "module", node_type: NodeType::Class },
            DeclKind { kind: "method", node_type: NodeType::Function },
            DeclKind { kind: "singleton_method", node_type: NodeType::Function },
        ],
        _ => &[],
    }
}

static ASPNET_ATTR_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[Http(Get|Post|Put|Delete|Patch)\s*\(\s*"([^"]*)"\s*\)\]"#).unwrap()
});
static ASPNET_MAP_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\.Map(Get|Post|Put|Delete|Patch)\s*\(\s*"([^"]*)""#).unwrap()
});
static LARAVEL_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"Route::(get|post|put|delete|patch)\s*\(\s*['"]([^'"]*)['"]"#).unwrap()
});
static RAILS_CONTROLLER_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+(\w+Controller)\s*<\s*ApplicationController").unwrap());
static RAILS_ACTION_METHOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"def\s+(index|show|create|update|destroy|edit|new)\b").unwrap());
static SINATRA_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(get|post|put|delete|patch)\s+['"]([^'"]*)['"]"#).unwrap()
});
static FLUTTER_WIDGET_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+(\w+)\s+extends\s+(StatelessWidget|StatefulWidget)").unwrap());
static FLUTTER_ROUTES_MAP: Lazy<Regex> = Lazy::new(|| Regex::new(r#"routes\s*:\s*\{([^}]*)\}"#).unwrap());
static FLUTTER_ROUTE_ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"]([^'"]*)['"]\s*:"#).unwrap());

pub fn analyze(ctx: &AnalysisContext) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let file = file_node(ctx);
    let file_id = file.id.clone();
    result.nodes.push(file);

    if let Some(tree) = ctx.tree {
        let kinds = decl_kinds(&ctx.language);
        walk_all(tree.root_node(), |node| {
            if let Some(decl) = kinds.iter().find(|d| d.kind == node.kind()) {
                if let Some(name) = decl_name(node, ctx.source) {
                    push_node(&mut result, ctx, node, &name, decl.node_type);
                }
            }
        });
    } else if matches!(ctx.language, LanguageTag::Dart | LanguageTag::Ruby) {
        extract_declarations_by_regex(ctx, &mut result);
    } else {
        return result;
    }

    extract_framework_routes(ctx, &file_id, &mut result);
    result
}

fn decl_name<'a>(node: tree_sitter::Node<'a>, source: &'a str) -> Option<String> {
    node.child_by_field_name("name").map(|n| node_text(n, source).to_string())
}

fn push_node(result: &mut ExtractionResult, ctx: &AnalysisContext, node: tree_sitter::Node, name: &str, node_type: NodeType) {
    let snippet = enclosing_declaration_text(node, ctx.source).to_string();
    let kind_key = if node_type == NodeType::Function { "function" } else { "class" };
    let id = node_id(kind_key, name, ctx.file_path, None);
    result.exports.insert(name.to_string(), id.clone());
    result
        .nodes
        .push(Node::new(id, node_type, name.to_string(), ctx.file_path, ctx.language.clone()).with_snippet(snippet));
}

static DART_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"class\s+(\w+)").unwrap());
static RUBY_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"class\s+(\w+)").unwrap());
static RUBY_DEF: Lazy<Regex> = Lazy::new(|| Regex::new(r"def\s+(self\.)?(\w+)").unwrap());

fn extract_declarations_by_regex(ctx: &AnalysisContext, result: &mut ExtractionResult) {
    let class_re = if matches!(ctx.language, LanguageTag::Dart) { &DART_CLASS } else { &RUBY_CLASS };
    for caps in class_re.captures_iter(ctx.source) {
        let name = caps[1].to_string();
        let id = node_id("class", &name, ctx.file_path, None);
        result.exports.insert(name.clone(), id.clone());
        result.nodes.push(Node::new(id, NodeType::Class, name, ctx.file_path, ctx.language.clone()));
    }
    if matches!(ctx.language, LanguageTag::Ruby) {
        for caps in RUBY_DEF.captures_iter(ctx.source) {
            let name = caps[2].to_string();
            let id = node_id("function", &name, ctx.file_path, None);
            result.exports.insert(name.clone(), id.clone());
            result.nodes.push(Node::new(id, NodeType::Function, name, ctx.file_path, ctx.language.clone()));
        }
    }
}

fn extract_framework_routes(ctx: &AnalysisContext, file_id: &str, result: &mut ExtractionResult) {
    match ctx.language {
        LanguageTag::CSharp => {
            for caps in ASPNET_ATTR_ROUTE.captures_iter(ctx.source) {
                emit_route(result, ctx, file_id, &caps[2], "ASP.NET", &caps[1].to_uppercase());
            }
            for caps in ASPNET_MAP_ROUTE.captures_iter(ctx.source) {
                emit_route(result, ctx, file_id, &caps[2], "ASP.NET", &caps[1].to_uppercase());
            }
        }
        LanguageTag::Php => {
            for caps in LARAVEL_ROUTE.captures_iter(ctx.source) {
                emit_route(result, ctx, file_id, &caps[2], "Laravel", &caps[1].to_uppercase());
            }
        }
        LanguageTag::Ruby => {
            if RAILS_CONTROLLER_CLASS.is_match(ctx.source) {
                for caps in RAILS_ACTION_METHOD.captures_iter(ctx.source) {
                    let action = &caps[1];
                    let method = match action {
                        "index" | "show" => "GET",
                        "create" => "POST",
                        "update" => "PUT",
                        "destroy" => "DELETE",
                        _ => "GET",
                    };
                    let path = format!("/{action}");
                    emit_route(result, ctx, file_id, &path, "Rails", method);
                }
            }
            for line in ctx.source.lines() {
                if let Some(caps) = SINATRA_ROUTE.captures(line) {
                    emit_route(result, ctx, file_id, &caps[2], "Sinatra", &caps[1].to_uppercase());
                }
            }
        }
        LanguageTag::Dart => {
            for caps in FLUTTER_WIDGET_CLASS.captures_iter(ctx.source) {
                let name = caps[1].to_string();
                let id = node_id("component", &name, ctx.file_path, None);
                result.nodes.push(Node::new(id, NodeType::Component, name, ctx.file_path, ctx.language.clone()));
            }
            if let Some(caps) = FLUTTER_ROUTES_MAP.captures(ctx.source) {
                for entry in FLUTTER_ROUTE_ENTRY.captures_iter(&caps[1]) {
                    emit_route(result, ctx, file_id, &entry[1], "Flutter", "ANY");
                }
            }
        }
        _ => {}
    }
}

fn emit_route(result: &mut ExtractionResult, ctx: &AnalysisContext, file_id: &str, path: &str, framework: &str, method: &str) {
    let id = node_id("apiroute", &format!("{path}:{method}"), ctx.file_path, None);
    let meta = Metadata::Route(RouteMeta {
        framework: framework.to_string(),
        http_method: Some(method.to_string()),
        extra: Default::default(),
    });
    result.nodes.push(
        Node::new(id.clone(), NodeType::ApiRoute, path.to_string(), ctx.file_path, ctx.language.clone())
            .with_metadata(meta),
    );
    result.edges.push(Edge::new(file_id.to_string(), id, EdgeType::References));
}
