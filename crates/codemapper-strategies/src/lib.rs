// ABOUTME: The Language Strategy Set (§4.A): one `analyze()` per language family,
// ABOUTME: selected by `dispatch()` from the closed `LanguageTag` enum.

pub mod common;
pub mod extraction;

pub mod languages {
    pub mod bash;
    pub mod generic;
    pub mod go;
    pub mod graphql;
    pub mod java;
    pub mod javascript;
    pub mod json;
    pub mod native;
    pub mod python;
    pub mod sql;
    pub mod terraform;
    pub mod web;
    pub mod yaml;
}

pub use extraction::{AnalysisContext, ExtractionResult};

use codemapper_core::LanguageTag;

/// Route an analysis context to its language strategy. Every arm here is the
/// single seam named by the closed `LanguageTag` enum (§6 REDESIGN FLAGS);
/// adding a language means adding both a variant and a match arm, nothing else.
pub fn dispatch(ctx: &AnalysisContext) -> ExtractionResult {
    match ctx.language {
        LanguageTag::TypeScript | LanguageTag::JavaScript => languages::javascript::analyze(ctx),
        LanguageTag::Python => languages::python::analyze(ctx),
        LanguageTag::Java => languages::java::analyze(ctx),
        LanguageTag::Go => languages::go::analyze(ctx),
        LanguageTag::Cpp
        | LanguageTag::CSharp
        | LanguageTag::Rust
        | LanguageTag::Php
        | LanguageTag::Ruby
        | LanguageTag::Dart => languages::native::analyze(ctx),
        LanguageTag::Yaml => languages::yaml::analyze(ctx),
        LanguageTag::Json => languages::json::analyze(ctx),
        LanguageTag::Terraform => languages::terraform::analyze(ctx),
        LanguageTag::Sql => languages::sql::analyze(ctx),
        LanguageTag::Bash => languages::bash::analyze(ctx),
        LanguageTag::Css | LanguageTag::Html => languages::web::analyze(ctx),
        LanguageTag::GraphQl => languages::graphql::analyze(ctx),
        LanguageTag::Kotlin
        | LanguageTag::Swift
        | LanguageTag::Scala
        | LanguageTag::Lua
        | LanguageTag::Proto
        | LanguageTag::Dockerfile
        | LanguageTag::NotApplicable
        | LanguageTag::Other(_) => languages::generic::analyze(ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemapper_core::NodeType;

    #[test]
    fn unmapped_language_emits_only_a_file_node() {
        let ctx = AnalysisContext {
            file_path: "main.kt",
            language: LanguageTag::Kotlin,
            source: "fun main() {}",
            tree: None,
        };
        let result = dispatch(&ctx);
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.nodes[0].node_type, NodeType::File);
    }

    #[test]
    fn python_without_tree_falls_back_to_file_node_only() {
        let ctx = AnalysisContext {
            file_path: "app.py",
            language: LanguageTag::Python,
            source: "def handler(): pass",
            tree: None,
        };
        let result = dispatch(&ctx);
        assert_eq!(result.nodes.len(), 1);
    }

    #[test]
    fn sql_create_table_emits_table_node_and_edge() {
        let ctx = AnalysisContext {
            file_path: "schema.sql",
            language: LanguageTag::Sql,
            source: "CREATE TABLE users (id INT PRIMARY KEY);",
            tree: None,
        };
        let result = dispatch(&ctx);
        assert!(result.nodes.iter().any(|n| n.label == "users"));
        assert!(!result.edges.is_empty());
    }
}
