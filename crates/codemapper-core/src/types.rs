// ABOUTME: The node/edge/code-map data model described in SPEC_FULL.md §3.
// ABOUTME: Field names are camelCase on the wire to match the JSON output contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::metadata::Metadata;

/// Closed enumeration of extension-derived language tags (§6). `Other` exists
/// purely so detection never has to fail outright; no strategy should ever
/// construct `Other` for a language this table names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageTag {
    TypeScript,
    JavaScript,
    Python,
    Java,
    Go,
    Html,
    Css,
    Cpp,
    CSharp,
    Rust,
    Dart,
    Php,
    Ruby,
    Kotlin,
    Swift,
    Scala,
    Lua,
    Bash,
    Yaml,
    Sql,
    Terraform,
    Proto,
    GraphQl,
    Json,
    Dockerfile,
    /// Synthetic nodes and genuinely unrecognized extensions.
    NotApplicable,
    Other(String),
}

impl LanguageTag {
    /// Extension (without leading dot) -> tag, per the closed table in §6.
    /// Returns `None` for extensions outside the table entirely (the file is
    /// then not discovered at all unless `onlyFiles` names it explicitly).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let tag = match ext.to_ascii_lowercase().as_str() {
            "ts" | "tsx" => LanguageTag::TypeScript,
            "js" | "jsx" => LanguageTag::JavaScript,
            "py" => LanguageTag::Python,
            "java" => LanguageTag::Java,
            "go" => LanguageTag::Go,
            "html" | "htm" => LanguageTag::Html,
            "css" => LanguageTag::Css,
            "cpp" | "cc" | "cxx" | "h" | "hpp" => LanguageTag::Cpp,
            "cs" => LanguageTag::CSharp,
            "rs" => LanguageTag::Rust,
            "dart" => LanguageTag::Dart,
            "php" => LanguageTag::Php,
            "rb" => LanguageTag::Ruby,
            "kt" | "kts" => LanguageTag::Kotlin,
            "swift" => LanguageTag::Swift,
            "scala" | "sc" => LanguageTag::Scala,
            "lua" => LanguageTag::Lua,
            "sh" | "bash" | "zsh" => LanguageTag::Bash,
            "yml" | "yaml" => LanguageTag::Yaml,
            "sql" => LanguageTag::Sql,
            "tf" => LanguageTag::Terraform,
            "proto" => LanguageTag::Proto,
            "graphql" | "gql" => LanguageTag::GraphQl,
            "json" => LanguageTag::Json,
            _ => return None,
        };
        Some(tag)
    }

    /// True for tags this workspace has a dedicated tree-sitter grammar for.
    pub fn has_tree_sitter_grammar(&self) -> bool {
        matches!(
            self,
            LanguageTag::Rust
                | LanguageTag::TypeScript
                | LanguageTag::JavaScript
                | LanguageTag::Python
                | LanguageTag::Go
                | LanguageTag::Java
                | LanguageTag::Cpp
                | LanguageTag::CSharp
                | LanguageTag::Ruby
                | LanguageTag::Php
        )
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LanguageTag::TypeScript => "TypeScript",
            LanguageTag::JavaScript => "JavaScript",
            LanguageTag::Python => "Python",
            LanguageTag::Java => "Java",
            LanguageTag::Go => "Go",
            LanguageTag::Html => "HTML",
            LanguageTag::Css => "CSS",
            LanguageTag::Cpp => "CPP",
            LanguageTag::CSharp => "CSharp",
            LanguageTag::Rust => "Rust",
            LanguageTag::Dart => "Dart",
            LanguageTag::Php => "PHP",
            LanguageTag::Ruby => "Ruby",
            LanguageTag::Kotlin => "Kotlin",
            LanguageTag::Swift => "Swift",
            LanguageTag::Scala => "Scala",
            LanguageTag::Lua => "Lua",
            LanguageTag::Bash => "Bash",
            LanguageTag::Yaml => "YAML",
            LanguageTag::Sql => "SQL",
            LanguageTag::Terraform => "Terraform",
            LanguageTag::Proto => "Proto",
            LanguageTag::GraphQl => "GraphQL",
            LanguageTag::Json => "JSON",
            LanguageTag::Dockerfile => "Dockerfile",
            LanguageTag::NotApplicable => "N/A",
            LanguageTag::Other(s) => s.as_str(),
        };
        write!(f, "{s}")
    }
}

impl FromStr for LanguageTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "TypeScript" => LanguageTag::TypeScript,
            "JavaScript" => LanguageTag::JavaScript,
            "Python" => LanguageTag::Python,
            "Java" => LanguageTag::Java,
            "Go" => LanguageTag::Go,
            "HTML" => LanguageTag::Html,
            "CSS" => LanguageTag::Css,
            "CPP" => LanguageTag::Cpp,
            "CSharp" => LanguageTag::CSharp,
            "Rust" => LanguageTag::Rust,
            "Dart" => LanguageTag::Dart,
            "PHP" => LanguageTag::Php,
            "Ruby" => LanguageTag::Ruby,
            "Kotlin" => LanguageTag::Kotlin,
            "Swift" => LanguageTag::Swift,
            "Scala" => LanguageTag::Scala,
            "Lua" => LanguageTag::Lua,
            "Bash" => LanguageTag::Bash,
            "YAML" => LanguageTag::Yaml,
            "SQL" => LanguageTag::Sql,
            "Terraform" => LanguageTag::Terraform,
            "Proto" => LanguageTag::Proto,
            "GraphQL" => LanguageTag::GraphQl,
            "JSON" => LanguageTag::Json,
            "Dockerfile" => LanguageTag::Dockerfile,
            "N/A" => LanguageTag::NotApplicable,
            other => LanguageTag::Other(other.to_string()),
        })
    }
}

impl Serialize for LanguageTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for LanguageTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(LanguageTag::from_str(&s).unwrap())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    File,
    Function,
    Class,
    Component,
    #[serde(rename = "APIRoute")]
    ApiRoute,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeType::File => "File",
            NodeType::Function => "Function",
            NodeType::Class => "Class",
            NodeType::Component => "Component",
            NodeType::ApiRoute => "APIRoute",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    Imports,
    Calls,
    ApiCall,
    DbQuery,
    References,
    MessagePublish,
    MessageConsume,
    RpcCall,
    GraphqlQuery,
    ReadsFrom,
    WritesTo,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Imports => "IMPORTS",
            EdgeType::Calls => "CALLS",
            EdgeType::ApiCall => "API_CALL",
            EdgeType::DbQuery => "DB_QUERY",
            EdgeType::References => "REFERENCES",
            EdgeType::MessagePublish => "MESSAGE_PUBLISH",
            EdgeType::MessageConsume => "MESSAGE_CONSUME",
            EdgeType::RpcCall => "RPC_CALL",
            EdgeType::GraphqlQuery => "GRAPHQL_QUERY",
            EdgeType::ReadsFrom => "READS_FROM",
            EdgeType::WritesTo => "WRITES_TO",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for EdgeType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EdgeType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "IMPORTS" => Ok(EdgeType::Imports),
            "CALLS" => Ok(EdgeType::Calls),
            "API_CALL" => Ok(EdgeType::ApiCall),
            "DB_QUERY" => Ok(EdgeType::DbQuery),
            "REFERENCES" => Ok(EdgeType::References),
            "MESSAGE_PUBLISH" => Ok(EdgeType::MessagePublish),
            "MESSAGE_CONSUME" => Ok(EdgeType::MessageConsume),
            "RPC_CALL" => Ok(EdgeType::RpcCall),
            "GRAPHQL_QUERY" => Ok(EdgeType::GraphqlQuery),
            "READS_FROM" => Ok(EdgeType::ReadsFrom),
            "WRITES_TO" => Ok(EdgeType::WritesTo),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &[
                    "IMPORTS",
                    "CALLS",
                    "API_CALL",
                    "DB_QUERY",
                    "REFERENCES",
                    "MESSAGE_PUBLISH",
                    "MESSAGE_CONSUME",
                    "RPC_CALL",
                    "GRAPHQL_QUERY",
                    "READS_FROM",
                    "WRITES_TO",
                ],
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    pub file_path: String,
    pub language: LanguageTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType, label: impl Into<String>, file_path: impl Into<String>, language: LanguageTag) -> Self {
        Self {
            id: id.into(),
            node_type,
            label: label.into(),
            file_path: file_path.into(),
            language,
            code_snippet: None,
            metadata: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.code_snippet = Some(snippet.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// True when the node's path or label suggests the `Service|Controller`
    /// scope used throughout the quality analyzer (§4.E).
    pub fn in_service_or_controller_scope(&self) -> bool {
        let re = |s: &str| s.contains("Service") || s.contains("Controller");
        re(&self.file_path) || re(&self.label)
    }

    pub fn is_test_fixture(&self) -> bool {
        let lower = self.file_path.to_lowercase();
        ["test", "spec", "mock", "stub"]
            .iter()
            .any(|needle| lower.contains(needle))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

impl Edge {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            edge_type,
        }
    }
}

/// Intermediate call-site record. Never emitted in the final `CodeMap` --
/// consumed entirely by the interaction analyzer's API_CALL synthesis pass.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub caller_id: String,
    pub raw: String,
    pub qualifier: Option<String>,
    pub caller_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMap {
    pub version: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub generator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub statistics: crate::statistics::Statistics,
}
