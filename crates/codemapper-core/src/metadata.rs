// ABOUTME: Typed metadata tagged sum (resolves the "dynamic typing & open
// ABOUTME: metadata" design note in SPEC_FULL.md §3/§9) keyed on platform/framework.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar/sequence/nested value for the catch-all bag every variant carries.
/// Untagged so the wire format still reads as a plain property bag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetadataValue {
    Scalar(String),
    Sequence(Vec<String>),
    Nested(BTreeMap<String, MetadataValue>),
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Scalar(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Scalar(s)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(v: Vec<String>) -> Self {
        MetadataValue::Sequence(v)
    }
}

pub type Extra = BTreeMap<String, MetadataValue>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesMeta {
    pub resource_kind: String,
    pub resource_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selectors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmMeta {
    pub chart_root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_kind: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KustomizeMeta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiMeta {
    pub path: String,
    pub http_method: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TerraformMeta {
    pub resource_type: String,
    pub resource_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    pub framework: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Metadata {
    Kubernetes(KubernetesMeta),
    Helm(HelmMeta),
    Kustomize(KustomizeMeta),
    OpenApi(OpenApiMeta),
    Terraform(TerraformMeta),
    Route(RouteMeta),
    Generic(Extra),
}

impl Metadata {
    /// `labels` for Kubernetes, else empty -- used by the Kubernetes linkage pass.
    pub fn kubernetes(&self) -> Option<&KubernetesMeta> {
        match self {
            Metadata::Kubernetes(m) => Some(m),
            _ => None,
        }
    }

    pub fn kustomize(&self) -> Option<&KustomizeMeta> {
        match self {
            Metadata::Kustomize(m) => Some(m),
            _ => None,
        }
    }

    pub fn helm(&self) -> Option<&HelmMeta> {
        match self {
            Metadata::Helm(m) => Some(m),
            _ => None,
        }
    }

    pub fn terraform(&self) -> Option<&TerraformMeta> {
        match self {
            Metadata::Terraform(m) => Some(m),
            _ => None,
        }
    }

    pub fn route(&self) -> Option<&RouteMeta> {
        match self {
            Metadata::Route(m) => Some(m),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        match self {
            Metadata::Generic(extra) => extra.get(key),
            _ => None,
        }
    }
}
