//! Typed resource descriptors with tag-directed decoding.
//!
//! Registration input is a JSON document whose `type` field selects the
//! concrete descriptor shape. The tag is inspected before any variant is
//! constructed; unknown tags are rejected explicitly rather than guessed at.
//! The field may be a single string or an array of candidate tags, in which
//! case the first known tag wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DescriptorError;
use crate::uri::ResourceKind;

const TAG_DATASET: &str = "dataset";
const TAG_PLUGIN: &str = "plugin";

/// Reference to an artifact already held by the artifact repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Artifact id in the repository.
    pub id: String,
    /// Original filename, used for format inference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Descriptor for a new dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Bound artifacts, one distribution each.
    #[serde(default)]
    pub artifacts: Vec<ArtifactRef>,
}

/// Descriptor for a new plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactRef>,
}

/// A registration descriptor, resolved from its `type` tag.
#[derive(Debug, Clone)]
pub enum ResourceDescriptor {
    Dataset(DatasetDescriptor),
    Plugin(PluginDescriptor),
}

impl ResourceDescriptor {
    /// Decode a descriptor from JSON, dispatching on the `type` field.
    pub fn from_json(input: &str) -> Result<Self, DescriptorError> {
        let value: Value = serde_json::from_str(input).map_err(|e| DescriptorError::Json {
            message: e.to_string(),
        })?;
        let tag = resolve_tag(&value)?;
        match tag.as_str() {
            TAG_DATASET => serde_json::from_value(value)
                .map(ResourceDescriptor::Dataset)
                .map_err(|e| DescriptorError::Json {
                    message: e.to_string(),
                }),
            TAG_PLUGIN => serde_json::from_value(value)
                .map(ResourceDescriptor::Plugin)
                .map_err(|e| DescriptorError::Json {
                    message: e.to_string(),
                }),
            other => Err(DescriptorError::UnknownType {
                tag: other.to_string(),
            }),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceDescriptor::Dataset(_) => ResourceKind::Dataset,
            ResourceDescriptor::Plugin(_) => ResourceKind::Plugin,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ResourceDescriptor::Dataset(d) => &d.title,
            ResourceDescriptor::Plugin(p) => &p.title,
        }
    }
}

/// Extract the descriptor tag: a string, or the first known entry of an
/// array of strings.
fn resolve_tag(value: &Value) -> Result<String, DescriptorError> {
    match value.get("type") {
        Some(Value::String(tag)) => Ok(tag.clone()),
        Some(Value::Array(tags)) => {
            let candidates: Vec<&str> = tags.iter().filter_map(Value::as_str).collect();
            if candidates.is_empty() {
                return Err(DescriptorError::MissingType);
            }
            match candidates
                .iter()
                .find(|t| **t == TAG_DATASET || **t == TAG_PLUGIN)
            {
                Some(tag) => Ok((*tag).to_string()),
                None => Err(DescriptorError::UnknownType {
                    tag: candidates.join(","),
                }),
            }
        }
        _ => Err(DescriptorError::MissingType),
    }
}
