//! Declarative pipeline specifications.
//!
//! A [`PipelineSpec`] is the flat, client-facing description of a pipeline:
//! a title, logical variables, and processing steps that reference variables
//! and each other by local ids. The [`builder`] compiles a validated spec
//! into a provenance graph.

pub mod builder;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

pub use builder::{BuiltPipeline, PipelineBuilder};

/// A complete pipeline specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSpec {
    /// Human-readable title for the pipeline.
    pub title: String,
    /// Optional longer description of the pipeline's purpose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Logical variables representing data flow within the pipeline scope.
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
    /// Processing steps.
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

/// A logical variable in a pipeline specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSpec {
    /// Local identifier, unique within the specification.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Optional UUID of a pre-existing dataset this variable specializes.
    /// Used for declaring external inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
}

/// A processing step in a pipeline specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSpec {
    /// Local identifier, unique within the specification.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// UUID of the registered plugin this step runs.
    pub plugin: String,
    /// Local ids of input variables.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Local ids of output variables.
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Local ids of steps that must complete before this one starts.
    #[serde(default)]
    pub preceded_by: Vec<String>,
}

fn valid_local_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl PipelineSpec {
    /// Parse a specification from JSON.
    pub fn from_json(input: &str) -> Result<Self, BuildError> {
        serde_json::from_str(input).map_err(|e| BuildError::SpecJson {
            message: e.to_string(),
        })
    }

    /// Validate the specification's shape before any graph is built.
    ///
    /// Checks: non-blank title, at least one variable and one step, local id
    /// charset, local id uniqueness, and a plugin reference per step.
    /// Dangling plugin/dataset references are checked against the store
    /// during the build, not here.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.title.trim().is_empty() {
            return Err(BuildError::BlankTitle);
        }
        if self.variables.is_empty() {
            return Err(BuildError::NoVariables);
        }
        if self.steps.is_empty() {
            return Err(BuildError::NoSteps);
        }
        let mut seen = HashSet::new();
        for id in self
            .variables
            .iter()
            .map(|v| &v.id)
            .chain(self.steps.iter().map(|s| &s.id))
        {
            if !valid_local_id(id) {
                return Err(BuildError::InvalidLocalId { id: id.clone() });
            }
            if !seen.insert(id.as_str()) {
                return Err(BuildError::DuplicateLocalId { id: id.clone() });
            }
        }
        for step in &self.steps {
            if step.plugin.trim().is_empty() {
                return Err(BuildError::BlankPluginRef {
                    step: step.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Local ids of terminal variables: produced by some step's outputs but
    /// consumed by no step's inputs. Order follows first production.
    pub fn terminal_variables(&self) -> Vec<&str> {
        let consumed: HashSet<&str> = self
            .steps
            .iter()
            .flat_map(|s| s.inputs.iter().map(String::as_str))
            .collect();
        let mut terminal = Vec::new();
        let mut produced: HashSet<&str> = HashSet::new();
        for step in &self.steps {
            for output in &step.outputs {
                if produced.insert(output.as_str()) && !consumed.contains(output.as_str()) {
                    terminal.push(output.as_str());
                }
            }
        }
        terminal
    }
}
