//! Compiles a pipeline specification into a provenance graph.
//!
//! The build is a pure accumulation into an in-memory graph; nothing touches
//! the store until the final merge. Any validation failure aborts the whole
//! specification, so the store never sees a partially-linked pipeline.

use std::collections::HashMap;

use oxigraph::model::vocab::rdf;
use oxigraph::model::{Graph, Literal, NamedNode, Triple};

use crate::error::BuildError;
use crate::store::MetadataStore;
use crate::uri::{ResourceKind, UriResolver};
use crate::vocab;

use super::PipelineSpec;

/// Result of compiling a specification: the pipeline URI and its graph.
#[derive(Debug)]
pub struct BuiltPipeline {
    pub uri: NamedNode,
    pub graph: Graph,
}

/// Compiles pipeline specifications against a store and URI resolver.
pub struct PipelineBuilder<'a> {
    store: &'a MetadataStore,
    uris: &'a UriResolver,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(store: &'a MetadataStore, uris: &'a UriResolver) -> Self {
        Self { store, uris }
    }

    /// Compile a specification into a provenance graph.
    ///
    /// Steps, in order: validate shape; materialize variables (checking
    /// referenced datasets exist); materialize steps (checking referenced
    /// plugins exist); link predecessors; synthesize an output dataset per
    /// terminal variable. Unresolved input/output/preceded-by local ids are
    /// skipped with a warning; dangling dataset or plugin references abort
    /// the build.
    pub fn build(&self, spec: &PipelineSpec) -> Result<BuiltPipeline, BuildError> {
        spec.validate()?;

        let mut graph = Graph::new();
        let pipeline = self.uris.mint(ResourceKind::Pipeline);
        graph.insert(&Triple::new(
            pipeline.clone(),
            rdf::TYPE.into_owned(),
            vocab::PLAN.into_owned(),
        ));
        graph.insert(&Triple::new(
            pipeline.clone(),
            vocab::TITLE.into_owned(),
            Literal::new_simple_literal(spec.title.trim()),
        ));
        if let Some(description) = spec.description.as_deref().filter(|d| !d.trim().is_empty()) {
            graph.insert(&Triple::new(
                pipeline.clone(),
                vocab::DESCRIPTION.into_owned(),
                Literal::new_simple_literal(description),
            ));
        }

        // Variables first: steps resolve their inputs and outputs against
        // this mapping.
        let mut variable_uris: HashMap<&str, NamedNode> = HashMap::new();
        for variable in &spec.variables {
            let uri = self.uris.mint_variable();
            graph.insert(&Triple::new(
                uri.clone(),
                rdf::TYPE.into_owned(),
                vocab::VARIABLE.into_owned(),
            ));
            graph.insert(&Triple::new(
                uri.clone(),
                vocab::TITLE.into_owned(),
                Literal::new_simple_literal(&variable.title),
            ));
            graph.insert(&Triple::new(
                uri.clone(),
                vocab::IS_VARIABLE_OF_PLAN.into_owned(),
                pipeline.clone(),
            ));
            if let Some(dataset_id) = variable.dataset.as_deref().filter(|d| !d.is_empty()) {
                let dataset_uri = self.uris.uri_for(ResourceKind::Dataset, dataset_id)?;
                if !self.store.resource_exists(dataset_uri.as_ref())? {
                    return Err(BuildError::UnknownDataset {
                        id: dataset_id.to_string(),
                    });
                }
                graph.insert(&Triple::new(
                    uri.clone(),
                    vocab::SPECIALIZATION_OF.into_owned(),
                    dataset_uri,
                ));
            }
            variable_uris.insert(variable.id.as_str(), uri);
        }

        // Steps, first pass: type, membership, plugin, variable links.
        let mut step_uris: HashMap<&str, NamedNode> = HashMap::new();
        for step in &spec.steps {
            let uri = self.uris.mint_step();
            graph.insert(&Triple::new(
                uri.clone(),
                rdf::TYPE.into_owned(),
                vocab::STEP.into_owned(),
            ));
            graph.insert(&Triple::new(
                uri.clone(),
                vocab::TITLE.into_owned(),
                Literal::new_simple_literal(&step.title),
            ));
            graph.insert(&Triple::new(
                uri.clone(),
                vocab::IS_STEP_OF_PLAN.into_owned(),
                pipeline.clone(),
            ));

            let plugin_uri = self.uris.uri_for(ResourceKind::Plugin, &step.plugin)?;
            if !self.store.resource_exists(plugin_uri.as_ref())? {
                return Err(BuildError::UnknownPlugin {
                    id: step.plugin.clone(),
                });
            }
            graph.insert(&Triple::new(
                uri.clone(),
                vocab::USES_PLUGIN.into_owned(),
                plugin_uri,
            ));

            for input in &step.inputs {
                match variable_uris.get(input.as_str()) {
                    Some(var_uri) => {
                        graph.insert(&Triple::new(
                            uri.clone(),
                            vocab::HAS_INPUT_VAR.into_owned(),
                            var_uri.clone(),
                        ));
                    }
                    None => {
                        tracing::warn!(step = %step.id, variable = %input, "skipping undeclared input variable");
                    }
                }
            }
            for output in &step.outputs {
                match variable_uris.get(output.as_str()) {
                    Some(var_uri) => {
                        graph.insert(&Triple::new(
                            uri.clone(),
                            vocab::IS_OUTPUT_VAR_OF.into_owned(),
                            var_uri.clone(),
                        ));
                    }
                    None => {
                        tracing::warn!(step = %step.id, variable = %output, "skipping undeclared output variable");
                    }
                }
            }
            step_uris.insert(step.id.as_str(), uri);
        }

        // Second pass: predecessor ordering edges. No acyclicity check; a
        // circular chain is stored as declared.
        for step in &spec.steps {
            let step_uri = &step_uris[step.id.as_str()];
            for predecessor in &step.preceded_by {
                match step_uris.get(predecessor.as_str()) {
                    Some(pred_uri) => {
                        graph.insert(&Triple::new(
                            step_uri.clone(),
                            vocab::IS_PRECEDED_BY.into_owned(),
                            pred_uri.clone(),
                        ));
                    }
                    None => {
                        tracing::warn!(step = %step.id, predecessor = %predecessor, "skipping unknown predecessor step");
                    }
                }
            }
        }

        // Terminal variables become fresh output datasets of the pipeline.
        for terminal_id in spec.terminal_variables() {
            let Some(var_uri) = variable_uris.get(terminal_id) else {
                continue;
            };
            let title = spec
                .variables
                .iter()
                .find(|v| v.id == terminal_id)
                .map(|v| v.title.as_str())
                .unwrap_or_default();
            let dataset_uri = self.uris.mint(ResourceKind::Dataset);
            tracing::debug!(variable = %terminal_id, dataset = %dataset_uri, "synthesizing output dataset");
            graph.insert(&Triple::new(
                dataset_uri.clone(),
                rdf::TYPE.into_owned(),
                vocab::DATASET.into_owned(),
            ));
            graph.insert(&Triple::new(
                dataset_uri.clone(),
                vocab::TITLE.into_owned(),
                Literal::new_simple_literal(title),
            ));
            graph.insert(&Triple::new(
                dataset_uri.clone(),
                vocab::WAS_DERIVED_FROM.into_owned(),
                var_uri.clone(),
            ));
            graph.insert(&Triple::new(
                dataset_uri.clone(),
                vocab::WAS_GENERATED_BY.into_owned(),
                pipeline.clone(),
            ));
            graph.insert(&Triple::new(
                var_uri.clone(),
                vocab::SPECIALIZATION_OF.into_owned(),
                dataset_uri,
            ));
        }

        Ok(BuiltPipeline {
            uri: pipeline,
            graph,
        })
    }

    /// Compile and atomically merge a specification; returns the pipeline URI.
    pub fn submit(&self, spec: &PipelineSpec) -> Result<NamedNode, BuildError> {
        let built = self.build(spec)?;
        let merged = self.store.merge(&built.graph, ResourceKind::Pipeline)?;
        tracing::info!(pipeline = %merged, "pipeline stored");
        Ok(merged)
    }
}
