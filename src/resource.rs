//! Builders for dataset and plugin description graphs.
//!
//! Upload endpoints create these resources directly: a typed subject with
//! title, optional description, and one distribution per bound artifact.
//! Pipelines are never built here; they go through the pipeline builder.

use oxigraph::model::vocab::rdf;
use oxigraph::model::{Graph, Literal, NamedNode, Triple};

use crate::distribution::{DistributionInput, append_distribution};
use crate::error::DistributionError;
use crate::uri::{ResourceKind, UriResolver};
use crate::vocab;

fn described_resource(
    uris: &UriResolver,
    kind: ResourceKind,
    title: &str,
    description: Option<&str>,
    distributions: &[DistributionInput],
) -> Result<(NamedNode, Graph), DistributionError> {
    let uri = uris.mint(kind);
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        uri.clone(),
        rdf::TYPE.into_owned(),
        kind.class().into_owned(),
    ));
    if !title.trim().is_empty() {
        graph.insert(&Triple::new(
            uri.clone(),
            vocab::TITLE.into_owned(),
            Literal::new_simple_literal(title.trim()),
        ));
    }
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        graph.insert(&Triple::new(
            uri.clone(),
            vocab::DESCRIPTION.into_owned(),
            Literal::new_simple_literal(description.trim()),
        ));
    }
    for input in distributions {
        append_distribution(&mut graph, &uri, input)?;
    }
    Ok((uri, graph))
}

/// Graph for a new dataset with one distribution per artifact.
pub fn dataset_graph(
    uris: &UriResolver,
    title: &str,
    description: Option<&str>,
    distributions: &[DistributionInput],
) -> Result<(NamedNode, Graph), DistributionError> {
    described_resource(uris, ResourceKind::Dataset, title, description, distributions)
}

/// Graph for a new plugin.
pub fn plugin_graph(
    uris: &UriResolver,
    title: &str,
    description: Option<&str>,
    distributions: &[DistributionInput],
) -> Result<(NamedNode, Graph), DistributionError> {
    described_resource(uris, ResourceKind::Plugin, title, description, distributions)
}
