//! Distribution management: the downloadable-artifact sub-graph of a resource.
//!
//! A distribution is an anonymous node owned by its dataset or plugin. It
//! carries an access URL pointing into the artifact repository and, when the
//! file extension allows, an inferred media type or compression format.
//! Distributions are never edited in place; they are appended or replaced
//! wholesale.

use oxigraph::model::vocab::rdf;
use oxigraph::model::{BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Triple};

use crate::artifact::ArtifactEndpoint;
use crate::error::{DistributionError, StoreError};
use crate::store::MetadataStore;
use crate::vocab;

/// Input for one distribution: where to fetch it and what the file was named.
#[derive(Debug, Clone)]
pub struct DistributionInput {
    /// Download URL for the bound artifact.
    pub access_url: String,
    /// File extension of the original upload, if known.
    pub file_ext: Option<String>,
}

impl DistributionInput {
    pub fn new(access_url: impl Into<String>, file_ext: Option<&str>) -> Self {
        Self {
            access_url: access_url.into(),
            file_ext: file_ext.map(|e| e.trim_start_matches('.').to_ascii_lowercase()),
        }
    }
}

/// Extension of a filename, without the dot.
pub fn file_extension(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Media type inferred from a file extension.
pub fn media_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "csv" => Some("text/csv"),
        "tsv" => Some("text/tab-separated-values"),
        "json" => Some("application/json"),
        "xml" => Some("application/xml"),
        "txt" => Some("text/plain"),
        "parquet" => Some("application/vnd.apache.parquet"),
        "py" => Some("text/x-python"),
        _ => None,
    }
}

/// Compression format inferred from a file extension.
pub fn compress_format_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "zip" => Some("application/zip"),
        "gz" => Some("application/gzip"),
        "bz2" => Some("application/x-bzip2"),
        "zst" => Some("application/zstd"),
        _ => None,
    }
}

/// Append a distribution node to `resource` inside an in-memory graph.
pub fn append_distribution(
    graph: &mut Graph,
    resource: &NamedNode,
    input: &DistributionInput,
) -> Result<(), DistributionError> {
    let dist = BlankNode::default();
    graph.insert(&Triple::new(
        resource.clone(),
        vocab::HAS_DISTRIBUTION.into_owned(),
        dist.clone(),
    ));
    graph.insert(&Triple::new(
        dist.clone(),
        rdf::TYPE.into_owned(),
        vocab::DISTRIBUTION.into_owned(),
    ));
    let url = NamedNode::new(&input.access_url).map_err(|_| DistributionError::BadAccessUrl {
        url: input.access_url.clone(),
    })?;
    graph.insert(&Triple::new(
        dist.clone(),
        vocab::ACCESS_URL.into_owned(),
        url,
    ));
    if let Some(ext) = input.file_ext.as_deref() {
        if let Some(media_type) = media_type_for_extension(ext) {
            graph.insert(&Triple::new(
                dist.clone(),
                vocab::MEDIA_TYPE.into_owned(),
                Literal::new_simple_literal(media_type),
            ));
        }
        if let Some(compress) = compress_format_for_extension(ext) {
            graph.insert(&Triple::new(
                dist,
                vocab::COMPRESS_FORMAT.into_owned(),
                Literal::new_simple_literal(compress),
            ));
        }
    }
    Ok(())
}

/// Attaches and replaces distribution sub-graphs of stored resources.
pub struct DistributionManager<'a> {
    store: &'a MetadataStore,
    endpoint: ArtifactEndpoint,
}

impl<'a> DistributionManager<'a> {
    pub fn new(store: &'a MetadataStore, endpoint: ArtifactEndpoint) -> Self {
        Self { store, endpoint }
    }

    /// Append one distribution to a stored resource.
    pub fn attach(
        &self,
        resource: NamedNodeRef<'_>,
        artifact_id: &str,
        file_ext: Option<&str>,
    ) -> Result<(), DistributionError> {
        if !self.store.resource_exists(resource)? {
            return Err(StoreError::NotFound {
                uri: resource.as_str().to_string(),
            }
            .into());
        }
        let mut graph = Graph::new();
        let input = DistributionInput::new(self.endpoint.url_for(artifact_id), file_ext);
        append_distribution(&mut graph, &resource.into_owned(), &input)?;
        self.store.append_graph(&graph)?;
        tracing::info!(resource = resource.as_str(), artifact = artifact_id, "attached distribution");
        Ok(())
    }

    /// Atomically replace every distribution of a stored resource.
    ///
    /// The old distribution nodes and their linking triples disappear in the
    /// same transaction that adds the new ones; a reader never observes the
    /// resource with zero distributions in between.
    pub fn replace_all(
        &self,
        resource: NamedNodeRef<'_>,
        artifact_ids: &[String],
    ) -> Result<(), DistributionError> {
        if artifact_ids.is_empty() {
            return Err(DistributionError::NoArtifacts);
        }
        let mut graph = Graph::new();
        let owner = resource.into_owned();
        for artifact_id in artifact_ids {
            let input = DistributionInput::new(self.endpoint.url_for(artifact_id), None);
            append_distribution(&mut graph, &owner, &input)?;
        }
        self.store.replace_distributions(resource, &graph)?;
        tracing::info!(
            resource = resource.as_str(),
            count = artifact_ids.len(),
            "replaced distributions"
        );
        Ok(())
    }
}
