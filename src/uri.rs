//! Resource identity resolution.
//!
//! Maps a resource kind plus an opaque identifier to its canonical URI
//! (`<base>/<kind-path>/<uuid>`) and back. Step and variable URIs live under
//! separately configured namespace prefixes; they are minted here but never
//! dereferenced by clients.

use oxigraph::model::{NamedNode, NamedNodeRef};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::UriError;
use crate::vocab;

/// Kinds of top-level, URI-addressable resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Dataset,
    Plugin,
    Pipeline,
}

impl ResourceKind {
    /// All kinds, in the order generic lookups probe them.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Pipeline,
        ResourceKind::Dataset,
        ResourceKind::Plugin,
    ];

    /// URI path segment for this kind.
    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceKind::Dataset => "datasets",
            ResourceKind::Plugin => "plugins",
            ResourceKind::Pipeline => "pipelines",
        }
    }

    /// RDF class a resource of this kind is typed with.
    pub fn class(self) -> NamedNodeRef<'static> {
        match self {
            ResourceKind::Dataset => vocab::DATASET,
            ResourceKind::Plugin => vocab::PLUGIN,
            ResourceKind::Pipeline => vocab::PLAN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Dataset => "dataset",
            ResourceKind::Plugin => "plugin",
            ResourceKind::Pipeline => "pipeline",
        }
    }

    /// Parse a kind name as used in descriptors and on the CLI.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dataset" | "datasets" => Some(ResourceKind::Dataset),
            "plugin" | "plugins" => Some(ResourceKind::Plugin),
            "pipeline" | "pipelines" => Some(ResourceKind::Pipeline),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds and parses canonical resource URIs from a configured base.
#[derive(Debug, Clone)]
pub struct UriResolver {
    base: String,
    step_ns: String,
    variable_ns: String,
}

impl UriResolver {
    /// Create a resolver from the store configuration.
    pub fn new(config: &StoreConfig) -> Result<Self, UriError> {
        if config.base_uri.trim().is_empty() {
            return Err(UriError::BlankBase);
        }
        Ok(Self {
            base: config.base(),
            step_ns: config.step_ns(),
            variable_ns: config.variable_ns(),
        })
    }

    /// Canonical URI for a resource of the given kind.
    pub fn uri_for(&self, kind: ResourceKind, id: &str) -> Result<NamedNode, UriError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(UriError::BlankId {
                kind: kind.as_str(),
            });
        }
        let uri = format!("{}{}/{id}", self.base, kind.path_segment());
        NamedNode::new(&uri).map_err(|_| UriError::Malformed { uri })
    }

    /// Mint a fresh resource URI with a random UUID.
    pub fn mint(&self, kind: ResourceKind) -> NamedNode {
        let uri = format!("{}{}/{}", self.base, kind.path_segment(), Uuid::new_v4());
        NamedNode::new_unchecked(uri)
    }

    /// Mint a fresh step URI in the step namespace.
    pub fn mint_step(&self) -> NamedNode {
        NamedNode::new_unchecked(format!("{}{}", self.step_ns, Uuid::new_v4()))
    }

    /// Mint a fresh variable URI in the variable namespace.
    pub fn mint_variable(&self) -> NamedNode {
        NamedNode::new_unchecked(format!("{}{}", self.variable_ns, Uuid::new_v4()))
    }

    /// Inverse lookup: recover the kind and identifier from a canonical URI.
    ///
    /// Returns `None` if the URI does not start with a known kind prefix or
    /// its trailing segment is not a valid UUID.
    pub fn kind_and_id_for(&self, uri: &str) -> Option<(ResourceKind, Uuid)> {
        let rest = uri.strip_prefix(&self.base)?;
        let (segment, id) = rest.split_once('/')?;
        let kind = ResourceKind::ALL
            .into_iter()
            .find(|k| k.path_segment() == segment)?;
        let uuid = Uuid::parse_str(id).ok()?;
        Some((kind, uuid))
    }
}
