//! Rich diagnostic error types for the provena store.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. [`ErrorClass`] collapses the
//! full taxonomy into the four outcomes a caller has to distinguish: invalid
//! input, missing resource, unsupported wire format, and storage failure.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the provena store.
///
/// Each variant wraps a subsystem-specific error, preserving the diagnostic
/// chain (error codes, help text) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum ProvenaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Uri(#[from] UriError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Distribution(#[from] DistributionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Coarse classification of an error, for callers that map outcomes onto a
/// transport status (4xx validation, 404, 415, 500).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed or incomplete input; dangling references. Not retryable.
    Validation,
    /// The addressed resource does not exist.
    NotFound,
    /// Content negotiation failed.
    UnsupportedFormat,
    /// Transaction-layer or I/O failure.
    Storage,
}

impl ProvenaError {
    /// Classify this error per the store's error taxonomy.
    pub fn class(&self) -> ErrorClass {
        match self {
            ProvenaError::Uri(_) => ErrorClass::Validation,
            ProvenaError::Format(e) => e.class(),
            ProvenaError::Store(e) => e.class(),
            ProvenaError::Build(e) => e.class(),
            ProvenaError::Descriptor(_) => ErrorClass::Validation,
            ProvenaError::Distribution(e) => e.class(),
            ProvenaError::Artifact(ArtifactError::NotFound { .. }) => ErrorClass::NotFound,
            ProvenaError::Artifact(_) => ErrorClass::Storage,
            ProvenaError::Config(_) => ErrorClass::Storage,
        }
    }
}

// ---------------------------------------------------------------------------
// URI resolution errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum UriError {
    #[error("blank identifier for {kind} resource")]
    #[diagnostic(
        code(provena::uri::blank_id),
        help("Resource identifiers must be non-empty. Pass the UUID assigned at registration time.")
    )]
    BlankId { kind: &'static str },

    #[error("base URI is blank")]
    #[diagnostic(
        code(provena::uri::blank_base),
        help("Set `base_uri` in the store configuration to an absolute URI such as `https://example.org/`.")
    )]
    BlankBase,

    #[error("constructed URI is not a valid IRI: {uri}")]
    #[diagnostic(
        code(provena::uri::malformed),
        help(
            "The base URI and identifier combine into an invalid IRI. \
             Identifiers may not contain spaces or control characters."
        )
    )]
    Malformed { uri: String },
}

// ---------------------------------------------------------------------------
// Wire format errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum FormatError {
    #[error("unsupported content type: {value}")]
    #[diagnostic(
        code(provena::format::unsupported_content_type),
        help("Supported graph syntaxes are text/turtle, application/ld+json, and application/rdf+xml.")
    )]
    UnsupportedContentType { value: String },

    #[error("no supported syntax satisfies accept header: {value}")]
    #[diagnostic(
        code(provena::format::unsupported_accept),
        help("Supported graph syntaxes are text/turtle, application/ld+json, and application/rdf+xml.")
    )]
    UnsupportedAccept { value: String },

    #[error("graph parse error: {message}")]
    #[diagnostic(
        code(provena::format::parse),
        help("The submitted document is not well-formed for the negotiated syntax.")
    )]
    Parse { message: String },

    #[error("graph serialization error: {message}")]
    #[diagnostic(code(provena::format::serialize))]
    Serialize { message: String },
}

impl FormatError {
    pub fn class(&self) -> ErrorClass {
        match self {
            FormatError::UnsupportedContentType { .. } | FormatError::UnsupportedAccept { .. } => {
                ErrorClass::UnsupportedFormat
            }
            FormatError::Parse { .. } => ErrorClass::Validation,
            FormatError::Serialize { .. } => ErrorClass::Storage,
        }
    }
}

// ---------------------------------------------------------------------------
// Graph store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("input graph is empty")]
    #[diagnostic(
        code(provena::store::empty_graph),
        help("A merge needs at least one triple. Check that the submitted document parsed to a non-empty graph.")
    )]
    EmptyGraph,

    #[error("input graph contains no resource of type {class}")]
    #[diagnostic(
        code(provena::store::no_primary_resource),
        help(
            "The merged graph must contain a subject typed with the expected \
             class. Add an rdf:type triple for the primary resource."
        )
    )]
    NoPrimaryResource { class: String },

    #[error("primary resource is a blank node, not a URI")]
    #[diagnostic(
        code(provena::store::blank_primary),
        help("Top-level resources must be URI-addressable. Only distributions may be blank nodes.")
    )]
    BlankPrimaryResource,

    #[error("resource not found: {uri}")]
    #[diagnostic(
        code(provena::store::not_found),
        help("No triple in the store mentions this URI. Verify the identifier and resource kind.")
    )]
    NotFound { uri: String },

    #[error("storage backend error: {message}")]
    #[diagnostic(
        code(provena::store::backend),
        help(
            "The underlying graph store failed. Check that the data directory \
             exists, has correct permissions, and that the disk is not full."
        )
    )]
    Backend { message: String },
}

impl StoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            StoreError::EmptyGraph
            | StoreError::NoPrimaryResource { .. }
            | StoreError::BlankPrimaryResource => ErrorClass::Validation,
            StoreError::NotFound { .. } => ErrorClass::NotFound,
            StoreError::Backend { .. } => ErrorClass::Storage,
        }
    }
}

impl From<oxigraph::store::StorageError> for StoreError {
    fn from(e: oxigraph::store::StorageError) -> Self {
        StoreError::Backend {
            message: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline build errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("pipeline title is blank")]
    #[diagnostic(
        code(provena::build::blank_title),
        help("Every pipeline needs a human-readable title.")
    )]
    BlankTitle,

    #[error("pipeline declares no variables")]
    #[diagnostic(
        code(provena::build::no_variables),
        help("Declare at least one variable; steps reference variables by their local ids.")
    )]
    NoVariables,

    #[error("pipeline declares no steps")]
    #[diagnostic(
        code(provena::build::no_steps),
        help("Declare at least one processing step.")
    )]
    NoSteps,

    #[error("invalid local identifier: \"{id}\"")]
    #[diagnostic(
        code(provena::build::invalid_local_id),
        help("Local step and variable ids may contain only ASCII letters, digits, underscores, and hyphens.")
    )]
    InvalidLocalId { id: String },

    #[error("duplicate local identifier: \"{id}\"")]
    #[diagnostic(
        code(provena::build::duplicate_local_id),
        help("Step and variable ids must be unique within one pipeline specification.")
    )]
    DuplicateLocalId { id: String },

    #[error("step \"{step}\" references no plugin")]
    #[diagnostic(
        code(provena::build::blank_plugin_ref),
        help("Every step must name the UUID of a registered plugin.")
    )]
    BlankPluginRef { step: String },

    #[error("dataset does not exist: {id}")]
    #[diagnostic(
        code(provena::build::unknown_dataset),
        help("Register the dataset first; variables may only specialize datasets already in the store.")
    )]
    UnknownDataset { id: String },

    #[error("plugin does not exist: {id}")]
    #[diagnostic(
        code(provena::build::unknown_plugin),
        help("Register the plugin first; steps may only use plugins already in the store.")
    )]
    UnknownPlugin { id: String },

    #[error("pipeline specification is not valid JSON: {message}")]
    #[diagnostic(
        code(provena::build::spec_json),
        help("The specification must be a JSON document with title, variables, and steps.")
    )]
    SpecJson { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Uri(#[from] UriError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

impl BuildError {
    pub fn class(&self) -> ErrorClass {
        match self {
            BuildError::Uri(_) => ErrorClass::Validation,
            BuildError::Store(e) => e.class(),
            _ => ErrorClass::Validation,
        }
    }
}

// ---------------------------------------------------------------------------
// Resource descriptor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DescriptorError {
    #[error("descriptor has no usable \"type\" field")]
    #[diagnostic(
        code(provena::descriptor::missing_type),
        help("Add a \"type\" field with value \"dataset\" or \"plugin\".")
    )]
    MissingType,

    #[error("unknown descriptor type: \"{tag}\"")]
    #[diagnostic(
        code(provena::descriptor::unknown_type),
        help("Known descriptor types are \"dataset\" and \"plugin\".")
    )]
    UnknownType { tag: String },

    #[error("descriptor is not valid JSON: {message}")]
    #[diagnostic(code(provena::descriptor::json))]
    Json { message: String },
}

// ---------------------------------------------------------------------------
// Distribution errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DistributionError {
    #[error("no artifact ids supplied")]
    #[diagnostic(
        code(provena::distribution::no_artifacts),
        help("Attach or replace requires at least one artifact id.")
    )]
    NoArtifacts,

    #[error("access URL is not a valid IRI: {url}")]
    #[diagnostic(
        code(provena::distribution::bad_access_url),
        help("Check the artifact download template in the store configuration.")
    )]
    BadAccessUrl { url: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

impl DistributionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            DistributionError::NoArtifacts | DistributionError::BadAccessUrl { .. } => {
                ErrorClass::Validation
            }
            DistributionError::Store(e) => e.class(),
        }
    }
}

// ---------------------------------------------------------------------------
// Artifact store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ArtifactError {
    #[error("artifact not found: {id}")]
    #[diagnostic(
        code(provena::artifact::not_found),
        help("The artifact repository holds no object with this id.")
    )]
    NotFound { id: String },

    #[error("artifact repository error: {message}")]
    #[diagnostic(code(provena::artifact::backend))]
    Backend { message: String },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read configuration file: {path}")]
    #[diagnostic(
        code(provena::config::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(provena::config::parse),
        help("The configuration file must be valid TOML with the documented keys.")
    )]
    Parse { message: String },
}

/// Convenience alias for functions returning provena results.
pub type ProvenaResult<T> = std::result::Result<T, ProvenaError>;
