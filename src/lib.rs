//! # provena
//!
//! A provenance metadata store for data-processing pipelines. Declarative
//! pipeline specifications (ordered steps, typed variables, plugin
//! references) are compiled into a graph of typed resources and persisted in
//! an RDF store that answers type-indexed listing and bounded-depth describe
//! queries.
//!
//! ## Architecture
//!
//! - **Identity** (`uri`): canonical `<base>/<kind>/<uuid>` resource URIs
//! - **Storage** (`store`): oxigraph-backed shared graph with atomic merges,
//!   a root-container index, and explicit bounded traversals
//! - **Compilation** (`pipeline`): pipeline specs to provenance graphs,
//!   including terminal-variable output datasets
//! - **Distributions** (`distribution`): append/replace of the
//!   downloadable-artifact sub-graph, format inference from file extensions
//! - **Wire formats** (`format`): Turtle, JSON-LD, and RDF/XML negotiation
//!
//! ## Library usage
//!
//! ```no_run
//! use provena::config::StoreConfig;
//! use provena::pipeline::{PipelineBuilder, PipelineSpec};
//! use provena::store::MetadataStore;
//! use provena::uri::UriResolver;
//!
//! let config = StoreConfig::default();
//! let store = MetadataStore::in_memory().unwrap();
//! let uris = UriResolver::new(&config).unwrap();
//! let spec = PipelineSpec::from_json(r#"{"title": "…", "variables": [], "steps": []}"#).unwrap();
//! let pipeline = PipelineBuilder::new(&store, &uris).submit(&spec);
//! ```

pub mod artifact;
pub mod config;
pub mod descriptor;
pub mod distribution;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod resource;
pub mod store;
pub mod uri;
pub mod vocab;
