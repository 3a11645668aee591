//! Graph store adapter: the single gateway to the persisted provenance graph.
//!
//! [`MetadataStore`] wraps an oxigraph [`Store`] holding one default graph.
//! All mutation happens inside a single write transaction per call; reads are
//! explicit bounded traversals (see [`describe`]) rather than a query
//! language. Newly merged datasets and plugins are indexed with an
//! `ldp:contains` edge from the well-known root container.

mod describe;

use std::path::{Path, PathBuf};

use oxigraph::model::vocab::rdf;
use oxigraph::model::{
    Graph, GraphName, GraphNameRef, Literal, NamedNode, NamedNodeRef, NamedOrBlankNodeRef, Quad,
    QuadRef, TermRef,
};
use oxigraph::store::Store;

use crate::error::StoreError;
use crate::uri::ResourceKind;
use crate::vocab;

/// Default blank-node expansion depth for bounded describes.
///
/// Three hops cover every nested structure the data model produces
/// (resource → distribution → its properties) with headroom.
pub const DEFAULT_DESCRIBE_HOPS: usize = 3;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The shared provenance graph store.
///
/// Owns the underlying oxigraph store handle; components receive a reference
/// at construction. `open`/`close` bracket the handle's lifecycle explicitly.
pub struct MetadataStore {
    store: Store,
    data_dir: Option<PathBuf>,
}

impl MetadataStore {
    /// Create an in-memory store (no persistence).
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new()?;
        let meta = Self {
            store,
            data_dir: None,
        };
        meta.ensure_root_container()?;
        Ok(meta)
    }

    /// Open or create a persistent store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path).map_err(|e| StoreError::Backend {
            message: format!("failed to create store directory {}: {e}", path.display()),
        })?;
        let store = Store::open(path)?;
        tracing::info!(path = %path.display(), "opened metadata store");
        let meta = Self {
            store,
            data_dir: Some(path.to_path_buf()),
        };
        meta.ensure_root_container()?;
        Ok(meta)
    }

    /// Flush and release the store handle.
    pub fn close(self) -> StoreResult<()> {
        if self.data_dir.is_some() {
            self.store.flush()?;
        }
        Ok(())
    }

    /// The root container resource exists in every store.
    fn ensure_root_container(&self) -> StoreResult<()> {
        let title = Literal::new_simple_literal("Provena store root");
        self.store.transaction(|mut txn| -> Result<(), StoreError> {
            let typed = QuadRef::new(
                vocab::ROOT_CONTAINER,
                rdf::TYPE,
                vocab::BASIC_CONTAINER,
                GraphNameRef::DefaultGraph,
            );
            if txn.insert(typed)? {
                tracing::debug!(root = vocab::ROOT_CONTAINER.as_str(), "created root container");
                txn.insert(QuadRef::new(
                    vocab::ROOT_CONTAINER,
                    vocab::TITLE,
                    &title,
                    GraphNameRef::DefaultGraph,
                ))?;
            }
            Ok(())
        })
    }

    /// Atomically merge a graph into the store.
    ///
    /// The first subject typed with the expected kind's class (graph iteration
    /// order) is the primary resource; callers must submit at most one.
    /// Datasets and plugins additionally get a `ldp:contains` edge from the
    /// root container, added idempotently. Either every triple (plus index
    /// edge) becomes visible, or none.
    pub fn merge(&self, graph: &Graph, kind: ResourceKind) -> StoreResult<NamedNode> {
        if graph.is_empty() {
            return Err(StoreError::EmptyGraph);
        }
        let class = kind.class();
        let primary = graph
            .iter()
            .find(|t| t.predicate == rdf::TYPE && t.object == TermRef::from(class))
            .map(|t| t.subject)
            .ok_or_else(|| StoreError::NoPrimaryResource {
                class: class.as_str().to_string(),
            })?;
        let NamedOrBlankNodeRef::NamedNode(primary_uri) = primary else {
            return Err(StoreError::BlankPrimaryResource);
        };
        let primary_uri = primary_uri.into_owned();
        tracing::info!(resource = %primary_uri, kind = %kind, triples = graph.len(), "merging graph");

        self.store.transaction(|mut txn| -> Result<(), StoreError> {
            for triple in graph.iter() {
                txn.insert(triple.in_graph(GraphNameRef::DefaultGraph))?;
            }
            if matches!(kind, ResourceKind::Dataset | ResourceKind::Plugin) {
                let contains = QuadRef::new(
                    vocab::ROOT_CONTAINER,
                    vocab::CONTAINS,
                    &primary_uri,
                    GraphNameRef::DefaultGraph,
                );
                if txn.insert(contains)? {
                    tracing::debug!(resource = %primary_uri, "indexed in root container");
                }
            }
            Ok(())
        })?;
        Ok(primary_uri)
    }

    /// Whether any triple has this URI as its subject.
    pub fn resource_exists(&self, uri: NamedNodeRef<'_>) -> StoreResult<bool> {
        Ok(self
            .store
            .quads_for_pattern(
                Some(uri.into()),
                None,
                None,
                Some(GraphNameRef::DefaultGraph),
            )
            .next()
            .transpose()?
            .is_some())
    }

    /// Bounded description of one resource.
    ///
    /// Emits all triples where the URI is subject or object, then expands
    /// blank nodes breadth-first for up to `max_hops` further levels. Named
    /// resources reached along the way are not expanded.
    pub fn describe(&self, uri: NamedNodeRef<'_>, max_hops: usize) -> StoreResult<Graph> {
        describe::describe(&self.store, uri, max_hops)
    }

    /// Description of a pipeline with its provenance dependencies inlined:
    /// steps, variables, used plugins, specialized and generated datasets,
    /// each with its own distribution sub-graph.
    pub fn describe_with_dependencies(&self, pipeline: NamedNodeRef<'_>) -> StoreResult<Graph> {
        describe::describe_with_dependencies(&self.store, pipeline, DEFAULT_DESCRIBE_HOPS)
    }

    /// All triples of all resources typed with the given class (one hop).
    pub fn list_by_type(&self, class: NamedNodeRef<'_>) -> StoreResult<Graph> {
        describe::list_by_type(&self.store, class, false)
    }

    /// As [`list_by_type`](Self::list_by_type), plus each resource's
    /// distribution sub-graph.
    pub fn list_by_type_with_distributions(&self, class: NamedNodeRef<'_>) -> StoreResult<Graph> {
        describe::list_by_type(&self.store, class, true)
    }

    /// The entire default graph, for operational export.
    pub fn dump(&self) -> StoreResult<Graph> {
        let mut graph = Graph::new();
        for quad in self.store.iter() {
            let quad = quad?;
            if quad.graph_name == GraphName::DefaultGraph {
                describe::insert_quad(&mut graph, &quad);
            }
        }
        Ok(graph)
    }

    /// Number of triples in the store.
    pub fn triple_count(&self) -> StoreResult<usize> {
        Ok(self.store.len()?)
    }

    /// Atomically replace every triple with `uri` as subject by `graph`.
    pub fn replace_resource(&self, uri: NamedNodeRef<'_>, graph: &Graph) -> StoreResult<()> {
        if graph.is_empty() {
            return Err(StoreError::EmptyGraph);
        }
        tracing::info!(resource = uri.as_str(), triples = graph.len(), "replacing resource");
        self.store.transaction(|mut txn| -> Result<(), StoreError> {
            let existing: Vec<Quad> = txn
                .quads_for_pattern(
                    Some(uri.into()),
                    None,
                    None,
                    Some(GraphNameRef::DefaultGraph),
                )
                .collect::<Result<_, _>>()?;
            if existing.is_empty() {
                return Err(StoreError::NotFound {
                    uri: uri.as_str().to_string(),
                });
            }
            for quad in &existing {
                txn.remove(quad.as_ref())?;
            }
            for triple in graph.iter() {
                txn.insert(triple.in_graph(GraphNameRef::DefaultGraph))?;
            }
            Ok(())
        })
    }

    /// Atomically swap a resource's distribution sub-graph.
    ///
    /// Snapshots the `dcat:distribution` links and every triple of the linked
    /// distribution nodes, removes them in one batch, then inserts the new
    /// sub-graph, all inside one transaction. A reader never observes the
    /// resource between removal and re-attachment.
    pub(crate) fn replace_distributions(
        &self,
        resource: NamedNodeRef<'_>,
        new_subgraph: &Graph,
    ) -> StoreResult<()> {
        self.store.transaction(|mut txn| -> Result<(), StoreError> {
            if txn
                .quads_for_pattern(
                    Some(resource.into()),
                    None,
                    None,
                    Some(GraphNameRef::DefaultGraph),
                )
                .next()
                .transpose()?
                .is_none()
            {
                return Err(StoreError::NotFound {
                    uri: resource.as_str().to_string(),
                });
            }
            // Snapshot before removing; no live iterator over quads being
            // deleted.
            let links: Vec<Quad> = txn
                .quads_for_pattern(
                    Some(resource.into()),
                    Some(vocab::HAS_DISTRIBUTION),
                    None,
                    Some(GraphNameRef::DefaultGraph),
                )
                .collect::<Result<_, _>>()?;
            let mut doomed: Vec<Quad> = links.clone();
            for link in &links {
                let node: NamedOrBlankNodeRef<'_> = match &link.object {
                    oxigraph::model::Term::BlankNode(b) => b.as_ref().into(),
                    oxigraph::model::Term::NamedNode(n) => n.as_ref().into(),
                    _ => continue,
                };
                let props: Vec<Quad> = txn
                    .quads_for_pattern(Some(node), None, None, Some(GraphNameRef::DefaultGraph))
                    .collect::<Result<_, _>>()?;
                doomed.extend(props);
            }
            for quad in &doomed {
                txn.remove(quad.as_ref())?;
            }
            for triple in new_subgraph.iter() {
                txn.insert(triple.in_graph(GraphNameRef::DefaultGraph))?;
            }
            Ok(())
        })
    }

    /// Append a graph in one transaction, without primary-type detection.
    pub(crate) fn append_graph(&self, graph: &Graph) -> StoreResult<()> {
        self.store.transaction(|mut txn| -> Result<(), StoreError> {
            for triple in graph.iter() {
                txn.insert(triple.in_graph(GraphNameRef::DefaultGraph))?;
            }
            Ok(())
        })
    }
}

impl std::fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataStore")
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{BlankNode, Triple};

    fn store() -> MetadataStore {
        MetadataStore::in_memory().unwrap()
    }

    fn dataset_graph(uri: &str, title: &str) -> (NamedNode, Graph) {
        let subject = NamedNode::new(uri).unwrap();
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            subject.clone(),
            rdf::TYPE.into_owned(),
            vocab::DATASET.into_owned(),
        ));
        graph.insert(&Triple::new(
            subject.clone(),
            vocab::TITLE.into_owned(),
            Literal::new_simple_literal(title),
        ));
        (subject, graph)
    }

    #[test]
    fn merge_returns_primary_uri_and_indexes_it() {
        let store = store();
        let (subject, graph) = dataset_graph("https://provena.dev/datasets/d1", "D1");

        let merged = store.merge(&graph, ResourceKind::Dataset).unwrap();
        assert_eq!(merged, subject);

        let root = store
            .describe(vocab::ROOT_CONTAINER, DEFAULT_DESCRIBE_HOPS)
            .unwrap();
        let contains = root
            .iter()
            .filter(|t| t.predicate == vocab::CONTAINS)
            .count();
        assert_eq!(contains, 1);
    }

    #[test]
    fn merge_rejects_empty_graph() {
        let store = store();
        let err = store.merge(&Graph::new(), ResourceKind::Dataset).unwrap_err();
        assert!(matches!(err, StoreError::EmptyGraph));
    }

    #[test]
    fn merge_rejects_missing_type() {
        let store = store();
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            NamedNode::new("https://provena.dev/datasets/d1").unwrap(),
            vocab::TITLE.into_owned(),
            Literal::new_simple_literal("untyped"),
        ));
        let err = store.merge(&graph, ResourceKind::Dataset).unwrap_err();
        assert!(matches!(err, StoreError::NoPrimaryResource { .. }));
        // Nothing was written.
        let before_root = 2; // root container type + title
        assert_eq!(store.triple_count().unwrap(), before_root);
    }

    #[test]
    fn merge_rejects_blank_primary() {
        let store = store();
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            BlankNode::default(),
            rdf::TYPE.into_owned(),
            vocab::DATASET.into_owned(),
        ));
        let err = store.merge(&graph, ResourceKind::Dataset).unwrap_err();
        assert!(matches!(err, StoreError::BlankPrimaryResource));
    }

    #[test]
    fn contains_index_is_idempotent() {
        let store = store();
        let (_, g1) = dataset_graph("https://provena.dev/datasets/d1", "D1");
        let (_, g2) = dataset_graph("https://provena.dev/datasets/d2", "D2");

        store.merge(&g1, ResourceKind::Dataset).unwrap();
        store.merge(&g1, ResourceKind::Dataset).unwrap();
        store.merge(&g2, ResourceKind::Dataset).unwrap();
        store.merge(&g2, ResourceKind::Dataset).unwrap();

        let root = store
            .describe(vocab::ROOT_CONTAINER, DEFAULT_DESCRIBE_HOPS)
            .unwrap();
        let contains = root
            .iter()
            .filter(|t| t.predicate == vocab::CONTAINS)
            .count();
        assert_eq!(contains, 2);
    }

    #[test]
    fn pipelines_are_not_indexed() {
        let store = store();
        let subject = NamedNode::new("https://provena.dev/pipelines/p1").unwrap();
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            subject,
            rdf::TYPE.into_owned(),
            vocab::PLAN.into_owned(),
        ));
        store.merge(&graph, ResourceKind::Pipeline).unwrap();

        let root = store
            .describe(vocab::ROOT_CONTAINER, DEFAULT_DESCRIBE_HOPS)
            .unwrap();
        assert!(root.iter().all(|t| t.predicate != vocab::CONTAINS));
    }

    #[test]
    fn describe_unknown_uri_is_not_found() {
        let store = store();
        let missing = NamedNode::new("https://provena.dev/datasets/nope").unwrap();
        let err = store.describe(missing.as_ref(), 2).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn describe_expands_blank_nodes_within_bounds() {
        let store = store();
        let subject = NamedNode::new("https://provena.dev/datasets/d1").unwrap();
        let dist = BlankNode::default();
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            subject.clone(),
            rdf::TYPE.into_owned(),
            vocab::DATASET.into_owned(),
        ));
        graph.insert(&Triple::new(
            subject.clone(),
            vocab::HAS_DISTRIBUTION.into_owned(),
            dist.clone(),
        ));
        graph.insert(&Triple::new(
            dist.clone(),
            rdf::TYPE.into_owned(),
            vocab::DISTRIBUTION.into_owned(),
        ));
        graph.insert(&Triple::new(
            dist,
            vocab::MEDIA_TYPE.into_owned(),
            Literal::new_simple_literal("text/csv"),
        ));
        store.merge(&graph, ResourceKind::Dataset).unwrap();

        let described = store.describe(subject.as_ref(), DEFAULT_DESCRIBE_HOPS).unwrap();
        // Type + distribution link + 2 distribution triples + contains edge
        // from the root container (uri as object).
        assert_eq!(described.len(), 5);

        // With zero extra hops the distribution's own triples are absent.
        let shallow = store.describe(subject.as_ref(), 0).unwrap();
        assert_eq!(shallow.len(), 3);
    }

    #[test]
    fn describe_does_not_expand_named_neighbours() {
        let store = store();
        let (d1, mut g1) = dataset_graph("https://provena.dev/datasets/d1", "D1");
        let (d2, g2) = dataset_graph("https://provena.dev/datasets/d2", "D2");
        store.merge(&g2, ResourceKind::Dataset).unwrap();
        // d1 references d2 by URI.
        g1.insert(&Triple::new(
            d1.clone(),
            vocab::WAS_DERIVED_FROM.into_owned(),
            d2.clone(),
        ));
        store.merge(&g1, ResourceKind::Dataset).unwrap();

        let described = store.describe(d1.as_ref(), DEFAULT_DESCRIBE_HOPS).unwrap();
        // The edge to d2 is present but d2's own title is not pulled in.
        assert!(described.iter().any(|t| t.predicate == vocab::WAS_DERIVED_FROM));
        assert!(
            !described
                .iter()
                .any(|t| t.subject == NamedOrBlankNodeRef::NamedNode(d2.as_ref())
                    && t.predicate == vocab::TITLE)
        );
    }

    #[test]
    fn list_by_type_on_empty_type_returns_empty_graph() {
        let store = store();
        let listed = store.list_by_type(vocab::PLUGIN).unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn replace_resource_requires_existing_subject() {
        let store = store();
        let (subject, graph) = dataset_graph("https://provena.dev/datasets/d1", "D1");
        let err = store.replace_resource(subject.as_ref(), &graph).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn replace_resource_swaps_subject_triples() {
        let store = store();
        let (subject, graph) = dataset_graph("https://provena.dev/datasets/d1", "Old title");
        store.merge(&graph, ResourceKind::Dataset).unwrap();

        let (_, replacement) = dataset_graph("https://provena.dev/datasets/d1", "New title");
        store.replace_resource(subject.as_ref(), &replacement).unwrap();

        let described = store.describe(subject.as_ref(), 1).unwrap();
        let titles: Vec<_> = described
            .iter()
            .filter(|t| t.predicate == vocab::TITLE)
            .collect();
        assert_eq!(titles.len(), 1);
        assert!(titles[0].object.to_string().contains("New title"));
    }

    #[test]
    fn dump_returns_every_triple() {
        let store = store();
        let (_, graph) = dataset_graph("https://provena.dev/datasets/d1", "D1");
        store.merge(&graph, ResourceKind::Dataset).unwrap();
        assert_eq!(store.dump().unwrap().len(), store.triple_count().unwrap());
    }
}
