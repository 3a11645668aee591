//! End-to-end integration tests for the provena store.
//!
//! These tests exercise the full path from resource registration through
//! pipeline compilation, merge, and bounded describes, validating that the
//! store adapter, URI resolver, and graph builder work together.

use oxigraph::model::vocab::rdf;
use oxigraph::model::{NamedOrBlankNodeRef, Term, TermRef};

use provena::artifact::ArtifactEndpoint;
use provena::config::StoreConfig;
use provena::distribution::{DistributionInput, DistributionManager};
use provena::error::{BuildError, StoreError};
use provena::format::{self, GraphSyntax};
use provena::pipeline::{PipelineBuilder, PipelineSpec, StepSpec, VariableSpec};
use provena::resource;
use provena::store::{DEFAULT_DESCRIBE_HOPS, MetadataStore};
use provena::uri::{ResourceKind, UriResolver};
use provena::vocab;

fn fixtures() -> (MetadataStore, UriResolver, ArtifactEndpoint) {
    let config = StoreConfig::default();
    let store = MetadataStore::in_memory().unwrap();
    let uris = UriResolver::new(&config).unwrap();
    let endpoint = ArtifactEndpoint::new(&config.artifact_download_template);
    (store, uris, endpoint)
}

fn register_dataset(
    store: &MetadataStore,
    uris: &UriResolver,
    endpoint: &ArtifactEndpoint,
    title: &str,
    artifact_ids: &[&str],
) -> String {
    let inputs: Vec<DistributionInput> = artifact_ids
        .iter()
        .map(|id| DistributionInput::new(endpoint.url_for(id), Some("csv")))
        .collect();
    let (uri, graph) = resource::dataset_graph(uris, title, None, &inputs).unwrap();
    store.merge(&graph, ResourceKind::Dataset).unwrap();
    uris.kind_and_id_for(uri.as_str()).unwrap().1.to_string()
}

fn register_plugin(store: &MetadataStore, uris: &UriResolver, title: &str) -> String {
    let (uri, graph) = resource::plugin_graph(uris, title, Some("A plugin"), &[]).unwrap();
    store.merge(&graph, ResourceKind::Plugin).unwrap();
    uris.kind_and_id_for(uri.as_str()).unwrap().1.to_string()
}

fn pipeline_spec(plugin: &str, dataset: &str) -> PipelineSpec {
    PipelineSpec {
        title: "Clean and aggregate".into(),
        description: Some("Normalizes records, then aggregates by key".into()),
        variables: vec![
            VariableSpec {
                id: "records".into(),
                title: "Raw records".into(),
                dataset: Some(dataset.into()),
            },
            VariableSpec {
                id: "clean".into(),
                title: "Clean records".into(),
                dataset: None,
            },
            VariableSpec {
                id: "totals".into(),
                title: "Aggregated totals".into(),
                dataset: None,
            },
        ],
        steps: vec![
            StepSpec {
                id: "normalize".into(),
                title: "Normalize".into(),
                plugin: plugin.into(),
                inputs: vec!["records".into()],
                outputs: vec!["clean".into()],
                preceded_by: vec![],
            },
            StepSpec {
                id: "aggregate".into(),
                title: "Aggregate".into(),
                plugin: plugin.into(),
                inputs: vec!["clean".into()],
                outputs: vec!["totals".into()],
                preceded_by: vec!["normalize".into()],
            },
        ],
    }
}

#[test]
fn build_then_merge_then_describe_with_dependencies() {
    let (store, uris, endpoint) = fixtures();
    let dataset = register_dataset(&store, &uris, &endpoint, "Sales records", &["a1"]);
    let plugin = register_plugin(&store, &uris, "Normalizer");

    let spec = pipeline_spec(&plugin, &dataset);
    let pipeline = PipelineBuilder::new(&store, &uris).submit(&spec).unwrap();

    let graph = store.describe_with_dependencies(pipeline.as_ref()).unwrap();

    // Both steps and all three variables are inlined.
    assert_eq!(
        graph.iter().filter(|t| t.object == TermRef::from(vocab::STEP)).count(),
        2
    );
    assert_eq!(
        graph
            .iter()
            .filter(|t| t.object == TermRef::from(vocab::VARIABLE))
            .count(),
        3
    );
    // The referenced plugin arrives with its own description.
    let plugin_uri = uris.uri_for(ResourceKind::Plugin, &plugin).unwrap();
    assert!(graph.iter().any(|t| {
        t.subject == NamedOrBlankNodeRef::NamedNode(plugin_uri.as_ref())
            && t.predicate == vocab::TITLE
    }));
    // The referenced dataset arrives with its distribution sub-graph.
    let dataset_uri = uris.uri_for(ResourceKind::Dataset, &dataset).unwrap();
    let dist_node = graph
        .iter()
        .find(|t| {
            t.subject == NamedOrBlankNodeRef::NamedNode(dataset_uri.as_ref())
                && t.predicate == vocab::HAS_DISTRIBUTION
        })
        .map(|t| t.object.into_owned())
        .expect("dataset distribution link");
    if let Term::BlankNode(b) = dist_node {
        assert!(graph.iter().any(|t| {
            t.subject == NamedOrBlankNodeRef::BlankNode(b.as_ref())
                && t.predicate == vocab::ACCESS_URL
        }));
    } else {
        panic!("distribution should be a blank node");
    }
    // The synthesized output dataset is linked back to the pipeline.
    assert_eq!(
        graph
            .iter()
            .filter(|t| t.predicate == vocab::WAS_GENERATED_BY)
            .count(),
        1
    );
}

#[test]
fn dangling_references_leave_store_untouched() {
    let (store, uris, endpoint) = fixtures();
    let dataset = register_dataset(&store, &uris, &endpoint, "Sales records", &["a1"]);
    let before = store.dump().unwrap().len();

    // Unknown plugin.
    let spec = pipeline_spec("0e45ab31-79a0-4c0f-94b2-5a9d40f1c1c0", &dataset);
    let err = PipelineBuilder::new(&store, &uris).submit(&spec).unwrap_err();
    assert!(matches!(err, BuildError::UnknownPlugin { .. }));
    assert_eq!(store.dump().unwrap().len(), before);

    // Unknown dataset.
    let plugin = register_plugin(&store, &uris, "Normalizer");
    let before = store.dump().unwrap().len();
    let spec = pipeline_spec(&plugin, "9d1f3c44-10af-44a5-b7c6-ffb22c2b0fd8");
    let err = PipelineBuilder::new(&store, &uris).submit(&spec).unwrap_err();
    assert!(matches!(err, BuildError::UnknownDataset { .. }));
    assert_eq!(store.dump().unwrap().len(), before);
}

#[test]
fn merge_describe_roundtrip_is_a_superset() {
    let (store, uris, _) = fixtures();
    let (uri, graph) = resource::dataset_graph(&uris, "Corpus", Some("Texts"), &[]).unwrap();
    store.merge(&graph, ResourceKind::Dataset).unwrap();

    let described = store.describe(uri.as_ref(), 1).unwrap();
    for triple in graph.iter() {
        assert!(
            described.contains(triple),
            "described graph is missing {triple}"
        );
    }
    // Plus the index edge pointing at the resource.
    assert!(described.iter().any(|t| t.predicate == vocab::CONTAINS));
}

#[test]
fn contains_index_stays_single_per_dataset() {
    let (store, uris, _) = fixtures();
    let (_, g1) = resource::dataset_graph(&uris, "One", None, &[]).unwrap();
    let (_, g2) = resource::dataset_graph(&uris, "Two", None, &[]).unwrap();
    for _ in 0..2 {
        store.merge(&g1, ResourceKind::Dataset).unwrap();
        store.merge(&g2, ResourceKind::Dataset).unwrap();
    }

    let root = store
        .describe(vocab::ROOT_CONTAINER, DEFAULT_DESCRIBE_HOPS)
        .unwrap();
    assert_eq!(
        root.iter().filter(|t| t.predicate == vocab::CONTAINS).count(),
        2
    );
}

#[test]
fn terminal_variable_synthesis_skips_consumed_outputs() {
    let (store, uris, endpoint) = fixtures();
    let dataset = register_dataset(&store, &uris, &endpoint, "Records", &["a1"]);
    let plugin = register_plugin(&store, &uris, "Tool");

    // normalize outputs "clean" (consumed by aggregate); aggregate outputs
    // "totals" (terminal).
    let spec = pipeline_spec(&plugin, &dataset);
    let built = PipelineBuilder::new(&store, &uris).build(&spec).unwrap();

    let derived: Vec<_> = built
        .graph
        .iter()
        .filter(|t| t.predicate == vocab::WAS_DERIVED_FROM)
        .collect();
    assert_eq!(derived.len(), 1);

    // The derived-from edge points at the "totals" variable, not "clean".
    // The synthesized dataset reuses the variable's title, so pin the
    // subject down by its type as well.
    let totals_var = built
        .graph
        .iter()
        .find(|t| {
            t.predicate == vocab::TITLE
                && t.object.to_string().contains("Aggregated totals")
                && built.graph.contains(oxigraph::model::TripleRef::new(
                    t.subject,
                    rdf::TYPE,
                    vocab::VARIABLE,
                ))
        })
        .map(|t| t.subject)
        .unwrap();
    assert_eq!(derived[0].object, {
        let NamedOrBlankNodeRef::NamedNode(n) = totals_var else {
            panic!("variable must be named")
        };
        TermRef::from(n)
    });
}

#[test]
fn distribution_replace_leaves_no_stale_triples() {
    let (store, uris, endpoint) = fixtures();
    let dataset = register_dataset(&store, &uris, &endpoint, "Records", &["d1", "d2"]);
    let dataset_uri = uris.uri_for(ResourceKind::Dataset, &dataset).unwrap();

    let old_urls: Vec<String> = vec![endpoint.url_for("d1"), endpoint.url_for("d2")];
    let manager = DistributionManager::new(&store, endpoint.clone());
    manager
        .replace_all(dataset_uri.as_ref(), &["art3".to_string()])
        .unwrap();

    let described = store
        .describe(dataset_uri.as_ref(), DEFAULT_DESCRIBE_HOPS)
        .unwrap();
    assert_eq!(
        described
            .iter()
            .filter(|t| t.predicate == vocab::HAS_DISTRIBUTION)
            .count(),
        1
    );
    assert!(described.iter().any(|t| {
        t.predicate == vocab::ACCESS_URL && t.object.to_string().contains("art3")
    }));

    // Nothing anywhere in the store mentions the old artifacts.
    let dump = store.dump().unwrap();
    for triple in dump.iter() {
        let rendered = triple.to_string();
        for old in &old_urls {
            assert!(!rendered.contains(old.as_str()), "stale triple: {rendered}");
        }
    }
}

#[test]
fn attach_appends_without_touching_existing_distributions() {
    let (store, uris, endpoint) = fixtures();
    let dataset = register_dataset(&store, &uris, &endpoint, "Records", &["d1"]);
    let dataset_uri = uris.uri_for(ResourceKind::Dataset, &dataset).unwrap();

    let manager = DistributionManager::new(&store, endpoint);
    manager
        .attach(dataset_uri.as_ref(), "d2", Some("zip"))
        .unwrap();

    let described = store
        .describe(dataset_uri.as_ref(), DEFAULT_DESCRIBE_HOPS)
        .unwrap();
    assert_eq!(
        described
            .iter()
            .filter(|t| t.predicate == vocab::HAS_DISTRIBUTION)
            .count(),
        2
    );
    assert!(described.iter().any(|t| t.predicate == vocab::COMPRESS_FORMAT));
}

#[test]
fn replace_all_on_unknown_resource_is_not_found() {
    let (store, uris, endpoint) = fixtures();
    let missing = uris
        .uri_for(ResourceKind::Dataset, "3c9e1d5e-8f7a-4b53-b1ad-62c1e0b4f7aa")
        .unwrap();
    let manager = DistributionManager::new(&store, endpoint);
    let err = manager
        .replace_all(missing.as_ref(), &["a1".to_string()])
        .unwrap_err();
    assert!(matches!(
        err,
        provena::error::DistributionError::Store(StoreError::NotFound { .. })
    ));
}

#[test]
fn list_by_type_returns_each_kind_separately() {
    let (store, uris, endpoint) = fixtures();
    register_dataset(&store, &uris, &endpoint, "D", &["a1"]);
    register_plugin(&store, &uris, "P");

    let datasets = store.list_by_type(vocab::DATASET).unwrap();
    assert_eq!(
        datasets
            .iter()
            .filter(|t| t.predicate == rdf::TYPE && t.object == TermRef::from(vocab::DATASET))
            .count(),
        1
    );
    // Shallow listing excludes the distribution sub-graph.
    assert!(datasets.iter().all(|t| t.predicate != vocab::ACCESS_URL));

    let with_dists = store.list_by_type_with_distributions(vocab::DATASET).unwrap();
    assert!(with_dists.iter().any(|t| t.predicate == vocab::ACCESS_URL));

    // A type with no members is an empty graph, not an error.
    let none = store.list_by_type(vocab::STEP).unwrap();
    assert!(none.is_empty());
}

#[test]
fn submitted_turtle_survives_a_wire_roundtrip() {
    let (store, uris, _) = fixtures();
    let (uri, graph) = resource::dataset_graph(&uris, "Corpus", None, &[]).unwrap();
    store.merge(&graph, ResourceKind::Dataset).unwrap();

    let described = store.describe(uri.as_ref(), 1).unwrap();
    let turtle = format::serialize_graph(&described, GraphSyntax::Turtle).unwrap();
    let reparsed = format::parse_graph(&turtle, GraphSyntax::Turtle).unwrap();
    assert_eq!(reparsed.len(), described.len());
}
