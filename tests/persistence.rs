//! Persistence tests: stored resources survive a close + reopen cycle.

use provena::config::StoreConfig;
use provena::pipeline::{PipelineBuilder, PipelineSpec, StepSpec, VariableSpec};
use provena::resource;
use provena::store::{DEFAULT_DESCRIBE_HOPS, MetadataStore};
use provena::uri::{ResourceKind, UriResolver};
use provena::vocab;

fn resolver() -> UriResolver {
    UriResolver::new(&StoreConfig::default()).unwrap()
}

#[test]
fn datasets_survive_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let uris = resolver();

    let uri = {
        let store = MetadataStore::open(dir.path()).unwrap();
        let (uri, graph) = resource::dataset_graph(&uris, "Corpus", None, &[]).unwrap();
        store.merge(&graph, ResourceKind::Dataset).unwrap();
        store.close().unwrap();
        uri
    };

    let store = MetadataStore::open(dir.path()).unwrap();
    assert!(store.resource_exists(uri.as_ref()).unwrap());
    let described = store.describe(uri.as_ref(), 1).unwrap();
    assert!(described.iter().any(|t| t.predicate == vocab::TITLE));
    // The root container index survived too.
    assert!(described.iter().any(|t| t.predicate == vocab::CONTAINS));
}

#[test]
fn pipelines_survive_restart_with_dependencies() {
    let dir = tempfile::TempDir::new().unwrap();
    let uris = resolver();

    let pipeline = {
        let store = MetadataStore::open(dir.path()).unwrap();
        let (plugin_uri, plugin_graph) =
            resource::plugin_graph(&uris, "Tool", None, &[]).unwrap();
        store.merge(&plugin_graph, ResourceKind::Plugin).unwrap();
        let plugin_id = uris
            .kind_and_id_for(plugin_uri.as_str())
            .unwrap()
            .1
            .to_string();

        let spec = PipelineSpec {
            title: "P".into(),
            description: None,
            variables: vec![VariableSpec {
                id: "out".into(),
                title: "Output".into(),
                dataset: None,
            }],
            steps: vec![StepSpec {
                id: "run".into(),
                title: "Run".into(),
                plugin: plugin_id,
                inputs: vec![],
                outputs: vec!["out".into()],
                preceded_by: vec![],
            }],
        };
        let pipeline = PipelineBuilder::new(&store, &uris).submit(&spec).unwrap();
        store.close().unwrap();
        pipeline
    };

    let store = MetadataStore::open(dir.path()).unwrap();
    let graph = store.describe_with_dependencies(pipeline.as_ref()).unwrap();
    assert!(graph.iter().any(|t| t.predicate == vocab::IS_STEP_OF_PLAN));
    assert!(graph.iter().any(|t| t.predicate == vocab::USES_PLUGIN));
    // "out" was terminal, so its synthesized dataset is back as well.
    assert!(graph.iter().any(|t| t.predicate == vocab::WAS_GENERATED_BY));
}

#[test]
fn triple_count_is_stable_across_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let uris = resolver();

    let count = {
        let store = MetadataStore::open(dir.path()).unwrap();
        let (_, graph) = resource::dataset_graph(&uris, "A", None, &[]).unwrap();
        store.merge(&graph, ResourceKind::Dataset).unwrap();
        let count = store.triple_count().unwrap();
        store.close().unwrap();
        count
    };

    let store = MetadataStore::open(dir.path()).unwrap();
    assert_eq!(store.triple_count().unwrap(), count);
    // Reopening must not duplicate the root container bootstrap.
    let root = store
        .describe(vocab::ROOT_CONTAINER, DEFAULT_DESCRIBE_HOPS)
        .unwrap();
    assert_eq!(root.iter().filter(|t| t.predicate == vocab::TITLE).count(), 1);
}
