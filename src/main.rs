//! provena CLI: provenance metadata store for data-processing pipelines.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use provena::artifact::ArtifactEndpoint;
use provena::config::StoreConfig;
use provena::descriptor::ResourceDescriptor;
use provena::distribution::{DistributionInput, DistributionManager, file_extension};
use provena::error::StoreError;
use provena::format::{self, GraphSyntax};
use provena::pipeline::{PipelineBuilder, PipelineSpec};
use provena::resource;
use provena::store::{DEFAULT_DESCRIBE_HOPS, MetadataStore};
use provena::uri::{ResourceKind, UriResolver};

#[derive(Parser)]
#[command(name = "provena", version, about = "Provenance metadata store")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for the persistent store (overrides the config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a data directory.
    Init,

    /// Register a dataset or plugin from a descriptor JSON file.
    Register {
        /// Path to the descriptor file.
        file: PathBuf,
    },

    /// Compile and store a pipeline specification JSON file.
    Submit {
        /// Path to the specification file.
        file: PathBuf,
    },

    /// Describe a resource by UUID.
    Describe {
        /// Resource UUID (any kind).
        uuid: String,

        /// Also inline pipeline dependencies (steps, variables, plugins, datasets).
        #[arg(long)]
        deep: bool,

        /// Blank-node expansion depth.
        #[arg(long, default_value_t = DEFAULT_DESCRIBE_HOPS)]
        hops: usize,

        /// Output syntax: turtle, jsonld, or rdfxml.
        #[arg(long, default_value = "turtle")]
        format: String,
    },

    /// List all resources of a kind.
    List {
        /// Resource kind: dataset, plugin, or pipeline.
        kind: String,

        /// Include each resource's distributions.
        #[arg(long)]
        distributions: bool,

        /// Output syntax: turtle, jsonld, or rdfxml.
        #[arg(long, default_value = "turtle")]
        format: String,
    },

    /// Export the entire graph.
    Dump {
        /// Output syntax: turtle, jsonld, or rdfxml.
        #[arg(long, default_value = "turtle")]
        format: String,
    },

    /// Replace every distribution of a dataset or plugin.
    SetDistributions {
        /// Resource kind: dataset or plugin.
        kind: String,

        /// Resource UUID.
        uuid: String,

        /// Artifact ids, one distribution each.
        #[arg(long = "artifact", required = true)]
        artifacts: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }

    if let Commands::Init = cli.command {
        let dir = config
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".provena"));
        let store = MetadataStore::open(&dir)?;
        store.close()?;
        println!("initialized store at {}", dir.display());
        return Ok(());
    }

    let store = match &config.data_dir {
        Some(dir) => MetadataStore::open(dir)?,
        None => MetadataStore::in_memory()?,
    };
    let uris = UriResolver::new(&config)?;
    let endpoint = ArtifactEndpoint::new(&config.artifact_download_template);

    match cli.command {
        Commands::Init => unreachable!("handled above"),

        Commands::Register { file } => {
            let raw = std::fs::read_to_string(&file).into_diagnostic()?;
            let descriptor = ResourceDescriptor::from_json(&raw)?;
            let (_, graph) = match &descriptor {
                ResourceDescriptor::Dataset(d) => {
                    let inputs = distribution_inputs(&endpoint, &d.artifacts);
                    resource::dataset_graph(&uris, &d.title, d.description.as_deref(), &inputs)?
                }
                ResourceDescriptor::Plugin(p) => {
                    let inputs = distribution_inputs(&endpoint, &p.artifacts);
                    resource::plugin_graph(&uris, &p.title, p.description.as_deref(), &inputs)?
                }
            };
            let stored = store.merge(&graph, descriptor.kind())?;
            println!("{stored}");
        }

        Commands::Submit { file } => {
            let raw = std::fs::read_to_string(&file).into_diagnostic()?;
            let spec = PipelineSpec::from_json(&raw)?;
            let pipeline = PipelineBuilder::new(&store, &uris).submit(&spec)?;
            println!("{pipeline}");
        }

        Commands::Describe {
            uuid,
            deep,
            hops,
            format: syntax,
        } => {
            let syntax = GraphSyntax::from_name(&syntax)?;
            let (kind, uri) = find_resource(&store, &uris, &uuid)?;
            let graph = if deep && kind == ResourceKind::Pipeline {
                store.describe_with_dependencies(uri.as_ref())?
            } else {
                store.describe(uri.as_ref(), hops)?
            };
            print_graph(&graph, syntax)?;
        }

        Commands::List {
            kind,
            distributions,
            format: syntax,
        } => {
            let syntax = GraphSyntax::from_name(&syntax)?;
            let kind = parse_kind(&kind)?;
            let graph = if distributions {
                store.list_by_type_with_distributions(kind.class())?
            } else {
                store.list_by_type(kind.class())?
            };
            print_graph(&graph, syntax)?;
        }

        Commands::Dump { format: syntax } => {
            let syntax = GraphSyntax::from_name(&syntax)?;
            let graph = store.dump()?;
            print_graph(&graph, syntax)?;
        }

        Commands::SetDistributions {
            kind,
            uuid,
            artifacts,
        } => {
            let kind = parse_kind(&kind)?;
            if kind == ResourceKind::Pipeline {
                return Err(miette::miette!("pipelines have no distributions"));
            }
            let uri = uris.uri_for(kind, &uuid)?;
            let manager = DistributionManager::new(&store, endpoint);
            manager.replace_all(uri.as_ref(), &artifacts)?;
            println!("{uri}");
        }
    }

    Ok(())
}

fn distribution_inputs(
    endpoint: &ArtifactEndpoint,
    artifacts: &[provena::descriptor::ArtifactRef],
) -> Vec<DistributionInput> {
    artifacts
        .iter()
        .map(|a| {
            let ext = a.filename.as_deref().and_then(file_extension);
            DistributionInput::new(endpoint.url_for(&a.id), ext)
        })
        .collect()
}

/// Probe each resource kind for the UUID, pipeline first.
fn find_resource(
    store: &MetadataStore,
    uris: &UriResolver,
    uuid: &str,
) -> Result<(ResourceKind, oxigraph::model::NamedNode)> {
    for kind in ResourceKind::ALL {
        let uri = uris.uri_for(kind, uuid)?;
        if store.resource_exists(uri.as_ref())? {
            return Ok((kind, uri));
        }
    }
    Err(StoreError::NotFound {
        uri: uuid.to_string(),
    }
    .into())
}

fn parse_kind(value: &str) -> Result<ResourceKind> {
    ResourceKind::parse(value)
        .ok_or_else(|| miette::miette!("unknown resource kind: {value} (expected dataset, plugin, or pipeline)"))
}

fn print_graph(graph: &oxigraph::model::Graph, syntax: GraphSyntax) -> Result<()> {
    let bytes = format::serialize_graph(graph, syntax)?;
    let text = String::from_utf8(bytes).into_diagnostic()?;
    println!("{text}");
    Ok(())
}
