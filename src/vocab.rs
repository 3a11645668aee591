//! RDF vocabulary terms for the provenance graph.
//!
//! The graph model reuses standard vocabularies wherever one exists: DCAT for
//! datasets and distributions, DCTERMS for labels, p-plan for pipeline
//! structure, PROV-O for derivation links, and LDP for the root container.
//! The local `df` namespace covers the handful of terms those vocabularies
//! lack (the plugin class, the plugin-usage property, the root container).

use oxigraph::model::NamedNodeRef;

// --- Namespaces ---

pub const DCAT_NS: &str = "http://www.w3.org/ns/dcat#";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
pub const PPLAN_NS: &str = "http://purl.org/net/p-plan#";
pub const PROV_NS: &str = "http://www.w3.org/ns/prov#";
pub const LDP_NS: &str = "http://www.w3.org/ns/ldp#";
pub const DF_NS: &str = "https://provena.dev/ns/df#";

// --- Classes ---

pub const DATASET: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#Dataset");
pub const DISTRIBUTION: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#Distribution");
pub const PLAN: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/net/p-plan#Plan");
pub const STEP: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/net/p-plan#Step");
pub const VARIABLE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/net/p-plan#Variable");
pub const PLUGIN: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("https://provena.dev/ns/df#Plugin");
pub const BASIC_CONTAINER: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#BasicContainer");

/// The well-known root container indexing all top-level datasets and plugins.
pub const ROOT_CONTAINER: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("https://provena.dev/ns/df#root");

// --- Properties ---

pub const TITLE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");
pub const DESCRIPTION: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");
pub const CONTAINS: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#contains");
pub const IS_STEP_OF_PLAN: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/net/p-plan#isStepOfPlan");
pub const IS_VARIABLE_OF_PLAN: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/net/p-plan#isVariableOfPlan");
pub const HAS_INPUT_VAR: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/net/p-plan#hasInputVar");
pub const IS_OUTPUT_VAR_OF: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/net/p-plan#isOutputVarOf");
pub const IS_PRECEDED_BY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://purl.org/net/p-plan#isPrecededBy");
pub const USES_PLUGIN: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("https://provena.dev/ns/df#usesPlugin");
pub const SPECIALIZATION_OF: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#specializationOf");
pub const WAS_DERIVED_FROM: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#wasDerivedFrom");
pub const WAS_GENERATED_BY: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#wasGeneratedBy");
pub const HAS_DISTRIBUTION: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#distribution");
pub const ACCESS_URL: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#accessURL");
pub const MEDIA_TYPE: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#mediaType");
pub const COMPRESS_FORMAT: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#compressFormat");

/// Prefix table handed to serializers so Turtle output stays readable.
pub const PREFIXES: &[(&str, &str)] = &[
    ("dcat", DCAT_NS),
    ("dcterms", DCTERMS_NS),
    ("p-plan", PPLAN_NS),
    ("prov", PROV_NS),
    ("ldp", LDP_NS),
    ("df", DF_NS),
];
