//! Graph wire formats and content negotiation.
//!
//! The store speaks exactly three RDF text syntaxes: Turtle, JSON-LD, and
//! RDF/XML. Anything else is rejected during negotiation; parse failures in a
//! supported syntax are validation errors, not negotiation errors.

use oxigraph::io::{JsonLdProfileSet, RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{Graph, GraphNameRef, Triple};

use crate::error::FormatError;
use crate::vocab;

/// A supported graph text syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphSyntax {
    Turtle,
    JsonLd,
    RdfXml,
}

impl GraphSyntax {
    /// MIME type used in Content-Type and Accept headers.
    pub fn media_type(self) -> &'static str {
        match self {
            GraphSyntax::Turtle => "text/turtle",
            GraphSyntax::JsonLd => "application/ld+json",
            GraphSyntax::RdfXml => "application/rdf+xml",
        }
    }

    /// Resolve a Content-Type header value. Parameters after `;` are ignored.
    pub fn from_content_type(value: &str) -> Result<Self, FormatError> {
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "text/turtle" => Ok(GraphSyntax::Turtle),
            "application/ld+json" => Ok(GraphSyntax::JsonLd),
            "application/rdf+xml" => Ok(GraphSyntax::RdfXml),
            _ => Err(FormatError::UnsupportedContentType {
                value: value.to_string(),
            }),
        }
    }

    /// Resolve an Accept header value, preferring Turtle.
    ///
    /// A missing, blank, or wildcard header defaults to Turtle.
    pub fn negotiate_accept(value: Option<&str>) -> Result<Self, FormatError> {
        let Some(raw) = value else {
            return Ok(GraphSyntax::Turtle);
        };
        let header = raw.trim();
        if header.is_empty() || header == "*/*" {
            return Ok(GraphSyntax::Turtle);
        }
        let lower = header.to_ascii_lowercase();
        for syntax in [GraphSyntax::Turtle, GraphSyntax::JsonLd, GraphSyntax::RdfXml] {
            if lower.contains(syntax.media_type()) {
                return Ok(syntax);
            }
        }
        Err(FormatError::UnsupportedAccept {
            value: raw.to_string(),
        })
    }

    /// Resolve a short syntax name as used on the CLI.
    pub fn from_name(name: &str) -> Result<Self, FormatError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(GraphSyntax::Turtle),
            "jsonld" | "json-ld" => Ok(GraphSyntax::JsonLd),
            "rdfxml" | "rdf-xml" | "xml" => Ok(GraphSyntax::RdfXml),
            _ => Err(FormatError::UnsupportedContentType {
                value: name.to_string(),
            }),
        }
    }

    fn rdf_format(self) -> RdfFormat {
        match self {
            GraphSyntax::Turtle => RdfFormat::Turtle,
            GraphSyntax::JsonLd => RdfFormat::JsonLd {
                profile: JsonLdProfileSet::empty(),
            },
            GraphSyntax::RdfXml => RdfFormat::RdfXml,
        }
    }
}

impl std::fmt::Display for GraphSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.media_type())
    }
}

/// Parse a document in the given syntax into a graph.
///
/// Named graphs are rejected; the store works on a single default graph.
pub fn parse_graph(bytes: &[u8], syntax: GraphSyntax) -> Result<Graph, FormatError> {
    let parser = RdfParser::from_format(syntax.rdf_format()).without_named_graphs();
    let mut graph = Graph::new();
    for quad in parser.for_slice(bytes) {
        let quad = quad.map_err(|e| FormatError::Parse {
            message: e.to_string(),
        })?;
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    Ok(graph)
}

/// Serialize a graph in the given syntax.
pub fn serialize_graph(graph: &Graph, syntax: GraphSyntax) -> Result<Vec<u8>, FormatError> {
    let mut serializer = RdfSerializer::from_format(syntax.rdf_format());
    for (prefix, iri) in vocab::PREFIXES {
        serializer = serializer
            .with_prefix(*prefix, *iri)
            .map_err(|e| FormatError::Serialize {
                message: e.to_string(),
            })?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for triple in graph.iter() {
        writer
            .serialize_quad(triple.in_graph(GraphNameRef::DefaultGraph))
            .map_err(|e| FormatError::Serialize {
                message: e.to_string(),
            })?;
    }
    writer.finish().map_err(|e| FormatError::Serialize {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{Literal, NamedNode};

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        let subject = NamedNode::new("https://provena.dev/datasets/d1").unwrap();
        graph.insert(&Triple::new(
            subject.clone(),
            vocab::TITLE.into_owned(),
            Literal::new_simple_literal("Sample"),
        ));
        graph
    }

    #[test]
    fn content_type_negotiation() {
        assert_eq!(
            GraphSyntax::from_content_type("text/turtle").unwrap(),
            GraphSyntax::Turtle
        );
        assert_eq!(
            GraphSyntax::from_content_type("application/ld+json; charset=utf-8").unwrap(),
            GraphSyntax::JsonLd
        );
        assert!(GraphSyntax::from_content_type("text/csv").is_err());
    }

    #[test]
    fn accept_negotiation_defaults_to_turtle() {
        assert_eq!(
            GraphSyntax::negotiate_accept(None).unwrap(),
            GraphSyntax::Turtle
        );
        assert_eq!(
            GraphSyntax::negotiate_accept(Some("*/*")).unwrap(),
            GraphSyntax::Turtle
        );
        assert_eq!(
            GraphSyntax::negotiate_accept(Some("application/rdf+xml")).unwrap(),
            GraphSyntax::RdfXml
        );
        assert!(GraphSyntax::negotiate_accept(Some("image/png")).is_err());
    }

    #[test]
    fn turtle_roundtrip() {
        let graph = sample_graph();
        let bytes = serialize_graph(&graph, GraphSyntax::Turtle).unwrap();
        let parsed = parse_graph(&bytes, GraphSyntax::Turtle).unwrap();
        assert_eq!(parsed.len(), graph.len());
    }

    #[test]
    fn malformed_turtle_is_a_parse_error() {
        let err = parse_graph(b"this is not turtle", GraphSyntax::Turtle).unwrap_err();
        assert!(matches!(err, FormatError::Parse { .. }));
    }

    #[test]
    fn empty_document_parses_to_empty_graph() {
        // The merge path is responsible for rejecting empty graphs.
        let graph = parse_graph(b"", GraphSyntax::Turtle).unwrap();
        assert!(graph.is_empty());
    }
}
