//! Shared value types: the server base URL, HTTP verbs, observer endpoints,
//! and the RDF/JSON document used to feed streams.
//!
//! Unlike the identifiers in [`crate::identifiers`], these types carry
//! structure that the request builder inspects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{CsparqlError, CsparqlResult};

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// Root URL of a C-SPARQL server's REST API
/// (e.g. `http://localhost:8175/csparql-server/api/1`).
///
/// Stored without a trailing slash; every request path is appended to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Parses and normalises a base URL.
    ///
    /// Only `http` and `https` URLs without a query string or fragment are
    /// accepted, since request paths are appended verbatim.
    pub fn parse(value: &str) -> CsparqlResult<Self> {
        let invalid = |reason: String| CsparqlError::Configuration {
            message: format!("invalid base URL '{value}': {reason}"),
        };

        let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query strings and fragments are not allowed".into()));
        }

        Ok(Self(url.as_str().trim_end_matches('/').to_string()))
    }

    /// Returns the base URL as a string slice (no trailing slash).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends already-validated path segments and parses the result.
    ///
    /// Fails if the parser folded or split any segment, so the URL always
    /// addresses exactly `segments` below the base path.
    pub(crate) fn join(&self, segments: &[String]) -> Result<Url, String> {
        let base = Url::parse(&self.0).map_err(|e| e.to_string())?;
        let url = Url::parse(&format!("{}/{}", self.0, segments.join("/")))
            .map_err(|e| e.to_string())?;

        let appended: Vec<&str> = url
            .path_segments()
            .map(|s| s.skip(path_depth(&base)).collect())
            .unwrap_or_default();
        let intact = appended.len() == segments.len() && appended.iter().all(|s| !s.is_empty());
        if !intact {
            return Err(format!(
                "path '{}' does not resolve to {} segments below the base URL",
                segments.join("/"),
                segments.len()
            ));
        }
        Ok(url)
    }
}

fn path_depth(url: &Url) -> usize {
    if url.path() == "/" {
        return 0;
    }
    url.path_segments().map_or(0, Iterator::count)
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// HTTP verb of a remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    /// Upper-case verb as it appears on the request line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------

/// Resource family an operation addresses.
///
/// Used to categorise server-reported errors for caller diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Stream,
    Query,
    Observer,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Stream => "stream",
            Self::Query => "query",
            Self::Observer => "observer",
        })
    }
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

/// Callback endpoint the engine pushes query results to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverEndpoint {
    /// Host name or address the engine connects back to.
    pub host: String,
    /// TCP port of the callback listener.
    pub port: u16,
}

impl ObserverEndpoint {
    /// Creates a new [`ObserverEndpoint`].
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl std::fmt::Display for ObserverEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// RDF/JSON payloads
// ---------------------------------------------------------------------------

/// Kind of an object term in an RDF/JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfTermKind {
    Uri,
    Bnode,
    Literal,
}

/// Object of a triple in RDF/JSON form:
/// `{ "type": "literal", "value": "21.5", "datatype": "http://..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfJsonObject {
    #[serde(rename = "type")]
    pub kind: RdfTermKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl RdfJsonObject {
    pub fn iri(value: impl Into<String>) -> Self {
        Self::term(RdfTermKind::Uri, value)
    }

    /// Blank node; `id` is written with the `_:` prefix if it lacks one.
    pub fn blank(id: impl Into<String>) -> Self {
        let id = id.into();
        let value = if id.starts_with("_:") { id } else { format!("_:{id}") };
        Self::term(RdfTermKind::Bnode, value)
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::term(RdfTermKind::Literal, value)
    }

    pub fn lang_literal(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.into()),
            ..Self::literal(value)
        }
    }

    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            datatype: Some(datatype.into()),
            ..Self::literal(value)
        }
    }

    fn term(kind: RdfTermKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }
}

/// An RDF graph in the RDF/JSON serialisation the engine accepts as a stream
/// payload: `{ subject: { predicate: [object, ...] } }`.
///
/// Subjects and predicates are kept in sorted order so the serialised text is
/// deterministic. Duplicate triples are stored once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RdfJsonGraph(BTreeMap<String, BTreeMap<String, Vec<RdfJsonObject>>>);

impl RdfJsonGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one triple. Blank-node subjects use the `_:id` form.
    pub fn add(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: RdfJsonObject,
    ) -> &mut Self {
        let objects = self
            .0
            .entry(subject.into())
            .or_default()
            .entry(predicate.into())
            .or_default();
        if !objects.contains(&object) {
            objects.push(object);
        }
        self
    }

    /// Number of triples in the graph.
    pub fn len(&self) -> usize {
        self.0
            .values()
            .flat_map(|predicates| predicates.values())
            .map(Vec::len)
            .sum()
    }

    /// Returns `true` if the graph holds no triples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over `(subject, predicate, object)` triples in sorted
    /// subject/predicate order.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &RdfJsonObject)> {
        self.0.iter().flat_map(|(s, predicates)| {
            predicates.iter().flat_map(move |(p, objects)| {
                objects.iter().map(move |o| (s.as_str(), p.as_str(), o))
            })
        })
    }

    /// Serialises the graph to RDF/JSON text.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses RDF/JSON text.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let base = BaseUrl::parse("http://localhost:8175/csparql-server/api/1/").unwrap();
        assert_eq!(base.as_str(), "http://localhost:8175/csparql-server/api/1");

        let bare = BaseUrl::parse("http://localhost:8175").unwrap();
        assert_eq!(bare.as_str(), "http://localhost:8175");
    }

    #[test]
    fn join_appends_segments_below_the_base_path() {
        let base = BaseUrl::parse("http://localhost:8175/csparql-server/api/1").unwrap();
        let url = base.join(&["streams".into(), "s1".into()]).unwrap();
        assert_eq!(url.path(), "/csparql-server/api/1/streams/s1");

        let bare = BaseUrl::parse("http://localhost:8175/").unwrap();
        assert_eq!(bare.join(&["streams".into()]).unwrap().path(), "/streams");
    }

    #[test]
    fn join_refuses_segments_the_parser_would_rewrite() {
        let base = BaseUrl::parse("http://localhost:8175/csparql-server/api/1").unwrap();
        for segment in ["%2e%2e", "%2e", "a\\b", "."] {
            assert!(
                base.join(&["streams".into(), segment.into()]).is_err(),
                "{segment:?} should be refused"
            );
        }
    }

    #[test]
    fn base_url_rejects_non_http_and_queries() {
        for bad in ["not a url", "ftp://host/api", "http://host/api?x=1", "http://host/api#f"] {
            assert!(
                matches!(BaseUrl::parse(bad), Err(CsparqlError::Configuration { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rdf_json_graph_serialises_in_rdf_json_shape() {
        let mut graph = RdfJsonGraph::new();
        graph
            .add(
                "http://ex.org/sensor1",
                "http://ex.org/hasTemperature",
                RdfJsonObject::typed_literal("21.5", "http://www.w3.org/2001/XMLSchema#double"),
            )
            .add(
                "http://ex.org/sensor1",
                "http://www.w3.org/2000/01/rdf-schema#label",
                RdfJsonObject::lang_literal("kitchen", "en"),
            );

        let value: serde_json::Value =
            serde_json::from_str(&graph.to_json_string().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "http://ex.org/sensor1": {
                    "http://ex.org/hasTemperature": [
                        {"type": "literal", "value": "21.5",
                         "datatype": "http://www.w3.org/2001/XMLSchema#double"}
                    ],
                    "http://www.w3.org/2000/01/rdf-schema#label": [
                        {"type": "literal", "value": "kitchen", "lang": "en"}
                    ]
                }
            })
        );
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn rdf_json_graph_ignores_duplicate_triples() {
        let mut graph = RdfJsonGraph::new();
        graph.add("_:b0", "http://ex.org/p", RdfJsonObject::iri("http://ex.org/o"));
        graph.add("_:b0", "http://ex.org/p", RdfJsonObject::iri("http://ex.org/o"));
        graph.add("_:b0", "http://ex.org/p", RdfJsonObject::blank("b1"));
        assert_eq!(graph.len(), 2);

        let objects: Vec<_> = graph.triples().map(|(_, _, o)| o.value.as_str()).collect();
        assert_eq!(objects, ["http://ex.org/o", "_:b1"]);
    }

    #[test]
    fn rdf_json_graph_parses_server_style_documents() {
        let text =
            r#"{"http://ex.org/s":{"http://ex.org/p":[{"type":"uri","value":"http://ex.org/o"}]}}"#;
        let graph = RdfJsonGraph::from_json_str(text).unwrap();
        let triples: Vec<_> = graph.triples().collect();
        let expected = RdfJsonObject::iri("http://ex.org/o");
        assert_eq!(triples, [("http://ex.org/s", "http://ex.org/p", &expected)]);

        let unknown_kind = r#"{"s":{"p":[{"type":"triple","value":"x"}]}}"#;
        assert!(RdfJsonGraph::from_json_str(unknown_kind).is_err());
    }
}
