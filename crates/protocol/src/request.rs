//! Request builder: maps each remote operation onto a verb, a URL path, and a
//! body.
//!
//! Building a request is pure. It validates names, assembles the path
//! segments, and encodes the body, but sends nothing. A request that cannot
//! be built fails here with [`CsparqlError::MalformedRequest`], before any
//! network I/O.
//!
//! | Operation | Verb | Path | Body |
//! |-----------|------|------|------|
//! | register stream | PUT | `streams/{name}` | form `streamIri` |
//! | unregister stream | DELETE | `streams/{name}` | — |
//! | feed stream | POST | `streams/{name}` | form `payload`, or raw JSON |
//! | stream info | GET | `streams/{name}` | — |
//! | streams info | GET | `streams` | — |
//! | register query | PUT | `queries/{name}` | form `queryBody` |
//! | unregister query | DELETE | `queries/{name}` | — |
//! | query info | GET | `queries/{name}` | — |
//! | queries info | GET | `queries` | — |
//! | pause / restart query | POST | `queries/{name}` | form `action` |
//! | add observer | POST | `queries/{name}` | form `action=addobserver`, `host`, `port` |
//! | delete observer | DELETE | `queries/{name}/observers/{id}` | — |
//! | observer info | GET | `queries/{name}/observers/{id}` | — |
//! | observers info | GET | `queries/{name}/observers` | — |

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::identifiers::{ObserverId, QueryName, StreamName};
use crate::{
    BaseUrl, CsparqlError, CsparqlResult, Method, ObserverEndpoint, RdfJsonGraph, ResourceKind,
};

/// Content type of form-encoded request bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Content type of raw stream payloads.
pub const JSON_CONTENT_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// One remote operation of the engine's REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    RegisterStream,
    UnregisterStream,
    FeedStream,
    StreamInfo,
    StreamsInfo,
    RegisterQuery,
    UnregisterQuery,
    QueryInfo,
    QueriesInfo,
    PauseQuery,
    RestartQuery,
    AddObserver,
    DeleteObserver,
    ObserverInfo,
    ObserversInfo,
}

impl Operation {
    /// Every operation, in API table order.
    pub const ALL: [Operation; 15] = [
        Self::RegisterStream,
        Self::UnregisterStream,
        Self::FeedStream,
        Self::StreamInfo,
        Self::StreamsInfo,
        Self::RegisterQuery,
        Self::UnregisterQuery,
        Self::QueryInfo,
        Self::QueriesInfo,
        Self::PauseQuery,
        Self::RestartQuery,
        Self::AddObserver,
        Self::DeleteObserver,
        Self::ObserverInfo,
        Self::ObserversInfo,
    ];

    /// Short machine-friendly name, used as a structured log field.
    pub fn name(self) -> &'static str {
        match self {
            Self::RegisterStream => "registerStream",
            Self::UnregisterStream => "unregisterStream",
            Self::FeedStream => "feedStream",
            Self::StreamInfo => "getStreamInfo",
            Self::StreamsInfo => "getStreamsInfo",
            Self::RegisterQuery => "registerQuery",
            Self::UnregisterQuery => "unregisterQuery",
            Self::QueryInfo => "getQueryInfo",
            Self::QueriesInfo => "getQueriesInfo",
            Self::PauseQuery => "pauseQuery",
            Self::RestartQuery => "restartQuery",
            Self::AddObserver => "addObserver",
            Self::DeleteObserver => "deleteObserver",
            Self::ObserverInfo => "getObserverInfo",
            Self::ObserversInfo => "getObserversInfo",
        }
    }

    /// HTTP verb the operation is sent with.
    pub fn method(self) -> Method {
        match self {
            Self::StreamInfo
            | Self::StreamsInfo
            | Self::QueryInfo
            | Self::QueriesInfo
            | Self::ObserverInfo
            | Self::ObserversInfo => Method::Get,
            Self::RegisterStream | Self::RegisterQuery => Method::Put,
            Self::FeedStream | Self::PauseQuery | Self::RestartQuery | Self::AddObserver => {
                Method::Post
            }
            Self::UnregisterStream | Self::UnregisterQuery | Self::DeleteObserver => Method::Delete,
        }
    }

    /// Resource family the operation addresses.
    pub fn resource_kind(self) -> ResourceKind {
        match self {
            Self::RegisterStream
            | Self::UnregisterStream
            | Self::FeedStream
            | Self::StreamInfo
            | Self::StreamsInfo => ResourceKind::Stream,
            Self::RegisterQuery
            | Self::UnregisterQuery
            | Self::QueryInfo
            | Self::QueriesInfo
            | Self::PauseQuery
            | Self::RestartQuery => ResourceKind::Query,
            Self::AddObserver
            | Self::DeleteObserver
            | Self::ObserverInfo
            | Self::ObserversInfo => ResourceKind::Observer,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::RegisterStream => "registering stream",
            Self::UnregisterStream => "unregistering stream",
            Self::FeedStream => "feeding stream",
            Self::StreamInfo => "getting information about stream",
            Self::StreamsInfo => "getting information about streams",
            Self::RegisterQuery => "registering query",
            Self::UnregisterQuery => "deleting query",
            Self::QueryInfo => "getting information about query",
            Self::QueriesInfo => "getting information about queries",
            Self::PauseQuery => "pausing query",
            Self::RestartQuery => "restarting query",
            Self::AddObserver => "adding observer to query",
            Self::DeleteObserver => "deleting observer",
            Self::ObserverInfo => "getting information about observer",
            Self::ObserversInfo => "getting information about observers of query",
        })
    }
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// Body of an outgoing request, before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    /// Key/value pairs sent as `application/x-www-form-urlencoded`.
    Form(Vec<(&'static str, String)>),
    /// A string sent verbatim with the given content type.
    Raw {
        content_type: &'static str,
        text: String,
    },
}

/// Encoded body ready to be put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: &'static str,
    pub text: String,
}

impl RequestBody {
    /// Encodes the body. `None` for [`RequestBody::Empty`].
    pub fn encode(&self) -> Option<EncodedBody> {
        match self {
            Self::Empty => None,
            Self::Form(pairs) => Some(EncodedBody {
                content_type: FORM_CONTENT_TYPE,
                text: form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs.iter())
                    .finish(),
            }),
            Self::Raw { content_type, text } => Some(EncodedBody {
                content_type: *content_type,
                text: text.clone(),
            }),
        }
    }

    /// Value of a form field, if this is a form body containing it.
    pub fn form_field(&self, key: &str) -> Option<&str> {
        match self {
            Self::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A fully described remote call: operation, path, and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    operation: Operation,
    segments: Vec<String>,
    body: RequestBody,
}

impl ApiRequest {
    fn new(operation: Operation, segments: Vec<String>, body: RequestBody) -> Self {
        Self {
            operation,
            segments,
            body,
        }
    }

    pub fn register_stream(name: &str, iri: &str) -> CsparqlResult<Self> {
        let op = Operation::RegisterStream;
        let name = stream_name(op, name)?;
        Ok(Self::new(
            op,
            stream_path(&name),
            RequestBody::Form(vec![("streamIri", iri.to_string())]),
        ))
    }

    pub fn unregister_stream(name: &str) -> CsparqlResult<Self> {
        let op = Operation::UnregisterStream;
        let name = stream_name(op, name)?;
        Ok(Self::new(op, stream_path(&name), RequestBody::Empty))
    }

    /// Feeds serialised RDF as the `payload` form field.
    pub fn feed_stream(name: &str, payload: &str) -> CsparqlResult<Self> {
        let op = Operation::FeedStream;
        let name = stream_name(op, name)?;
        Ok(Self::new(
            op,
            stream_path(&name),
            RequestBody::Form(vec![("payload", payload.to_string())]),
        ))
    }

    /// Serialises `graph` to RDF/JSON and feeds it as the `payload` form field.
    pub fn feed_stream_graph(name: &str, graph: &RdfJsonGraph) -> CsparqlResult<Self> {
        let op = Operation::FeedStream;
        let payload = graph
            .to_json_string()
            .map_err(|e| malformed(op, format!("RDF/JSON serialisation failed: {e}")))?;
        Self::feed_stream(name, &payload)
    }

    /// Feeds `payload` verbatim as an `application/json` body.
    pub fn feed_stream_raw(name: &str, payload: &str) -> CsparqlResult<Self> {
        let op = Operation::FeedStream;
        let name = stream_name(op, name)?;
        Ok(Self::new(
            op,
            stream_path(&name),
            RequestBody::Raw {
                content_type: JSON_CONTENT_TYPE,
                text: payload.to_string(),
            },
        ))
    }

    pub fn stream_info(name: &str) -> CsparqlResult<Self> {
        let op = Operation::StreamInfo;
        let name = stream_name(op, name)?;
        Ok(Self::new(op, stream_path(&name), RequestBody::Empty))
    }

    pub fn streams_info() -> Self {
        Self::new(
            Operation::StreamsInfo,
            vec!["streams".to_string()],
            RequestBody::Empty,
        )
    }

    pub fn register_query(name: &str, query_body: &str) -> CsparqlResult<Self> {
        let op = Operation::RegisterQuery;
        let name = query_name(op, name)?;
        Ok(Self::new(
            op,
            query_path(&name),
            RequestBody::Form(vec![("queryBody", query_body.to_string())]),
        ))
    }

    pub fn unregister_query(name: &str) -> CsparqlResult<Self> {
        let op = Operation::UnregisterQuery;
        let name = query_name(op, name)?;
        Ok(Self::new(op, query_path(&name), RequestBody::Empty))
    }

    pub fn query_info(name: &str) -> CsparqlResult<Self> {
        let op = Operation::QueryInfo;
        let name = query_name(op, name)?;
        Ok(Self::new(op, query_path(&name), RequestBody::Empty))
    }

    pub fn queries_info() -> Self {
        Self::new(
            Operation::QueriesInfo,
            vec!["queries".to_string()],
            RequestBody::Empty,
        )
    }

    pub fn pause_query(name: &str) -> CsparqlResult<Self> {
        Self::query_action(Operation::PauseQuery, name, "pause")
    }

    pub fn restart_query(name: &str) -> CsparqlResult<Self> {
        Self::query_action(Operation::RestartQuery, name, "restart")
    }

    fn query_action(op: Operation, name: &str, action: &str) -> CsparqlResult<Self> {
        let name = query_name(op, name)?;
        Ok(Self::new(
            op,
            query_path(&name),
            RequestBody::Form(vec![("action", action.to_string())]),
        ))
    }

    pub fn add_observer(query: &str, endpoint: &ObserverEndpoint) -> CsparqlResult<Self> {
        let op = Operation::AddObserver;
        let query = query_name(op, query)?;
        Ok(Self::new(
            op,
            query_path(&query),
            RequestBody::Form(vec![
                ("action", "addobserver".to_string()),
                ("host", endpoint.host.clone()),
                ("port", endpoint.port.to_string()),
            ]),
        ))
    }

    pub fn delete_observer(query: &str, id: &str) -> CsparqlResult<Self> {
        let op = Operation::DeleteObserver;
        Ok(Self::new(op, observer_path(op, query, id)?, RequestBody::Empty))
    }

    pub fn observer_info(query: &str, id: &str) -> CsparqlResult<Self> {
        let op = Operation::ObserverInfo;
        Ok(Self::new(op, observer_path(op, query, id)?, RequestBody::Empty))
    }

    pub fn observers_info(query: &str) -> CsparqlResult<Self> {
        let op = Operation::ObserversInfo;
        let query = query_name(op, query)?;
        let mut segments = query_path(&query);
        segments.push("observers".to_string());
        Ok(Self::new(op, segments, RequestBody::Empty))
    }

    // -----------------------------------------------------------------------

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn method(&self) -> Method {
        self.operation.method()
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Request path relative to the base URL, e.g. `queries/q1/observers/7`.
    pub fn target(&self) -> String {
        self.segments.join("/")
    }

    /// Absolute URL of this request against `base`.
    pub fn url(&self, base: &BaseUrl) -> CsparqlResult<Url> {
        base.join(&self.segments)
            .map_err(|e| malformed(self.operation, format!("invalid URL: {e}")))
    }
}

fn malformed(operation: Operation, reason: impl Into<String>) -> CsparqlError {
    CsparqlError::MalformedRequest {
        operation,
        reason: reason.into(),
    }
}

fn stream_name(op: Operation, name: &str) -> CsparqlResult<StreamName> {
    StreamName::parse(name).map_err(|e| malformed(op, format!("invalid stream name: {e}")))
}

fn query_name(op: Operation, name: &str) -> CsparqlResult<QueryName> {
    QueryName::parse(name).map_err(|e| malformed(op, format!("invalid query name: {e}")))
}

fn stream_path(name: &StreamName) -> Vec<String> {
    vec!["streams".to_string(), name.to_string()]
}

fn query_path(name: &QueryName) -> Vec<String> {
    vec!["queries".to_string(), name.to_string()]
}

fn observer_path(op: Operation, query: &str, id: &str) -> CsparqlResult<Vec<String>> {
    let query = query_name(op, query)?;
    let id = ObserverId::parse(id).map_err(|e| malformed(op, format!("invalid observer id: {e}")))?;
    let mut segments = query_path(&query);
    segments.extend(["observers".to_string(), id.to_string()]);
    Ok(segments)
}
