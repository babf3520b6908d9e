//! The client port: one method per remote operation.
//!
//! [`CsparqlApi`] has a single required method, [`CsparqlApi::execute`], which
//! performs one round trip for an already-built [`ApiRequest`]. Every named
//! operation is a provided method that builds its request and hands it to
//! `execute`. Transports (see the `csparql-client` crate) therefore implement
//! the exchange once and get the whole API surface.
//!
//! Every call returns the server's success body decoded from a JSON string.
//! Calls are independent: the trait carries no session state.

use crate::{ApiRequest, CsparqlResult, ObserverEndpoint, RdfJsonGraph};

/// Remote C-SPARQL engine operations.
///
/// Implementations must be safe to share between threads; the trait adds no
/// locking of its own.
pub trait CsparqlApi: Send + Sync {
    /// Sends `request`, returning the decoded success body.
    fn execute(&self, request: ApiRequest) -> CsparqlResult<String>;

    // -- Streams ------------------------------------------------------------

    /// Registers a new RDF stream `name` identified by `iri`.
    fn register_stream(&self, name: &str, iri: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::register_stream(name, iri)?)
    }

    /// Unregisters stream `name`.
    ///
    /// A second call for the same name is expected to surface the server's
    /// error; it is never reported as success.
    fn unregister_stream(&self, name: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::unregister_stream(name)?)
    }

    /// Puts serialised RDF (`payload`) into stream `name`.
    fn feed_stream(&self, name: &str, payload: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::feed_stream(name, payload)?)
    }

    /// Puts an RDF graph into stream `name`, serialised as RDF/JSON.
    fn feed_stream_graph(&self, name: &str, graph: &RdfJsonGraph) -> CsparqlResult<String> {
        self.execute(ApiRequest::feed_stream_graph(name, graph)?)
    }

    /// Puts `payload` into stream `name` as a raw `application/json` body.
    fn feed_stream_raw(&self, name: &str, payload: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::feed_stream_raw(name, payload)?)
    }

    fn stream_info(&self, name: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::stream_info(name)?)
    }

    fn streams_info(&self) -> CsparqlResult<String> {
        self.execute(ApiRequest::streams_info())
    }

    // -- Queries ------------------------------------------------------------

    /// Registers continuous query `name`; `query_body` is passed through opaque.
    fn register_query(&self, name: &str, query_body: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::register_query(name, query_body)?)
    }

    fn unregister_query(&self, name: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::unregister_query(name)?)
    }

    fn query_info(&self, name: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::query_info(name)?)
    }

    fn queries_info(&self) -> CsparqlResult<String> {
        self.execute(ApiRequest::queries_info())
    }

    fn pause_query(&self, name: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::pause_query(name)?)
    }

    fn restart_query(&self, name: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::restart_query(name)?)
    }

    // -- Observers ----------------------------------------------------------

    /// Attaches a result observer at `endpoint` to query `query`.
    fn add_observer(&self, query: &str, endpoint: &ObserverEndpoint) -> CsparqlResult<String> {
        self.execute(ApiRequest::add_observer(query, endpoint)?)
    }

    fn delete_observer(&self, query: &str, id: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::delete_observer(query, id)?)
    }

    fn observer_info(&self, query: &str, id: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::observer_info(query, id)?)
    }

    fn observers_info(&self, query: &str) -> CsparqlResult<String> {
        self.execute(ApiRequest::observers_info(query)?)
    }
}
