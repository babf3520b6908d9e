//! Protocol domain for the C-SPARQL engine REST client.
//!
//! This crate describes *what* a client call is: which resource it addresses,
//! which verb and path it uses, what body it carries, and how it can fail.
//! It performs no I/O. The HTTP transport that actually sends requests lives
//! in the `csparql-client` crate and plugs in through [`CsparqlApi`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Path-segment newtypes (`StreamName`, `QueryName`, `ObserverId`) |
//! | [`types`] | Base URL, HTTP verbs, observer endpoints, RDF/JSON payloads |
//! | [`request`] | `Operation` table and the pure request builder |
//! | [`errors`] | `CsparqlError` taxonomy |
//! | [`api`] | The `CsparqlApi` port trait |

pub mod api;
pub mod errors;
pub mod identifiers;
pub mod request;
pub mod types;

pub use api::CsparqlApi;
pub use errors::{CsparqlError, CsparqlResult};
pub use identifiers::{InvalidSegment, ObserverId, QueryName, StreamName};
pub use request::{ApiRequest, EncodedBody, Operation, RequestBody};
pub use types::{
    BaseUrl, Method, ObserverEndpoint, RdfJsonGraph, RdfJsonObject, RdfTermKind, ResourceKind,
};
