//! Blocking HTTP client for the C-SPARQL engine REST API.
//!
//! Implements the [`csparql_protocol::CsparqlApi`] trait over HTTP with a
//! pooled [`reqwest::blocking::Client`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport setup, header handling, status
//! classification, and response decoding live here. The request shapes and
//! the error taxonomy come from [`csparql_protocol`]; this crate adds no
//! domain rules.
//!
//! ## Transport
//!
//! - One `reqwest` blocking client per [`HttpCsparqlClient`], with a uniform
//!   connect and overall timeout (30 s unless configured otherwise).
//! - Every request carries `Cache-Control: no-cache`.
//! - No retries. A failed call surfaces to the caller immediately.

pub mod client;
pub mod config;
pub mod response;

pub use client::HttpCsparqlClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
