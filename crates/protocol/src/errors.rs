//! Error taxonomy for C-SPARQL client operations.
//!
//! Every failure a client call can produce is one variant of [`CsparqlError`].
//! The variants are ordered by how far the call got: configuration and request
//! construction fail before any network I/O; the remaining variants describe
//! what went wrong on or after the wire.
//!
//! No variant is retried internally. Callers receive the error exactly once,
//! with enough context (operation, target path, raw server body) to decide
//! what to do next.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Operation, ResourceKind};

/// Result alias used throughout the client crates.
pub type CsparqlResult<T> = Result<T, CsparqlError>;

/// Errors produced by C-SPARQL client operations.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CsparqlError {
    /// The client itself could not be set up.
    ///
    /// Produced by: base URL parsing, HTTP transport construction.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The request could not be built. Nothing was sent.
    ///
    /// Produced by: a name that is not a valid URL path segment, URL assembly,
    /// payload serialisation.
    #[error("Malformed request while {operation}: {reason}")]
    MalformedRequest {
        /// The operation that was being prepared.
        operation: Operation,
        /// Why construction failed.
        reason: String,
    },

    /// The server could not be reached, or the exchange broke off midway.
    ///
    /// Covers connection refused, DNS failure, timeouts, and failures while
    /// reading the response body.
    #[error("Unreachable host while {operation}: {message}")]
    Unreachable {
        /// The operation that was in flight.
        operation: Operation,
        /// Transport-level description of the failure.
        message: String,
    },

    /// The server answered with a non-2xx status.
    ///
    /// `body` is the response body exactly as the server sent it.
    #[error("Error while {operation} '{target}' (HTTP {status})\nERROR: {body}")]
    Server {
        /// Resource family the operation targets.
        kind: ResourceKind,
        /// The operation that was rejected.
        operation: Operation,
        /// Request path relative to the base URL (e.g. `streams/s1`).
        target: String,
        /// HTTP status code returned by the server.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The server answered 2xx but the body is not a JSON-encoded string.
    #[error("Malformed response while {operation} '{target}': {reason}")]
    MalformedResponse {
        /// The operation whose response could not be decoded.
        operation: Operation,
        /// Request path relative to the base URL.
        target: String,
        /// Raw response body.
        body: String,
        /// Decoder error message.
        reason: String,
    },
}

impl CsparqlError {
    /// The operation this error relates to, if any.
    ///
    /// `None` only for [`CsparqlError::Configuration`].
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Configuration { .. } => None,
            Self::MalformedRequest { operation, .. }
            | Self::Unreachable { operation, .. }
            | Self::Server { operation, .. }
            | Self::MalformedResponse { operation, .. } => Some(*operation),
        }
    }

    /// Resource family of a server-reported error (stream / query / observer).
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Self::Server { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// HTTP status of a server-reported error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the request never left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::MalformedRequest { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_message_carries_raw_body() {
        let err = CsparqlError::Server {
            kind: ResourceKind::Stream,
            operation: Operation::RegisterStream,
            target: "streams/s1".to_string(),
            status: 400,
            body: "Stream s1 already exists".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Error while registering stream 'streams/s1' (HTTP 400)"));
        assert!(msg.ends_with("ERROR: Stream s1 already exists"));
        assert_eq!(err.kind(), Some(ResourceKind::Stream));
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_local());
    }

    #[test]
    fn local_errors_have_no_kind() {
        let err = CsparqlError::MalformedRequest {
            operation: Operation::PauseQuery,
            reason: "name is empty".to_string(),
        };
        assert!(err.is_local());
        assert_eq!(err.kind(), None);
        assert_eq!(err.operation(), Some(Operation::PauseQuery));

        let err = CsparqlError::Configuration {
            message: "bad url".to_string(),
        };
        assert_eq!(err.operation(), None);
    }
}
