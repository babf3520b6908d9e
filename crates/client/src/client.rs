//! [`HttpCsparqlClient`]: the blocking HTTP transport for [`CsparqlApi`].

use std::fmt;

use csparql_protocol::{
    ApiRequest, BaseUrl, CsparqlApi, CsparqlError, CsparqlResult, Method, Operation,
};
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::redirect;
use tracing::{debug, debug_span};

use crate::config::ClientConfig;
use crate::response;

/// Synchronous client for one C-SPARQL server.
///
/// Owns a pooled `reqwest` blocking client. Clones share the pool; the pool
/// is released when the last clone is dropped or [`HttpCsparqlClient::close`]
/// is called on it.
///
/// The blocking transport drives its own internal runtime, so the client must
/// not be created or dropped on an async executor thread. Async callers wrap
/// calls in `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct HttpCsparqlClient {
    http: Client,
    base_url: BaseUrl,
}

impl fmt::Debug for HttpCsparqlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCsparqlClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpCsparqlClient {
    /// Client for `base_url` with the default timeout and pool settings.
    ///
    /// # Example
    /// ```no_run
    /// use csparql_client::HttpCsparqlClient;
    /// use csparql_protocol::CsparqlApi;
    ///
    /// let client = HttpCsparqlClient::new("http://localhost:8175/csparql-server/api/1")?;
    /// let reply = client.register_stream("s1", "http://ex.org/s1")?;
    /// println!("{reply}");
    /// client.close();
    /// # Ok::<(), csparql_protocol::CsparqlError>(())
    /// ```
    pub fn new(base_url: &str) -> CsparqlResult<Self> {
        Self::with_config(&ClientConfig::new(base_url))
    }

    /// Client built from an explicit [`ClientConfig`].
    ///
    /// Redirects are not followed: every call is one round trip, and a 3xx
    /// reply is reported like any other non-success status.
    pub fn with_config(config: &ClientConfig) -> CsparqlResult<Self> {
        let base_url = BaseUrl::parse(&config.base_url)?;
        let http = Client::builder()
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| CsparqlError::Configuration {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        debug!(
            base_url = base_url.as_str(),
            timeout_ms = config.timeout_ms,
            "csparql client created"
        );
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Releases this handle on the connection pool.
    ///
    /// Equivalent to dropping the client, but makes the end of its scope
    /// explicit at the call site.
    pub fn close(self) {
        debug!(base_url = self.base_url.as_str(), "csparql client closed");
        drop(self.http);
    }
}

impl CsparqlApi for HttpCsparqlClient {
    fn execute(&self, request: ApiRequest) -> CsparqlResult<String> {
        let operation = request.operation();
        let target = request.target();
        let span = debug_span!("csparql_request", operation = operation.name(), path = %target);
        let _enter = span.enter();

        let url = request.url(&self.base_url)?;

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method()), url.clone())
            .header(CACHE_CONTROL, "no-cache");
        if let Some(body) = request.body().encode() {
            builder = builder.header(CONTENT_TYPE, body.content_type).body(body.text);
        }

        let http_response = builder
            .send()
            .map_err(|e| transport_error(operation, &e))?;
        let status = http_response.status().as_u16();
        debug!(url = %url, status, "csparql response");

        let body = http_response
            .text()
            .map_err(|e| transport_error(operation, &e))?;

        response::interpret(&request, status, body)
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Maps a `reqwest` failure onto the error taxonomy.
///
/// Builder errors mean nothing was sent; everything else is treated as the
/// host being unreachable.
fn transport_error(operation: Operation, e: &reqwest::Error) -> CsparqlError {
    if e.is_builder() {
        return CsparqlError::MalformedRequest {
            operation,
            reason: e.to_string(),
        };
    }

    let message = if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    };
    CsparqlError::Unreachable { operation, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_base_url_is_a_configuration_error() {
        let err = HttpCsparqlClient::new("localhost:8175/api").unwrap_err();
        assert!(matches!(err, CsparqlError::Configuration { .. }), "{err:?}");
    }

    #[test]
    fn base_url_is_normalised() {
        let client = HttpCsparqlClient::new("http://localhost:8175/csparql-server/api/1/").unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "http://localhost:8175/csparql-server/api/1"
        );
        assert!(format!("{client:?}").contains("csparql-server/api/1"));
        client.close();
    }
}
