//! Shared helpers for the wiremock-backed client tests.

#![allow(dead_code)]

use std::time::Duration;

use csparql_client::{ClientConfig, HttpCsparqlClient};
use csparql_protocol::CsparqlResult;
use wiremock::MockServer;

/// API root the mock server is mounted under, mirroring a real deployment.
pub const API_ROOT: &str = "/csparql-server/api/1";

pub fn base_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), API_ROOT)
}

pub fn api_path(rest: &str) -> String {
    format!("{API_ROOT}/{rest}")
}

/// Runs `f` against a fresh blocking client on a blocking-pool thread.
///
/// The blocking client must not live on an async worker thread, so every call
/// goes through `spawn_blocking`.
pub async fn with_client<T, F>(base_url: String, f: F) -> CsparqlResult<T>
where
    F: FnOnce(&HttpCsparqlClient) -> CsparqlResult<T> + Send + 'static,
    T: Send + 'static,
{
    with_client_timeout(base_url, Duration::from_secs(5), f).await
}

/// [`with_client`] with an explicit client timeout.
pub async fn with_client_timeout<T, F>(
    base_url: String,
    timeout: Duration,
    f: F,
) -> CsparqlResult<T>
where
    F: FnOnce(&HttpCsparqlClient) -> CsparqlResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let config = ClientConfig::new(base_url).with_timeout(timeout);
        let client = HttpCsparqlClient::with_config(&config)?;
        let result = f(&client);
        client.close();
        result
    })
    .await
    .expect("blocking client task panicked")
}

/// JSON-encodes `text` the way the server wraps every success body.
pub fn json_string(text: &str) -> String {
    serde_json::to_string(text).unwrap()
}
