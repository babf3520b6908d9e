//! Response interpreter: status classification and JSON-string unwrapping.

use csparql_protocol::{ApiRequest, CsparqlError, CsparqlResult};

/// Turns a completed exchange into the call's result.
///
/// A 2xx body must be a JSON-encoded string (`"\"ok\""` decodes to `ok`);
/// anything else is a [`CsparqlError::MalformedResponse`]. A non-2xx status
/// becomes [`CsparqlError::Server`] carrying `body` verbatim.
pub fn interpret(request: &ApiRequest, status: u16, body: String) -> CsparqlResult<String> {
    let operation = request.operation();

    if (200..300).contains(&status) {
        serde_json::from_str::<String>(&body).map_err(|e| CsparqlError::MalformedResponse {
            operation,
            target: request.target(),
            reason: format!("expected a JSON string: {e}"),
            body,
        })
    } else {
        Err(CsparqlError::Server {
            kind: operation.resource_kind(),
            operation,
            target: request.target(),
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use csparql_protocol::{Operation, ResourceKind};

    use super::*;

    fn request() -> ApiRequest {
        ApiRequest::register_stream("s1", "http://ex.org/s1").unwrap()
    }

    #[test]
    fn success_body_is_unquoted() {
        assert_eq!(interpret(&request(), 200, "\"ok\"".into()).unwrap(), "ok");
        assert_eq!(
            interpret(&request(), 204, "\"s1 registered\"".into()).unwrap(),
            "s1 registered"
        );
    }

    #[test]
    fn escaped_json_inside_the_string_is_preserved() {
        let body = r#""{\"name\":\"s1\",\"status\":\"RUNNING\"}""#;
        assert_eq!(
            interpret(&request(), 200, body.into()).unwrap(),
            r#"{"name":"s1","status":"RUNNING"}"#
        );
    }

    #[test]
    fn non_string_success_body_is_malformed() {
        for body in ["{\"a\":1}", "ok", "", "[\"ok\"]"] {
            match interpret(&request(), 200, body.into()) {
                Err(CsparqlError::MalformedResponse { body: raw, target, .. }) => {
                    assert_eq!(raw, body);
                    assert_eq!(target, "streams/s1");
                }
                other => panic!("{body:?}: expected malformed response, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_2xx_keeps_raw_body() {
        for status in [199, 300, 404, 500] {
            let err = interpret(&request(), status, "Stream not found".into()).unwrap_err();
            assert_eq!(
                err,
                CsparqlError::Server {
                    kind: ResourceKind::Stream,
                    operation: Operation::RegisterStream,
                    target: "streams/s1".into(),
                    status,
                    body: "Stream not found".into(),
                }
            );
        }
    }
}
