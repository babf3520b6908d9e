//! Maps each subcommand onto exactly one client call.

use std::io::Read;

use anyhow::{bail, Context, Result};
use csparql_protocol::{CsparqlApi, ObserverEndpoint, RdfJsonGraph};
use tracing::info;

use crate::cli::{Commands, FeedMode, ObserverCommand, PayloadArgs, QueryCommand, StreamCommand};

/// Runs `command` against `api`, returning the decoded server reply.
pub fn dispatch(api: &dyn CsparqlApi, command: Commands) -> Result<String> {
    let reply = match command {
        Commands::Stream(cmd) => stream(api, cmd)?,
        Commands::Query(cmd) => query(api, cmd)?,
        Commands::Observer(cmd) => observer(api, cmd)?,
    };
    Ok(reply)
}

fn stream(api: &dyn CsparqlApi, command: StreamCommand) -> Result<String> {
    let reply = match command {
        StreamCommand::Register { name, iri } => api.register_stream(&name, &iri)?,
        StreamCommand::Unregister { name } => api.unregister_stream(&name)?,
        StreamCommand::Feed { name, input, mode } => {
            let payload = read_payload(&input, &mut std::io::stdin().lock())?;
            info!(stream = %name, bytes = payload.len(), ?mode, "feeding stream");
            match mode {
                FeedMode::Form => api.feed_stream(&name, &payload)?,
                FeedMode::Raw => api.feed_stream_raw(&name, &payload)?,
                FeedMode::RdfJson => {
                    let graph = RdfJsonGraph::from_json_str(&payload)
                        .context("payload is not an RDF/JSON document")?;
                    api.feed_stream_graph(&name, &graph)?
                }
            }
        }
        StreamCommand::Info { name: Some(name) } => api.stream_info(&name)?,
        StreamCommand::Info { name: None } => api.streams_info()?,
    };
    Ok(reply)
}

fn query(api: &dyn CsparqlApi, command: QueryCommand) -> Result<String> {
    let reply = match command {
        QueryCommand::Register { name, input } => {
            let body = read_payload(&input, &mut std::io::stdin().lock())?;
            api.register_query(&name, &body)?
        }
        QueryCommand::Unregister { name } => api.unregister_query(&name)?,
        QueryCommand::Info { name: Some(name) } => api.query_info(&name)?,
        QueryCommand::Info { name: None } => api.queries_info()?,
        QueryCommand::Pause { name } => api.pause_query(&name)?,
        QueryCommand::Restart { name } => api.restart_query(&name)?,
    };
    Ok(reply)
}

fn observer(api: &dyn CsparqlApi, command: ObserverCommand) -> Result<String> {
    let reply = match command {
        ObserverCommand::Add { query, host, port } => {
            api.add_observer(&query, &ObserverEndpoint::new(host, port))?
        }
        ObserverCommand::Delete { query, id } => api.delete_observer(&query, &id)?,
        ObserverCommand::Info {
            query,
            id: Some(id),
        } => api.observer_info(&query, &id)?,
        ObserverCommand::Info { query, id: None } => api.observers_info(&query)?,
    };
    Ok(reply)
}

/// Resolves a payload from inline text, `--file`, or `stdin` when the inline
/// text is `-` or absent.
fn read_payload(args: &PayloadArgs, stdin: &mut dyn Read) -> Result<String> {
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload from {}", path.display()));
    }

    match args.text.as_deref() {
        Some("-") | None => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read payload from stdin")?;
            if text.is_empty() {
                bail!("empty payload: pass it inline, with --file, or on stdin");
            }
            Ok(text)
        }
        Some(text) => Ok(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use csparql_protocol::{ApiRequest, CsparqlError, CsparqlResult, Operation};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<ApiRequest>>,
    }

    impl CsparqlApi for Recorder {
        fn execute(&self, request: ApiRequest) -> CsparqlResult<String> {
            self.sent.lock().unwrap().push(request);
            Ok("done".to_string())
        }
    }

    fn inline(text: &str) -> PayloadArgs {
        PayloadArgs {
            text: Some(text.to_string()),
            file: None,
        }
    }

    #[test]
    fn info_without_name_lists_collection() {
        let api = Recorder::default();
        dispatch(&api, Commands::Stream(StreamCommand::Info { name: None })).unwrap();
        dispatch(&api, Commands::Query(QueryCommand::Info { name: None })).unwrap();
        dispatch(
            &api,
            Commands::Observer(ObserverCommand::Info {
                query: "q1".into(),
                id: None,
            }),
        )
        .unwrap();

        let ops: Vec<_> = api.sent.lock().unwrap().iter().map(|r| r.operation()).collect();
        assert_eq!(
            ops,
            [Operation::StreamsInfo, Operation::QueriesInfo, Operation::ObserversInfo]
        );
    }

    #[test]
    fn feed_modes_select_the_request_shape() {
        let api = Recorder::default();
        let doc =
            r#"{"http://ex.org/s":{"http://ex.org/p":[{"type":"uri","value":"http://ex.org/o"}]}}"#;
        for mode in [FeedMode::Form, FeedMode::Raw, FeedMode::RdfJson] {
            dispatch(
                &api,
                Commands::Stream(StreamCommand::Feed {
                    name: "s1".into(),
                    input: inline(doc),
                    mode,
                }),
            )
            .unwrap();
        }

        let sent = api.sent.lock().unwrap();
        assert_eq!(sent[0].body().form_field("payload"), Some(doc));
        assert_eq!(sent[1].body().encode().unwrap().content_type, "application/json");
        assert!(sent[2].body().form_field("payload").is_some());
    }

    #[test]
    fn invalid_rdf_json_is_rejected_before_sending() {
        let api = Recorder::default();
        let err = dispatch(
            &api,
            Commands::Stream(StreamCommand::Feed {
                name: "s1".into(),
                input: inline("not json"),
                mode: FeedMode::RdfJson,
            }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("RDF/JSON"));
        assert!(api.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn client_errors_propagate_with_their_type() {
        let api = Recorder::default();
        let err = dispatch(
            &api,
            Commands::Query(QueryCommand::Pause {
                name: "a/b".into(),
            }),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CsparqlError>(),
            Some(CsparqlError::MalformedRequest { .. })
        ));
    }

    #[test]
    fn payload_sources() {
        let mut empty: &[u8] = b"";
        assert_eq!(read_payload(&inline("abc"), &mut empty).unwrap(), "abc");

        let mut stdin: &[u8] = b"from stdin";
        assert_eq!(read_payload(&inline("-"), &mut stdin).unwrap(), "from stdin");

        let mut empty: &[u8] = b"";
        let none = PayloadArgs {
            text: None,
            file: None,
        };
        assert!(read_payload(&none, &mut empty).is_err());

        let path = std::env::temp_dir().join(format!("csparql-payload-{}.rq", std::process::id()));
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"SELECT * WHERE { ?s ?p ?o }")
            .unwrap();
        let from_file = PayloadArgs {
            text: None,
            file: Some(path.clone()),
        };
        assert_eq!(
            read_payload(&from_file, &mut empty).unwrap(),
            "SELECT * WHERE { ?s ?p ?o }"
        );
        std::fs::remove_file(path).unwrap();
    }
}
