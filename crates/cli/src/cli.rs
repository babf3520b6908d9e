use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// API root of a default local C-SPARQL server deployment.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8175/csparql-server/api/1";

#[derive(Parser, Debug)]
#[command(name = "csparql", about = "Client for the C-SPARQL engine REST API", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root URL of the engine's REST API
    #[arg(long, global = true, env = "CSPARQL_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Connect and request timeout in seconds
    #[arg(long, global = true, env = "CSPARQL_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log debug output (request spans and response statuses) to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage RDF streams
    #[command(subcommand)]
    Stream(StreamCommand),

    /// Manage continuous queries
    #[command(subcommand)]
    Query(QueryCommand),

    /// Manage result observers of a query
    #[command(subcommand)]
    Observer(ObserverCommand),
}

#[derive(Subcommand, Debug)]
pub enum StreamCommand {
    /// Register a new RDF stream
    Register {
        /// Stream name (a single URL path segment)
        name: String,
        /// IRI identifying the stream
        iri: String,
    },

    /// Unregister a stream
    Unregister { name: String },

    /// Put serialised RDF into a stream
    Feed {
        name: String,

        #[command(flatten)]
        input: PayloadArgs,

        /// How the payload is sent
        #[arg(long, value_enum, default_value_t = FeedMode::Form)]
        mode: FeedMode,
    },

    /// Show one stream, or all streams when NAME is omitted
    Info { name: Option<String> },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// `payload` form field, sent as-is
    Form,
    /// Parsed as RDF/JSON first, then sent as the `payload` form field
    RdfJson,
    /// Raw `application/json` request body
    Raw,
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Register a continuous query
    Register {
        name: String,

        #[command(flatten)]
        input: PayloadArgs,
    },

    /// Unregister a query
    Unregister { name: String },

    /// Show one query, or all queries when NAME is omitted
    Info { name: Option<String> },

    /// Pause a running query
    Pause { name: String },

    /// Restart a paused query
    Restart { name: String },
}

#[derive(Subcommand, Debug)]
pub enum ObserverCommand {
    /// Attach a result observer to a query
    Add {
        query: String,
        /// Host the engine pushes results to
        host: String,
        /// Port the engine pushes results to
        port: u16,
    },

    /// Detach an observer
    Delete { query: String, id: String },

    /// Show one observer, or all observers of QUERY when ID is omitted
    Info { query: String, id: Option<String> },
}

/// Inline text, a file, or stdin (`-`).
#[derive(Args, Debug, Clone)]
pub struct PayloadArgs {
    /// Inline payload; `-` reads stdin
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the payload from a file
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}
