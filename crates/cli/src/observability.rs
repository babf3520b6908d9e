//! Tracing subscriber wiring and per-invocation run identifiers.

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::cli::{LogArgs, LogFormat};

/// Identifies a single CLI invocation.
///
/// Generated fresh on every run and recorded on the root span so all events
/// from one invocation can be correlated in aggregated logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Filter directives when `RUST_LOG` is unset.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,csparql_client=debug,csparql_cli=debug"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. Logs go to stderr; stdout carries only
/// command output.
///
/// `RUST_LOG` takes precedence over `--verbose` when set.
pub fn init(args: &LogArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(args.verbose)));

    match args.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init(),
    }
}
