//! `csparql` command-line entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration** — server URL and timeout from flags or the
//!    `CSPARQL_SERVER_URL` / `CSPARQL_TIMEOUT_SECS` environment variables.
//! 2. **Wire observability** — install a `tracing-subscriber` (text or JSON)
//!    writing to stderr, and open a root span carrying a fresh [`RunId`].
//! 3. **Construct infrastructure** — build one `HttpCsparqlClient`, hand it to
//!    the command dispatcher as a `dyn CsparqlApi`, and close it afterwards.
//! 4. **Report** — print the decoded server reply on stdout, or the error
//!    chain on stderr with exit status 1.

mod cli;
mod commands;
mod observability;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use csparql_client::{ClientConfig, HttpCsparqlClient};
use tracing::{debug, info_span};

use cli::Cli;
use observability::RunId;

fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::init(&cli.log);

    let run_id = RunId::new_random();
    let span = info_span!("csparql", run_id = %run_id);
    let _enter = span.enter();

    match run(cli) {
        Ok(reply) => {
            println!("{reply}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = %e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let config = ClientConfig::new(&cli.server_url)
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let client = HttpCsparqlClient::with_config(&config)
        .with_context(|| format!("cannot set up client for {}", cli.server_url))?;

    let result = commands::dispatch(&client, cli.command);
    client.close();
    result
}
