//! Tally CLI application
//!
//! Drives the Tally LLM gateway from the shell.
//!
//! ```bash
//! tally chat "Which category fits: STARBUCKS #1234?"
//! tally batch transactions.txt
//! tally config show
//! ```
//!
//! Set `RUST_LOG=debug` for verbose logging, `--json-logs` for JSON lines.

mod args;
mod commands;
mod console;
mod router;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);
    router::route(cli).await
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
