use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Context;
use arcane_core::ArcaneClient;
use arcane_mcp::cli::Args;
use arcane_mcp::{tools, Server};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("invalid log filter: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to start Arcane MCP server: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries protocol messages only.
fn init_logging(args: &Args) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(args.log_filter()).context("parsing log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = args.client_config();
    config.validate()?;

    let client = ArcaneClient::new(config);
    if client.config().api_key().is_none() && client.config().credentials().is_some() {
        client.authenticate().context("initial login")?;
    }

    let server = Server::new(client, tools::registry());
    info!(url = %server.client().config().base_url, "Arcane MCP server started");
    server
        .serve(std::io::stdin().lock(), std::io::stdout().lock())
        .context("stdio")
}
