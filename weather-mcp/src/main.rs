//! Binary crate for the `weather-mcp` tool server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The newline-delimited JSON-RPC loop on stdin/stdout
//! - Logging setup (stderr only; stdout carries protocol messages)

use clap::Parser;

mod cli;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
