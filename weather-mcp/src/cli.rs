use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;
use weather_core::{Config, ToolRegistry};

use crate::server::McpServer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-mcp",
    version,
    about = "Weather locations tool server (JSON-RPC over stdio)"
)]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Location document to use instead of the configured one.
    #[arg(long, global = true)]
    pub locations_file: Option<PathBuf>,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve tools on stdin/stdout until stdin closes.
    Serve,

    /// Update and save the configuration file.
    Configure {
        /// Geocoding search endpoint.
        #[arg(long)]
        geocoding_url: Option<String>,

        /// Daily forecast endpoint.
        #[arg(long)]
        forecast_url: Option<String>,
    },

    /// Print the config and location document paths.
    Paths,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let mut config = Config::load_from(&config_path)?;
        if let Some(path) = self.locations_file {
            config.locations_file = Some(path);
        }

        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => {
                let registry = ToolRegistry::from_config(&config)
                    .context("Failed to set up tool registry")?;
                info!(version = env!("CARGO_PKG_VERSION"), "weather-mcp server starting");

                let stdin = BufReader::new(tokio::io::stdin());
                McpServer::new(registry)
                    .run(stdin, tokio::io::stdout())
                    .await?;

                info!("stdin closed, shutting down");
            }
            Command::Configure {
                geocoding_url,
                forecast_url,
            } => {
                if let Some(url) = geocoding_url {
                    config.geocoding_url = url;
                }
                if let Some(url) = forecast_url {
                    config.forecast_url = url;
                }
                config.save_to(&config_path)?;
                println!("Saved configuration to {}", config_path.display());
            }
            Command::Paths => {
                println!("config:    {}", config_path.display());
                println!("locations: {}", config.locations_path()?.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["weather-mcp"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_overrides_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "weather-mcp",
            "serve",
            "--locations-file",
            "/tmp/locations.json",
        ])
        .expect("parse");

        assert!(matches!(cli.command, Some(Command::Serve)));
        assert_eq!(cli.locations_file, Some(PathBuf::from("/tmp/locations.json")));
    }

    #[tokio::test]
    async fn configure_writes_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let cli = Cli::try_parse_from([
            "weather-mcp",
            "--config",
            path.to_str().expect("utf-8 path"),
            "configure",
            "--forecast-url",
            "http://localhost:8080/v1/forecast",
        ])
        .expect("parse");
        cli.run().await.expect("configure");

        let saved = Config::load_from(&path).expect("load");
        assert_eq!(saved.forecast_url, "http://localhost:8080/v1/forecast");
        assert_eq!(saved.geocoding_url, Config::default().geocoding_url);
    }
}
