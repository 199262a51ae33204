//! Command-line and environment configuration for the `arcane-mcp` binary.

use arcane_core::ClientConfig;
use clap::Parser;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Parser)]
#[command(name = "arcane-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Expose an Arcane server's Docker management API as tools over stdio")]
pub struct Args {
    /// Base URL of the Arcane server, e.g. https://arcane.example.com
    #[arg(long = "api-url", env = "ARCANE_API_URL")]
    pub api_url: Option<String>,

    /// API key; takes precedence over username and password
    #[arg(long = "api-key", env = "ARCANE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "ARCANE_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "ARCANE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Log filter directive (overrides RUST_LOG), e.g. `debug` or `arcane_core=trace`
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

impl Args {
    /// Client configuration. Not validated here.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone().unwrap_or_default(),
            api_key: self.api_key.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    /// Filter directive: `--log-level`, else `RUST_LOG`, else `info`.
    pub fn log_filter(&self) -> String {
        self.log_level
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }
}
