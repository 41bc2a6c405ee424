//! Command-line entry point for the static file server.
//!
//! ```bash
//! statichttp ./public --port 8080
//! STATICHTTP_PORT=8080 statichttp --config server.json
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use statichttp_rs::{HttpServer, ServerConfig, ServerError};

/// Serve static files and directory listings over HTTP.
#[derive(Debug, Parser)]
#[command(name = "statichttp", version, about)]
struct Cli {
    /// Document root to serve
    #[arg(env = "STATICHTTP_ROOT")]
    root: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "STATICHTTP_HOST")]
    host: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long, env = "STATICHTTP_PORT")]
    port: Option<u16>,

    /// Maximum number of concurrent connections
    #[arg(long)]
    max_connections: Option<usize>,

    /// Read buffer size per connection, in bytes
    #[arg(long)]
    buffer_size: Option<usize>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig, ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(root) = self.root {
            config.root = root;
        }
        let host = self.host.unwrap_or(config.addr.ip());
        let port = self.port.unwrap_or(config.addr.port());
        config.addr = SocketAddr::new(host, port);
        if let Some(max_connections) = self.max_connections {
            config.max_connections = max_connections;
        }
        if let Some(buffer_size) = self.buffer_size {
            config.read_buffer_size = buffer_size;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match HttpServer::new(config).start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {e}");
            ExitCode::FAILURE
        }
    }
}
