//! HTTP server binary for embed resolution
//!
//! # Usage
//!
//! ```bash
//! embed-resolver --port 3000 --host 0.0.0.0 --config ./config.toml
//! ```
//!
//! # API Endpoints
//!
//! - `GET /api/{source}/play/{slug}?ep=N`: Resolve every server of a play page
//! - `GET /ping`: Health check endpoint
//! - `GET /`: API index

use clap::Parser;
use embed_resolver::cli::{ServerArgs, run_server_mode};
use std::path::PathBuf;

/// Resolve streaming-server embed URLs from client-rendered play pages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on [default: 3000]
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to [default: ::]
    #[arg(long)]
    host: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for ServerArgs {
    fn from(cli: Cli) -> Self {
        Self {
            port: cli.port,
            host: cli.host,
            config: cli.config,
            verbose: cli.verbose,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_server_mode(cli.into()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults_leave_settings_untouched() {
        let args: ServerArgs = Cli::try_parse_from(["embed-resolver"]).unwrap().into();
        assert_eq!(args.port, None);
        assert_eq!(args.host, None);
        assert_eq!(args.config, None);
        assert!(!args.verbose);
    }

    #[test]
    fn test_cli_overrides() {
        let args: ServerArgs = Cli::try_parse_from([
            "embed-resolver",
            "-p",
            "8080",
            "--host",
            "0.0.0.0",
            "-c",
            "/etc/embed-resolver.toml",
            "-v",
        ])
        .unwrap()
        .into();
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.config, Some(PathBuf::from("/etc/embed-resolver.toml")));
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_rejects_bad_port() {
        assert!(Cli::try_parse_from(["embed-resolver", "--port", "99999"]).is_err());
    }
}
