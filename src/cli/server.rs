//! Server mode CLI logic
//!
//! Contains the core logic for running the HTTP server mode.

use crate::{
    browser::BrowserSession, config::ConfigLoader, resolver::MultiServerResolver, server::app,
    utils::version,
};
use anyhow::Result;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

/// Lets the log filter be retuned once configuration is loaded
type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Arguments for server mode
#[derive(Debug, Default)]
pub struct ServerArgs {
    /// Overrides `server.port`
    pub port: Option<u16>,
    /// Overrides `server.host`
    pub host: Option<String>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Run server mode with the given arguments
pub async fn run_server_mode(args: ServerArgs) -> Result<()> {
    // Installed before loading so the loader's own messages are printed
    let filter_handle = init_tracing(args.verbose);

    let mut settings = ConfigLoader::new().load(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.logging.verbose |= args.verbose;

    if let Some(handle) = &filter_handle {
        let filter = log_filter(&settings.logging.level, settings.logging.verbose);
        if let Err(e) = handle.reload(filter) {
            tracing::warn!("Failed to apply configured log level: {}", e);
        }
    }

    tracing::info!("Starting embed resolver v{}", version::get_version());
    tracing::debug!(
        servers = ?settings.resolver.servers,
        preferred_hosts = ?settings.resolver.preferred_hosts,
        "Resolver configuration"
    );

    let session = Arc::new(BrowserSession::new(settings.browser.clone()));
    let resolver = Arc::new(MultiServerResolver::with_session(
        &settings,
        Arc::clone(&session),
    ));
    let app = app::create_app_with_resolver(settings.clone(), resolver);

    // Parse address and attempt IPv6/IPv4 fallback
    let addr = parse_and_bind_address(&settings.server.host, settings.server.port).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Embed resolver v{} listening on {}",
        version::get_version(),
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    if let Err(e) = session.shutdown().await {
        tracing::warn!("Browser did not shut down cleanly: {}", e);
    }

    Ok(())
}

/// Directive used when RUST_LOG is unset
fn log_directive(level: &str, verbose: bool) -> &str {
    if verbose { "debug" } else { level }
}

/// RUST_LOG wins; otherwise the configured level, or debug when verbose
fn log_filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_directive(level, verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber at the default level.
///
/// Returns `None` when a subscriber is already installed, e.g. when
/// embedded in another binary.
fn init_tracing(verbose: bool) -> Option<FilterHandle> {
    let (filter, handle) = reload::Layer::new(log_filter("info", verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .ok()
        .map(|_| handle)
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

/// Parse host string and attempt to bind to the address
///
/// - First try to bind to IPv6 (::)
/// - If that fails, fall back to IPv4 (0.0.0.0)
pub async fn parse_and_bind_address(host: &str, port: u16) -> Result<std::net::SocketAddr> {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

    // Try to parse as IP address first
    if let Ok(ip) = host.parse::<IpAddr>() {
        let addr = SocketAddr::new(ip, port);
        tracing::debug!("Parsed address: {}", addr);
        return Ok(addr);
    }

    match host {
        "::" => {
            let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port);
            tracing::debug!("Using IPv6 any address: {}", addr);

            match tokio::net::TcpListener::bind(addr).await {
                Ok(_) => {
                    tracing::info!("Successfully bound to IPv6 address {}", addr);
                    Ok(addr)
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not listen on [::]:{} (Caused by {}), falling back to 0.0.0.0",
                        port,
                        e
                    );
                    let fallback_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
                    tracing::info!("Using IPv4 fallback address: {}", fallback_addr);
                    Ok(fallback_addr)
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid host address: {}. Use '::' for IPv6 or '0.0.0.0' for IPv4",
                host
            );
        }
    }
}
