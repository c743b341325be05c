//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the embed resolver.

use crate::types::Source;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Identity string presented to target sites while rendering play pages
pub const DEFAULT_BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration settings for the embed resolver
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server configuration
    pub server: ServerSettings,
    /// Target site configuration
    pub sources: SourceSettings,
    /// Headless browser configuration
    pub browser: BrowserSettings,
    /// Multi-server resolution configuration
    pub resolver: ResolverSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Base URLs of the supported streaming sites
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub rebahin_base_url: String,
    pub kitanonton_base_url: String,
}

/// Headless browser and extraction timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// User agent set on every page context before navigation
    pub user_agent: String,
    /// Explicit Chromium executable, auto-detected when absent
    pub chrome_path: Option<PathBuf>,
    /// Run without a visible window
    pub headless: bool,
    /// Upper bound on a single play-page navigation
    pub navigation_timeout_secs: u64,
    /// Quiescence wait after navigation before the DOM is inspected
    pub settle_delay_ms: u64,
    /// Additional command-line switches passed to Chromium
    pub extra_args: Vec<String>,
}

/// Server fan-out and default selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Server indices probed for every play request, in report order
    pub servers: Vec<u32>,
    /// Host signatures favoured when choosing the default server
    pub preferred_hosts: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "::".to_string(),
            port: 3000,
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            rebahin_base_url: "https://rebahinxxi3.fit".to_string(),
            kitanonton_base_url: "https://kitanonton2.live".to_string(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_BROWSER_USER_AGENT.to_string(),
            chrome_path: None,
            headless: true,
            navigation_timeout_secs: 30,
            settle_delay_ms: 8000,
            extra_args: Vec::new(),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            servers: vec![1, 2, 3, 4, 5],
            preferred_hosts: vec!["short.icu".to_string()],
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl SourceSettings {
    /// Base URL configured for a source
    pub fn base_url(&self, source: Source) -> &str {
        match source {
            Source::Rebahin => &self.rebahin_base_url,
            Source::Kitanonton => &self.kitanonton_base_url,
        }
    }
}

impl BrowserSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Apply environment variable overrides on top of these settings
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid port: {}", e)))?;
        }

        if let Ok(url) = std::env::var("REBAHIN_BASE_URL") {
            self.sources.rebahin_base_url = url;
        }

        if let Ok(url) = std::env::var("KITANONTON_BASE_URL") {
            self.sources.kitanonton_base_url = url;
        }

        if let Ok(user_agent) = std::env::var("BROWSER_USER_AGENT") {
            self.browser.user_agent = user_agent;
        }

        if let Ok(path) = std::env::var("CHROME_PATH") {
            self.browser.chrome_path = Some(PathBuf::from(path));
        }

        if let Ok(timeout) = std::env::var("NAVIGATION_TIMEOUT_SECS") {
            self.browser.navigation_timeout_secs = timeout.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid navigation timeout: {}", e))
            })?;
        }

        if let Ok(delay) = std::env::var("SETTLE_DELAY_MS") {
            self.browser.settle_delay_ms = delay
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid settle delay: {}", e)))?;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Reject settings the resolver cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        for source in Source::ALL {
            let base = self.sources.base_url(source);
            let url = url::Url::parse(base).map_err(|e| {
                crate::Error::config(format!("Invalid base URL for {}: {} ({})", source, base, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(crate::Error::config(format!(
                    "Base URL for {} must be http(s): {}",
                    source, base
                )));
            }
        }

        if self.browser.user_agent.trim().is_empty() {
            return Err(crate::Error::config("Browser user agent must not be empty"));
        }

        if self.browser.navigation_timeout_secs == 0 {
            return Err(crate::Error::config(
                "Navigation timeout must be at least one second",
            ));
        }

        if self.resolver.servers.is_empty() {
            return Err(crate::Error::config("Server list must not be empty"));
        }

        if self.resolver.servers.contains(&0) {
            return Err(crate::Error::config("Server indices start at 1"));
        }

        Ok(())
    }
}
