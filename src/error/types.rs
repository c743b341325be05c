//! Error type definitions
//!
//! Defines the main error types used throughout the embed resolver.

use thiserror::Error;

/// Main error type for the embed resolver
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// The shared headless browser could not be started
    #[error("Browser launch failed: {0}")]
    SessionLaunch(String),

    /// A play page did not settle within the navigation bound
    #[error("Navigation timed out after {timeout_secs}s: {url}")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    /// Rendering finished but no heuristic produced a candidate
    #[error("No embed URL found after rendering {url}")]
    NoEmbedFound { url: String },

    /// Any other fault while driving a page context
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Caller supplied an unusable source, slug, episode or server index
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file parsing errors
    #[error("TOML error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new server error
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Create a browser launch error
    pub fn session_launch(msg: impl Into<String>) -> Self {
        Self::SessionLaunch(msg.into())
    }

    /// Create a navigation timeout error
    pub fn navigation_timeout(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self::NavigationTimeout {
            url: url.into(),
            timeout_secs,
        }
    }

    /// Create a no-embed-found error
    pub fn no_embed_found(url: impl Into<String>) -> Self {
        Self::NoEmbedFound { url: url.into() }
    }

    /// Create a new extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a new invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is contained to a single server attempt.
    ///
    /// Launch and request-validation failures abort a whole resolution;
    /// everything else is reported as a per-server failure.
    pub fn is_per_server(&self) -> bool {
        !matches!(
            self,
            Self::SessionLaunch(_) | Self::InvalidRequest(_) | Self::Config(_)
        )
    }
}
