//! Response type definitions
//!
//! Defines the JSON bodies returned by the HTTP endpoints.

use super::{ResolutionReport, Source};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public shape of a play resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayResponse {
    pub success: bool,
    pub source: Source,
    pub slug: String,
    /// Requested episode, 1 when none was given
    pub episode: u32,
    pub default_server: Option<u32>,
    pub default_url: Option<String>,
    /// Servers that produced an embed URL, in request order
    pub servers: Vec<ServerEntry>,
}

/// One playable server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub server: u32,
    pub url: String,
}

impl From<&ResolutionReport> for PlayResponse {
    fn from(report: &ResolutionReport) -> Self {
        let servers = report
            .results
            .iter()
            .filter_map(|result| {
                result.url().map(|url| ServerEntry {
                    server: result.server_index,
                    url: url.to_string(),
                })
            })
            .collect();

        Self {
            success: true,
            source: report.source,
            slug: report.slug.clone(),
            episode: report.episode.unwrap_or(1),
            default_server: report.default_server,
            default_url: report.default_url.clone(),
            servers,
        }
    }
}

/// Ping response for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// Server uptime in seconds
    pub server_uptime: u64,

    /// Server version
    pub version: String,

    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl PingResponse {
    /// Create a new ping response
    pub fn new(server_uptime: u64, version: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            server_uptime,
            version: version.into(),
            started_at,
        }
    }
}

/// Error response for API errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Short error category
    pub error: String,
    /// Human readable detail
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}
