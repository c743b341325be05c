//! Resolution report definitions
//!
//! The internal record of one multi-server resolution, including the
//! per-server failures that the public response filters out.

use super::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of rendering a single play page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// An absolute HTTP(S) embed URL
    Success { url: String },
    /// Why this server produced nothing
    Failure { reason: String },
}

/// One server's extraction result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub server_index: u32,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ExtractionResult {
    pub fn success(server_index: u32, url: impl Into<String>) -> Self {
        Self {
            server_index,
            outcome: Outcome::Success { url: url.into() },
        }
    }

    pub fn failure(server_index: u32, reason: impl Into<String>) -> Self {
        Self {
            server_index,
            outcome: Outcome::Failure {
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// The embed URL, if this server succeeded
    pub fn url(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success { url } => Some(url),
            Outcome::Failure { .. } => None,
        }
    }
}

/// Aggregated result of resolving every requested server.
///
/// `results` holds one entry per requested server in request order, and the
/// default is present exactly when at least one entry succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub source: Source,
    pub slug: String,
    pub episode: Option<u32>,
    pub default_server: Option<u32>,
    pub default_url: Option<String>,
    pub results: Vec<ExtractionResult>,
    pub resolved_at: DateTime<Utc>,
}

impl ResolutionReport {
    /// Successful results in request order
    pub fn successes(&self) -> impl Iterator<Item = &ExtractionResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.successes().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_accessors() {
        let ok = ExtractionResult::success(3, "https://short.icu/abc");
        let failed = ExtractionResult::failure(2, "Navigation timed out");

        assert!(ok.is_success());
        assert_eq!(ok.url(), Some("https://short.icu/abc"));
        assert!(!failed.is_success());
        assert_eq!(failed.url(), None);
    }

    #[test]
    fn test_result_serialization_is_tagged() {
        let json = serde_json::to_value(ExtractionResult::failure(4, "No embed URL found")).unwrap();
        assert_eq!(json["server_index"], 4);
        assert_eq!(json["status"], "failure");
        assert_eq!(json["reason"], "No embed URL found");
    }

    #[test]
    fn test_report_counts() {
        let report = ResolutionReport {
            source: Source::Rebahin,
            slug: "movie-x".to_string(),
            episode: None,
            default_server: Some(1),
            default_url: Some("https://a.test/e".to_string()),
            results: vec![
                ExtractionResult::success(1, "https://a.test/e"),
                ExtractionResult::failure(2, "timeout"),
            ],
            resolved_at: Utc::now(),
        };

        assert_eq!(report.successes().count(), 1);
        assert_eq!(report.failure_count(), 1);
    }
}
