//! # Multi-Server Resolution
//!
//! Fans a play request out over every requested server index, one task
//! and one page context per server, and folds the outcomes into a
//! [`ResolutionReport`].
//!
//! - Every task is joined; none is cancelled because a sibling failed.
//! - Per-server faults (timeouts, missing iframes, crashed pages, even a
//!   panicking task) become `Failure` entries at that server's position,
//!   and the server's page context is closed either way.
//! - Only failing to obtain a browser at all fails the whole call.
//! - `results` is in request order regardless of completion order.

use super::policy;
use crate::{
    Result,
    browser::{BrowserHandle, BrowserLauncher, BrowserSession, BrowserSessionGeneric, ChromiumLauncher},
    config::{Settings, SourceSettings},
    extract::EmbedExtractor,
    types::{ExtractionResult, PlayTarget, ResolutionReport, Source},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Convenience type alias for the Chromium-backed resolver
pub type MultiServerResolver = MultiServerResolverGeneric<ChromiumLauncher>;

/// Concurrent embed resolution across a site's servers
pub struct MultiServerResolverGeneric<L: BrowserLauncher> {
    session: Arc<BrowserSessionGeneric<L>>,
    extractor: Arc<EmbedExtractor>,
    sources: SourceSettings,
    preferred_hosts: Vec<String>,
}

impl MultiServerResolverGeneric<ChromiumLauncher> {
    /// Creates a resolver with its own Chromium session
    pub fn new(settings: &Settings) -> Self {
        let session = Arc::new(BrowserSession::new(settings.browser.clone()));
        Self::with_session(settings, session)
    }
}

impl<L: BrowserLauncher> MultiServerResolverGeneric<L> {
    /// Creates a resolver over an existing, possibly shared, session
    pub fn with_session(settings: &Settings, session: Arc<BrowserSessionGeneric<L>>) -> Self {
        Self {
            session,
            extractor: Arc::new(EmbedExtractor::new(&settings.browser)),
            sources: settings.sources.clone(),
            preferred_hosts: settings.resolver.preferred_hosts.clone(),
        }
    }

    /// Replace the extractor, e.g. to change timings
    pub fn with_extractor(mut self, extractor: EmbedExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn session(&self) -> &Arc<BrowserSessionGeneric<L>> {
        &self.session
    }

    /// Resolve `slug` (and `episode`, for series) on every server in `servers`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidRequest`] for an unusable slug, episode or server index
    /// - [`crate::Error::SessionLaunch`] when no browser could be started
    ///
    /// Failures of individual servers are reported inside the returned report.
    pub async fn resolve(
        &self,
        source: Source,
        slug: &str,
        episode: Option<u32>,
        servers: &[u32],
    ) -> Result<ResolutionReport> {
        let base_url = self.sources.base_url(source);
        let targets = servers
            .iter()
            .map(|&server| -> Result<(PlayTarget, Url)> {
                let target = PlayTarget::new(slug, episode, server)?;
                let url = target.play_url(base_url)?;
                Ok((target, url))
            })
            .collect::<Result<Vec<_>>>()?;

        let started = Instant::now();
        tracing::info!(
            %source,
            slug,
            ?episode,
            servers = targets.len(),
            "Resolving embed URLs"
        );

        let results = if targets.is_empty() {
            Vec::new()
        } else {
            let handle = self.session.acquire().await?;
            self.fan_out(handle, targets).await
        };

        let default = policy::select_default(&results, &self.preferred_hosts);
        let default_server = default.map(|r| r.server_index);
        let default_url = default.and_then(|r| r.url()).map(str::to_string);

        let report = ResolutionReport {
            source,
            slug: slug.to_string(),
            episode,
            default_server,
            default_url,
            results,
            resolved_at: Utc::now(),
        };

        tracing::info!(
            %source,
            slug,
            succeeded = report.successes().count(),
            failed = report.failure_count(),
            default_server = ?report.default_server,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Resolution complete"
        );
        Ok(report)
    }

    async fn fan_out(
        &self,
        handle: Arc<L::Handle>,
        targets: Vec<(PlayTarget, Url)>,
    ) -> Vec<ExtractionResult> {
        let server_indices: Vec<u32> = targets.iter().map(|(t, _)| t.server_index()).collect();

        let tasks: Vec<_> = targets
            .into_iter()
            .map(|(target, url)| {
                let handle = Arc::clone(&handle);
                let extractor = Arc::clone(&self.extractor);
                tokio::spawn(extract_one(handle, extractor, target.server_index(), url))
            })
            .collect();

        // join_all keeps spawn order, which is request order
        futures::future::join_all(tasks)
            .await
            .into_iter()
            .zip(server_indices)
            .map(|(joined, server)| {
                joined.unwrap_or_else(|e| {
                    tracing::error!(server, "Extraction task aborted: {}", e);
                    ExtractionResult::failure(server, format!("Extraction task aborted: {}", e))
                })
            })
            .collect()
    }
}

async fn extract_one<H: BrowserHandle>(
    handle: Arc<H>,
    extractor: Arc<EmbedExtractor>,
    server: u32,
    url: Url,
) -> ExtractionResult {
    let outcome = match handle.open_context().await {
        Ok(context) => extractor.extract(context, &url).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(embed_url) => ExtractionResult::success(server, embed_url),
        Err(e) => {
            if e.is_per_server() {
                tracing::debug!(server, url = %url, "Server failed: {}", e);
            } else {
                tracing::warn!(server, url = %url, "Server failed outside extraction: {}", e);
            }
            ExtractionResult::failure(server, e.to_string())
        }
    }
}
