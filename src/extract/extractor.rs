//! Embed extraction from a rendered play page

use super::{heuristics, normalize};
use crate::{Error, Result, browser::PageContext, config::BrowserSettings};
use futures::FutureExt;
use scraper::Html;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Renders one play page in a page context and pulls out its embed URL
#[derive(Debug, Clone)]
pub struct EmbedExtractor {
    user_agent: String,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl EmbedExtractor {
    pub fn new(settings: &BrowserSettings) -> Self {
        Self {
            user_agent: settings.user_agent.clone(),
            navigation_timeout: settings.navigation_timeout(),
            settle_delay: settings.settle_delay(),
        }
    }

    /// Override the navigation bound and the post-load quiescence wait
    pub fn with_timings(mut self, navigation_timeout: Duration, settle_delay: Duration) -> Self {
        self.navigation_timeout = navigation_timeout;
        self.settle_delay = settle_delay;
        self
    }

    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Extract the normalized embed URL from `page_url`.
    ///
    /// Takes ownership of `context` and always closes it before returning,
    /// whether extraction succeeded, failed or panicked. A panic is reported
    /// as an extraction error.
    pub async fn extract<C: PageContext>(&self, context: C, page_url: &Url) -> Result<String> {
        let started = Instant::now();
        let result = AssertUnwindSafe(self.render_and_extract(&context, page_url))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(Error::extraction(format!(
                    "Page crashed during extraction: {}",
                    panic_message(panic.as_ref())
                )))
            });

        if let Err(e) = context.close().await {
            warn!(url = %page_url, "Failed to close page context: {}", e);
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(embed_url) => info!(url = %page_url, elapsed_ms, "Found embed URL: {}", embed_url),
            Err(e) => warn!(url = %page_url, elapsed_ms, "Extraction failed: {}", e),
        }
        result
    }

    async fn render_and_extract<C: PageContext>(&self, context: &C, page_url: &Url) -> Result<String> {
        context.set_user_agent(&self.user_agent).await?;

        debug!(url = %page_url, "Navigating to play page");
        tokio::time::timeout(self.navigation_timeout, context.navigate(page_url.as_str()))
            .await
            .map_err(|_| {
                Error::navigation_timeout(page_url.as_str(), self.navigation_timeout.as_secs())
            })??;

        // Players are injected by script after the load event
        debug!(
            url = %page_url,
            "Waiting {}ms for the player iframe", self.settle_delay.as_millis()
        );
        tokio::time::sleep(self.settle_delay).await;

        let markup = context.content().await?;

        // Relative iframe sources resolve against where the page ended up
        let document_url = match context.current_url().await {
            Ok(Some(current)) => Url::parse(&current)
                .ok()
                .filter(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or_else(|| page_url.clone()),
            Ok(None) => page_url.clone(),
            Err(e) => {
                debug!(url = %page_url, "Could not read final page URL: {}", e);
                page_url.clone()
            }
        };
        if document_url != *page_url {
            debug!(url = %page_url, final_url = %document_url, "Play page redirected");
        }

        extract_from_document(&markup, &document_url)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Apply the heuristics to rendered markup and normalize the hit.
///
/// Relative sources are resolved against `page_url`, matching what the
/// browser reports for an iframe's `src` property.
pub fn extract_from_document(markup: &str, page_url: &Url) -> Result<String> {
    let document = Html::parse_document(markup);
    let (strategy, raw_src) =
        heuristics::find_embed(&document).ok_or_else(|| Error::no_embed_found(page_url.as_str()))?;
    debug!(url = %page_url, strategy, "Matched embed candidate: {}", raw_src);

    let absolute = resolve_against(page_url, &raw_src);
    let embed_url = normalize::normalize(&absolute);

    if !normalize::is_absolute_http(&embed_url) {
        return Err(Error::extraction(format!(
            "Embed candidate is not an HTTP(S) URL: {}",
            embed_url
        )));
    }
    Ok(embed_url)
}

fn resolve_against(page_url: &Url, src: &str) -> String {
    if src.starts_with("//") {
        return src.to_string();
    }
    match Url::parse(src) {
        Ok(_) => src.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => page_url
            .join(src)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| src.to_string()),
        Err(_) => src.to_string(),
    }
}
