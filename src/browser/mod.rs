//! Headless browser management
//!
//! One long-lived browser process is shared by every extraction; each
//! extraction renders in its own page context. The traits here are the seam
//! between the resolver and the concrete browser binding, so the resolver can
//! be driven by a scripted fake in tests.

pub mod chromium;
pub mod session;

#[cfg(test)]
pub(crate) mod fake;

use crate::Result;
use async_trait::async_trait;

pub use chromium::{ChromiumBrowser, ChromiumLauncher, ChromiumPage};
pub use session::{BrowserSession, BrowserSessionGeneric};

/// Starts a browser process
#[async_trait]
pub trait BrowserLauncher: Send + Sync + 'static {
    type Handle: BrowserHandle;

    /// Spawn a new browser instance
    async fn launch(&self) -> Result<Self::Handle>;
}

/// A running browser shared by concurrent extractions
#[async_trait]
pub trait BrowserHandle: Send + Sync + 'static {
    type Context: PageContext;

    /// Open a fresh, isolated page context.
    ///
    /// Must be callable concurrently; a context is never handed out twice.
    async fn open_context(&self) -> Result<Self::Context>;

    /// Terminate the browser process
    async fn close(&self) -> Result<()>;

    /// Whether the connection to the browser is still usable
    fn is_alive(&self) -> bool {
        true
    }
}

/// A single page owned by one extraction
#[async_trait]
pub trait PageContext: Send + Sync + 'static {
    async fn set_user_agent(&self, user_agent: &str) -> Result<()>;

    /// Navigate and wait for the page load to finish
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Serialized DOM of the current document
    async fn content(&self) -> Result<String>;

    /// URL of the current document after redirects, when known
    async fn current_url(&self) -> Result<Option<String>> {
        Ok(None)
    }

    async fn close(self) -> Result<()>;
}
