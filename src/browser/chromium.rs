//! Chromium binding over the DevTools protocol

use super::{BrowserHandle, BrowserLauncher, PageContext};
use crate::{Error, Result, config::BrowserSettings};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Switches applied to every launch on top of `BrowserSettings::extra_args`
const DEFAULT_ARGS: &[&str] = &[
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-first-run",
    "--no-default-browser-check",
    "--mute-audio",
];

fn cdp_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::extraction(format!("{}: {}", context, e))
}

/// Launches a local Chromium
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.settings.navigation_timeout());

        if !self.settings.headless {
            builder = builder.with_head();
        }

        if let Some(path) = &self.settings.chrome_path {
            builder = builder.chrome_executable(path);
        }

        for arg in DEFAULT_ARGS {
            builder = builder.arg(*arg);
        }
        for arg in &self.settings.extra_args {
            builder = builder.arg(arg.as_str());
        }

        builder
            .build()
            .map_err(|e| Error::session_launch(format!("Failed to build browser config: {e}")))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    type Handle = ChromiumBrowser;

    async fn launch(&self) -> Result<ChromiumBrowser> {
        let config = self.config()?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::session_launch(format!("Failed to launch browser: {e}")))?;

        // The DevTools connection only makes progress while the handler is polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e}");
                }
            }
            debug!("Browser handler stream ended");
        });

        Ok(ChromiumBrowser {
            browser: RwLock::new(browser),
            handler_task,
        })
    }
}

/// A running Chromium process
pub struct ChromiumBrowser {
    /// Read-locked to open pages, write-locked to close the process
    browser: RwLock<Browser>,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserHandle for ChromiumBrowser {
    type Context = ChromiumPage;

    async fn open_context(&self) -> Result<ChromiumPage> {
        let page = self
            .browser
            .read()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| cdp_error("Failed to open page", e))?;
        Ok(ChromiumPage { page })
    }

    async fn close(&self) -> Result<()> {
        let mut browser = self.browser.write().await;
        browser
            .close()
            .await
            .map_err(|e| Error::internal(format!("Failed to close browser: {e}")))?;
        if let Err(e) = browser.wait().await {
            warn!("Failed waiting for browser process to exit: {e}");
        }
        self.handler_task.abort();
        Ok(())
    }

    fn is_alive(&self) -> bool {
        // The handler stream ends when the DevTools connection drops
        !self.handler_task.is_finished()
    }
}

impl Drop for ChromiumBrowser {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

/// One Chromium tab
pub struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl PageContext for ChromiumPage {
    async fn set_user_agent(&self, user_agent: &str) -> Result<()> {
        self.page
            .set_user_agent(SetUserAgentOverrideParams::new(user_agent))
            .await
            .map_err(|e| cdp_error("Failed to set user agent", e))?;
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| cdp_error("Navigation failed", e))?;
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| cdp_error("Failed to read document", e))
    }

    async fn current_url(&self) -> Result<Option<String>> {
        self.page
            .url()
            .await
            .map_err(|e| cdp_error("Failed to read page URL", e))
    }

    async fn close(self) -> Result<()> {
        self.page
            .close()
            .await
            .map_err(|e| cdp_error("Failed to close page", e))
    }
}
