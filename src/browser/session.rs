//! # Browser Session Management
//!
//! [`BrowserSessionGeneric`] owns the process-wide browser handle.
//!
//! - The browser is launched lazily by the first [`acquire`] call.
//! - Launch is single-flight: concurrent first callers wait on the same
//!   launch instead of racing to start a second process.
//! - A failed launch caches nothing, so the next call retries.
//! - [`shutdown`] closes the browser; a later [`acquire`] launches a new one.
//! - A browser whose connection has died is dropped and relaunched.
//!
//! [`acquire`]: BrowserSessionGeneric::acquire
//! [`shutdown`]: BrowserSessionGeneric::shutdown

use super::{BrowserHandle, BrowserLauncher, ChromiumLauncher};
use crate::{Result, config::BrowserSettings};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::Mutex;

/// Convenience type alias for the Chromium-backed session
pub type BrowserSession = BrowserSessionGeneric<ChromiumLauncher>;

/// Lazily started, shared browser handle
pub struct BrowserSessionGeneric<L: BrowserLauncher> {
    launcher: L,
    /// Held across launch so that concurrent first callers serialize on it
    handle: Mutex<Option<Arc<L::Handle>>>,
    launches: AtomicUsize,
}

impl BrowserSessionGeneric<ChromiumLauncher> {
    /// Creates a Chromium session; nothing is spawned until first use.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use embed_resolver::browser::BrowserSession;
    /// use embed_resolver::config::BrowserSettings;
    ///
    /// let session = BrowserSession::new(BrowserSettings::default());
    /// assert_eq!(session.launch_count(), 0);
    /// ```
    pub fn new(settings: BrowserSettings) -> Self {
        Self::with_launcher(ChromiumLauncher::new(settings))
    }
}

impl<L: BrowserLauncher> BrowserSessionGeneric<L> {
    /// Creates a session around a custom launcher
    pub fn with_launcher(launcher: L) -> Self {
        Self {
            launcher,
            handle: Mutex::new(None),
            launches: AtomicUsize::new(0),
        }
    }

    /// Returns the shared browser, launching it if none is running
    pub async fn acquire(&self) -> Result<Arc<L::Handle>> {
        let mut guard = self.handle.lock().await;
        if let Some(handle) = guard.as_ref() {
            if handle.is_alive() {
                return Ok(Arc::clone(handle));
            }
            tracing::warn!("Lost connection to headless browser, relaunching");
            guard.take();
        }

        tracing::info!("Launching headless browser");
        let started = Instant::now();
        let handle = match self.launcher.launch().await {
            Ok(handle) => Arc::new(handle),
            Err(e) => {
                tracing::error!("Failed to launch headless browser: {}", e);
                return Err(e);
            }
        };
        self.launches.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Headless browser ready"
        );

        *guard = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Opens an isolated page context on the shared browser
    pub async fn open_context(&self) -> Result<<L::Handle as BrowserHandle>::Context> {
        let handle = self.acquire().await?;
        handle.open_context().await
    }

    /// Closes the browser if one is running.
    ///
    /// Extractions still holding the old handle finish against it; new
    /// callers get a freshly launched browser.
    ///
    /// ```rust
    /// use embed_resolver::browser::BrowserSession;
    /// use embed_resolver::config::BrowserSettings;
    ///
    /// # tokio_test::block_on(async {
    /// let session = BrowserSession::new(BrowserSettings::default());
    /// // Nothing was launched, so this is a no-op
    /// session.shutdown().await.unwrap();
    /// assert!(!session.is_running().await);
    /// # });
    /// ```
    pub async fn shutdown(&self) -> Result<()> {
        let handle = self.handle.lock().await.take();
        match handle {
            Some(handle) => {
                tracing::info!("Shutting down headless browser");
                handle.close().await?;
                tracing::info!("Browser shutdown complete");
            }
            None => tracing::debug!("No browser running, nothing to shut down"),
        }
        Ok(())
    }

    /// Whether a browser is currently running
    pub async fn is_running(&self) -> bool {
        self.handle.lock().await.is_some()
    }

    /// Number of successful launches over the session's lifetime
    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl<L: BrowserLauncher + std::fmt::Debug> std::fmt::Debug for BrowserSessionGeneric<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession")
            .field("launcher", &self.launcher)
            .field("launches", &self.launch_count())
            .finish()
    }
}
