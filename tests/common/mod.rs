//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// A browser that serves canned markup keyed by the play URL
pub mod scripted {
    use async_trait::async_trait;
    use embed_resolver::{
        Result,
        browser::{BrowserHandle, BrowserLauncher, PageContext},
    };
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Markup served per URL substring; URLs without a match never finish loading
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedLauncher {
        pages: Arc<HashMap<String, String>>,
        launches: Arc<AtomicUsize>,
    }

    impl ScriptedLauncher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve a page whose player iframe points at `embed`
        pub fn with_embed(mut self, url_fragment: &str, embed: &str) -> Self {
            let markup = format!(
                r#"<html><body><div id="player"><iframe id="iframe-embed" src="{embed}"></iframe></div></body></html>"#
            );
            Arc::make_mut(&mut self.pages).insert(url_fragment.to_string(), markup);
            self
        }

        pub fn launches(&self) -> usize {
            self.launches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BrowserLauncher for ScriptedLauncher {
        type Handle = ScriptedBrowser;

        async fn launch(&self) -> Result<Self::Handle> {
            self.launches.fetch_add(1, Ordering::SeqCst);
            Ok(ScriptedBrowser {
                pages: Arc::clone(&self.pages),
            })
        }
    }

    pub struct ScriptedBrowser {
        pages: Arc<HashMap<String, String>>,
    }

    #[async_trait]
    impl BrowserHandle for ScriptedBrowser {
        type Context = ScriptedPage;

        async fn open_context(&self) -> Result<Self::Context> {
            Ok(ScriptedPage {
                pages: Arc::clone(&self.pages),
                markup: Mutex::new(None),
            })
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }
    }

    pub struct ScriptedPage {
        pages: Arc<HashMap<String, String>>,
        markup: Mutex<Option<String>>,
    }

    #[async_trait]
    impl PageContext for ScriptedPage {
        async fn set_user_agent(&self, _user_agent: &str) -> Result<()> {
            Ok(())
        }

        async fn navigate(&self, url: &str) -> Result<()> {
            let page = self
                .pages
                .iter()
                .find(|(fragment, _)| url.contains(fragment.as_str()))
                .map(|(_, markup)| markup.clone());
            match page {
                Some(markup) => {
                    *self.markup.lock().unwrap() = Some(markup);
                    Ok(())
                }
                None => std::future::pending().await,
            }
        }

        async fn content(&self) -> Result<String> {
            Ok(self.markup.lock().unwrap().clone().unwrap_or_default())
        }

        async fn close(self) -> Result<()> {
            Ok(())
        }
    }
}

/// Test helper functions
pub mod helpers {
    use super::scripted::ScriptedLauncher;
    use axum::Router;
    use embed_resolver::{
        browser::BrowserSessionGeneric, config::Settings, extract::EmbedExtractor,
        resolver::MultiServerResolverGeneric, server::create_app_with_resolver,
    };
    use std::sync::Arc;
    use std::time::Duration;

    /// Create test settings with custom values
    pub fn create_test_settings(servers: &[u32]) -> Settings {
        let mut settings = Settings::default();
        settings.resolver.servers = servers.to_vec();
        settings
    }

    /// Router backed by a scripted browser with short timings
    pub fn create_test_app(settings: Settings, launcher: ScriptedLauncher) -> Router {
        let session = Arc::new(BrowserSessionGeneric::with_launcher(launcher));
        let extractor = EmbedExtractor::new(&settings.browser)
            .with_timings(Duration::from_millis(200), Duration::ZERO);
        let resolver = Arc::new(
            MultiServerResolverGeneric::with_session(&settings, session).with_extractor(extractor),
        );
        create_app_with_resolver(settings, resolver)
    }
}
