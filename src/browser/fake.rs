//! Scripted in-memory browser used by unit tests

use super::{BrowserHandle, BrowserLauncher, PageContext};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a fake page does when navigated to a URL
#[derive(Debug, Clone)]
pub enum PageScript {
    /// Load successfully and serve this markup
    Html(String),
    /// Load after a delay, then serve this markup
    SlowHtml(Duration, String),
    /// Land on another URL, then serve this markup
    Redirected { to: String, markup: String },
    /// Never finish loading
    Hang,
    /// Fail navigation with this message
    NavigationError(String),
    /// Load, then fail when the DOM is read
    ContentError(String),
    /// Panic inside navigation
    Panic,
}

impl PageScript {
    pub fn html(markup: impl Into<String>) -> Self {
        Self::Html(markup.into())
    }

    pub fn iframe(src: &str) -> Self {
        Self::Html(iframe_markup(src))
    }

    pub fn slow_iframe(delay: Duration, src: &str) -> Self {
        Self::SlowHtml(delay, iframe_markup(src))
    }

    pub fn redirected_iframe(to: &str, src: &str) -> Self {
        Self::Redirected {
            to: to.to_string(),
            markup: iframe_markup(src),
        }
    }
}

fn iframe_markup(src: &str) -> String {
    format!(
        r#"<html><body><div id="player"><iframe id="iframe-embed" src="{src}"></iframe></div></body></html>"#
    )
}

type Script = Arc<dyn Fn(&str) -> PageScript + Send + Sync>;

/// Counters shared by a fake launcher and everything it creates
#[derive(Debug, Default)]
pub struct FakeState {
    launches: AtomicUsize,
    failing_launches: AtomicUsize,
    contexts_opened: AtomicUsize,
    contexts_closed: AtomicUsize,
    browsers_closed: AtomicUsize,
    user_agents: Mutex<Vec<String>>,
    /// Liveness flag of the most recently launched browser
    current_browser: Mutex<Option<Arc<AtomicBool>>>,
}

impl FakeState {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn contexts_opened(&self) -> usize {
        self.contexts_opened.load(Ordering::SeqCst)
    }

    pub fn contexts_closed(&self) -> usize {
        self.contexts_closed.load(Ordering::SeqCst)
    }

    pub fn open_contexts(&self) -> usize {
        self.contexts_opened() - self.contexts_closed()
    }

    pub fn browsers_closed(&self) -> usize {
        self.browsers_closed.load(Ordering::SeqCst)
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }

    /// Sever the connection to the latest browser as if it had crashed
    pub fn crash_browser(&self) {
        if let Some(alive) = self.current_browser.lock().unwrap().as_ref() {
            alive.store(false, Ordering::SeqCst);
        }
    }
}

pub struct FakeLauncher {
    script: Script,
    launch_delay: Duration,
    state: Arc<FakeState>,
}

impl std::fmt::Debug for FakeLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeLauncher").finish_non_exhaustive()
    }
}

impl FakeLauncher {
    pub fn new(script: impl Fn(&str) -> PageScript + Send + Sync + 'static) -> Self {
        Self {
            script: Arc::new(script),
            launch_delay: Duration::ZERO,
            state: Arc::new(FakeState::default()),
        }
    }

    pub fn with_launch_delay(mut self, delay: Duration) -> Self {
        self.launch_delay = delay;
        self
    }

    /// Make the next `count` launches fail
    pub fn failing_launches(self, count: usize) -> Self {
        self.state.failing_launches.store(count, Ordering::SeqCst);
        self
    }

    pub fn state(&self) -> Arc<FakeState> {
        Arc::clone(&self.state)
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    type Handle = FakeBrowser;

    async fn launch(&self) -> Result<FakeBrowser> {
        if !self.launch_delay.is_zero() {
            tokio::time::sleep(self.launch_delay).await;
        }

        let remaining = self.state.failing_launches.load(Ordering::SeqCst);
        if remaining > 0 {
            self.state
                .failing_launches
                .store(remaining - 1, Ordering::SeqCst);
            return Err(Error::session_launch("fake browser refused to start"));
        }

        self.state.launches.fetch_add(1, Ordering::SeqCst);
        let alive = Arc::new(AtomicBool::new(true));
        *self.state.current_browser.lock().unwrap() = Some(Arc::clone(&alive));
        Ok(FakeBrowser {
            script: Arc::clone(&self.script),
            state: Arc::clone(&self.state),
            alive,
        })
    }
}

pub struct FakeBrowser {
    script: Script,
    state: Arc<FakeState>,
    alive: Arc<AtomicBool>,
}

impl std::fmt::Debug for FakeBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeBrowser").finish_non_exhaustive()
    }
}

#[async_trait]
impl BrowserHandle for FakeBrowser {
    type Context = FakePage;

    async fn open_context(&self) -> Result<FakePage> {
        let id = self.state.contexts_opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakePage {
            id,
            script: Arc::clone(&self.script),
            state: Arc::clone(&self.state),
            loaded: Mutex::new(None),
            current_url: Mutex::new(None),
        })
    }

    async fn close(&self) -> Result<()> {
        self.state.browsers_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

pub struct FakePage {
    id: usize,
    script: Script,
    state: Arc<FakeState>,
    loaded: Mutex<Option<PageScript>>,
    current_url: Mutex<Option<String>>,
}

impl FakePage {
    pub fn id(&self) -> usize {
        self.id
    }
}

#[async_trait]
impl PageContext for FakePage {
    async fn set_user_agent(&self, user_agent: &str) -> Result<()> {
        self.state
            .user_agents
            .lock()
            .unwrap()
            .push(user_agent.to_string());
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        let script = (self.script)(url);
        *self.current_url.lock().unwrap() = Some(url.to_string());
        match script {
            PageScript::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
            PageScript::NavigationError(message) => Err(Error::extraction(message)),
            PageScript::Panic => panic!("fake page crashed while loading {url}"),
            PageScript::SlowHtml(delay, markup) => {
                tokio::time::sleep(delay).await;
                *self.loaded.lock().unwrap() = Some(PageScript::Html(markup));
                Ok(())
            }
            PageScript::Redirected { to, markup } => {
                *self.current_url.lock().unwrap() = Some(to);
                *self.loaded.lock().unwrap() = Some(PageScript::Html(markup));
                Ok(())
            }
            other => {
                *self.loaded.lock().unwrap() = Some(other);
                Ok(())
            }
        }
    }

    async fn content(&self) -> Result<String> {
        let loaded = self.loaded.lock().unwrap().clone();
        match loaded {
            Some(PageScript::Html(markup)) => Ok(markup),
            Some(PageScript::ContentError(message)) => Err(Error::extraction(message)),
            _ => Err(Error::extraction("page has no document")),
        }
    }

    async fn current_url(&self) -> Result<Option<String>> {
        Ok(self.current_url.lock().unwrap().clone())
    }

    async fn close(self) -> Result<()> {
        self.state.contexts_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
