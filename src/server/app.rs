//! Axum application setup
//!
//! Creates and configures the Axum application with routes and middleware.

use crate::{
    browser::{BrowserLauncher, ChromiumLauncher},
    config::Settings,
    resolver::{MultiServerResolver, MultiServerResolverGeneric},
};
use axum::{Router, routing::get};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
pub struct AppState<L: BrowserLauncher = ChromiumLauncher> {
    /// Resolver driving the shared browser session
    pub resolver: Arc<MultiServerResolverGeneric<L>>,
    /// Application settings
    pub settings: Arc<Settings>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
    /// Wall-clock start time reported by `/ping`
    pub started_at: DateTime<Utc>,
}

impl<L: BrowserLauncher> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            settings: Arc::clone(&self.settings),
            start_time: self.start_time,
            started_at: self.started_at,
        }
    }
}

impl<L: BrowserLauncher> AppState<L> {
    pub fn new(settings: Settings, resolver: Arc<MultiServerResolverGeneric<L>>) -> Self {
        Self {
            resolver,
            settings: Arc::new(settings),
            start_time: std::time::Instant::now(),
            started_at: Utc::now(),
        }
    }
}

/// Create the main Axum application backed by its own Chromium session
pub fn create_app(settings: Settings) -> Router {
    let resolver = Arc::new(MultiServerResolver::new(&settings));
    create_app_with_resolver(settings, resolver)
}

/// Create the application around an existing resolver.
///
/// The caller keeps its own handle on the resolver's session so it can shut
/// the browser down once the server stops.
pub fn create_app_with_resolver<L: BrowserLauncher>(
    settings: Settings,
    resolver: Arc<MultiServerResolverGeneric<L>>,
) -> Router {
    let state = AppState::new(settings, resolver);

    Router::new()
        .route("/", get(super::handlers::index::<L>))
        .route("/ping", get(super::handlers::ping::<L>))
        .route("/api/{source}/play/{slug}", get(super::handlers::play::<L>))
        .fallback(super::handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
