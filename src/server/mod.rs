//! HTTP server implementation
//!
//! Axum router, shared state and request handlers for the play API.

pub mod app;
pub mod handlers;

pub use app::{AppState, create_app, create_app_with_resolver};
