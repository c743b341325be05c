//! HTTP request handlers
//!
//! Implementation of HTTP endpoints for the embed resolver server.

use crate::{
    Error,
    browser::BrowserLauncher,
    server::app::AppState,
    types::{ErrorResponse, PingResponse, PlayQuery, PlayResponse, Source},
    utils::version,
};
use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{Method, StatusCode, Uri},
    response::Json,
};
use axum_macros::debug_handler;
use serde_json::{Value, json};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Resolve every configured server for a play page
///
/// GET /api/{source}/play/{slug}?ep=N
///
/// Always answers 200 once a browser is available, even when every server
/// failed; the failures are simply absent from `servers`.
pub async fn play<L: BrowserLauncher>(
    State(state): State<AppState<L>>,
    Path((source, slug)): Path<(String, String)>,
    query: Result<Query<PlayQuery>, QueryRejection>,
) -> Result<Json<PlayResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        let error = Error::invalid_request(rejection.body_text());
        error_response(&error)
    })?;
    let source: Source = source.parse().map_err(|e| error_response(&e))?;

    tracing::debug!(%source, slug, episode = ?query.ep, "Received play request");

    let servers = &state.settings.resolver.servers;
    match state.resolver.resolve(source, &slug, query.ep, servers).await {
        Ok(report) => Ok(Json(PlayResponse::from(&report))),
        Err(e) => {
            tracing::error!(%source, slug, "Failed to resolve play page: {}", e);
            Err(error_response(&e))
        }
    }
}

/// Build the status and body for an error
fn error_response(error: &Error) -> ApiError {
    (
        error_status(error),
        Json(ErrorResponse::new(error_label(error), error.to_string())),
    )
}

fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::InvalidRequest(_) | Error::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Short category shown in the `error` field
fn error_label(error: &Error) -> &'static str {
    match error {
        Error::InvalidRequest(_) => "Invalid request",
        Error::InvalidUrl(_) => "Invalid URL",
        Error::SessionLaunch(_) => "Browser unavailable",
        Error::NavigationTimeout { .. } => "Navigation timeout",
        Error::NoEmbedFound { .. } => "No embed found",
        Error::Extraction(_) => "Extraction failed",
        Error::Config(_) => "Configuration error",
        Error::Server(_) => "Server error",
        Error::Json(_) => "JSON error",
        Error::TomlParse(_) => "Configuration error",
        Error::Io(_) => "I/O error",
        Error::Internal(_) => "Internal server error",
    }
}

/// API index
///
/// GET /
pub async fn index<L: BrowserLauncher>(State(state): State<AppState<L>>) -> Json<Value> {
    let mut endpoints = serde_json::Map::new();
    for source in Source::ALL {
        endpoints.insert(
            source.to_string(),
            json!({
                "base_url": state.settings.sources.base_url(source),
                "play": format!("/api/{}/play/:slug?ep=2 - Returns all streaming servers", source),
            }),
        );
    }

    Json(json!({
        "message": format!("Embed Resolver API v{}", version::get_version()),
        "endpoints": endpoints,
        "health": "/ping",
        "examples": {
            "play": "/api/rebahin/play/gates-of-flesh-2025-sub-indo?ep=2",
        },
    }))
}

/// Ping endpoint for health checks
///
/// GET /ping
///
/// Returns server status and uptime information.
pub async fn ping<L: BrowserLauncher>(State(state): State<AppState<L>>) -> Json<PingResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let response = PingResponse::new(uptime, version::get_version(), state.started_at);

    tracing::debug!(
        "Ping response: uptime={}s, version={}",
        uptime,
        version::get_version()
    );
    Json(response)
}

/// JSON 404 for everything else
#[debug_handler]
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "Endpoint not found",
            format!("Cannot {} {}", method, uri),
        )),
    )
}
