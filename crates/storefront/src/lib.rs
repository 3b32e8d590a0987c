//! tidycart storefront library.
//!
//! The presentation layer and HTTP host for the cart widget, exposed as a
//! library so the router can be driven from tests.
//!
//! # Modules
//!
//! - [`render`] - reconciles a `CartView` from the cart after every change
//! - [`controls`] - control roles and click dispatch
//! - [`seed`] - initial cart rows read from an existing document
//! - [`routes`] - axum handlers (HTMX fragments)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod controls;
pub mod error;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod seed;
pub mod state;

use std::time::Duration;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the storefront router with tracing and request IDs.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
