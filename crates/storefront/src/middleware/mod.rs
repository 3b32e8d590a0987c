//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (one `http_request` span per request)
//! 3. Request ID (tag the span and response)

pub mod request_id;

pub use request_id::request_id_middleware;
