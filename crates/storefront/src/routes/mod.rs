//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Cart page
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart/items             - Line items + out-of-band total
//! POST /cart/click             - Delegated control click (returns items or heart)
//! POST /cart/add               - Add product (returns items, triggers cart-updated)
//! GET  /cart/count             - Cart count badge (fragment)
//! ```

pub mod cart;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(cart::items))
        .route("/click", post(cart::click))
        .route("/add", post(cart::add))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Cart page
        .route("/", get(cart::show))
        // Cart fragments
        .nest("/cart", cart_routes())
}
