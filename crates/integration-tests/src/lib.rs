//! Integration tests for tidycart.
//!
//! Tests drive the storefront router in-process with
//! `tower::ServiceExt::oneshot`; no server or network is involved.
//!
//! ```bash
//! cargo test -p tidycart-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tidycart_core::{Cart, ObservedCart};
use tidycart_storefront::config::StorefrontConfig;
use tidycart_storefront::render::CartRenderer;
use tidycart_storefront::seed;
use tidycart_storefront::state::AppState;
use tower::ServiceExt;

/// The seed page the storefront ships with: a Book and a Pen.
pub const SEED_DOCUMENT: &str = r#"
<div class="cart">
    <div class="cart-item" data-id="1" data-price="10"><span>Book</span></div>
    <div class="cart-item" data-id="2" data-price="5"><span>Pen</span></div>
</div>
<span id="total-price"></span>
"#;

/// A state whose cart was seeded from `document`.
#[must_use]
pub fn seeded_state(document: &str) -> AppState {
    let mut cart = ObservedCart::new(Cart::new(), CartRenderer::new());
    seed::seed_cart(&mut cart, document);
    // Tests run from this crate's directory rather than the workspace root
    let config = StorefrontConfig {
        static_dir: "../storefront/static".into(),
        ..StorefrontConfig::default()
    };
    AppState::new(config, cart)
}

/// A router over a seeded cart, plus the state for inspecting the cart.
#[must_use]
pub fn test_app(document: &str) -> (Router, AppState) {
    let state = seeded_state(document);
    (tidycart_storefront::app(state.clone()), state)
}

/// A captured response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub hx_trigger: Option<String>,
    pub body: String,
}

/// Send a GET request.
///
/// # Panics
///
/// Panics if the request cannot be built or the body is not UTF-8.
pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::get(uri)
        .body(Body::empty())
        .expect("valid request");
    send(app, request).await
}

/// Send a url-encoded form POST.
///
/// # Panics
///
/// Panics if the request cannot be built or the body is not UTF-8.
pub async fn post_form(app: &Router, uri: &str, form: &str) -> TestResponse {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_owned()))
        .expect("valid request");
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let hx_trigger = response
        .headers()
        .get("HX-Trigger")
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let body = String::from_utf8(bytes.to_vec()).expect("utf-8 body");

    TestResponse {
        status,
        hx_trigger,
        body,
    }
}

/// Count rendered cart rows in an HTML fragment.
#[must_use]
pub fn row_count(html: &str) -> usize {
    html.matches("class=\"cart-item\"").count()
}

/// The text of the `#total-price` element.
#[must_use]
pub fn total_text(html: &str) -> Option<&str> {
    let start = html.find("id=\"total-price\"")?;
    let rest = html.get(start..)?;
    let open_end = rest.find('>')? + 1;
    let rest = rest.get(open_end..)?;
    let close = rest.find('<')?;
    rest.get(..close)
}
