//! Cart route handlers.
//!
//! Cart operations use HTMX: every control posts to `/cart/click`, and the
//! response is either the re-rendered line items (with an out-of-band total)
//! or, for the like toggle, just the flipped heart button.

use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tidycart_core::{Price, Product, ProductId};
use tracing::instrument;

use crate::controls::{self, Click, ClickOutcome};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::render::{CartCountTemplate, CartItemsTemplate, CartShowTemplate, HeartTemplate};
use crate::state::AppState;

/// HTMX event fired whenever the cart contents change.
const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: ProductId,
    pub name: String,
    pub price: String,
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CartShowTemplate> {
    let cart = state.cart()?.observer().view().clone();
    Ok(CartShowTemplate { cart })
}

/// Current line items and total (HTMX).
#[instrument(skip(state))]
pub async fn items(State(state): State<AppState>) -> Result<CartItemsTemplate> {
    let cart = state.cart()?.observer().view().clone();
    Ok(CartItemsTemplate { cart })
}

/// Handle a click on any cart control (HTMX).
#[instrument(skip(state))]
pub async fn click(State(state): State<AppState>, Form(click): Form<Click>) -> Result<Response> {
    let id = click.id.to_string();
    add_breadcrumb(
        "cart",
        "Control clicked",
        Some(&[("role", click.role.as_str()), ("id", id.as_str())]),
    );

    let (outcome, cart) = {
        let mut widget = state.cart()?;
        let outcome = controls::dispatch(&mut *widget, &click);
        (outcome, widget.observer().view().clone())
    };

    match outcome {
        ClickOutcome::Liked(liked) => Ok(HeartTemplate {
            id: click.id,
            liked,
        }
        .into_response()),
        ClickOutcome::Cart(change) => {
            tracing::debug!(?change, "Cart control handled");
            Ok((AppendHeaders([CART_UPDATED]), CartItemsTemplate { cart }).into_response())
        }
    }
}

/// Add a product to the cart (HTMX).
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Result<Response> {
    let price = form
        .price
        .parse::<Price>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let product = Product::new(form.id, form.name.trim(), price);

    let cart = {
        let mut widget = state.cart()?;
        widget.add_item(product);
        widget.observer().view().clone()
    };

    Ok((AppendHeaders([CART_UPDATED]), CartItemsTemplate { cart }).into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<CartCountTemplate> {
    let count = state.cart()?.cart().item_count();
    Ok(CartCountTemplate { count })
}
