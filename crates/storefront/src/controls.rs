//! Cart control roles and click dispatch.
//!
//! Every rendered control carries a [`ControlRole`] (the `data-role`
//! attribute, posted as the `role` field). All clicks arrive at one endpoint
//! and are routed here by role.

use serde::Deserialize;
use tidycart_core::{CartChange, CartObserver, ObservedCart, ProductId};

/// What a cart control does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlRole {
    Increment,
    Decrement,
    Delete,
    /// Visual-only marker; never touches the cart.
    LikeToggle,
}

impl ControlRole {
    /// The role marker as written in markup.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Delete => "delete",
            Self::LikeToggle => "like-toggle",
        }
    }
}

/// A click on a cart control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Click {
    pub role: ControlRole,
    pub id: ProductId,
    /// Current state of the like marker; only meaningful for `LikeToggle`.
    #[serde(default)]
    pub liked: bool,
}

/// Result of dispatching a [`Click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The cart was (possibly) mutated and re-rendered.
    Cart(CartChange),
    /// The like marker flipped to this state; the cart is untouched.
    Liked(bool),
}

/// Route a click to the matching cart operation.
///
/// Clicks for products that are not in the cart are no-ops.
pub fn dispatch<O: CartObserver>(cart: &mut ObservedCart<O>, click: &Click) -> ClickOutcome {
    let change = match click.role {
        ControlRole::Increment => step_quantity(cart, click.id, 1),
        ControlRole::Decrement => step_quantity(cart, click.id, -1),
        ControlRole::Delete => cart.remove_item(click.id),
        ControlRole::LikeToggle => return ClickOutcome::Liked(!click.liked),
    };
    ClickOutcome::Cart(change)
}

fn step_quantity<O: CartObserver>(
    cart: &mut ObservedCart<O>,
    id: ProductId,
    delta: i64,
) -> CartChange {
    let Some(current) = cart.cart().quantity_of(id) else {
        return CartChange::Unchanged;
    };
    cart.update_item_quantity(id, i64::from(current) + delta)
}
