//! Change notification for carts.

use std::sync::Arc;

use super::{Cart, CartChange};
use crate::types::{Product, ProductId};

/// Receives a notification after every cart mutation.
///
/// Presentation layers implement this to reconcile their output from the
/// current cart state.
pub trait CartObserver {
    /// Called with the cart as it is after the mutation.
    fn cart_changed(&mut self, cart: &Cart, change: &CartChange);
}

impl<F> CartObserver for F
where
    F: FnMut(&Cart, &CartChange),
{
    fn cart_changed(&mut self, cart: &Cart, change: &CartChange) {
        self(cart, change);
    }
}

/// A [`Cart`] paired with the observer that renders it.
///
/// Notification policy:
/// - [`add_item`](Self::add_item) and [`remove_item`](Self::remove_item)
///   always notify, even when removal finds nothing.
/// - [`update_item_quantity`](Self::update_item_quantity) notifies only when
///   the product is in the cart.
/// - [`refresh`](Self::refresh) notifies unconditionally.
#[derive(Debug)]
pub struct ObservedCart<O> {
    cart: Cart,
    observer: O,
}

impl<O: CartObserver> ObservedCart<O> {
    /// Wrap a cart. The observer is not notified until the first mutation or
    /// [`refresh`](Self::refresh).
    pub const fn new(cart: Cart, observer: O) -> Self {
        Self { cart, observer }
    }

    pub fn add_item(&mut self, product: impl Into<Arc<Product>>) -> CartChange {
        let change = self.cart.add_item(product);
        self.notify(&change);
        change
    }

    pub fn remove_item(&mut self, id: ProductId) -> CartChange {
        let change = self.cart.remove_item(id);
        self.notify(&change);
        change
    }

    pub fn update_item_quantity(&mut self, id: ProductId, quantity: i64) -> CartChange {
        if self.cart.get(id).is_none() {
            return CartChange::Unchanged;
        }
        let change = self.cart.update_item_quantity(id, quantity);
        self.notify(&change);
        change
    }

    /// Notify the observer without mutating, e.g. for the first render.
    pub fn refresh(&mut self) {
        self.notify(&CartChange::Unchanged);
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    fn notify(&mut self, change: &CartChange) {
        self.observer.cart_changed(&self.cart, change);
    }
}
