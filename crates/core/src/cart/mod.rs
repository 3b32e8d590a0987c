//! The cart model.
//!
//! [`Cart`] is an ordered list of [`CartItem`]s keyed by product ID. Every
//! mutation returns a [`CartChange`] describing what happened, and lookups of
//! unknown IDs are silent no-ops rather than errors.
//!
//! The cart never renders itself. Wrap it in an [`ObservedCart`] to have a
//! [`CartObserver`] notified after each mutation.

mod observer;

use std::sync::Arc;

use crate::types::{Price, Product, ProductId};

pub use observer::{CartObserver, ObservedCart};

/// A product paired with a quantity of at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    product: Arc<Product>,
    quantity: u32,
}

impl CartItem {
    fn new(product: Arc<Product>) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// The product in this line.
    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Current quantity, always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price().times(self.quantity)
    }
}

/// What a cart mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended with the given quantity.
    Added { id: ProductId, quantity: u32 },
    /// An existing line now has the given quantity.
    QuantityChanged { id: ProductId, quantity: u32 },
    /// The line was removed.
    Removed { id: ProductId },
    /// Nothing matched; the cart is as it was.
    Unchanged,
}

/// An ordered collection of cart lines, at most one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the same product ID, or appends a new
    /// line with quantity 1.
    pub fn add_item(&mut self, product: impl Into<Arc<Product>>) -> CartChange {
        let product = product.into();
        let id = product.id();

        if let Some(item) = self.items.iter_mut().find(|item| item.product.id() == id) {
            item.quantity = item.quantity.saturating_add(1);
            return CartChange::QuantityChanged {
                id,
                quantity: item.quantity,
            };
        }

        self.items.push(CartItem::new(product));
        CartChange::Added { id, quantity: 1 }
    }

    /// Remove the line for `id`, if there is one.
    pub fn remove_item(&mut self, id: ProductId) -> CartChange {
        let before = self.items.len();
        self.items.retain(|item| item.product.id() != id);

        if self.items.len() == before {
            CartChange::Unchanged
        } else {
            CartChange::Removed { id }
        }
    }

    /// Set the quantity of the line for `id`.
    ///
    /// Unknown IDs are ignored. A quantity of zero or less removes the line.
    /// Quantities above `u32::MAX` are clamped.
    pub fn update_item_quantity(&mut self, id: ProductId, quantity: i64) -> CartChange {
        if self.get(id).is_none() {
            return CartChange::Unchanged;
        }
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|item| item.product.id() == id) {
            Some(item) => {
                item.quantity = quantity;
                CartChange::QuantityChanged { id, quantity }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Sum of every line total. Zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// The line for `id`.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id() == id)
    }

    /// Quantity of `id` in the cart, if present.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.get(id).map(CartItem::quantity)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    fn product(id: i32, name: &str, price: i64) -> Product {
        Product::new(ProductId::new(id), name, Price::new(price).unwrap())
    }

    fn book() -> Product {
        product(1, "Book", 10)
    }

    fn pen() -> Product {
        product(2, "Pen", 5)
    }

    #[test]
    fn test_adding_same_product_twice_increments_quantity() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add_item(book()),
            CartChange::Added {
                id: ProductId::new(1),
                quantity: 1
            }
        );
        assert_eq!(
            cart.add_item(book()),
            CartChange::QuantityChanged {
                id: ProductId::new(1),
                quantity: 2
            }
        );

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), Some(2));
        assert_eq!(cart.total().amount(), 20);
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(book());
        cart.add_item(pen());

        let change = cart.update_item_quantity(ProductId::new(2), 0);

        assert_eq!(
            change,
            CartChange::Removed {
                id: ProductId::new(2)
            }
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().unwrap().product().name(), "Book");
        assert_eq!(cart.total().amount(), 10);
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_increment_then_decrement_restores_total() {
        let mut cart = Cart::new();
        cart.add_item(book());
        cart.add_item(pen());
        let before = cart.total();

        let id = ProductId::new(2);
        let qty = i64::from(cart.quantity_of(id).unwrap());
        cart.update_item_quantity(id, qty + 1);
        cart.update_item_quantity(id, qty);

        assert_eq!(cart.total(), before);
        assert_eq!(cart.quantity_of(id), Some(1));
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add_item(book());
        let snapshot = cart.clone();

        assert_eq!(cart.remove_item(ProductId::new(99)), CartChange::Unchanged);
        assert_eq!(
            cart.update_item_quantity(ProductId::new(99), 4),
            CartChange::Unchanged
        );
        assert_eq!(
            cart.update_item_quantity(ProductId::new(99), -1),
            CartChange::Unchanged
        );
        assert_eq!(cart, snapshot);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(pen());
        cart.add_item(book());
        cart.add_item(pen());

        let names: Vec<_> = cart.items().iter().map(|i| i.product().name()).collect();
        assert_eq!(names, ["Pen", "Book"]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_huge_quantity_is_clamped() {
        let mut cart = Cart::new();
        cart.add_item(book());
        cart.update_item_quantity(ProductId::new(1), i64::MAX);
        assert_eq!(cart.quantity_of(ProductId::new(1)), Some(u32::MAX));
    }

    #[test]
    fn test_line_total() {
        let mut cart = Cart::new();
        cart.add_item(product(3, "Mug", 7));
        cart.update_item_quantity(ProductId::new(3), 3);
        assert_eq!(cart.items().first().unwrap().line_total().amount(), 21);
    }

    fn arb_products() -> impl Strategy<Value = Vec<(i32, i64)>> {
        prop::collection::vec((0i32..8, 0i64..1_000), 0..40)
    }

    fn build(adds: &[(i32, i64)]) -> Cart {
        // The first price seen for an ID wins, like a catalog would.
        let mut prices: HashMap<i32, i64> = HashMap::new();
        let mut cart = Cart::new();
        for &(id, price) in adds {
            let price = *prices.entry(id).or_insert(price);
            cart.add_item(product(id, "p", price));
        }
        cart
    }

    proptest! {
        /// Property: one line per distinct ID, quantity equals number of adds
        #[test]
        fn prop_add_counts_per_product(adds in arb_products()) {
            let cart = build(&adds);

            let mut expected: HashMap<i32, u32> = HashMap::new();
            for (id, _) in &adds {
                *expected.entry(*id).or_default() += 1;
            }

            prop_assert_eq!(cart.len(), expected.len());
            for (id, count) in expected {
                prop_assert_eq!(cart.quantity_of(ProductId::new(id)), Some(count));
            }
        }

        /// Property: total is the sum of price times quantity
        #[test]
        fn prop_total_matches_line_sum(adds in arb_products()) {
            let cart = build(&adds);
            let expected: i64 = cart
                .items()
                .iter()
                .map(|i| i.product().price().amount() * i64::from(i.quantity()))
                .sum();
            prop_assert_eq!(cart.total().amount(), expected);
        }

        /// Property: updating to a non-positive quantity is the same as removing
        #[test]
        fn prop_non_positive_update_equals_remove(
            adds in arb_products(),
            id in 0i32..8,
            quantity in -5i64..=0,
        ) {
            let mut updated = build(&adds);
            let mut removed = updated.clone();

            updated.update_item_quantity(ProductId::new(id), quantity);
            removed.remove_item(ProductId::new(id));

            prop_assert_eq!(updated, removed);
        }

        /// Property: operations on an absent ID leave the cart untouched
        #[test]
        fn prop_absent_id_is_idempotent(adds in arb_products(), quantity in -5i64..50) {
            let mut cart = build(&adds);
            let snapshot = cart.clone();
            let absent = ProductId::new(100);

            prop_assert_eq!(cart.remove_item(absent), CartChange::Unchanged);
            prop_assert_eq!(cart.update_item_quantity(absent, quantity), CartChange::Unchanged);
            prop_assert_eq!(cart, snapshot);
        }

        /// Property: every line keeps a quantity of at least one
        #[test]
        fn prop_quantities_stay_positive(
            adds in arb_products(),
            updates in prop::collection::vec((0i32..8, -3i64..5), 0..20),
        ) {
            let mut cart = build(&adds);
            for (id, quantity) in updates {
                cart.update_item_quantity(ProductId::new(id), quantity);
            }
            prop_assert!(cart.items().iter().all(|i| i.quantity() >= 1));
        }
    }
}
