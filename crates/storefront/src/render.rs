//! Cart presentation layer.
//!
//! [`CartRenderer`] subscribes to cart changes and keeps a [`CartView`] in
//! step with the model. Every notification rebuilds the line items from
//! scratch; there is no diffing against the previous view.

use askama::Template;
use askama_web::WebTemplate;
use tidycart_core::{Cart, CartChange, CartItem, CartObserver, ProductId};

/// Cart item display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Unit price, written to the row's `data-price` attribute.
    pub unit_price: i64,
    /// Formatted line total, e.g. `$20`.
    pub line_total: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let product = item.product();
        Self {
            id: product.id(),
            name: product.name().to_string(),
            quantity: item.quantity(),
            unit_price: product.price().amount(),
            line_total: item.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Contents of the `#total-price` element: the bare total amount.
    pub total_price: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_price: "0".to_string(),
            item_count: 0,
        }
    }
}

/// Observer that reconciles a [`CartView`] from the cart.
#[derive(Debug, Clone)]
pub struct CartRenderer {
    view: CartView,
    renders: u64,
}

impl Default for CartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CartRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: CartView::empty(),
            renders: 0,
        }
    }

    /// The most recently rendered view.
    #[must_use]
    pub const fn view(&self) -> &CartView {
        &self.view
    }

    /// Number of reconciliation passes so far.
    #[must_use]
    pub const fn renders(&self) -> u64 {
        self.renders
    }

    /// Drop every rendered line item and rebuild them in cart order, then
    /// refresh the total.
    pub fn display_cart_items(&mut self, cart: &Cart) {
        self.view.items.clear();
        self.view
            .items
            .extend(cart.items().iter().map(CartItemView::from));
        self.view.item_count = cart.item_count();
        self.renders += 1;

        self.update_total_price(cart);
    }

    /// Write the cart total into the total display slot.
    pub fn update_total_price(&mut self, cart: &Cart) {
        self.view.total_price = cart.total().amount().to_string();
    }
}

impl CartObserver for CartRenderer {
    fn cart_changed(&mut self, cart: &Cart, change: &CartChange) {
        self.display_cart_items(cart);
        tracing::debug!(
            ?change,
            items = self.view.items.len(),
            total = %self.view.total_price,
            "Cart re-rendered"
        );
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart line items and total fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Like toggle fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/heart.html")]
pub struct HeartTemplate {
    pub id: ProductId,
    pub liked: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tidycart_core::{ObservedCart, Price, Product};

    use super::*;

    fn product(id: i32, name: &str, price: i64) -> Product {
        Product::new(ProductId::new(id), name, Price::new(price).unwrap())
    }

    #[test]
    fn test_empty_cart_renders_no_line_items() {
        let mut observed = ObservedCart::new(Cart::new(), CartRenderer::new());
        observed.refresh();

        let view = observed.observer().view();
        assert!(view.items.is_empty());
        assert_eq!(view.total_price, "0");

        let html = CartItemsTemplate { cart: view.clone() }.render().unwrap();
        assert!(!html.contains("class=\"cart-item\""));
        assert!(html.contains("id=\"total-price\""));
    }

    #[test]
    fn test_render_follows_cart_order_and_totals() {
        let mut observed = ObservedCart::new(Cart::new(), CartRenderer::new());
        observed.add_item(product(2, "Pen", 5));
        observed.add_item(product(1, "Book", 10));
        observed.add_item(product(1, "Book", 10));

        let view = observed.observer().view();
        let names: Vec<_> = view.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Pen", "Book"]);
        assert_eq!(view.items.last().unwrap().line_total, "$20");
        assert_eq!(view.total_price, "25");
        assert_eq!(view.item_count, 3);
        assert_eq!(observed.observer().renders(), 3);
    }

    #[test]
    fn test_removed_rows_disappear_from_view() {
        let mut observed = ObservedCart::new(Cart::new(), CartRenderer::new());
        observed.add_item(product(1, "Book", 10));
        observed.add_item(product(2, "Pen", 5));
        observed.update_item_quantity(ProductId::new(2), 0);

        let view = observed.observer().view();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_price, "10");
    }

    #[test]
    fn test_row_markup_exposes_controls() {
        let mut observed = ObservedCart::new(Cart::new(), CartRenderer::new());
        observed.add_item(product(7, "Lamp", 12));

        let html = CartItemsTemplate {
            cart: observed.observer().view().clone(),
        }
        .render()
        .unwrap();

        assert!(html.contains("data-id=\"7\""));
        assert!(html.contains("data-price=\"12\""));
        assert!(html.contains("<span>Lamp</span>"));
        assert!(html.contains("<span class=\"quantity\">1</span>"));
        assert!(html.contains("<span class=\"price\">$12</span>"));
        for role in ["increment", "decrement", "delete", "like-toggle"] {
            assert!(
                html.contains(&format!("data-role=\"{role}\"")),
                "missing control {role}"
            );
        }
    }

    #[test]
    fn test_names_are_escaped() {
        let mut observed = ObservedCart::new(Cart::new(), CartRenderer::new());
        observed.add_item(product(1, "<b>Bold</b>", 1));

        let html = CartItemsTemplate {
            cart: observed.observer().view().clone(),
        }
        .render()
        .unwrap();

        assert!(!html.contains("<b>Bold</b>"));
    }

    #[test]
    fn test_heart_fragment_reflects_liked_state() {
        let liked = HeartTemplate {
            id: ProductId::new(1),
            liked: true,
        }
        .render()
        .unwrap();
        assert!(liked.contains("heart liked"));

        let plain = HeartTemplate {
            id: ProductId::new(1),
            liked: false,
        }
        .render()
        .unwrap();
        assert!(plain.contains("class=\"heart\""));
        assert!(!plain.contains("heart liked"));
    }
}
