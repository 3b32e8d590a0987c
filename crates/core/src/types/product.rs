//! Product records.

use super::{Price, ProductId};

/// A product that can be placed in the cart.
///
/// Immutable after construction; the cart shares products between items by
/// reference rather than copying them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Price,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }

    /// The product's stable identifier.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }
}
