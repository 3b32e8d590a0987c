//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use tidycart_core::ObservedCart;

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::render::CartRenderer;

/// The cart together with its presentation layer.
pub type CartWidget = ObservedCart<CartRenderer>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart widget sits behind a
/// mutex so each request mutates and re-renders it to completion before the
/// next one runs.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: Mutex<CartWidget>,
}

impl AppState {
    /// Create a new application state around an already-seeded cart widget.
    ///
    /// Runs an initial render so the first page load reflects the seed.
    #[must_use]
    pub fn new(config: StorefrontConfig, mut cart: CartWidget) -> Self {
        cart.refresh();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Lock the cart widget.
    ///
    /// Do not hold the guard across an `.await`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if a previous holder panicked.
    pub fn cart(&self) -> Result<MutexGuard<'_, CartWidget>, AppError> {
        self.inner
            .cart
            .lock()
            .map_err(|_| AppError::Internal("cart lock poisoned".to_string()))
    }
}
