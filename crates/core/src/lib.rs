//! tidycart core - cart domain types.
//!
//! This crate provides the pure cart model used by the storefront widget:
//! - [`types`] - Newtype wrappers for product IDs and prices, plus [`Product`]
//! - [`cart`] - The [`Cart`] state-mutation API and the [`CartObserver`] seam
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP, no
//! rendering. Presentation layers subscribe to cart changes through
//! [`ObservedCart`] instead of being called from inside the model.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartChange, CartItem, CartObserver, ObservedCart};
pub use types::*;
