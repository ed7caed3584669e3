//! Persistent shopping-cart state for client applications.
//!
//! This crate keeps the list of products a user has put in their cart,
//! mirrors it to a key-value store, and hands it to UI code through a
//! scoped context:
//!
//! - **Cart**: items and the pure add / increment / decrement rules
//! - **Store**: a single-writer task that applies commands in order and
//!   writes the whole cart through to storage after each one
//! - **Context**: `provide_cart` / `use_cart` for code below a provider
//! - **Config**: storage key, backend and write retry settings
//!
//! # Example
//!
//! ```rust,ignore
//! use market_cart::prelude::*;
//!
//! let handle = CartStore::from_config(&CartConfig::default()).await?;
//! handle.loaded().await?;
//!
//! handle.add_to_cart(NewCartItem::new("p1", "Mug", "https://img/mug.png", 10.0)).await?;
//! handle.increment("p1").await?;
//! handle.decrement("p1").await?;
//!
//! for item in handle.products() {
//!     println!("{} x{}", item.title, item.quantity);
//! }
//! ```

pub mod cart;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod retry;
pub mod store;

#[cfg(feature = "leptos")]
pub mod reactive;

pub use cart::{CartItem, CartState, DecrementOutcome, NewCartItem};
pub use config::{CartConfig, PersistConfig, StorageConfig};
pub use context::{provide_cart, use_cart, with_cart, CartProvider};
pub use error::CartError;
pub use ids::ProductId;
pub use retry::{BackoffStrategy, RetryPolicy};
pub use store::{CartHandle, CartStore, CartView, Pending, StoreOptions};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartItem, CartState, DecrementOutcome, NewCartItem};
    pub use crate::config::CartConfig;
    pub use crate::context::{provide_cart, use_cart, with_cart};
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::store::{CartHandle, CartStore, StoreOptions};
}
