//! Cart error types.

use market_kv::KvError;
use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Arithmetic overflow on a quantity.
    #[error("Quantity overflow for item {0}")]
    Overflow(String),

    /// Price that cannot be stored (NaN or infinite).
    #[error("Invalid price for item {0}")]
    InvalidPrice(String),

    /// The stored cart could not be read, so writes are held back.
    #[error("Cart could not be loaded: {0}")]
    LoadFailed(String),

    /// The cart accessor was used without a provider in scope.
    #[error("use_cart must be used within a cart provider")]
    MissingProvider,

    /// The store task has shut down.
    #[error("Cart store is closed")]
    StoreClosed,

    /// Storage error after retries were exhausted.
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<toml::de::Error> for CartError {
    fn from(e: toml::de::Error) -> Self {
        CartError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::ConfigError(e.to_string())
    }
}
