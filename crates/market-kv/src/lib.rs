//! Async key-value storage for the market cart.
//!
//! The cart keeps a single serialized record under one key. This crate
//! provides the storage seam ([`KvStore`]), two backends, and a typed JSON
//! wrapper on top of them.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use market_kv::{kv_key, JsonStore, MemoryStore};
//!
//! let store = JsonStore::new(Arc::new(MemoryStore::new()));
//! let key = kv_key!("@GoMarketplace", "cart");
//!
//! store.set(&key, &vec!["p1", "p2"]).await?;
//! let ids: Option<Vec<String>> = store.get(&key).await?;
//! store.delete(&key).await?;
//! ```

mod backend;
mod error;
mod file;
mod json;
mod memory;
mod store;

pub use backend::{open, Backend};
pub use error::KvError;
pub use file::FileStore;
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use store::{KvResult, KvStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{kv_key, Backend, FileStore, JsonStore, KvError, KvStore, MemoryStore};
}
