//! Typed JSON values over any [`KvStore`].

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::store::{KvResult, KvStore};

/// Type-safe wrapper that serializes values as JSON.
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct JsonStore {
    store: Arc<dyn KvStore>,
}

impl JsonStore {
    /// Wrap a raw store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Get a value.
    ///
    /// Returns `None` if the key doesn't exist, and a serialization error if
    /// the stored text is not a valid `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> KvResult<Option<T>> {
        match self.store.get(key).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Serialize `value` and overwrite the record under `key`.
    pub async fn set<T>(&self, key: &str, value: &T) -> KvResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let text = serde_json::to_string(value)?;
        self.store.set(key, text).await
    }

    /// Delete a value.
    pub async fn delete(&self, key: &str) -> KvResult<()> {
        self.store.delete(key).await
    }
}

impl std::fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStore").finish_non_exhaustive()
    }
}

/// Build a namespaced storage key.
///
/// # Example
///
/// ```rust
/// let key = market_kv::kv_key!("@GoMarketplace", "cart");
/// assert_eq!(key, "@GoMarketplace:cart");
/// ```
#[macro_export]
macro_rules! kv_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
