//! The storage seam.

use async_trait::async_trait;

use crate::KvError;

/// Result type for storage operations.
pub type KvResult<T> = Result<T, KvError>;

/// An async string key-value store.
///
/// Values are opaque strings; callers that want typed values go through
/// [`JsonStore`](crate::JsonStore).
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Overwrite the value under `key`.
    async fn set(&self, key: &str, value: String) -> KvResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> KvResult<()>;
}
