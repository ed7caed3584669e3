//! File-backed store: one file per key under a directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::store::{KvResult, KvStore};
use crate::KvError;

/// Extension for committed records.
const RECORD_EXT: &str = "kv";

/// Extension for in-flight writes.
const TEMP_EXT: &str = "tmp";

/// Key-value store persisted as files in a directory.
///
/// Keys are percent-encoded into file names, so any non-empty key is
/// accepted. A write lands in a temp file first and is renamed over the
/// record, so readers never observe a partial value.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> KvResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| KvError::OpenError(format!("{}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    /// Directory holding the records.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &str) -> KvResult<PathBuf> {
        if key.is_empty() {
            return Err(KvError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", encode_key(key), RECORD_EXT)))
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let path = self.record_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        let path = self.record_path(key)?;
        let temp = path.with_extension(TEMP_EXT);
        tokio::fs::write(&temp, value).await?;
        tokio::fs::rename(&temp, &path).await?;
        tracing::trace!(key, path = %path.display(), "record written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        let path = self.record_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Percent-encode everything outside `[A-Za-z0-9_-]`.
///
/// `.` is encoded too, which keeps `.` / `..` keys and the extensions
/// unambiguous.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}
