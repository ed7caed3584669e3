//! Backend selection.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{KvResult, KvStore};
use crate::{FileStore, MemoryStore};

/// Which storage backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process memory; nothing survives a restart.
    Memory,
    /// One file per key under a directory.
    #[default]
    File,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Open a backend. `path` is ignored by the memory backend.
pub async fn open(backend: Backend, path: &Path) -> KvResult<Arc<dyn KvStore>> {
    match backend {
        Backend::Memory => Ok(Arc::new(MemoryStore::new())),
        Backend::File => Ok(Arc::new(FileStore::open(path).await?)),
    }
}
