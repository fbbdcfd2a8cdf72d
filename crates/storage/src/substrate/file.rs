//! Substrate persisted as a single JSON document

use super::{KvSubstrate, SubstrateStats, SubstrateStatsSnapshot};
use async_trait::async_trait;
use cairn_core::{Error, Result};
use cairn_utils::write_atomic;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// File-backed substrate.
///
/// The whole document is held in memory and rewritten atomically after every
/// `set` and `remove`, so one call maps to one file replacement. Writes are
/// serialized by `writer` and hit the disk on the blocking pool.
#[derive(Debug)]
pub struct FileSubstrate {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
    writer: Mutex<()>,
    stats: SubstrateStats,
}

impl FileSubstrate {
    /// Open the document at `path`, starting empty if it does not exist yet
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<BTreeMap<String, Value>>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(Error::file_system(&path, "read store document", e)),
        };
        debug!(path = %path.display(), entries = entries.len(), "Opened file substrate");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
            writer: Mutex::new(()),
            stats: SubstrateStats::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stats(&self) -> SubstrateStatsSnapshot {
        self.stats.snapshot()
    }

    /// Apply `change` to a copy of the document, write it out, then publish it
    async fn commit<F>(&self, operation: &'static str, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, Value>) + Send,
    {
        let _writer = self.writer.lock().await;

        let mut next = self.entries.read().clone();
        change(&mut next);
        let bytes = serde_json::to_vec_pretty(&next)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| {
                Error::substrate_with_source(operation, "store writer task failed", e)
            })??;

        // Memory only moves forward once the document is on disk
        *self.entries.write() = next;
        Ok(())
    }
}

#[async_trait]
impl KvSubstrate for FileSubstrate {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        self.stats.record_get();
        let entries = self.entries.read();
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    async fn set(&self, items: Vec<(String, Value)>) -> Result<()> {
        self.stats.record_set();
        trace!(count = items.len(), path = %self.path.display(), "file set");
        self.commit("set", move |next| next.extend(items)).await
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        self.stats.record_remove();
        trace!(count = keys.len(), path = %self.path.display(), "file remove");
        self.commit("remove", |next| {
            for key in keys {
                next.remove(key);
            }
        })
        .await
    }
}
