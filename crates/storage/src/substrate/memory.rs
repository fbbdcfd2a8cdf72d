//! Process-local substrate

use super::{KvSubstrate, SubstrateStats, SubstrateStatsSnapshot};
use async_trait::async_trait;
use cairn_core::Result;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

/// In-memory substrate; every call is applied under a single lock
#[derive(Debug, Default)]
pub struct MemorySubstrate {
    entries: RwLock<HashMap<String, Value>>,
    stats: SubstrateStats,
}

impl MemorySubstrate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round-trip counters so far
    pub fn stats(&self) -> SubstrateStatsSnapshot {
        self.stats.snapshot()
    }

    /// Copy of every stored pair
    pub fn dump(&self) -> HashMap<String, Value> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Write a raw value, bypassing every check of the record layer
    pub fn insert_raw(&self, key: impl Into<String>, value: Value) {
        self.entries.write().insert(key.into(), value);
    }
}

#[async_trait]
impl KvSubstrate for MemorySubstrate {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        self.stats.record_get();
        let entries = self.entries.read();
        let found: HashMap<String, Value> = keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect();
        trace!(requested = keys.len(), found = found.len(), "memory get");
        Ok(found)
    }

    async fn set(&self, items: Vec<(String, Value)>) -> Result<()> {
        self.stats.record_set();
        trace!(count = items.len(), "memory set");
        let mut entries = self.entries.write();
        for (key, value) in items {
            entries.insert(key, value);
        }
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        self.stats.record_remove();
        trace!(count = keys.len(), "memory remove");
        let mut entries = self.entries.write();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
