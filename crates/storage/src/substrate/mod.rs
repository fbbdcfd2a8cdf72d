//! The primitive key-value substrate the local backend is built on
//!
//! A substrate only knows whole JSON values under exact string keys. It has
//! no queries, no ordering and no multi-key transactions; each trait call is
//! one round-trip, and the graph layer relies on that to keep every logical
//! operation down to a single write call.

mod file;
mod memory;

pub use file::FileSubstrate;
pub use memory::MemorySubstrate;

use async_trait::async_trait;
use cairn_core::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Whole-value key-value storage
#[async_trait]
pub trait KvSubstrate: Send + Sync {
    /// Values for the keys that exist; missing keys are left out of the map
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>>;

    /// Write every pair in one call
    async fn set(&self, items: Vec<(String, Value)>) -> Result<()>;

    /// Delete every key in one call; missing keys are ignored
    async fn remove(&self, keys: &[String]) -> Result<()>;
}

/// Round-trip counters of a substrate
#[derive(Debug, Default)]
pub struct SubstrateStats {
    pub gets: AtomicU64,
    pub sets: AtomicU64,
    pub removes: AtomicU64,
}

/// Point-in-time copy of [`SubstrateStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstrateStatsSnapshot {
    pub gets: u64,
    pub sets: u64,
    pub removes: u64,
}

impl SubstrateStats {
    pub fn snapshot(&self) -> SubstrateStatsSnapshot {
        SubstrateStatsSnapshot {
            gets: self.gets.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_remove(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }
}

impl SubstrateStatsSnapshot {
    /// Counter deltas since `earlier`
    pub fn since(&self, earlier: &SubstrateStatsSnapshot) -> SubstrateStatsSnapshot {
        SubstrateStatsSnapshot {
            gets: self.gets - earlier.gets,
            sets: self.sets - earlier.sets,
            removes: self.removes - earlier.removes,
        }
    }
}
