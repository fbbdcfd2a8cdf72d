//! Record store facade
//!
//! The only component that talks to the [`KvSubstrate`]. It speaks typed
//! [`Record`]s, checks every contract (kind agreement, unique keys per batch,
//! list shape) before a substrate call is made, and offers `prepare_*`
//! helpers that compute a new list value without committing it so a caller
//! can gather every mutation of one logical action into a single [`set`].
//!
//! [`set`]: RecordStore::set

use crate::codec::{check_kind, Record, RecordKey, RecordKind, RecordValue};
use crate::substrate::KvSubstrate;
use cairn_core::{Error, Nid, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Which list elements a [`RecordStore::prepare_removal`] drops
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalCriteria {
    /// Drop ids contained in the set, for id lists
    Ids(HashSet<Nid>),
    /// Drop edges with either endpoint in the set, for edge lists
    EdgeEndpoints(HashSet<Nid>),
}

impl RemovalCriteria {
    fn applies_to(&self, kind: RecordKind) -> bool {
        match self {
            RemovalCriteria::Ids(_) => matches!(
                kind,
                RecordKind::AllNids | RecordKind::OriginToNid | RecordKind::PipelineToNid
            ),
            RemovalCriteria::EdgeEndpoints(_) => kind == RecordKind::NidToEdge,
        }
    }

    fn apply(&self, value: RecordValue) -> RecordValue {
        match (self, value) {
            (RemovalCriteria::Ids(ids), RecordValue::AllNids(mut list)) => {
                list.retain(|nid| !ids.contains(nid));
                RecordValue::AllNids(list)
            }
            (RemovalCriteria::Ids(ids), RecordValue::OriginNids(mut list)) => {
                list.retain(|nid| !ids.contains(nid));
                RecordValue::OriginNids(list)
            }
            (RemovalCriteria::Ids(ids), RecordValue::PipelineNids(mut list)) => {
                list.retain(|nid| !ids.contains(nid));
                RecordValue::PipelineNids(list)
            }
            (RemovalCriteria::EdgeEndpoints(ids), RecordValue::NodeEdges(mut edges)) => {
                edges.retain(|edge| !ids.contains(&edge.from) && !ids.contains(&edge.to));
                RecordValue::NodeEdges(edges)
            }
            // Shape is checked by `applies_to` before any read
            (_, value) => value,
        }
    }
}

#[derive(Clone)]
pub struct RecordStore {
    substrate: Arc<dyn KvSubstrate>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

impl RecordStore {
    pub fn new(substrate: Arc<dyn KvSubstrate>) -> Self {
        Self { substrate }
    }

    /// Write a batch in one substrate call.
    ///
    /// The whole batch is rejected before the call if any pair has mismatched
    /// kinds or if two pairs share a key.
    pub async fn set(&self, records: Vec<Record>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut seen = HashSet::with_capacity(records.len());
        let mut items = Vec::with_capacity(records.len());
        for record in &records {
            check_kind(&record.key, &record.value)?;
            let key = record.key.encode();
            if !seen.insert(key.clone()) {
                return Err(Error::duplicate_key(key));
            }
            items.push((key, record.value.to_json()?));
        }

        debug!(count = items.len(), "Committing record batch");
        self.substrate.set(items).await
    }

    /// Decoded value under one key, `None` if absent
    pub async fn get(&self, key: &RecordKey) -> Result<Option<RecordValue>> {
        let encoded = key.encode();
        let mut found = self.substrate.get(std::slice::from_ref(&encoded)).await?;
        match found.remove(&encoded) {
            Some(raw) => Ok(Some(RecordValue::from_json(key, raw)?)),
            None => Ok(None),
        }
    }

    /// Decoded records for many keys, in input order; absent keys are omitted
    pub async fn get_many(&self, keys: &[RecordKey]) -> Result<Vec<Record>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let encoded: Vec<String> = keys.iter().map(RecordKey::encode).collect();
        let found = self.substrate.get(&encoded).await?;
        trace!(requested = keys.len(), found = found.len(), "Fetched records");

        let mut records = Vec::with_capacity(found.len());
        for (key, encoded_key) in keys.iter().zip(&encoded) {
            if let Some(raw) = found.get(encoded_key) {
                let value = RecordValue::from_json(key, raw.clone())?;
                records.push(Record {
                    key: key.clone(),
                    value,
                });
            }
        }
        Ok(records)
    }

    /// Delete many keys in one substrate call
    pub async fn remove(&self, keys: &[RecordKey]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let encoded: Vec<String> = keys.iter().map(RecordKey::encode).collect();
        debug!(count = encoded.len(), "Removing records");
        self.substrate.remove(&encoded).await
    }

    /// Current list at `key` with the payload of `tail` appended, uncommitted
    pub async fn prepare_append(&self, key: RecordKey, tail: RecordValue) -> Result<Record> {
        check_kind(&key, &tail)?;
        let empty = RecordValue::empty_list(key.kind()).ok_or_else(|| {
            Error::not_a_list(key.encode(), format!("'{}' records are not lists", key.kind()))
        })?;

        let current = self.get(&key).await?.unwrap_or(empty);
        let value = current.concat(tail)?;
        Ok(Record { key, value })
    }

    /// Current list at `key` without the elements matching `criteria`, uncommitted
    pub async fn prepare_removal(
        &self,
        key: RecordKey,
        criteria: &RemovalCriteria,
    ) -> Result<Record> {
        if !criteria.applies_to(key.kind()) {
            return Err(Error::not_a_list(
                key.encode(),
                format!("removal criteria do not fit '{}' records", key.kind()),
            ));
        }
        let empty = RecordValue::empty_list(key.kind()).ok_or_else(|| {
            Error::not_a_list(key.encode(), format!("'{}' records are not lists", key.kind()))
        })?;

        let current = self.get(&key).await?.unwrap_or(empty);
        Ok(Record {
            value: criteria.apply(current),
            key,
        })
    }
}
