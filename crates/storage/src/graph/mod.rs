//! Node and edge domain logic on top of the record store
//!
//! Each mutating operation reads what it needs, prepares every derived
//! index update, and commits them with exactly one [`RecordStore::set`]
//! (bulk delete: one `remove` followed by one `set`). Two independent
//! operations touching the same list can still race and lose an update;
//! callers that need strict ordering per origin or pipeline must serialize
//! those calls themselves.

mod activity;
mod bulk_delete;
mod edge;
mod node;

use crate::iter::NodeIterator;
use crate::store::RecordStore;
use crate::substrate::KvSubstrate;
use cairn_core::NodeEventListeners;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GraphOps {
    store: RecordStore,
    listeners: Arc<NodeEventListeners>,
}

impl GraphOps {
    pub fn new(substrate: Arc<dyn KvSubstrate>) -> Self {
        Self::with_store(RecordStore::new(substrate))
    }

    pub fn with_store(store: RecordStore) -> Self {
        Self {
            store,
            listeners: Arc::new(NodeEventListeners::new()),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Registry notified after node creates and updates are committed
    pub fn listeners(&self) -> &Arc<NodeEventListeners> {
        &self.listeners
    }

    /// Lazy cursor over every node, newest first
    pub fn iterate(&self) -> NodeIterator {
        NodeIterator::new(self.store.clone())
    }
}
