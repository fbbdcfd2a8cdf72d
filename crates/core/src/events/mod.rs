//! Node change notifications
//!
//! Graph operations own a [`NodeEventListeners`] registry and fan out a
//! [`NodeEvent`] to every registered listener after a write has been
//! committed. Fan-out is synchronous: listeners run in registration order on
//! the caller's task, so they should hand heavy work off elsewhere.

use crate::types::{Nid, NodeExtattrs, NodeIndexText, NodeType};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Content change of a single node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeEvent {
    Created {
        nid: Nid,
        ntype: NodeType,
        text: String,
        index_text: Option<NodeIndexText>,
        extattrs: Option<NodeExtattrs>,
    },
    Updated {
        nid: Nid,
        text: Option<String>,
        index_text: Option<NodeIndexText>,
    },
}

impl NodeEvent {
    pub fn nid(&self) -> &Nid {
        match self {
            NodeEvent::Created { nid, .. } | NodeEvent::Updated { nid, .. } => nid,
        }
    }
}

/// Observer of node changes
pub trait NodeEventListener: Send + Sync {
    /// Listener name, used for removal and debugging
    fn name(&self) -> &str;

    /// Handle one committed change
    fn on_node_event(&self, event: &NodeEvent);
}

/// Registry of node event listeners
#[derive(Default)]
pub struct NodeEventListeners {
    listeners: RwLock<Vec<Arc<dyn NodeEventListener>>>,
}

impl NodeEventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener
    pub fn add_listener(&self, listener: Arc<dyn NodeEventListener>) {
        debug!(listener = listener.name(), "Node event listener added");
        self.listeners.write().push(listener);
    }

    /// Remove every listener registered under `name`
    pub fn remove_listener(&self, name: &str) -> bool {
        let mut listeners = self.listeners.write();
        let initial_len = listeners.len();
        listeners.retain(|l| l.name() != name);
        let removed = listeners.len() != initial_len;
        if removed {
            debug!(listener = name, "Node event listener removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Deliver `event` to every listener
    pub fn notify(&self, event: &NodeEvent) {
        // Snapshot so a listener may add or remove listeners while handling
        let listeners: Vec<_> = self.listeners.read().iter().cloned().collect();
        for listener in listeners {
            listener.on_node_event(event);
        }
    }
}

impl std::fmt::Debug for NodeEventListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .listeners
            .read()
            .iter()
            .map(|l| l.name().to_string())
            .collect();
        f.debug_struct("NodeEventListeners")
            .field("listeners", &names)
            .finish()
    }
}
