//! Lazy cursor over every node in the store

use crate::codec::RecordKey;
use crate::store::RecordStore;
use cairn_core::{Error, Nid, Node, Result};
use tracing::{debug, trace};

#[derive(Debug)]
enum Cursor {
    /// Nothing read yet
    Pending,
    /// Snapshot of `all-nids`, newest first
    Resolved(Vec<Nid>),
    Aborted,
}

/// Walks nodes newest first.
///
/// The id list is read once, on the first call to [`next`](Self::next);
/// nodes created after that are not visited.
#[derive(Debug)]
pub struct NodeIterator {
    store: RecordStore,
    cursor: Cursor,
    position: usize,
}

impl NodeIterator {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            cursor: Cursor::Pending,
            position: 0,
        }
    }

    async fn resolve(&mut self) -> Result<&[Nid]> {
        if matches!(self.cursor, Cursor::Pending) {
            let mut nids = match self.store.get(&RecordKey::AllNids).await? {
                Some(value) => value.into_nid_list()?,
                None => Vec::new(),
            };
            nids.reverse();
            debug!(total = nids.len(), "Node iterator resolved");
            self.cursor = Cursor::Resolved(nids);
        }
        match &self.cursor {
            Cursor::Resolved(nids) => Ok(nids.as_slice()),
            _ => Ok(&[]),
        }
    }

    /// Next node, or `None` once exhausted or aborted
    pub async fn next(&mut self) -> Result<Option<Node>> {
        if matches!(self.cursor, Cursor::Aborted) {
            return Ok(None);
        }
        let position = self.position;
        let nid = match self.resolve().await?.get(position) {
            Some(nid) => nid.clone(),
            None => return Ok(None),
        };
        self.position += 1;

        trace!(nid = %nid, position, "Visiting node");
        match self.store.get(&RecordKey::Node(nid.clone())).await? {
            Some(value) => Ok(Some(value.into_node_record()?.node)),
            None => Err(Error::index_inconsistency(
                RecordKey::AllNids.encode(),
                nid.as_str(),
            )),
        }
    }

    /// Number of nodes yielded so far
    pub fn total(&self) -> usize {
        self.position
    }

    /// Stop iterating; later `next` calls return `None` without touching storage
    pub fn abort(&mut self) {
        self.cursor = Cursor::Aborted;
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::RecordKey;
    use crate::graph::GraphOps;
    use crate::substrate::{KvSubstrate, MemorySubstrate};
    use cairn_core::{AccountId, Error, NodeCreateArgs, NodeType};
    use std::sync::Arc;

    async fn populated(texts: &[&str]) -> (Arc<MemorySubstrate>, GraphOps) {
        let substrate = Arc::new(MemorySubstrate::new());
        let ops = GraphOps::new(substrate.clone());
        for text in texts {
            ops.create_node(NodeCreateArgs::new(NodeType::Text, *text), &AccountId::new("u"))
                .await
                .unwrap();
        }
        (substrate, ops)
    }

    #[tokio::test]
    async fn test_newest_first() {
        let (_, ops) = populated(&["first", "second", "third"]).await;
        let mut iter = ops.iterate();

        assert_eq!(iter.total(), 0);
        let mut seen = Vec::new();
        while let Some(node) = iter.next().await.unwrap() {
            seen.push(node.text);
        }
        assert_eq!(seen, vec!["third", "second", "first"]);
        assert_eq!(iter.total(), 3);
        assert!(iter.next().await.unwrap().is_none());
        assert_eq!(iter.total(), 3);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let (_, ops) = populated(&[]).await;
        let mut iter = ops.iterate();
        assert!(iter.next().await.unwrap().is_none());
        assert_eq!(iter.total(), 0);
    }

    #[tokio::test]
    async fn test_abort_stops_iteration() {
        let (substrate, ops) = populated(&["a", "b", "c"]).await;
        let mut iter = ops.iterate();

        assert!(iter.next().await.unwrap().is_some());
        assert_eq!(iter.total(), 1);

        let before = substrate.stats();
        iter.abort();
        assert_eq!(iter.total(), 0);
        assert!(iter.next().await.unwrap().is_none());
        assert!(iter.next().await.unwrap().is_none());
        assert_eq!(substrate.stats().since(&before).gets, 0);

        // Aborting one cursor leaves the others alone
        let mut fresh = ops.iterate();
        let mut count = 0;
        while fresh.next().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_snapshot_ignores_later_nodes() {
        let (_, ops) = populated(&["a"]).await;
        let mut iter = ops.iterate();
        assert_eq!(iter.next().await.unwrap().unwrap().text, "a");

        ops.create_node(NodeCreateArgs::new(NodeType::Text, "late"), &AccountId::new("u"))
            .await
            .unwrap();

        assert!(iter.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_node_record_is_reported() {
        let (substrate, ops) = populated(&["a"]).await;
        let nid = ops.get_all_nids().await.unwrap().remove(0);
        substrate
            .remove(&[RecordKey::Node(nid.clone()).encode()])
            .await
            .unwrap();

        let err = ops.iterate().next().await.unwrap_err();
        assert!(matches!(err, Error::IndexInconsistency { id, .. } if id == nid.as_str()));
    }
}
