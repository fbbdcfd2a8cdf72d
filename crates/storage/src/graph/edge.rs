//! Edge create and lookup
//!
//! Each edge is stored twice, once in the `nid->edge` list of each endpoint,
//! so "all edges of X" stays a single-key read.

use super::GraphOps;
use crate::codec::{RecordKey, RecordValue};
use cairn_core::{AccountId, Edge, EdgeCreateArgs, Error, Nid, NodeEdges, Result};
use chrono::Utc;
use tracing::debug;

impl GraphOps {
    /// Link `from` to `to`, writing the edge under both endpoints in one batch
    pub async fn create_edge(&self, args: EdgeCreateArgs, account: &AccountId) -> Result<Edge> {
        for (field, nid) in [("from", &args.from), ("to", &args.to)] {
            if !nid.is_well_formed() {
                return Err(Error::invalid_argument(
                    field,
                    format!("'{nid}' is not a well-formed node id"),
                ));
            }
        }

        let edge = Edge::new(args.from, args.to, account.clone(), Utc::now());

        let mut records = vec![
            self.store
                .prepare_append(
                    RecordKey::NodeEdges(edge.from.clone()),
                    RecordValue::NodeEdges(vec![edge.clone()]),
                )
                .await?,
        ];
        // A self-loop lives in one list only
        if edge.to != edge.from {
            records.push(
                self.store
                    .prepare_append(
                        RecordKey::NodeEdges(edge.to.clone()),
                        RecordValue::NodeEdges(vec![edge.clone()]),
                    )
                    .await?,
            );
        }

        self.store.set(records).await?;
        debug!(eid = %edge.eid, from = %edge.from, to = %edge.to, "Edge created");
        Ok(edge)
    }

    /// Edges of `nid`, split into incoming (`from_edges`) and outgoing (`to_edges`)
    pub async fn get_edges(&self, nid: &Nid) -> Result<NodeEdges> {
        let edges = match self.store.get(&RecordKey::NodeEdges(nid.clone())).await? {
            Some(value) => value.into_edges()?,
            None => return Ok(NodeEdges::default()),
        };

        let mut result = NodeEdges::default();
        for edge in edges {
            if &edge.from == nid {
                result.to_edges.push(edge);
            } else if &edge.to == nid {
                result.from_edges.push(edge);
            }
        }
        Ok(result)
    }

    /// Raw `nid->edge` list of a node, as stored
    pub async fn get_edge_list(&self, nid: &Nid) -> Result<Vec<Edge>> {
        match self.store.get(&RecordKey::NodeEdges(nid.clone())).await? {
            Some(value) => value.into_edges(),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::GraphOps;
    use crate::substrate::MemorySubstrate;
    use cairn_core::{AccountId, EdgeCreateArgs, Nid, NodeCreateArgs, NodeType};
    use std::sync::Arc;

    async fn two_nodes(ops: &GraphOps) -> (Nid, Nid) {
        let account = AccountId::new("u");
        let a = ops
            .create_node(NodeCreateArgs::new(NodeType::Text, "a"), &account)
            .await
            .unwrap();
        let b = ops
            .create_node(NodeCreateArgs::new(NodeType::Text, "b"), &account)
            .await
            .unwrap();
        (a, b)
    }

    #[tokio::test]
    async fn test_edge_is_visible_from_both_ends() {
        let substrate = Arc::new(MemorySubstrate::new());
        let ops = GraphOps::new(substrate.clone());
        let (a, b) = two_nodes(&ops).await;

        let before = substrate.stats();
        let edge = ops
            .create_edge(
                EdgeCreateArgs {
                    from: a.clone(),
                    to: b.clone(),
                },
                &AccountId::new("u"),
            )
            .await
            .unwrap();
        assert_eq!(substrate.stats().since(&before).sets, 1);

        let of_a = ops.get_edges(&a).await.unwrap();
        let of_b = ops.get_edges(&b).await.unwrap();
        assert_eq!(of_a.to_edges, vec![edge.clone()]);
        assert!(of_a.from_edges.is_empty());
        assert_eq!(of_b.from_edges, vec![edge.clone()]);
        assert!(of_b.to_edges.is_empty());

        let raw_a = ops.get_edge_list(&a).await.unwrap();
        let raw_b = ops.get_edge_list(&b).await.unwrap();
        assert_eq!(raw_a[0].eid, edge.eid);
        assert_eq!(raw_b[0].eid, edge.eid);
    }

    #[tokio::test]
    async fn test_self_loop_is_stored_once() {
        let ops = GraphOps::new(Arc::new(MemorySubstrate::new()));
        let (a, _) = two_nodes(&ops).await;

        ops.create_edge(
            EdgeCreateArgs {
                from: a.clone(),
                to: a.clone(),
            },
            &AccountId::new("u"),
        )
        .await
        .unwrap();

        assert_eq!(ops.get_edge_list(&a).await.unwrap().len(), 1);
        assert_eq!(ops.get_edges(&a).await.unwrap().to_edges.len(), 1);
    }

    #[tokio::test]
    async fn test_node_without_edges() {
        let ops = GraphOps::new(Arc::new(MemorySubstrate::new()));
        let edges = ops.get_edges(&Nid::new("lonely").unwrap()).await.unwrap();
        assert!(edges.from_edges.is_empty());
        assert!(edges.to_edges.is_empty());
    }

    #[tokio::test]
    async fn test_links_created_with_node() {
        let ops = GraphOps::new(Arc::new(MemorySubstrate::new()));
        let (a, b) = two_nodes(&ops).await;

        let c = ops
            .create_node(
                NodeCreateArgs::new(NodeType::Text, "c")
                    .linked_from([a.clone()])
                    .linked_to([b.clone()]),
                &AccountId::new("u"),
            )
            .await
            .unwrap();

        let of_c = ops.get_edges(&c).await.unwrap();
        assert_eq!(of_c.from_edges.len(), 1);
        assert_eq!(of_c.from_edges[0].from, a);
        assert_eq!(of_c.to_edges.len(), 1);
        assert_eq!(of_c.to_edges[0].to, b);

        assert_eq!(ops.get_edges(&a).await.unwrap().to_edges[0].to, c);
        assert_eq!(ops.get_edges(&b).await.unwrap().from_edges[0].from, c);

        // Edges created together share one timestamp
        assert_eq!(of_c.from_edges[0].created_at, of_c.to_edges[0].created_at);
    }
}
