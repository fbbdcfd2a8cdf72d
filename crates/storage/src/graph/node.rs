//! Node create, read and update

use super::GraphOps;
use crate::codec::{NodeRecord, Record, RecordKey, RecordValue};
use cairn_core::{
    Ack, AccountId, Edge, Error, Nid, Node, NodeCreateArgs, NodeCreatedVia, NodeEvent,
    NodeUpdateArgs, OriginId, Result,
};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

impl GraphOps {
    /// Create a node, its index entries and any requested links in one write
    #[instrument(skip_all, fields(ntype = %args.ntype))]
    pub async fn create_node(&self, args: NodeCreateArgs, account: &AccountId) -> Result<Nid> {
        for (field, nids) in [("from_nid", &args.from_nid), ("to_nid", &args.to_nid)] {
            if let Some(bad) = nids.iter().find(|nid| !nid.is_well_formed()) {
                return Err(Error::invalid_argument(
                    field,
                    format!("'{bad}' is not a well-formed node id"),
                ));
            }
        }

        let nid = Nid::generate();
        let created_at = args.created_at.unwrap_or_else(Utc::now);
        let node = Node {
            nid: nid.clone(),
            ntype: args.ntype,
            text: args.text,
            index_text: args.index_text,
            extattrs: args.extattrs,
            created_at,
            updated_at: created_at,
            owned_by: account.clone(),
        };

        let mut records = vec![
            self.store
                .prepare_append(RecordKey::AllNids, RecordValue::AllNids(vec![nid.clone()]))
                .await?,
            Record::new(
                RecordKey::Node(nid.clone()),
                RecordValue::Node(NodeRecord {
                    node: node.clone(),
                    origin: args.origin,
                }),
            )?,
        ];

        if let Some(origin) = args.origin {
            records.push(
                self.store
                    .prepare_append(
                        RecordKey::OriginNids(origin),
                        RecordValue::OriginNids(vec![nid.clone()]),
                    )
                    .await?,
            );
        }

        if let NodeCreatedVia::AutoIngestion(pipeline) = &args.created_via {
            records.push(
                self.store
                    .prepare_append(
                        RecordKey::PipelineNids(pipeline.clone()),
                        RecordValue::PipelineNids(vec![nid.clone()]),
                    )
                    .await?,
            );
        }

        let link_time = Utc::now();
        let mut own_edges = Vec::with_capacity(args.from_nid.len() + args.to_nid.len());
        // One prepared append per neighbour, even when it is linked twice
        let mut neighbour_edges: BTreeMap<Nid, Vec<Edge>> = BTreeMap::new();
        for from in args.from_nid {
            let edge = Edge::new(from.clone(), nid.clone(), account.clone(), link_time);
            neighbour_edges.entry(from).or_default().push(edge.clone());
            own_edges.push(edge);
        }
        for to in args.to_nid {
            let edge = Edge::new(nid.clone(), to.clone(), account.clone(), link_time);
            neighbour_edges.entry(to).or_default().push(edge.clone());
            own_edges.push(edge);
        }

        let edge_count = own_edges.len();
        if !own_edges.is_empty() {
            records.push(Record::new(
                RecordKey::NodeEdges(nid.clone()),
                RecordValue::NodeEdges(own_edges),
            )?);
            for (other, edges) in neighbour_edges {
                records.push(
                    self.store
                        .prepare_append(RecordKey::NodeEdges(other), RecordValue::NodeEdges(edges))
                        .await?,
                );
            }
        }

        self.store.set(records).await?;
        info!(nid = %nid, edges = edge_count, "Node created");

        self.listeners.notify(&NodeEvent::Created {
            nid: nid.clone(),
            ntype: node.ntype,
            text: node.text,
            index_text: node.index_text,
            extattrs: node.extattrs,
        });
        Ok(nid)
    }

    /// Node by id; a missing node is an error
    pub async fn get_node(&self, nid: &Nid) -> Result<Node> {
        Ok(self.get_node_record(nid).await?.node)
    }

    pub(crate) async fn get_node_record(&self, nid: &Nid) -> Result<NodeRecord> {
        match self.store.get(&RecordKey::Node(nid.clone())).await? {
            Some(value) => value.into_node_record(),
            None => Err(Error::not_found("node", nid.as_str())),
        }
    }

    /// Nodes for the given ids, in input order; missing ids are skipped
    pub async fn get_nodes(&self, nids: &[Nid]) -> Result<Vec<Node>> {
        let keys: Vec<RecordKey> = nids.iter().cloned().map(RecordKey::Node).collect();
        self.store
            .get_many(&keys)
            .await?
            .into_iter()
            .map(|record| record.value.into_node_record().map(|r| r.node))
            .collect()
    }

    /// Every node created from `origin`
    pub async fn get_nodes_by_origin(&self, origin: OriginId) -> Result<Vec<Node>> {
        let nids = match self.store.get(&RecordKey::OriginNids(origin)).await? {
            Some(value) => value.into_nid_list()?,
            None => return Ok(Vec::new()),
        };
        self.get_nodes(&nids).await
    }

    /// Every node id, most recently created first
    pub async fn get_all_nids(&self) -> Result<Vec<Nid>> {
        let mut nids = match self.store.get(&RecordKey::AllNids).await? {
            Some(value) => value.into_nid_list()?,
            None => Vec::new(),
        };
        nids.reverse();
        Ok(nids)
    }

    /// Overwrite the supplied fields of an existing node
    #[instrument(skip_all, fields(nid = %args.nid))]
    pub async fn update_node(&self, args: NodeUpdateArgs) -> Result<Ack> {
        let NodeRecord { mut node, origin } = self.get_node_record(&args.nid).await?;

        if let Some(text) = &args.text {
            node.text = text.clone();
        }
        if let Some(index_text) = &args.index_text {
            node.index_text = Some(index_text.clone());
        }
        if !args.preserve_update_time {
            node.updated_at = Utc::now();
        }

        self.store
            .set(vec![Record::new(
                RecordKey::Node(args.nid.clone()),
                RecordValue::Node(NodeRecord { node, origin }),
            )?])
            .await?;
        debug!("Node updated");

        self.listeners.notify(&NodeEvent::Updated {
            nid: args.nid,
            text: args.text,
            index_text: args.index_text,
        });
        Ok(Ack)
    }
}
