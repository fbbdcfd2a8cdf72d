//! Edge records and edge operation shapes

use super::ids::{AccountId, Eid, Nid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directed link between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub eid: Eid,
    pub from: Nid,
    pub to: Nid,
    pub is_sticky: bool,
    pub owned_by: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Edge {
    /// A fresh, non-sticky edge stamped with `at`
    pub fn new(from: Nid, to: Nid, owned_by: AccountId, at: DateTime<Utc>) -> Self {
        Self {
            eid: Eid::generate(),
            from,
            to,
            is_sticky: false,
            owned_by,
            created_at: at,
            updated_at: at,
        }
    }

    /// Whether `nid` is either endpoint of this edge
    pub fn touches(&self, nid: &Nid) -> bool {
        &self.from == nid || &self.to == nid
    }

    /// The endpoint that is not `nid`, or `nid` itself for a self-loop
    pub fn other_end(&self, nid: &Nid) -> &Nid {
        if &self.from == nid {
            &self.to
        } else {
            &self.from
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCreateArgs {
    pub from: Nid,
    pub to: Nid,
}

/// Edges of one node split by direction.
///
/// `from_edges` holds links coming from other nodes into the queried node,
/// `to_edges` holds links going out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEdges {
    pub from_edges: Vec<Edge>,
    pub to_edges: Vec<Edge>,
}
