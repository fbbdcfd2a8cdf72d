//! Typed record codec
//!
//! Every persisted pair belongs to one closed [`RecordKind`]. Keys are a sum
//! type ([`RecordKey`]) with a single exhaustive string encoding, values are a
//! sum type ([`RecordValue`]) stored as `{"kind": <tag>, "value": <payload>}`.
//!
//! | Kind | Storage key | Payload |
//! |------|-------------|---------|
//! | all-nids | `all-nids` | `Vec<Nid>`, oldest first |
//! | nid->node | `nid->node:<nid>` | [`NodeRecord`] |
//! | origin->nid | `origin->nid:<origin id>` | `Vec<Nid>` |
//! | nid->edge | `nid->edge:<nid>` | `Vec<Edge>` touching the node |
//! | origin->activity | `origin->activity:<origin id>` | [`TotalUserActivity`] |
//! | pipeline->progress | `pipeline->progress:<pipeline id>` | [`IngestionProgress`] |
//! | pipeline->nid | `pipeline->nid:<pipeline id>` | `Vec<Nid>` |
//!
//! The layout carries no version marker.

use cairn_core::{
    Edge, Error, IngestionProgress, Nid, Node, OriginId, PipelineId, Result, TotalUserActivity,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const KEY_SEPARATOR: char = ':';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "all-nids")]
    AllNids,
    #[serde(rename = "nid->node")]
    NidToNode,
    #[serde(rename = "origin->nid")]
    OriginToNid,
    #[serde(rename = "nid->edge")]
    NidToEdge,
    #[serde(rename = "origin->activity")]
    OriginToActivity,
    #[serde(rename = "pipeline->progress")]
    PipelineToProgress,
    #[serde(rename = "pipeline->nid")]
    PipelineToNid,
}

impl RecordKind {
    const ALL: [RecordKind; 7] = [
        RecordKind::AllNids,
        RecordKind::NidToNode,
        RecordKind::OriginToNid,
        RecordKind::NidToEdge,
        RecordKind::OriginToActivity,
        RecordKind::PipelineToProgress,
        RecordKind::PipelineToNid,
    ];

    pub const fn tag(self) -> &'static str {
        match self {
            RecordKind::AllNids => "all-nids",
            RecordKind::NidToNode => "nid->node",
            RecordKind::OriginToNid => "origin->nid",
            RecordKind::NidToEdge => "nid->edge",
            RecordKind::OriginToActivity => "origin->activity",
            RecordKind::PipelineToProgress => "pipeline->progress",
            RecordKind::PipelineToNid => "pipeline->nid",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Whether values of this kind are lists that can be appended to
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            RecordKind::AllNids
                | RecordKind::OriginToNid
                | RecordKind::NidToEdge
                | RecordKind::PipelineToNid
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Logical key of one record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    AllNids,
    Node(Nid),
    OriginNids(OriginId),
    NodeEdges(Nid),
    OriginActivity(OriginId),
    PipelineProgress(PipelineId),
    PipelineNids(PipelineId),
}

impl RecordKey {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordKey::AllNids => RecordKind::AllNids,
            RecordKey::Node(_) => RecordKind::NidToNode,
            RecordKey::OriginNids(_) => RecordKind::OriginToNid,
            RecordKey::NodeEdges(_) => RecordKind::NidToEdge,
            RecordKey::OriginActivity(_) => RecordKind::OriginToActivity,
            RecordKey::PipelineProgress(_) => RecordKind::PipelineToProgress,
            RecordKey::PipelineNids(_) => RecordKind::PipelineToNid,
        }
    }

    /// Storage key string; stable across restarts
    pub fn encode(&self) -> String {
        let kind = self.kind().tag();
        match self {
            RecordKey::AllNids => kind.to_string(),
            RecordKey::Node(nid) | RecordKey::NodeEdges(nid) => {
                format!("{kind}{KEY_SEPARATOR}{nid}")
            }
            RecordKey::OriginNids(origin) | RecordKey::OriginActivity(origin) => {
                format!("{kind}{KEY_SEPARATOR}{}", origin.id)
            }
            RecordKey::PipelineProgress(pipeline) | RecordKey::PipelineNids(pipeline) => {
                format!("{kind}{KEY_SEPARATOR}{}", pipeline.id)
            }
        }
    }

    /// Inverse of [`RecordKey::encode`]
    pub fn decode(raw: &str) -> Result<Self> {
        let (tag, inner) = match raw.split_once(KEY_SEPARATOR) {
            Some((tag, inner)) => (tag, Some(inner)),
            None => (raw, None),
        };
        let kind = RecordKind::from_tag(tag)
            .ok_or_else(|| Error::invalid_argument("key", format!("unknown record kind in '{raw}'")))?;

        let missing = || Error::invalid_argument("key", format!("'{raw}' has no logical key"));
        let origin = |inner: &str| {
            inner
                .parse::<u64>()
                .map(OriginId::new)
                .map_err(|e| Error::invalid_argument("key", format!("bad origin in '{raw}': {e}")))
        };

        match (kind, inner) {
            (RecordKind::AllNids, None) => Ok(RecordKey::AllNids),
            (RecordKind::AllNids, Some(_)) => Err(Error::invalid_argument(
                "key",
                format!("'{raw}' is a singleton kind and takes no logical key"),
            )),
            (_, None) => Err(missing()),
            (RecordKind::NidToNode, Some(inner)) => Ok(RecordKey::Node(Nid::new(inner)?)),
            (RecordKind::NidToEdge, Some(inner)) => Ok(RecordKey::NodeEdges(Nid::new(inner)?)),
            (RecordKind::OriginToNid, Some(inner)) => Ok(RecordKey::OriginNids(origin(inner)?)),
            (RecordKind::OriginToActivity, Some(inner)) => {
                Ok(RecordKey::OriginActivity(origin(inner)?))
            }
            (RecordKind::PipelineToProgress, Some(inner)) => {
                Ok(RecordKey::PipelineProgress(PipelineId::new(inner)))
            }
            (RecordKind::PipelineToNid, Some(inner)) => {
                Ok(RecordKey::PipelineNids(PipelineId::new(inner)))
            }
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// A node together with the origin it was created from.
///
/// The origin rides next to the node rather than inside it so it never shows
/// up in node equality or in what callers receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<OriginId>,
}

/// Payload of one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum RecordValue {
    #[serde(rename = "all-nids")]
    AllNids(Vec<Nid>),
    #[serde(rename = "nid->node")]
    Node(NodeRecord),
    #[serde(rename = "origin->nid")]
    OriginNids(Vec<Nid>),
    #[serde(rename = "nid->edge")]
    NodeEdges(Vec<Edge>),
    #[serde(rename = "origin->activity")]
    OriginActivity(TotalUserActivity),
    #[serde(rename = "pipeline->progress")]
    PipelineProgress(IngestionProgress),
    #[serde(rename = "pipeline->nid")]
    PipelineNids(Vec<Nid>),
}

impl RecordValue {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordValue::AllNids(_) => RecordKind::AllNids,
            RecordValue::Node(_) => RecordKind::NidToNode,
            RecordValue::OriginNids(_) => RecordKind::OriginToNid,
            RecordValue::NodeEdges(_) => RecordKind::NidToEdge,
            RecordValue::OriginActivity(_) => RecordKind::OriginToActivity,
            RecordValue::PipelineProgress(_) => RecordKind::PipelineToProgress,
            RecordValue::PipelineNids(_) => RecordKind::PipelineToNid,
        }
    }

    /// Empty list value of a list-shaped kind
    pub fn empty_list(kind: RecordKind) -> Option<Self> {
        match kind {
            RecordKind::AllNids => Some(RecordValue::AllNids(Vec::new())),
            RecordKind::OriginToNid => Some(RecordValue::OriginNids(Vec::new())),
            RecordKind::NidToEdge => Some(RecordValue::NodeEdges(Vec::new())),
            RecordKind::PipelineToNid => Some(RecordValue::PipelineNids(Vec::new())),
            RecordKind::NidToNode
            | RecordKind::OriginToActivity
            | RecordKind::PipelineToProgress => None,
        }
    }

    /// Number of elements of a list value
    pub fn list_len(&self) -> Option<usize> {
        match self {
            RecordValue::AllNids(ids)
            | RecordValue::OriginNids(ids)
            | RecordValue::PipelineNids(ids) => Some(ids.len()),
            RecordValue::NodeEdges(edges) => Some(edges.len()),
            _ => None,
        }
    }

    /// Concatenate the payload of `tail` onto this list value
    pub fn concat(self, tail: RecordValue) -> Result<Self> {
        match (self, tail) {
            (RecordValue::AllNids(mut a), RecordValue::AllNids(b)) => {
                a.extend(b);
                Ok(RecordValue::AllNids(a))
            }
            (RecordValue::OriginNids(mut a), RecordValue::OriginNids(b)) => {
                a.extend(b);
                Ok(RecordValue::OriginNids(a))
            }
            (RecordValue::PipelineNids(mut a), RecordValue::PipelineNids(b)) => {
                a.extend(b);
                Ok(RecordValue::PipelineNids(a))
            }
            (RecordValue::NodeEdges(mut a), RecordValue::NodeEdges(b)) => {
                a.extend(b);
                Ok(RecordValue::NodeEdges(a))
            }
            (head, tail) => Err(Error::not_a_list(
                head.kind().tag(),
                format!("cannot append '{}' to '{}'", tail.kind(), head.kind()),
            )),
        }
    }

    pub fn into_nid_list(self) -> Result<Vec<Nid>> {
        match self {
            RecordValue::AllNids(ids)
            | RecordValue::OriginNids(ids)
            | RecordValue::PipelineNids(ids) => Ok(ids),
            other => Err(unexpected(other.kind(), "an id list")),
        }
    }

    pub fn into_edges(self) -> Result<Vec<Edge>> {
        match self {
            RecordValue::NodeEdges(edges) => Ok(edges),
            other => Err(unexpected(other.kind(), RecordKind::NidToEdge.tag())),
        }
    }

    pub fn into_node_record(self) -> Result<NodeRecord> {
        match self {
            RecordValue::Node(record) => Ok(record),
            other => Err(unexpected(other.kind(), RecordKind::NidToNode.tag())),
        }
    }

    pub fn into_activity(self) -> Result<TotalUserActivity> {
        match self {
            RecordValue::OriginActivity(activity) => Ok(activity),
            other => Err(unexpected(other.kind(), RecordKind::OriginToActivity.tag())),
        }
    }

    pub fn into_progress(self) -> Result<IngestionProgress> {
        match self {
            RecordValue::PipelineProgress(progress) => Ok(progress),
            other => Err(unexpected(other.kind(), RecordKind::PipelineToProgress.tag())),
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode a stored value, refusing one whose tag differs from `key`'s kind
    pub fn from_json(key: &RecordKey, raw: Value) -> Result<Self> {
        let stored_tag = raw
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or("<untagged>")
            .to_string();
        if stored_tag != key.kind().tag() {
            return Err(Error::kind_mismatch(key.encode(), key.kind().tag(), stored_tag));
        }
        Ok(serde_json::from_value(raw)?)
    }
}

fn unexpected(actual: RecordKind, expected: &str) -> Error {
    Error::kind_mismatch("<decoded value>", expected, actual.tag())
}

/// Reject a pair whose key and value declare different kinds
pub fn check_kind(key: &RecordKey, value: &RecordValue) -> Result<()> {
    if key.kind() == value.kind() {
        Ok(())
    } else {
        Err(Error::kind_mismatch(
            key.encode(),
            key.kind().tag(),
            value.kind().tag(),
        ))
    }
}

/// A kind-checked key/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: RecordKey,
    pub value: RecordValue,
}

impl Record {
    pub fn new(key: RecordKey, value: RecordValue) -> Result<Self> {
        check_kind(&key, &value)?;
        Ok(Self { key, value })
    }
}
