//! Node payloads and the argument shapes of node operations

use super::ids::{AccountId, Nid, OriginId, PipelineId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of content a node holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Text,
    Url,
    Image,
    WebQuote,
    WebPage,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Text => "text",
            NodeType::Url => "url",
            NodeType::Image => "image",
            NodeType::WebQuote => "web-quote",
            NodeType::WebPage => "web-page",
        };
        f.write_str(name)
    }
}

/// Text extracted from a node for search indexing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIndexText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brands: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dominant_colors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAttrs {
    pub url: String,
}

/// Extended attributes attached to bookmarks, quotes and images
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeExtattrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebAttrs>,
}

/// A stored content unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub nid: Nid,
    pub ntype: NodeType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_text: Option<NodeIndexText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extattrs: Option<NodeExtattrs>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owned_by: AccountId,
}

/// How a node came to exist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "via", content = "pipeline")]
pub enum NodeCreatedVia {
    #[default]
    Manual,
    AutoIngestion(PipelineId),
}

/// Arguments of `node.create`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCreateArgs {
    pub ntype: NodeType,
    pub text: String,
    #[serde(default)]
    pub index_text: Option<NodeIndexText>,
    #[serde(default)]
    pub extattrs: Option<NodeExtattrs>,
    /// Existing nodes that link to the new node
    #[serde(default)]
    pub from_nid: Vec<Nid>,
    /// Existing nodes the new node links to
    #[serde(default)]
    pub to_nid: Vec<Nid>,
    #[serde(default)]
    pub origin: Option<OriginId>,
    #[serde(default)]
    pub created_via: NodeCreatedVia,
    /// Backdated creation time, used when ingesting historical items
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NodeCreateArgs {
    pub fn new(ntype: NodeType, text: impl Into<String>) -> Self {
        Self {
            ntype,
            text: text.into(),
            index_text: None,
            extattrs: None,
            from_nid: Vec::new(),
            to_nid: Vec::new(),
            origin: None,
            created_via: NodeCreatedVia::default(),
            created_at: None,
        }
    }

    pub fn with_index_text(mut self, index_text: NodeIndexText) -> Self {
        self.index_text = Some(index_text);
        self
    }

    pub fn with_extattrs(mut self, extattrs: NodeExtattrs) -> Self {
        self.extattrs = Some(extattrs);
        self
    }

    pub fn with_origin(mut self, origin: OriginId) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_pipeline(mut self, pipeline: PipelineId) -> Self {
        self.created_via = NodeCreatedVia::AutoIngestion(pipeline);
        self
    }

    pub fn linked_from(mut self, nids: impl IntoIterator<Item = Nid>) -> Self {
        self.from_nid.extend(nids);
        self
    }

    pub fn linked_to(mut self, nids: impl IntoIterator<Item = Nid>) -> Self {
        self.to_nid.extend(nids);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNodeResponse {
    pub nid: Nid,
}

/// Arguments of `node.update`; only supplied fields are overwritten
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeUpdateArgs {
    pub nid: Nid,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub index_text: Option<NodeIndexText>,
    #[serde(default)]
    pub preserve_update_time: bool,
}

impl NodeUpdateArgs {
    pub fn new(nid: Nid) -> Self {
        Self {
            nid,
            text: None,
            index_text: None,
            preserve_update_time: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_index_text(mut self, index_text: NodeIndexText) -> Self {
        self.index_text = Some(index_text);
        self
    }

    pub fn preserving_update_time(mut self) -> Self {
        self.preserve_update_time = true;
        self
    }
}

/// Selects the nodes removed by `node.bulk_delete`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeBulkDeleteCriteria {
    CreatedVia(NodeCreatedVia),
}

impl fmt::Display for NodeBulkDeleteCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeBulkDeleteCriteria::CreatedVia(NodeCreatedVia::Manual) => {
                f.write_str("created via manual action")
            }
            NodeBulkDeleteCriteria::CreatedVia(NodeCreatedVia::AutoIngestion(pipeline)) => {
                write!(f, "created via pipeline '{pipeline}'")
            }
        }
    }
}

/// Acknowledgement returned by operations with no payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack;
