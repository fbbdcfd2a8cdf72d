//! Storage API contract and the local backend implementing it

use crate::graph::GraphOps;
use crate::iter::NodeIterator;
use crate::substrate::{FileSubstrate, KvSubstrate, MemorySubstrate};
use async_trait::async_trait;
use cairn_config::{BackendKind, StoreConfig};
use cairn_core::{
    AccountId, Ack, ActivityReport, Edge, EdgeCreateArgs, Error, IngestionProgress,
    NewNodeResponse, Nid, Node, NodeBulkDeleteCriteria, NodeCreateArgs, NodeEdges,
    NodeEventListeners, NodeIndexText, NodeUpdateArgs, OriginAssociation, OriginId, PipelineId,
    Result, TotalUserActivity,
};
use cairn_utils::tracing::operation_span;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn, Instrument};

/// Cursor handed out by [`StorageApi::node_iterate`]
#[async_trait]
pub trait NodeIterate: Send {
    async fn next(&mut self) -> Result<Option<Node>>;
    /// Nodes yielded so far
    fn total(&self) -> usize;
    fn abort(&mut self);
}

#[async_trait]
impl NodeIterate for NodeIterator {
    async fn next(&mut self) -> Result<Option<Node>> {
        NodeIterator::next(self).await
    }

    fn total(&self) -> usize {
        NodeIterator::total(self)
    }

    fn abort(&mut self) {
        NodeIterator::abort(self)
    }
}

/// File payload for blob uploads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobFile {
    pub name: String,
    pub mime: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// One blob to build index text for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobIndexInput {
    pub nid: Nid,
    pub mime: String,
}

/// Everything a storage backend exposes to the rest of the application
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn node_create(&self, args: NodeCreateArgs, account: &AccountId)
        -> Result<NewNodeResponse>;
    async fn node_get(&self, nid: &Nid) -> Result<Node>;
    async fn node_get_by_origin(&self, origin: OriginId) -> Result<Vec<Node>>;
    async fn node_get_all_nids(&self) -> Result<Vec<Nid>>;
    async fn node_update(&self, args: NodeUpdateArgs) -> Result<Ack>;
    async fn node_bulk_delete(&self, criteria: NodeBulkDeleteCriteria) -> Result<usize>;
    async fn node_iterate(&self) -> Result<Box<dyn NodeIterate>>;
    async fn node_batch_get(&self, nids: &[Nid]) -> Result<Vec<Node>>;
    async fn node_delete(&self, nid: &Nid) -> Result<Ack>;
    async fn node_url(&self, nid: &Nid) -> Result<String>;

    async fn edge_create(&self, args: EdgeCreateArgs, account: &AccountId) -> Result<Edge>;
    async fn edge_get(&self, nid: &Nid) -> Result<NodeEdges>;

    async fn activity_external_add(&self, origin: OriginId, report: ActivityReport)
        -> Result<Ack>;
    async fn activity_external_get(&self, origin: OriginId) -> Result<TotalUserActivity>;
    async fn activity_association_record(&self, association: OriginAssociation) -> Result<Ack>;
    async fn activity_association_get(&self, origin: OriginId)
        -> Result<Vec<OriginAssociation>>;

    async fn external_ingestion_get(&self, pipeline: &PipelineId) -> Result<IngestionProgress>;
    async fn external_ingestion_advance(
        &self,
        pipeline: &PipelineId,
        progress: IngestionProgress,
    ) -> Result<Ack>;

    async fn blob_upload(&self, file: BlobFile, account: &AccountId) -> Result<NewNodeResponse>;
    async fn blob_source_url(&self, nid: &Nid) -> Result<String>;
    async fn blob_index_build(&self, inputs: Vec<BlobIndexInput>) -> Result<Vec<NodeIndexText>>;
}

/// [`StorageApi`] over a local key-value substrate
#[derive(Debug, Clone)]
pub struct LocalBackend {
    ops: GraphOps,
}

impl LocalBackend {
    pub fn new(substrate: Arc<dyn KvSubstrate>) -> Self {
        Self {
            ops: GraphOps::new(substrate),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySubstrate::new()))
    }

    /// Backend over the substrate named in `config`
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let substrate: Arc<dyn KvSubstrate> = match config.backend {
            BackendKind::Memory => Arc::new(MemorySubstrate::new()),
            BackendKind::File => Arc::new(FileSubstrate::open(config.store_file()).await?),
        };
        info!(backend = %config.backend, source = ?config.source, "Storage backend opened");
        Ok(Self::new(substrate))
    }

    pub fn listeners(&self) -> &Arc<NodeEventListeners> {
        self.ops.listeners()
    }

    pub fn ops(&self) -> &GraphOps {
        &self.ops
    }
}

fn unsupported<T>(endpoint: &str, message: impl Into<String>) -> Result<T> {
    let err = Error::unsupported(endpoint, message);
    warn!(endpoint, "{err}");
    Err(err)
}

#[async_trait]
impl StorageApi for LocalBackend {
    async fn node_create(
        &self,
        args: NodeCreateArgs,
        account: &AccountId,
    ) -> Result<NewNodeResponse> {
        let nid = self
            .ops
            .create_node(args, account)
            .instrument(operation_span("node_create"))
            .await?;
        Ok(NewNodeResponse { nid })
    }

    async fn node_get(&self, nid: &Nid) -> Result<Node> {
        self.ops.get_node(nid).await
    }

    async fn node_get_by_origin(&self, origin: OriginId) -> Result<Vec<Node>> {
        self.ops.get_nodes_by_origin(origin).await
    }

    async fn node_get_all_nids(&self) -> Result<Vec<Nid>> {
        self.ops.get_all_nids().await
    }

    async fn node_update(&self, args: NodeUpdateArgs) -> Result<Ack> {
        self.ops
            .update_node(args)
            .instrument(operation_span("node_update"))
            .await
    }

    async fn node_bulk_delete(&self, criteria: NodeBulkDeleteCriteria) -> Result<usize> {
        self.ops
            .bulk_delete(criteria)
            .instrument(operation_span("node_bulk_delete"))
            .await
    }

    async fn node_iterate(&self) -> Result<Box<dyn NodeIterate>> {
        Ok(Box::new(self.ops.iterate()))
    }

    async fn node_batch_get(&self, nids: &[Nid]) -> Result<Vec<Node>> {
        self.ops.get_nodes(nids).await
    }

    async fn node_delete(&self, nid: &Nid) -> Result<Ack> {
        unsupported(
            "node_delete",
            format!("deleting single node '{nid}' is not supported by the local backend"),
        )
    }

    async fn node_url(&self, nid: &Nid) -> Result<String> {
        unsupported(
            "node_url",
            format!("the local backend has no web address for node '{nid}'"),
        )
    }

    async fn edge_create(&self, args: EdgeCreateArgs, account: &AccountId) -> Result<Edge> {
        self.ops
            .create_edge(args, account)
            .instrument(operation_span("edge_create"))
            .await
    }

    async fn edge_get(&self, nid: &Nid) -> Result<NodeEdges> {
        self.ops.get_edges(nid).await
    }

    async fn activity_external_add(
        &self,
        origin: OriginId,
        report: ActivityReport,
    ) -> Result<Ack> {
        self.ops
            .add_activity(origin, report)
            .instrument(operation_span("activity_external_add"))
            .await
    }

    async fn activity_external_get(&self, origin: OriginId) -> Result<TotalUserActivity> {
        self.ops.get_activity(origin).await
    }

    async fn activity_association_record(&self, _association: OriginAssociation) -> Result<Ack> {
        Ok(Ack)
    }

    async fn activity_association_get(
        &self,
        _origin: OriginId,
    ) -> Result<Vec<OriginAssociation>> {
        Ok(Vec::new())
    }

    async fn external_ingestion_get(&self, pipeline: &PipelineId) -> Result<IngestionProgress> {
        self.ops.get_ingestion(pipeline).await
    }

    async fn external_ingestion_advance(
        &self,
        pipeline: &PipelineId,
        progress: IngestionProgress,
    ) -> Result<Ack> {
        self.ops.advance_ingestion(pipeline, progress).await
    }

    async fn blob_upload(&self, file: BlobFile, _account: &AccountId) -> Result<NewNodeResponse> {
        unsupported(
            "blob_upload",
            format!(
                "cannot store '{}' ({}, {} bytes): blobs are not supported by the local backend",
                file.name,
                file.mime,
                file.data.len()
            ),
        )
    }

    async fn blob_source_url(&self, nid: &Nid) -> Result<String> {
        unsupported(
            "blob_source_url",
            format!("node '{nid}' has no blob source in the local backend"),
        )
    }

    async fn blob_index_build(&self, inputs: Vec<BlobIndexInput>) -> Result<Vec<NodeIndexText>> {
        let message = if inputs.is_empty() {
            "index building is not supported by the local backend".to_string()
        } else {
            inputs
                .iter()
                .map(|input| format!("{} for '{}' is unsupported", input.mime, input.nid))
                .collect::<Vec<_>>()
                .join("; ")
        };
        unsupported("blob_index_build", message)
    }
}
