//! Cascading delete of everything an ingestion pipeline created

use super::GraphOps;
use crate::codec::RecordKey;
use crate::store::RemovalCriteria;
use cairn_core::{
    Error, Nid, NodeBulkDeleteCriteria, NodeCreatedVia, OriginId, PipelineId, Result,
};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{info, instrument};

impl GraphOps {
    /// Remove every node the pipeline named by `criteria` created.
    ///
    /// Besides the victims' own records this repairs the edge lists of
    /// surviving neighbours, the `all-nids` registry, origin indexes, and
    /// drops the pipeline's progress and node list. Returns the number of
    /// nodes removed.
    #[instrument(skip_all, fields(criteria = %criteria))]
    pub async fn bulk_delete(&self, criteria: NodeBulkDeleteCriteria) -> Result<usize> {
        let pipeline = match criteria {
            NodeBulkDeleteCriteria::CreatedVia(NodeCreatedVia::AutoIngestion(pipeline)) => {
                pipeline
            }
            other => return Err(Error::unsupported_delete_criteria(other.to_string())),
        };

        let victims = self.pipeline_nids(&pipeline).await?;
        if victims.is_empty() {
            return Ok(0);
        }
        let victim_set: HashSet<Nid> = victims.iter().cloned().collect();

        let node_keys: Vec<RecordKey> = victims.iter().cloned().map(RecordKey::Node).collect();
        let edge_keys: Vec<RecordKey> =
            victims.iter().cloned().map(RecordKey::NodeEdges).collect();

        // Everything below is read before anything is deleted
        let node_records = self.store.get_many(&node_keys).await?;
        let edge_records = self.store.get_many(&edge_keys).await?;

        let mut neighbours = BTreeSet::new();
        for record in edge_records {
            let RecordKey::NodeEdges(owner) = record.key else {
                continue;
            };
            for edge in record.value.into_edges()? {
                let other = edge.other_end(&owner);
                if !victim_set.contains(other) {
                    neighbours.insert(other.clone());
                }
            }
        }

        let mut by_origin: BTreeMap<OriginId, HashSet<Nid>> = BTreeMap::new();
        for record in node_records {
            let node_record = record.value.into_node_record()?;
            if let Some(origin) = node_record.origin {
                by_origin
                    .entry(origin)
                    .or_default()
                    .insert(node_record.node.nid);
            }
        }

        let mut rewrites = Vec::with_capacity(neighbours.len() + by_origin.len() + 1);
        let endpoints = RemovalCriteria::EdgeEndpoints(victim_set.clone());
        for neighbour in neighbours {
            rewrites.push(
                self.store
                    .prepare_removal(RecordKey::NodeEdges(neighbour), &endpoints)
                    .await?,
            );
        }
        rewrites.push(
            self.store
                .prepare_removal(RecordKey::AllNids, &RemovalCriteria::Ids(victim_set.clone()))
                .await?,
        );
        for (origin, nids) in by_origin {
            rewrites.push(
                self.store
                    .prepare_removal(RecordKey::OriginNids(origin), &RemovalCriteria::Ids(nids))
                    .await?,
            );
        }

        let mut removals = Vec::with_capacity(2 + node_keys.len() + edge_keys.len());
        removals.push(RecordKey::PipelineProgress(pipeline.clone()));
        removals.push(RecordKey::PipelineNids(pipeline.clone()));
        removals.extend(node_keys);
        removals.extend(edge_keys);

        self.store.remove(&removals).await?;
        self.store.set(rewrites).await?;

        info!(pipeline = %pipeline, removed = victims.len(), "Pipeline nodes deleted");
        Ok(victims.len())
    }

    /// Distinct ids recorded for a pipeline, in creation order
    async fn pipeline_nids(&self, pipeline: &PipelineId) -> Result<Vec<Nid>> {
        let listed = match self
            .store
            .get(&RecordKey::PipelineNids(pipeline.clone()))
            .await?
        {
            Some(value) => value.into_nid_list()?,
            None => return Ok(Vec::new()),
        };
        let mut seen = HashSet::with_capacity(listed.len());
        Ok(listed
            .into_iter()
            .filter(|nid| seen.insert(nid.clone()))
            .collect())
    }
}
