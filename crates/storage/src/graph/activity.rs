//! External activity and ingestion progress

use super::GraphOps;
use crate::codec::{Record, RecordKey, RecordValue};
use cairn_core::{
    Ack, ActivityReport, IngestionProgress, OriginId, PipelineId, Result, TotalUserActivity,
};
use tracing::debug;

impl GraphOps {
    /// Merge one activity report into the origin's accumulated activity
    pub async fn add_activity(&self, origin: OriginId, report: ActivityReport) -> Result<Ack> {
        let mut activity = self.get_activity(origin).await?;

        match report {
            ActivityReport::Visits {
                visits,
                reported_by,
            } => {
                debug!(origin = %origin, visits = visits.len(), "Recording visits");
                activity
                    .visits
                    .extend(visits.into_iter().map(|mut visit| {
                        if reported_by.is_some() {
                            visit.reported_by = reported_by.clone();
                        }
                        visit
                    }));
            }
            ActivityReport::Attention(attention) => {
                debug!(origin = %origin, seconds = attention.seconds, "Recording attention");
                activity.seconds_of_attention += attention.seconds;
                activity.attentions.push(attention);
            }
        }

        self.store
            .set(vec![Record::new(
                RecordKey::OriginActivity(origin),
                RecordValue::OriginActivity(activity),
            )?])
            .await?;
        Ok(Ack)
    }

    /// Accumulated activity of an origin, empty if nothing was recorded
    pub async fn get_activity(&self, origin: OriginId) -> Result<TotalUserActivity> {
        match self.store.get(&RecordKey::OriginActivity(origin)).await? {
            Some(value) => value.into_activity(),
            None => Ok(TotalUserActivity::default()),
        }
    }

    /// How far a pipeline has ingested; the epoch if it never advanced
    pub async fn get_ingestion(&self, pipeline: &PipelineId) -> Result<IngestionProgress> {
        match self
            .store
            .get(&RecordKey::PipelineProgress(pipeline.clone()))
            .await?
        {
            Some(value) => value.into_progress(),
            None => Ok(IngestionProgress::default()),
        }
    }

    pub async fn advance_ingestion(
        &self,
        pipeline: &PipelineId,
        progress: IngestionProgress,
    ) -> Result<Ack> {
        self.store
            .set(vec![Record::new(
                RecordKey::PipelineProgress(pipeline.clone()),
                RecordValue::PipelineProgress(progress),
            )?])
            .await?;
        debug!(pipeline = %pipeline, until = %progress.ingested_until, "Ingestion advanced");
        Ok(Ack)
    }
}
