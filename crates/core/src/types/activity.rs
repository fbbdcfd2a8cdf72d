//! Passive-usage activity and external ingestion progress

use super::ids::{OriginId, PipelineId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserVisit {
    pub timestamp: DateTime<Utc>,
    /// Pipeline that reported the visit, when it did not come from live browsing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<PipelineId>,
}

impl UserVisit {
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            reported_by: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAttention {
    pub seconds: f64,
    pub timestamp: DateTime<Utc>,
}

/// Everything known about how a user interacted with one origin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalUserActivity {
    #[serde(default)]
    pub visits: Vec<UserVisit>,
    #[serde(default)]
    pub attentions: Vec<UserAttention>,
    #[serde(default)]
    pub seconds_of_attention: f64,
}

/// One report passed to `activity.external.add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityReport {
    Visits {
        visits: Vec<UserVisit>,
        #[serde(default)]
        reported_by: Option<PipelineId>,
    },
    Attention(UserAttention),
}

/// Resumable cursor of an external ingestion job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionProgress {
    pub ingested_until: DateTime<Utc>,
}

/// Association between two origins, reported by the association API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginAssociation {
    pub from: OriginId,
    pub to: OriginId,
    pub seconds_of_attention: f64,
}
