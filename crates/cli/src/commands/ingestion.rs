use crate::output::print_json;
use cairn_core::{IngestionProgress, PipelineId, Result};
use cairn_storage::{LocalBackend, StorageApi};
use chrono::{DateTime, Utc};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum IngestionCommands {
    /// Print how far a pipeline has ingested
    Get { pipeline: String },

    /// Move a pipeline's progress marker
    Advance {
        pipeline: String,

        /// RFC 3339 timestamp, defaults to now
        #[arg(long)]
        until: Option<DateTime<Utc>>,
    },
}

impl IngestionCommands {
    pub async fn execute(self, backend: &LocalBackend) -> Result<()> {
        match self {
            IngestionCommands::Get { pipeline } => {
                let progress = backend
                    .external_ingestion_get(&PipelineId::new(pipeline))
                    .await?;
                print_json(&progress)
            }
            IngestionCommands::Advance { pipeline, until } => {
                let progress = IngestionProgress {
                    ingested_until: until.unwrap_or_else(Utc::now),
                };
                backend
                    .external_ingestion_advance(&PipelineId::new(pipeline), progress)
                    .await?;
                print_json(&progress)
            }
        }
    }
}
