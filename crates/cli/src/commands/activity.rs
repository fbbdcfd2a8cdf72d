use super::parse_origin;
use crate::output::print_json;
use cairn_core::{ActivityReport, OriginId, PipelineId, Result, UserAttention, UserVisit};
use cairn_storage::{LocalBackend, StorageApi};
use chrono::{DateTime, Utc};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ActivityCommands {
    /// Print accumulated activity of an origin
    Get {
        #[arg(value_parser = parse_origin)]
        origin: OriginId,
    },

    /// Record one visit of an origin
    AddVisit {
        #[arg(value_parser = parse_origin)]
        origin: OriginId,

        /// Visit time, defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,

        /// Pipeline that observed the visit
        #[arg(long)]
        reported_by: Option<String>,
    },

    /// Record seconds of attention spent on an origin
    AddAttention {
        #[arg(value_parser = parse_origin)]
        origin: OriginId,

        #[arg(long)]
        seconds: f64,
    },
}

impl ActivityCommands {
    pub async fn execute(self, backend: &LocalBackend) -> Result<()> {
        let origin = match self {
            ActivityCommands::Get { origin } => {
                return print_json(&backend.activity_external_get(origin).await?);
            }
            ActivityCommands::AddVisit {
                origin,
                at,
                reported_by,
            } => {
                let report = ActivityReport::Visits {
                    visits: vec![UserVisit::at(at.unwrap_or_else(Utc::now))],
                    reported_by: reported_by.map(PipelineId::new),
                };
                backend.activity_external_add(origin, report).await?;
                origin
            }
            ActivityCommands::AddAttention { origin, seconds } => {
                let report = ActivityReport::Attention(UserAttention {
                    seconds,
                    timestamp: Utc::now(),
                });
                backend.activity_external_add(origin, report).await?;
                origin
            }
        };
        print_json(&backend.activity_external_get(origin).await?)
    }
}
