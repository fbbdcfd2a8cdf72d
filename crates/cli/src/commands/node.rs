use super::{parse_node_type, parse_origin, DEFAULT_ACCOUNT};
use crate::output::print_json;
use cairn_core::{
    AccountId, Nid, NodeBulkDeleteCriteria, NodeCreateArgs, NodeCreatedVia, NodeType,
    NodeUpdateArgs, OriginId, PipelineId, Result,
};
use cairn_storage::{LocalBackend, NodeIterate, StorageApi};
use clap::Subcommand;
use serde_json::json;

#[derive(Subcommand)]
pub enum NodeCommands {
    /// Create a node and print its id
    Create {
        /// Node text
        text: String,

        /// Node type (text, url, image, web-quote, web-page)
        #[arg(long = "type", value_parser = parse_node_type, default_value = "text")]
        ntype: NodeType,

        /// Link an existing node to the new one (repeatable)
        #[arg(long = "from")]
        from_nids: Vec<Nid>,

        /// Link the new node to an existing one (repeatable)
        #[arg(long = "to")]
        to_nids: Vec<Nid>,

        /// Origin id or URL the node came from
        #[arg(long, value_parser = parse_origin)]
        origin: Option<OriginId>,

        /// Mark the node as created by this ingestion pipeline
        #[arg(long)]
        pipeline: Option<String>,

        /// Owning account
        #[arg(long, default_value = DEFAULT_ACCOUNT)]
        account: String,
    },

    /// Print one node
    Get { nid: Nid },

    /// Print nodes, newest first
    List {
        /// Stop after this many nodes
        #[arg(long)]
        limit: Option<usize>,

        /// Print only the ids
        #[arg(long)]
        ids_only: bool,
    },

    /// Change a node's text
    Update {
        nid: Nid,

        /// New text
        #[arg(long)]
        text: Option<String>,

        /// Keep the current update timestamp
        #[arg(long)]
        preserve_update_time: bool,
    },

    /// Print every node created from an origin
    ByOrigin {
        /// Origin id or URL
        #[arg(value_parser = parse_origin)]
        origin: OriginId,
    },

    /// Delete every node an ingestion pipeline created
    DeletePipeline { pipeline: String },
}

impl NodeCommands {
    pub async fn execute(self, backend: &LocalBackend) -> Result<()> {
        match self {
            NodeCommands::Create {
                text,
                ntype,
                from_nids,
                to_nids,
                origin,
                pipeline,
                account,
            } => {
                let mut args = NodeCreateArgs::new(ntype, text)
                    .linked_from(from_nids)
                    .linked_to(to_nids);
                if let Some(origin) = origin {
                    args = args.with_origin(origin);
                }
                if let Some(pipeline) = pipeline {
                    args = args.with_pipeline(PipelineId::new(pipeline));
                }
                let response = backend.node_create(args, &AccountId::new(account)).await?;
                print_json(&response)
            }
            NodeCommands::Get { nid } => print_json(&backend.node_get(&nid).await?),
            NodeCommands::List { limit, ids_only } => {
                if ids_only {
                    let mut nids = backend.node_get_all_nids().await?;
                    if let Some(limit) = limit {
                        nids.truncate(limit);
                    }
                    return print_json(&nids);
                }

                let mut iter = backend.node_iterate().await?;
                let mut nodes = Vec::new();
                while let Some(node) = iter.next().await? {
                    nodes.push(node);
                    if limit.is_some_and(|limit| nodes.len() >= limit) {
                        iter.abort();
                        break;
                    }
                }
                print_json(&nodes)
            }
            NodeCommands::Update {
                nid,
                text,
                preserve_update_time,
            } => {
                let mut args = NodeUpdateArgs::new(nid.clone());
                if let Some(text) = text {
                    args = args.with_text(text);
                }
                if preserve_update_time {
                    args = args.preserving_update_time();
                }
                backend.node_update(args).await?;
                print_json(&backend.node_get(&nid).await?)
            }
            NodeCommands::ByOrigin { origin } => {
                print_json(&backend.node_get_by_origin(origin).await?)
            }
            NodeCommands::DeletePipeline { pipeline } => {
                let criteria = NodeBulkDeleteCriteria::CreatedVia(NodeCreatedVia::AutoIngestion(
                    PipelineId::new(pipeline.clone()),
                ));
                let removed = backend.node_bulk_delete(criteria).await?;
                print_json(&json!({ "pipeline": pipeline, "removed": removed }))
            }
        }
    }
}
