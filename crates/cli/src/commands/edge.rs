use super::DEFAULT_ACCOUNT;
use crate::output::print_json;
use cairn_core::{AccountId, EdgeCreateArgs, Nid, Result};
use cairn_storage::{LocalBackend, StorageApi};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum EdgeCommands {
    /// Link `from` to `to`
    Create {
        from: Nid,
        to: Nid,

        /// Owning account
        #[arg(long, default_value = DEFAULT_ACCOUNT)]
        account: String,
    },

    /// Print incoming and outgoing edges of a node
    Get { nid: Nid },
}

impl EdgeCommands {
    pub async fn execute(self, backend: &LocalBackend) -> Result<()> {
        match self {
            EdgeCommands::Create { from, to, account } => {
                let edge = backend
                    .edge_create(EdgeCreateArgs { from, to }, &AccountId::new(account))
                    .await?;
                print_json(&edge)
            }
            EdgeCommands::Get { nid } => print_json(&backend.edge_get(&nid).await?),
        }
    }
}
