use cairn_core::{NodeType, OriginId, Result};
use cairn_storage::LocalBackend;
use clap::Subcommand;

pub mod activity;
pub mod edge;
pub mod ingestion;
pub mod node;

use self::activity::ActivityCommands;
use self::edge::EdgeCommands;
use self::ingestion::IngestionCommands;
use self::node::NodeCommands;

/// Account recorded as owner when none is given
pub const DEFAULT_ACCOUNT: &str = "local";

#[derive(Subcommand)]
pub enum Commands {
    /// Create, read and update nodes
    #[command(visible_alias = "n")]
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Link nodes and inspect their links
    #[command(visible_alias = "e")]
    Edge {
        #[command(subcommand)]
        command: EdgeCommands,
    },

    /// Track how far an ingestion pipeline has progressed
    Ingestion {
        #[command(subcommand)]
        command: IngestionCommands,
    },

    /// Record and inspect user activity per origin
    Activity {
        #[command(subcommand)]
        command: ActivityCommands,
    },
}

impl Commands {
    pub async fn execute(self, backend: &LocalBackend) -> Result<()> {
        match self {
            Commands::Node { command } => command.execute(backend).await,
            Commands::Edge { command } => command.execute(backend).await,
            Commands::Ingestion { command } => command.execute(backend).await,
            Commands::Activity { command } => command.execute(backend).await,
        }
    }
}

/// Accept either a numeric origin id or a location to derive one from
pub fn parse_origin(raw: &str) -> std::result::Result<OriginId, String> {
    match raw.parse::<u64>() {
        Ok(id) => Ok(OriginId::new(id)),
        Err(_) if raw.contains("://") => Ok(OriginId::from_url(raw)),
        Err(_) => Err(format!("'{raw}' is neither an origin id nor a URL")),
    }
}

pub fn parse_node_type(raw: &str) -> std::result::Result<NodeType, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown node type '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin() {
        assert_eq!(parse_origin("42").unwrap(), OriginId::new(42));
        assert_eq!(
            parse_origin("https://example.com/a").unwrap(),
            OriginId::from_url("https://example.com/a")
        );
        assert!(parse_origin("example").is_err());
    }

    #[test]
    fn test_parse_node_type() {
        assert_eq!(parse_node_type("web-quote").unwrap(), NodeType::WebQuote);
        assert_eq!(parse_node_type("text").unwrap(), NodeType::Text);
        assert!(parse_node_type("video").is_err());
    }
}
