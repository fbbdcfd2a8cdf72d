use cairn_config::{BackendKind, ConfigLoader, ConfigSource, StoreConfigOverrides};
use cairn_storage::LocalBackend;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod output;

use commands::Commands;

#[derive(Parser)]
#[command(name = "cairn")]
#[command(about = "Inspect and edit a local cairn graph store", long_about = None)]
#[command(version)]
struct Cli {
    /// Storage backend (memory or file); memory stores are discarded on exit
    #[arg(long, global = true)]
    backend: Option<BackendKind>,

    /// Directory holding the file backend's store document
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "cairn_storage=trace"
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> StoreConfigOverrides {
        StoreConfigOverrides {
            backend: self.backend,
            data_dir: self.data_dir.clone(),
            log_filter: self.log.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = cli
        .overrides()
        .apply(ConfigLoader::load()?, ConfigSource::CommandLine);

    if let Err(e) = cairn_utils::tracing::init(&config.log_filter) {
        eprintln!("Failed to initialize tracing: {e}");
    }
    tracing::debug!(?config, "Resolved store configuration");

    let backend = LocalBackend::open(&config).await?;
    cli.command.execute(&backend).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "cairn",
            "node",
            "get",
            "abc",
            "--backend",
            "memory",
            "--data-dir",
            "/tmp/cairn",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.backend, Some(BackendKind::Memory));
        assert_eq!(overrides.data_dir, Some(PathBuf::from("/tmp/cairn")));
        assert_eq!(overrides.log_filter, None);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["cairn", "--backend", "s3", "node", "list"]).is_err());
    }
}
