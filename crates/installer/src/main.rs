//! Lantern APM collector schema installer.
//!
//! Creates the collector's Elasticsearch indices before ingestion starts, or
//! removes them with `--teardown`.

mod config;

use anyhow::Context;
use clap::Parser;
use collector_storage::define::SchemaCatalog;
use tracing::info;

use crate::config::InstallerConfig;

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level` when set.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "collector_installer={},collector_storage={}",
            level, level
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Loads the table definitions to act on.
fn load_catalog(config: &InstallerConfig) -> anyhow::Result<SchemaCatalog> {
    match &config.schema {
        Some(path) => {
            info!(schema = %path.display(), "Loading table definitions");
            SchemaCatalog::from_json_file(path)
                .with_context(|| format!("Failed to load schema file {}", path.display()))
        }
        None => {
            info!("Using built-in table definitions");
            Ok(SchemaCatalog::builtin())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = InstallerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let catalog = load_catalog(&config)?;

    info!(
        nodes = %config.nodes,
        shards = config.shards,
        replicas = config.replicas,
        tables = catalog.len(),
        teardown = config.teardown,
        "Starting collector schema installer"
    );

    run(&config, catalog).await
}

/// Connects to Elasticsearch and runs the install or teardown pass.
#[cfg(feature = "elasticsearch")]
async fn run(config: &InstallerConfig, catalog: SchemaCatalog) -> anyhow::Result<()> {
    use collector_storage::backends::elasticsearch::{
        ElasticsearchClient, ElasticsearchStorageInstaller,
    };
    use collector_storage::installer::StorageInstaller;

    let storage_config = config.to_storage_config();
    storage_config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid storage configuration: {}", e))?;

    let client = ElasticsearchClient::new(&storage_config)?;
    client
        .health_check()
        .await
        .with_context(|| format!("Elasticsearch at {} is not available", client.node()))?;

    let installer = ElasticsearchStorageInstaller::from_config(&storage_config)?;

    if config.teardown {
        let report = installer.uninstall(&client, catalog.into_tables()).await?;
        info!(
            deleted = report.deleted.len(),
            not_deleted = report.not_deleted.len(),
            "Teardown complete"
        );
        return Ok(());
    }

    let report = installer.install(&client, catalog.into_tables()).await?;
    if !report.is_complete() {
        anyhow::bail!(
            "Elasticsearch did not acknowledge creation of: {}",
            report.not_acknowledged.join(", ")
        );
    }

    info!(
        created = report.created.len(),
        already_present = report.already_present.len(),
        "Schema install complete"
    );
    Ok(())
}

/// Fallback when the elasticsearch feature is not enabled.
#[cfg(not(feature = "elasticsearch"))]
async fn run(_config: &InstallerConfig, _catalog: SchemaCatalog) -> anyhow::Result<()> {
    anyhow::bail!(
        "The installer requires the 'elasticsearch' feature. \
         Build with: cargo build -p collector-installer --features elasticsearch"
    )
}
