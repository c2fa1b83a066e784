//! Command line configuration for the schema installer.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `COLLECTOR_ES_NODES` | http://localhost:9200 | Comma-separated node URLs |
//! | `COLLECTOR_ES_SHARDS` | 1 | Primary shards per index |
//! | `COLLECTOR_ES_REPLICAS` | 1 | Replicas per index |
//! | `COLLECTOR_ES_REQUEST_TIMEOUT_MS` | 30000 | Request timeout (milliseconds) |
//! | `COLLECTOR_ES_USERNAME` | | Basic auth username |
//! | `COLLECTOR_ES_PASSWORD` | | Basic auth password |
//! | `COLLECTOR_ES_DISABLE_CERT_VALIDATION` | false | Skip TLS certificate checks |
//! | `COLLECTOR_SCHEMA` | | Table definitions file (JSON) |
//! | `COLLECTOR_ABORT_ON_MAPPING_ERROR` | false | Fail instead of creating unmapped indices |
//! | `COLLECTOR_TEARDOWN` | false | Delete the indices instead of creating them |
//! | `COLLECTOR_LOG_LEVEL` | info | Log level |

use std::path::PathBuf;

use clap::Parser;
use collector_storage::backends::elasticsearch::{
    ElasticsearchAuth, ElasticsearchConfig, MappingFailurePolicy,
};

/// Installer configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "collector-installer")]
#[command(about = "Creates the collector's storage indices")]
pub struct InstallerConfig {
    /// Elasticsearch node URLs, comma separated.
    #[arg(long, env = "COLLECTOR_ES_NODES", default_value = "http://localhost:9200")]
    pub nodes: String,

    /// Number of primary shards per index.
    #[arg(long, env = "COLLECTOR_ES_SHARDS", default_value = "1")]
    pub shards: u32,

    /// Number of replicas per index.
    #[arg(long, env = "COLLECTOR_ES_REPLICAS", default_value = "1")]
    pub replicas: u32,

    /// Request timeout in milliseconds.
    #[arg(long, env = "COLLECTOR_ES_REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Basic auth username.
    #[arg(long, env = "COLLECTOR_ES_USERNAME")]
    pub username: Option<String>,

    /// Basic auth password.
    #[arg(long, env = "COLLECTOR_ES_PASSWORD")]
    pub password: Option<String>,

    /// Skip TLS certificate validation (development only).
    #[arg(long, env = "COLLECTOR_ES_DISABLE_CERT_VALIDATION")]
    pub disable_certificate_validation: bool,

    /// Table definitions file. Uses the built-in catalog when absent.
    #[arg(long, env = "COLLECTOR_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Fail a table whose mapping cannot be built instead of creating it unmapped.
    #[arg(long, env = "COLLECTOR_ABORT_ON_MAPPING_ERROR")]
    pub abort_on_mapping_error: bool,

    /// Delete the indices instead of creating them.
    #[arg(long, env = "COLLECTOR_TEARDOWN")]
    pub teardown: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "COLLECTOR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            nodes: "http://localhost:9200".to_string(),
            shards: 1,
            replicas: 1,
            request_timeout_ms: 30000,
            username: None,
            password: None,
            disable_certificate_validation: false,
            schema: None,
            abort_on_mapping_error: false,
            teardown: false,
            log_level: "info".to_string(),
        }
    }
}

impl InstallerConfig {
    /// Node URLs with surrounding whitespace and empty entries removed.
    pub fn node_list(&self) -> Vec<String> {
        self.nodes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.node_list().is_empty() {
            errors.push("At least one Elasticsearch node is required".to_string());
        }

        if self.shards == 0 {
            errors.push("Shard count cannot be 0".to_string());
        }

        if self.replicas == 0 {
            errors.push("Replica count cannot be 0".to_string());
        }

        if self.request_timeout_ms == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.username.is_some() != self.password.is_some() {
            errors.push("Username and password must be given together".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builds the storage client and installer configuration.
    pub fn to_storage_config(&self) -> ElasticsearchConfig {
        let auth = match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(ElasticsearchAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        let mapping_failure_policy = if self.abort_on_mapping_error {
            MappingFailurePolicy::Abort
        } else {
            MappingFailurePolicy::Degrade
        };

        ElasticsearchConfig {
            nodes: self.node_list(),
            number_of_shards: self.shards,
            number_of_replicas: self.replicas,
            request_timeout_ms: self.request_timeout_ms,
            auth,
            disable_certificate_validation: self.disable_certificate_validation,
            mapping_failure_policy,
        }
    }
}
