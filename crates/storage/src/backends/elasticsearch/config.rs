//! Elasticsearch installer and client configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// What to do when a table's field mapping cannot be built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingFailurePolicy {
    /// Create the index with settings only and no field mapping.
    #[default]
    Degrade,
    /// Fail the create operation without contacting the storage engine.
    Abort,
}

/// Configuration for the Elasticsearch schema installer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    pub nodes: Vec<String>,

    /// Number of primary shards per index (default: 1).
    #[serde(default = "default_shards")]
    pub number_of_shards: u32,

    /// Number of replica shards per index (default: 1).
    #[serde(default = "default_replicas")]
    pub number_of_replicas: u32,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,

    /// Behaviour when a field mapping cannot be built (default: degrade).
    #[serde(default)]
    pub mapping_failure_policy: MappingFailurePolicy,
}

fn default_shards() -> u32 {
    1
}

fn default_replicas() -> u32 {
    1
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            number_of_shards: default_shards(),
            number_of_replicas: default_replicas(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
            mapping_failure_policy: MappingFailurePolicy::default(),
        }
    }
}

impl ElasticsearchConfig {
    /// Checks the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_counts(self.number_of_shards, self.number_of_replicas)?;

        if self.nodes.is_empty() {
            return Err(ConfigError::NoNodes);
        }

        for node in &self.nodes {
            let rest = node
                .strip_prefix("http://")
                .or_else(|| node.strip_prefix("https://"));
            match rest {
                Some(host) if !host.is_empty() => {}
                _ => {
                    return Err(ConfigError::InvalidNode {
                        node: node.clone(),
                        message: "expected an http:// or https:// URL".to_string(),
                    });
                }
            }
        }

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }

        Ok(())
    }
}

/// Shard and replica counts must both be positive.
pub(crate) fn validate_counts(shards: u32, replicas: u32) -> Result<(), ConfigError> {
    if shards == 0 {
        return Err(ConfigError::InvalidShardCount { value: shards });
    }
    if replicas == 0 {
        return Err(ConfigError::InvalidReplicaCount { value: replicas });
    }
    Ok(())
}
