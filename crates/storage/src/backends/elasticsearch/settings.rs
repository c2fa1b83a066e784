//! Index settings derived from a table definition.
//!
//! Every index gets the same text-analysis configuration: one custom analyzer
//! built on one standard tokenizer with a short maximum token length.

use serde_json::{Value, json};

use crate::define::TableDefine;

/// Name of the analyzer declared on every index.
pub const ANALYZER_NAME: &str = "collector_analyzer";

/// Name of the tokenizer the analyzer uses.
pub const TOKENIZER_NAME: &str = "collector_tokenizer";

/// Algorithm behind [`TOKENIZER_NAME`].
pub const TOKENIZER_TYPE: &str = "standard";

/// Maximum token length of [`TOKENIZER_NAME`].
pub const MAX_TOKEN_LENGTH: u32 = 5;

/// Physical configuration of one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    number_of_shards: u32,
    number_of_replicas: u32,
    refresh_interval: String,
}

impl IndexSettings {
    /// Derives the settings for `table` with the installer-wide shard and replica counts.
    pub fn build(table: &TableDefine, number_of_shards: u32, number_of_replicas: u32) -> Self {
        Self {
            number_of_shards,
            number_of_replicas,
            refresh_interval: format!("{}s", table.refresh_interval_secs()),
        }
    }

    /// Number of primary shards.
    pub fn number_of_shards(&self) -> u32 {
        self.number_of_shards
    }

    /// Number of replicas per primary shard.
    pub fn number_of_replicas(&self) -> u32 {
        self.number_of_replicas
    }

    /// Refresh interval with its time-unit suffix, e.g. `"5s"`.
    pub fn refresh_interval(&self) -> &str {
        &self.refresh_interval
    }

    /// Renders the `settings` body of an index creation request.
    pub fn to_json(&self) -> Value {
        json!({
            "index": {
                "number_of_shards": self.number_of_shards,
                "number_of_replicas": self.number_of_replicas,
                "refresh_interval": self.refresh_interval,
            },
            "analysis": {
                "analyzer": {
                    ANALYZER_NAME: {
                        "type": "custom",
                        "tokenizer": TOKENIZER_NAME,
                    }
                },
                "tokenizer": {
                    TOKENIZER_NAME: {
                        "type": TOKENIZER_TYPE,
                        "max_token_length": MAX_TOKEN_LENGTH,
                    }
                }
            }
        })
    }
}
