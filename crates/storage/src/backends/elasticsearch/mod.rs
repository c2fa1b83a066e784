//! Elasticsearch schema installation.
//!
//! This module turns Elasticsearch-tagged [`TableDefine`](crate::define::TableDefine)s
//! into indices before the collector starts writing to them.
//!
//! # Index Structure
//!
//! Each table becomes one index named after the table. Index settings come from
//! the installer-wide shard and replica counts plus the table's refresh
//! interval, and every index declares the same analyzer:
//!
//! ```json
//! {
//!   "settings": {
//!     "index": { "number_of_shards": 1, "number_of_replicas": 1, "refresh_interval": "2s" },
//!     "analysis": {
//!       "analyzer":  { "collector_analyzer":  { "type": "custom", "tokenizer": "collector_tokenizer" } },
//!       "tokenizer": { "collector_tokenizer": { "type": "standard", "max_token_length": 5 } }
//!     }
//!   },
//!   "mappings": {
//!     "properties": {
//!       "service_name": { "type": "text", "fielddata": true },
//!       "application_id": { "type": "integer" }
//!     }
//!   }
//! }
//! ```
//!
//! If a table's mapping cannot be built, the index is by default still created
//! with settings only; see [`MappingFailurePolicy`].
//!
//! # Example
//!
//! ```ignore
//! use collector_storage::backends::elasticsearch::{
//!     ElasticsearchClient, ElasticsearchConfig, ElasticsearchStorageInstaller,
//! };
//! use collector_storage::define::SchemaCatalog;
//! use collector_storage::installer::StorageInstaller;
//!
//! let config = ElasticsearchConfig {
//!     nodes: vec!["http://localhost:9200".to_string()],
//!     ..Default::default()
//! };
//! let client = ElasticsearchClient::new(&config)?;
//! let installer = ElasticsearchStorageInstaller::from_config(&config)?;
//! installer.install(&client, SchemaCatalog::builtin().into_tables()).await?;
//! ```

mod client;
mod config;
mod installer;
mod mapping;
mod settings;
#[cfg(feature = "elasticsearch")]
mod transport;

pub use client::IndexClient;
pub use config::{ElasticsearchAuth, ElasticsearchConfig, MappingFailurePolicy};
pub use installer::{ElasticsearchStorageInstaller, IndexBlueprint, is_valid_index_name};
pub use mapping::{EsColumnType, MappingDocument, ParseColumnTypeError};
pub use settings::{
    ANALYZER_NAME, IndexSettings, MAX_TOKEN_LENGTH, TOKENIZER_NAME, TOKENIZER_TYPE,
};
#[cfg(feature = "elasticsearch")]
pub use transport::ElasticsearchClient;
