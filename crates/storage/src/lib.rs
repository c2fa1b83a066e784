//! Lantern APM Collector Storage
//!
//! This crate makes sure the physical storage structures the collector writes
//! to exist before ingestion starts. Logical, backend-agnostic table
//! definitions are translated into backend-specific settings and field
//! mappings, and created, checked, or deleted against the storage engine.
//!
//! # Features
//!
//! - `elasticsearch` (default) - Elasticsearch client built on the official `elasticsearch` crate
//!
//! # Architecture
//!
//! - [`define`] - Logical table and column definitions tagged with a storage dialect
//! - [`installer`] - The backend-independent install pass ([`installer::StorageInstaller`])
//! - [`backends`] - Backend installers, settings and mapping builders, and clients
//! - [`observer`] - Injected hooks that report what each installer step did
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use collector_storage::backends::elasticsearch::ElasticsearchStorageInstaller;
//! use collector_storage::define::{ColumnDefine, StorageDialect, TableDefine};
//! use collector_storage::installer::StorageInstaller;
//!
//! let definitions = vec![
//!     TableDefine::new(StorageDialect::Elasticsearch, "service_name")
//!         .with_refresh_interval(2)
//!         .with_column(ColumnDefine::new("service_name", "Text"))
//!         .with_column(ColumnDefine::new("application_id", "Integer")),
//!     TableDefine::new(StorageDialect::MySql, "service_name"),
//! ];
//!
//! let installer = ElasticsearchStorageInstaller::new(1, 1).unwrap();
//! let tables = installer.define_filter(definitions);
//! assert_eq!(tables.len(), 1);
//!
//! let blueprint = installer.blueprint(&tables[0]);
//! assert_eq!(blueprint.settings.refresh_interval(), "2s");
//!
//! let mapping = blueprint.mapping.unwrap();
//! assert_eq!(mapping.field("service_name").unwrap()["fielddata"], true);
//! ```
//!
//! Running the pass against a cluster:
//!
//! ```ignore
//! use collector_storage::backends::elasticsearch::{ElasticsearchClient, ElasticsearchConfig};
//! use collector_storage::define::SchemaCatalog;
//!
//! let config = ElasticsearchConfig::default();
//! let client = ElasticsearchClient::new(&config)?;
//! let installer = ElasticsearchStorageInstaller::from_config(&config)?;
//! let report = installer
//!     .install(&client, SchemaCatalog::builtin().into_tables())
//!     .await?;
//! assert!(report.is_complete());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod define;
pub mod error;
pub mod installer;
pub mod observer;
