//! Logical schema model.
//!
//! This module provides the backend-agnostic description of what the collector
//! stores:
//!
//! - [`TableDefine`] - One logical table, installed as one physical index
//! - [`ColumnDefine`] - One field of a table
//! - [`StorageDialect`] - The storage backend a definition is written for
//! - [`SchemaCatalog`] - A validated set of definitions loaded at startup
//!
//! # Examples
//!
//! ```
//! use collector_storage::define::{ColumnDefine, StorageDialect, TableDefine};
//!
//! let table = TableDefine::new(StorageDialect::Elasticsearch, "segment_duration")
//!     .with_refresh_interval(5)
//!     .with_column(ColumnDefine::new("service_name", "Text"))
//!     .with_column(ColumnDefine::new("duration", "Long"));
//!
//! assert_eq!(table.name(), "segment_duration");
//! assert_eq!(table.columns().len(), 2);
//! assert!(table.is_dialect(StorageDialect::Elasticsearch));
//! ```

mod catalog;
mod table;

pub use catalog::SchemaCatalog;
pub use table::{ColumnDefine, StorageDialect, TableDefine};
