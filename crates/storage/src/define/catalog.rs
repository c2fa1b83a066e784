//! Validated sets of table definitions.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backends::elasticsearch::is_valid_index_name;
use crate::error::CatalogError;

use super::table::{ColumnDefine, StorageDialect, TableDefine};

/// On-disk layout of a schema file.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    tables: Vec<TableDefine>,
}

/// The table definitions handed to an installation run.
///
/// A catalog guarantees that table names are non-empty and unique per dialect,
/// and that Elasticsearch table names are legal index names. Column-level
/// problems are left to the dialect's mapping builder.
///
/// # Examples
///
/// ```
/// use collector_storage::define::SchemaCatalog;
///
/// let catalog = SchemaCatalog::from_json_str(r#"{
///     "tables": [
///         {
///             "name": "global_trace",
///             "dialect": "elasticsearch",
///             "refresh_interval_secs": 10,
///             "columns": [
///                 {"name": "segment_id", "type": "Keyword"},
///                 {"name": "time_bucket", "type": "Long"}
///             ]
///         }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.tables()[0].name(), "global_trace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    tables: Vec<TableDefine>,
}

impl SchemaCatalog {
    /// Validates and wraps a list of definitions.
    pub fn new(tables: Vec<TableDefine>) -> Result<Self, CatalogError> {
        validate(&tables)?;
        Ok(Self { tables })
    }

    /// Parses a catalog from a JSON document of the form `{"tables": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse { source })?;
        Self::new(document.tables)
    }

    /// Reads and parses a catalog from a JSON schema file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The collector's standard Elasticsearch indices.
    pub fn builtin() -> Self {
        let es = StorageDialect::Elasticsearch;
        let tables = vec![
            TableDefine::new(es, "application")
                .with_refresh_interval(2)
                .with_columns([
                    ColumnDefine::new("application_code", "Keyword"),
                    ColumnDefine::new("application_id", "Integer"),
                    ColumnDefine::new("layer", "Integer"),
                    ColumnDefine::new("address_id", "Integer"),
                    ColumnDefine::new("is_address", "Integer"),
                ]),
            TableDefine::new(es, "instance")
                .with_refresh_interval(2)
                .with_columns([
                    ColumnDefine::new("application_id", "Integer"),
                    ColumnDefine::new("application_code", "Keyword"),
                    ColumnDefine::new("agent_uuid", "Keyword"),
                    ColumnDefine::new("register_time", "Long"),
                    ColumnDefine::new("instance_id", "Integer"),
                    ColumnDefine::new("heartbeat_time", "Long"),
                    ColumnDefine::new("os_info", "Keyword"),
                    ColumnDefine::new("address_id", "Integer"),
                    ColumnDefine::new("is_address", "Integer"),
                ]),
            TableDefine::new(es, "network_address")
                .with_refresh_interval(2)
                .with_columns([
                    ColumnDefine::new("address_id", "Integer"),
                    ColumnDefine::new("network_address", "Keyword"),
                    ColumnDefine::new("span_layer", "Integer"),
                    ColumnDefine::new("server_type", "Integer"),
                ]),
            TableDefine::new(es, "service_name")
                .with_refresh_interval(2)
                .with_columns([
                    ColumnDefine::new("service_name", "Text"),
                    ColumnDefine::new("service_name_keyword", "Keyword"),
                    ColumnDefine::new("application_id", "Integer"),
                    ColumnDefine::new("service_id", "Integer"),
                    ColumnDefine::new("src_span_type", "Integer"),
                ]),
            TableDefine::new(es, "global_trace")
                .with_refresh_interval(10)
                .with_columns([
                    ColumnDefine::new("segment_id", "Keyword"),
                    ColumnDefine::new("global_trace_id", "Keyword"),
                    ColumnDefine::new("time_bucket", "Long"),
                ]),
            TableDefine::new(es, "segment")
                .with_refresh_interval(10)
                .with_columns([
                    ColumnDefine::new("data_binary", "Binary"),
                    ColumnDefine::new("time_bucket", "Long"),
                ]),
            TableDefine::new(es, "segment_duration")
                .with_refresh_interval(10)
                .with_columns([
                    ColumnDefine::new("segment_id", "Keyword"),
                    ColumnDefine::new("application_id", "Integer"),
                    ColumnDefine::new("service_name", "Text"),
                    ColumnDefine::new("duration", "Long"),
                    ColumnDefine::new("start_time", "Long"),
                    ColumnDefine::new("end_time", "Long"),
                    ColumnDefine::new("is_error", "Boolean"),
                    ColumnDefine::new("time_bucket", "Long"),
                ]),
        ];

        Self { tables }
    }

    /// Returns the definitions in catalog order.
    pub fn tables(&self) -> &[TableDefine] {
        &self.tables
    }

    /// Consumes the catalog, returning its definitions.
    pub fn into_tables(self) -> Vec<TableDefine> {
        self.tables
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn validate(tables: &[TableDefine]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();

    for (position, table) in tables.iter().enumerate() {
        let name = table.name();
        if name.is_empty() {
            return Err(CatalogError::EmptyTableName { position });
        }

        if table.is_dialect(StorageDialect::Elasticsearch) && !is_valid_index_name(name) {
            return Err(CatalogError::InvalidIndexName {
                name: name.to_string(),
                dialect: table.dialect().to_string(),
            });
        }

        if !seen.insert((table.dialect(), name)) {
            return Err(CatalogError::DuplicateTable {
                name: name.to_string(),
                dialect: table.dialect().to_string(),
            });
        }
    }

    Ok(())
}
