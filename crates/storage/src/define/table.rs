//! Table and column definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The storage backend a table definition is written for.
///
/// Installers only act on definitions tagged with their own dialect; every
/// other definition is dropped during filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageDialect {
    /// Elasticsearch document indices.
    Elasticsearch,
    /// H2 embedded relational tables.
    H2,
    /// MySQL relational tables.
    #[serde(rename = "mysql")]
    MySql,
}

impl fmt::Display for StorageDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageDialect::Elasticsearch => write!(f, "elasticsearch"),
            StorageDialect::H2 => write!(f, "h2"),
            StorageDialect::MySql => write!(f, "mysql"),
        }
    }
}

/// One field of a logical table.
///
/// The type is kept as the dialect's type tag (e.g. `"Text"`, `"Long"`) and
/// is only interpreted when the dialect renders the column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefine {
    /// Field name, unique within its table.
    name: String,

    /// Dialect-specific type tag.
    #[serde(rename = "type")]
    column_type: String,
}

impl ColumnDefine {
    /// Creates a column with the given name and type tag.
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type tag as written in the definition.
    pub fn column_type(&self) -> &str {
        &self.column_type
    }
}

/// A logical storage table.
///
/// Definitions are built once at startup, either in code or from a schema
/// file, and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefine {
    /// Table name; becomes the physical index name.
    name: String,

    /// Which storage backend this definition belongs to.
    dialect: StorageDialect,

    /// Seconds before newly written data becomes visible to queries.
    #[serde(default = "default_refresh_interval_secs")]
    refresh_interval_secs: u64,

    /// Fields in declaration order.
    #[serde(default)]
    columns: Vec<ColumnDefine>,
}

fn default_refresh_interval_secs() -> u64 {
    1
}

impl TableDefine {
    /// Document type identifier sent along with index creation requests.
    pub const TYPE_NAME: &'static str = "type";

    /// Creates a table with no columns and the default refresh interval of one second.
    pub fn new(dialect: StorageDialect, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dialect,
            refresh_interval_secs: default_refresh_interval_secs(),
            columns: Vec::new(),
        }
    }

    /// Sets the refresh interval in seconds.
    pub fn with_refresh_interval(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = secs;
        self
    }

    /// Appends a column.
    pub fn with_column(mut self, column: ColumnDefine) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends several columns, keeping their order.
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = ColumnDefine>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dialect this definition is tagged with.
    pub fn dialect(&self) -> StorageDialect {
        self.dialect
    }

    /// Returns true if this definition is tagged with `dialect`.
    pub fn is_dialect(&self, dialect: StorageDialect) -> bool {
        self.dialect == dialect
    }

    /// Returns the refresh interval in seconds.
    pub fn refresh_interval_secs(&self) -> u64 {
        self.refresh_interval_secs
    }

    /// Returns the columns in declaration order.
    pub fn columns(&self) -> &[ColumnDefine] {
        &self.columns
    }

    /// Returns the document type identifier for this table.
    pub fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}
