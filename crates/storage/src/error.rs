//! Error types for storage schema installation.
//!
//! Errors are split by where they originate: the storage client transport,
//! the mapping builder, table-definition catalogs, and configuration. The
//! installer operations surface [`InstallError`], which wraps the first two
//! and also rejects table names the backend cannot address.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for installer operations.
pub type InstallResult<T> = Result<T, InstallError>;

/// The error type returned by installer operations.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The storage client failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The mapping could not be built and the installer is configured to abort.
    #[error(transparent)]
    Mapping(#[from] MappingBuildError),

    /// The table name cannot be used as a physical name by this installer.
    #[error("table name '{name}' is not a valid {dialect} index name")]
    InvalidTableName { name: String, dialect: String },
}

impl InstallError {
    /// Returns true if this error is the storage engine reporting a missing index.
    pub fn is_index_not_found(&self) -> bool {
        matches!(self, InstallError::Client(ClientError::IndexNotFound { .. }))
    }
}

/// Errors reported by a storage client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The storage engine has no index with this name.
    #[error("index not found: {index}")]
    IndexNotFound { index: String },

    /// The request never produced a response.
    #[error("transport error in {backend_name}: {message}")]
    Transport {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The storage engine answered with a status the client does not handle.
    #[error("{operation} on index {index} returned status {status}: {body}")]
    UnexpectedStatus {
        operation: String,
        index: String,
        status: u16,
        body: String,
    },

    /// The response body could not be interpreted.
    #[error("invalid response from {operation} on index {index}: {message}")]
    InvalidResponse {
        operation: String,
        index: String,
        message: String,
    },
}

/// Errors raised while rendering a table's columns into a field mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingBuildError {
    /// The column's type tag is not a type the dialect knows.
    #[error("unknown column type '{column_type}' for {table}.{column}")]
    UnknownColumnType {
        table: String,
        column: String,
        column_type: String,
    },

    /// A column has an empty name.
    #[error("column {position} of {table} has an empty name")]
    EmptyColumnName { table: String, position: usize },

    /// Two columns share a name.
    #[error("duplicate column {table}.{column}")]
    DuplicateColumn { table: String, column: String },
}

/// Errors raised while loading or validating a catalog of table definitions.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The definitions file could not be read.
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The definitions document is not valid JSON for the catalog format.
    #[error("failed to parse schema definitions: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// A table has an empty name.
    #[error("table definition at position {position} has an empty name")]
    EmptyTableName { position: usize },

    /// The name is not usable as an index name for its dialect.
    #[error("'{name}' is not a valid {dialect} index name")]
    InvalidIndexName { name: String, dialect: String },

    /// Two tables of the same dialect share a name.
    #[error("duplicate {dialect} table definition: {name}")]
    DuplicateTable { name: String, dialect: String },
}

/// Errors in installer or client configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Shard count must be positive.
    #[error("number of shards must be positive, got {value}")]
    InvalidShardCount { value: u32 },

    /// Replica count must be positive.
    #[error("number of replicas must be positive, got {value}")]
    InvalidReplicaCount { value: u32 },

    /// No storage engine node was configured.
    #[error("at least one storage node must be configured")]
    NoNodes,

    /// A configured node address is not a usable URL.
    #[error("invalid node address '{node}': {message}")]
    InvalidNode { node: String, message: String },

    /// Request timeout must be positive.
    #[error("request timeout cannot be 0")]
    ZeroRequestTimeout,
}
