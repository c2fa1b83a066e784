//! The storage client contract consumed by the installer.

use async_trait::async_trait;

use crate::error::ClientError;

use super::mapping::MappingDocument;
use super::settings::IndexSettings;

/// Index lifecycle operations against an Elasticsearch cluster.
///
/// The installer treats implementations as an opaque transport: it never looks
/// at connection details and performs no retries of its own.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Creates an index, returning whether the cluster acknowledged it.
    ///
    /// With `mapping` absent the index is created with settings only.
    async fn create_index(
        &self,
        name: &str,
        type_name: &str,
        settings: &IndexSettings,
        mapping: Option<&MappingDocument>,
    ) -> Result<bool, ClientError>;

    /// Deletes an index, returning whether the cluster acknowledged it.
    ///
    /// Returns [`ClientError::IndexNotFound`] when there is no such index.
    async fn delete_index(&self, name: &str) -> Result<bool, ClientError>;

    /// Returns whether the index exists.
    async fn exists_index(&self, name: &str) -> Result<bool, ClientError>;
}
