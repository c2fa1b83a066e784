//! Elasticsearch schema installer.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use crate::define::{StorageDialect, TableDefine};
use crate::error::{ClientError, ConfigError, InstallError, InstallResult, MappingBuildError};
use crate::installer::StorageInstaller;
use crate::observer::{InstallEvent, InstallObserver, TracingObserver};

use super::client::IndexClient;
use super::config::{ElasticsearchConfig, MappingFailurePolicy, validate_counts};
use super::mapping::MappingDocument;
use super::settings::IndexSettings;

/// Longest index name the storage engine accepts, in bytes.
const MAX_INDEX_NAME_LEN: usize = 255;

// Lowercase only, and none of the separators or wildcards the REST API
// expands into several indices.
static INDEX_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_.\-]*$").expect("valid index name pattern"));

/// Returns true if `name` addresses exactly one index.
pub fn is_valid_index_name(name: &str) -> bool {
    name.len() <= MAX_INDEX_NAME_LEN && INDEX_NAME_PATTERN.is_match(name)
}

fn check_index_name(table: &TableDefine) -> InstallResult<()> {
    if is_valid_index_name(table.name()) {
        Ok(())
    } else {
        Err(InstallError::InvalidTableName {
            name: table.name().to_string(),
            dialect: StorageDialect::Elasticsearch.to_string(),
        })
    }
}

/// Everything needed to create one index.
///
/// The mapping is kept as a `Result` so the caller decides whether an index
/// without field mappings is acceptable.
#[derive(Debug, Clone)]
pub struct IndexBlueprint {
    /// Index settings.
    pub settings: IndexSettings,
    /// Field mapping, or why it could not be built.
    pub mapping: Result<MappingDocument, MappingBuildError>,
}

/// Installs Elasticsearch-tagged table definitions as indices.
///
/// Shard and replica counts are fixed at construction and shared by every
/// index this installer creates. Tables whose names are not valid index names
/// are rejected before any request reaches the client.
///
/// # Example
///
/// ```ignore
/// use collector_storage::backends::elasticsearch::{
///     ElasticsearchClient, ElasticsearchConfig, ElasticsearchStorageInstaller,
/// };
/// use collector_storage::define::SchemaCatalog;
/// use collector_storage::installer::StorageInstaller;
///
/// let config = ElasticsearchConfig::default();
/// let client = ElasticsearchClient::new(&config)?;
/// let installer = ElasticsearchStorageInstaller::from_config(&config)?;
/// let report = installer
///     .install(&client, SchemaCatalog::builtin().into_tables())
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ElasticsearchStorageInstaller {
    number_of_shards: u32,
    number_of_replicas: u32,
    mapping_failure_policy: MappingFailurePolicy,
    observer: Arc<dyn InstallObserver>,
}

impl ElasticsearchStorageInstaller {
    /// Creates an installer with the given shard and replica counts.
    ///
    /// Both counts must be positive. Events go to a [`TracingObserver`] and
    /// mapping failures degrade to settings-only creation.
    pub fn new(number_of_shards: u32, number_of_replicas: u32) -> Result<Self, ConfigError> {
        validate_counts(number_of_shards, number_of_replicas)?;
        Ok(Self {
            number_of_shards,
            number_of_replicas,
            mapping_failure_policy: MappingFailurePolicy::default(),
            observer: Arc::new(TracingObserver),
        })
    }

    /// Creates an installer from the counts and policy in `config`.
    pub fn from_config(config: &ElasticsearchConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.number_of_shards, config.number_of_replicas)?
            .with_mapping_failure_policy(config.mapping_failure_policy))
    }

    /// Replaces the observer events are reported to.
    pub fn with_observer(mut self, observer: Arc<dyn InstallObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sets what happens when a table's mapping cannot be built.
    pub fn with_mapping_failure_policy(mut self, policy: MappingFailurePolicy) -> Self {
        self.mapping_failure_policy = policy;
        self
    }

    /// Number of primary shards given to every index.
    pub fn number_of_shards(&self) -> u32 {
        self.number_of_shards
    }

    /// Number of replicas given to every index.
    pub fn number_of_replicas(&self) -> u32 {
        self.number_of_replicas
    }

    /// The configured mapping failure policy.
    pub fn mapping_failure_policy(&self) -> MappingFailurePolicy {
        self.mapping_failure_policy
    }

    /// Derives the settings and mapping for `table` without touching the cluster.
    pub fn blueprint(&self, table: &TableDefine) -> IndexBlueprint {
        IndexBlueprint {
            settings: IndexSettings::build(table, self.number_of_shards, self.number_of_replicas),
            mapping: MappingDocument::build(table),
        }
    }
}

#[async_trait]
impl StorageInstaller for ElasticsearchStorageInstaller {
    type Client = dyn IndexClient;

    fn dialect(&self) -> StorageDialect {
        StorageDialect::Elasticsearch
    }

    fn observer(&self) -> &dyn InstallObserver {
        self.observer.as_ref()
    }

    async fn is_exists(&self, client: &Self::Client, table: &TableDefine) -> InstallResult<bool> {
        check_index_name(table)?;
        let exists = client.exists_index(table.name()).await?;
        self.observer.notify(&InstallEvent::IndexChecked { table, exists });
        Ok(exists)
    }

    async fn create_table(
        &self,
        client: &Self::Client,
        table: &TableDefine,
    ) -> InstallResult<bool> {
        check_index_name(table)?;
        let IndexBlueprint { settings, mapping } = self.blueprint(table);

        let mapping = match mapping {
            Ok(mapping) => {
                self.observer.notify(&InstallEvent::MappingBuilt {
                    table,
                    mapping: mapping.as_json(),
                });
                Some(mapping)
            }
            Err(error) => {
                self.observer.notify(&InstallEvent::MappingFailed {
                    table,
                    error: &error,
                });
                match self.mapping_failure_policy {
                    MappingFailurePolicy::Degrade => None,
                    MappingFailurePolicy::Abort => return Err(error.into()),
                }
            }
        };

        let acknowledged = client
            .create_index(table.name(), table.type_name(), &settings, mapping.as_ref())
            .await?;

        self.observer.notify(&InstallEvent::IndexCreated {
            table,
            type_name: table.type_name(),
            acknowledged,
            with_mapping: mapping.is_some(),
        });
        Ok(acknowledged)
    }

    async fn delete_table(
        &self,
        client: &Self::Client,
        table: &TableDefine,
    ) -> InstallResult<bool> {
        check_index_name(table)?;
        match client.delete_index(table.name()).await {
            Ok(acknowledged) => {
                self.observer.notify(&InstallEvent::IndexDeleted {
                    table,
                    acknowledged,
                });
                Ok(acknowledged)
            }
            Err(ClientError::IndexNotFound { .. }) => {
                self.observer.notify(&InstallEvent::IndexNotFound { table });
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define::ColumnDefine;

    #[test]
    fn test_new_rejects_zero_counts() {
        assert_eq!(
            ElasticsearchStorageInstaller::new(0, 1).unwrap_err(),
            ConfigError::InvalidShardCount { value: 0 }
        );
        assert_eq!(
            ElasticsearchStorageInstaller::new(1, 0).unwrap_err(),
            ConfigError::InvalidReplicaCount { value: 0 }
        );
    }

    #[test]
    fn test_from_config() {
        let config = ElasticsearchConfig {
            number_of_shards: 3,
            number_of_replicas: 2,
            mapping_failure_policy: MappingFailurePolicy::Abort,
            ..Default::default()
        };
        let installer = ElasticsearchStorageInstaller::from_config(&config).unwrap();
        assert_eq!(installer.number_of_shards(), 3);
        assert_eq!(installer.number_of_replicas(), 2);
        assert_eq!(installer.mapping_failure_policy(), MappingFailurePolicy::Abort);
    }

    #[test]
    fn test_filter_keeps_elasticsearch_in_order() {
        let installer = ElasticsearchStorageInstaller::new(1, 1).unwrap();
        let definitions = vec![
            TableDefine::new(StorageDialect::Elasticsearch, "application"),
            TableDefine::new(StorageDialect::H2, "application"),
            TableDefine::new(StorageDialect::Elasticsearch, "segment"),
            TableDefine::new(StorageDialect::MySql, "instance"),
            TableDefine::new(StorageDialect::Elasticsearch, "instance"),
        ];

        let once = installer.define_filter(definitions);
        let names: Vec<&str> = once.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["application", "segment", "instance"]);

        let twice = installer.define_filter(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_index_name_rule() {
        for name in ["segment", "segment_duration", "global.trace-1", "0day"] {
            assert!(is_valid_index_name(name), "{name} should be accepted");
        }
        for name in ["", "Segment", "_segment", "seg ment", "a,b", "*", "seg*", "-x"] {
            assert!(!is_valid_index_name(name), "{name} should be rejected");
        }
        assert!(is_valid_index_name(&"a".repeat(255)));
        assert!(!is_valid_index_name(&"a".repeat(256)));
    }

    #[test]
    fn test_blueprint_carries_mapping_error() {
        let installer = ElasticsearchStorageInstaller::new(3, 1).unwrap();
        let table = TableDefine::new(StorageDialect::Elasticsearch, "segment")
            .with_refresh_interval(10)
            .with_column(ColumnDefine::new("data_binary", "Blob"));

        let blueprint = installer.blueprint(&table);
        assert_eq!(blueprint.settings.number_of_shards(), 3);
        assert_eq!(blueprint.settings.refresh_interval(), "10s");
        assert!(matches!(
            blueprint.mapping,
            Err(MappingBuildError::UnknownColumnType { .. })
        ));
    }
}
