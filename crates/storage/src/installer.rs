//! Backend-independent installation pass.
//!
//! Each storage backend provides a [`StorageInstaller`] that knows how to check,
//! create and delete the physical structure for one [`TableDefine`]. The trait's
//! provided methods run the pass over a whole set of definitions:
//!
//! 1. keep only the definitions tagged with the installer's dialect
//! 2. ask the storage engine whether each table already exists
//! 3. create the missing ones and record whether the engine acknowledged them
//!
//! Tables are handled one at a time, in definition order. A client error on any
//! table stops the pass and is returned to the caller; tables already created
//! stay created.

use async_trait::async_trait;
use serde::Serialize;

use crate::define::{StorageDialect, TableDefine};
use crate::error::InstallResult;
use crate::observer::{InstallEvent, InstallObserver};

/// Summary of an install pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Definitions left after filtering.
    pub considered: usize,
    /// Tables that already existed and were left untouched.
    pub already_present: Vec<String>,
    /// Tables created and acknowledged by the storage engine.
    pub created: Vec<String>,
    /// Tables whose creation the storage engine did not acknowledge.
    pub not_acknowledged: Vec<String>,
}

impl InstallReport {
    /// Returns true if every considered table now exists or was acknowledged.
    pub fn is_complete(&self) -> bool {
        self.not_acknowledged.is_empty()
    }
}

/// Summary of an uninstall pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UninstallReport {
    /// Tables the storage engine deleted.
    pub deleted: Vec<String>,
    /// Tables that were missing or whose deletion was not acknowledged.
    pub not_deleted: Vec<String>,
}

/// Installs logical table definitions into one storage backend.
#[async_trait]
pub trait StorageInstaller: Send + Sync {
    /// The client used to reach the storage engine.
    type Client: ?Sized + Send + Sync;

    /// The dialect whose definitions this installer acts on.
    fn dialect(&self) -> StorageDialect;

    /// Where installer events are reported.
    fn observer(&self) -> &dyn InstallObserver;

    /// Keeps the definitions this installer can act on, preserving order.
    fn define_filter(&self, definitions: Vec<TableDefine>) -> Vec<TableDefine> {
        let dialect = self.dialect();
        definitions
            .into_iter()
            .filter(|table| table.is_dialect(dialect))
            .collect()
    }

    /// Returns whether the table's physical structure exists.
    async fn is_exists(&self, client: &Self::Client, table: &TableDefine) -> InstallResult<bool>;

    /// Creates the table's physical structure, returning the acknowledgement.
    async fn create_table(&self, client: &Self::Client, table: &TableDefine)
    -> InstallResult<bool>;

    /// Deletes the table's physical structure, returning whether it was deleted.
    async fn delete_table(&self, client: &Self::Client, table: &TableDefine)
    -> InstallResult<bool>;

    /// Creates every missing table among `definitions`.
    async fn install(
        &self,
        client: &Self::Client,
        definitions: Vec<TableDefine>,
    ) -> InstallResult<InstallReport> {
        let tables = self.define_filter(definitions);
        let mut report = InstallReport {
            considered: tables.len(),
            ..Default::default()
        };

        for table in &tables {
            if self.is_exists(client, table).await? {
                report.already_present.push(table.name().to_string());
                continue;
            }

            if self.create_table(client, table).await? {
                report.created.push(table.name().to_string());
            } else {
                report.not_acknowledged.push(table.name().to_string());
            }
        }

        self.observer().notify(&InstallEvent::InstallFinished {
            dialect: self.dialect(),
            report: &report,
        });
        Ok(report)
    }

    /// Deletes every table among `definitions`.
    async fn uninstall(
        &self,
        client: &Self::Client,
        definitions: Vec<TableDefine>,
    ) -> InstallResult<UninstallReport> {
        let tables = self.define_filter(definitions);
        let mut report = UninstallReport::default();

        for table in &tables {
            if self.delete_table(client, table).await? {
                report.deleted.push(table.name().to_string());
            } else {
                report.not_deleted.push(table.name().to_string());
            }
        }

        self.observer().notify(&InstallEvent::UninstallFinished {
            dialect: self.dialect(),
            report: &report,
        });
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use parking_lot::Mutex;

    use super::*;
    use crate::error::{ClientError, InstallError};
    use crate::observer::NoopObserver;

    /// In-memory installer over a set of existing table names.
    #[derive(Debug, Default)]
    struct SetInstaller {
        observer: NoopObserver,
        refuse: HashSet<String>,
        fail_on: Option<String>,
    }

    #[derive(Debug, Default)]
    struct SetClient {
        tables: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl StorageInstaller for SetInstaller {
        type Client = SetClient;

        fn dialect(&self) -> StorageDialect {
            StorageDialect::H2
        }

        fn observer(&self) -> &dyn InstallObserver {
            &self.observer
        }

        async fn is_exists(&self, client: &SetClient, table: &TableDefine) -> InstallResult<bool> {
            if self.fail_on.as_deref() == Some(table.name()) {
                return Err(ClientError::Transport {
                    backend_name: "h2".to_string(),
                    message: "connection reset".to_string(),
                    source: None,
                }
                .into());
            }
            Ok(client.tables.lock().contains(table.name()))
        }

        async fn create_table(
            &self,
            client: &SetClient,
            table: &TableDefine,
        ) -> InstallResult<bool> {
            if self.refuse.contains(table.name()) {
                return Ok(false);
            }
            Ok(client.tables.lock().insert(table.name().to_string()))
        }

        async fn delete_table(
            &self,
            client: &SetClient,
            table: &TableDefine,
        ) -> InstallResult<bool> {
            Ok(client.tables.lock().remove(table.name()))
        }
    }

    fn h2(name: &str) -> TableDefine {
        TableDefine::new(StorageDialect::H2, name)
    }

    #[tokio::test]
    async fn test_install_skips_existing_and_foreign_tables() {
        let installer = SetInstaller::default();
        let client = SetClient::default();
        client.tables.lock().insert("instance".to_string());

        let report = installer
            .install(
                &client,
                vec![
                    h2("application"),
                    TableDefine::new(StorageDialect::Elasticsearch, "segment"),
                    h2("instance"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(report.considered, 2);
        assert_eq!(report.created, vec!["application"]);
        assert_eq!(report.already_present, vec!["instance"]);
        assert!(report.is_complete());
        assert!(!client.tables.lock().contains("segment"));
    }

    #[tokio::test]
    async fn test_install_reports_unacknowledged() {
        let installer = SetInstaller {
            refuse: HashSet::from(["application".to_string()]),
            ..Default::default()
        };
        let client = SetClient::default();

        let report = installer
            .install(&client, vec![h2("application"), h2("instance")])
            .await
            .unwrap();

        assert_eq!(report.not_acknowledged, vec!["application"]);
        assert_eq!(report.created, vec!["instance"]);
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn test_install_stops_on_client_error() {
        let installer = SetInstaller {
            fail_on: Some("instance".to_string()),
            ..Default::default()
        };
        let client = SetClient::default();

        let err = installer
            .install(
                &client,
                vec![h2("application"), h2("instance"), h2("network_address")],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::Client(ClientError::Transport { .. })));
        let tables = client.tables.lock();
        assert!(tables.contains("application"));
        assert!(!tables.contains("network_address"));
    }

    #[tokio::test]
    async fn test_uninstall() {
        let installer = SetInstaller::default();
        let client = SetClient::default();
        client.tables.lock().insert("application".to_string());

        let report = installer
            .uninstall(&client, vec![h2("application"), h2("instance")])
            .await
            .unwrap();

        assert_eq!(report.deleted, vec!["application"]);
        assert_eq!(report.not_deleted, vec!["instance"]);
        assert!(client.tables.lock().is_empty());
    }
}
