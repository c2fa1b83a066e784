//! Test infrastructure for the installer tests.
//!
//! Provides an in-memory [`IndexClient`] that records every request, an
//! observer that records every event, and table fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use collector_storage::backends::elasticsearch::{IndexClient, IndexSettings, MappingDocument};
use collector_storage::define::{ColumnDefine, StorageDialect, TableDefine};
use collector_storage::error::ClientError;
use collector_storage::observer::{InstallEvent, InstallObserver};

/// One create request as the client received it.
#[derive(Debug, Clone)]
pub struct CreateCall {
    pub name: String,
    pub type_name: String,
    pub settings: IndexSettings,
    pub mapping: Option<Value>,
}

#[derive(Debug, Default)]
struct MockState {
    indices: HashMap<String, Option<Value>>,
    creates: Vec<CreateCall>,
    deletes: Vec<String>,
    exists_checks: Vec<String>,
    refuse_create: bool,
    fail_exists_for: Option<String>,
    fail_deletes: bool,
}

/// In-memory cluster that records requests.
#[derive(Debug, Clone, Default)]
pub struct MockIndexClient {
    state: Arc<Mutex<MockState>>,
}

impl MockIndexClient {
    pub fn with_indices(names: &[&str]) -> Self {
        let client = Self::default();
        {
            let mut state = client.state.lock();
            for name in names {
                state.indices.insert((*name).to_string(), None);
            }
        }
        client
    }

    /// Makes every create request come back unacknowledged.
    pub fn refuse_creates(&self) {
        self.state.lock().refuse_create = true;
    }

    /// Makes the existence check for `name` fail with a transport error.
    pub fn fail_exists_for(&self, name: &str) {
        self.state.lock().fail_exists_for = Some(name.to_string());
    }

    /// Makes every delete request fail with a server error.
    pub fn fail_deletes(&self) {
        self.state.lock().fail_deletes = true;
    }

    pub fn creates(&self) -> Vec<CreateCall> {
        self.state.lock().creates.clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.state.lock().deletes.clone()
    }

    pub fn exists_checks(&self) -> Vec<String> {
        self.state.lock().exists_checks.clone()
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.state.lock().indices.contains_key(name)
    }
}

#[async_trait]
impl IndexClient for MockIndexClient {
    async fn create_index(
        &self,
        name: &str,
        type_name: &str,
        settings: &IndexSettings,
        mapping: Option<&MappingDocument>,
    ) -> Result<bool, ClientError> {
        let mut state = self.state.lock();
        let mapping = mapping.map(|m| m.as_json().clone());
        state.creates.push(CreateCall {
            name: name.to_string(),
            type_name: type_name.to_string(),
            settings: settings.clone(),
            mapping: mapping.clone(),
        });

        if state.refuse_create {
            return Ok(false);
        }
        if state.indices.contains_key(name) {
            return Err(ClientError::UnexpectedStatus {
                operation: "create".to_string(),
                index: name.to_string(),
                status: 400,
                body: "resource_already_exists_exception".to_string(),
            });
        }
        state.indices.insert(name.to_string(), mapping);
        Ok(true)
    }

    async fn delete_index(&self, name: &str) -> Result<bool, ClientError> {
        let mut state = self.state.lock();
        state.deletes.push(name.to_string());

        if state.fail_deletes {
            return Err(ClientError::UnexpectedStatus {
                operation: "delete".to_string(),
                index: name.to_string(),
                status: 500,
                body: "forced delete failure".to_string(),
            });
        }
        match state.indices.remove(name) {
            Some(_) => Ok(true),
            None => Err(ClientError::IndexNotFound {
                index: name.to_string(),
            }),
        }
    }

    async fn exists_index(&self, name: &str) -> Result<bool, ClientError> {
        let mut state = self.state.lock();
        state.exists_checks.push(name.to_string());

        if state.fail_exists_for.as_deref() == Some(name) {
            return Err(ClientError::Transport {
                backend_name: "mock".to_string(),
                message: "connection refused".to_string(),
                source: None,
            });
        }
        Ok(state.indices.contains_key(name))
    }
}

/// Observer that keeps `(kind, table)` for every event.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<(String, Option<String>)> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<String> {
        self.events.lock().iter().map(|(k, _)| k.clone()).collect()
    }
}

impl InstallObserver for RecordingObserver {
    fn notify(&self, event: &InstallEvent<'_>) {
        self.events.lock().push((
            event.kind().to_string(),
            event.table().map(|t| t.name().to_string()),
        ));
    }
}

pub fn es_table(name: &str, refresh_interval_secs: u64, columns: &[(&str, &str)]) -> TableDefine {
    TableDefine::new(StorageDialect::Elasticsearch, name)
        .with_refresh_interval(refresh_interval_secs)
        .with_columns(
            columns
                .iter()
                .map(|(column, column_type)| ColumnDefine::new(*column, *column_type)),
        )
}

pub fn segment_duration() -> TableDefine {
    es_table(
        "segment_duration",
        5,
        &[
            ("service_name", "Text"),
            ("duration", "Long"),
            ("application_id", "Integer"),
        ],
    )
}

/// Definitions for several dialects, interleaved.
pub fn mixed_definitions() -> Vec<TableDefine> {
    vec![
        es_table("application", 2, &[("application_code", "Keyword")]),
        TableDefine::new(StorageDialect::H2, "application"),
        segment_duration(),
        TableDefine::new(StorageDialect::MySql, "segment_duration"),
        es_table("global_trace", 10, &[("global_trace_id", "Keyword")]),
    ]
}
