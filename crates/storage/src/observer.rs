//! Observability hooks for schema installation.
//!
//! Installers never log directly. After each step they hand an
//! [`InstallEvent`] to an injected [`InstallObserver`]; the default
//! [`TracingObserver`] turns those events into `tracing` records.

use std::fmt::Debug;

use crate::define::{StorageDialect, TableDefine};
use crate::error::MappingBuildError;
use crate::installer::{InstallReport, UninstallReport};

/// Something that happened while installing or removing a table.
// Variant fields are named after what they hold
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy)]
pub enum InstallEvent<'a> {
    /// A field mapping was rendered for the table.
    MappingBuilt {
        table: &'a TableDefine,
        mapping: &'a serde_json::Value,
    },

    /// The field mapping could not be rendered.
    MappingFailed {
        table: &'a TableDefine,
        error: &'a MappingBuildError,
    },

    /// The storage engine was asked whether the index exists.
    IndexChecked { table: &'a TableDefine, exists: bool },

    /// An index creation request completed.
    IndexCreated {
        table: &'a TableDefine,
        type_name: &'a str,
        acknowledged: bool,
        with_mapping: bool,
    },

    /// An index deletion request completed.
    IndexDeleted {
        table: &'a TableDefine,
        acknowledged: bool,
    },

    /// Deletion was requested for an index the storage engine does not have.
    IndexNotFound { table: &'a TableDefine },

    /// An install pass finished.
    InstallFinished {
        dialect: StorageDialect,
        report: &'a InstallReport,
    },

    /// An uninstall pass finished.
    UninstallFinished {
        dialect: StorageDialect,
        report: &'a UninstallReport,
    },
}

impl InstallEvent<'_> {
    /// Short stable name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            InstallEvent::MappingBuilt { .. } => "mapping_built",
            InstallEvent::MappingFailed { .. } => "mapping_failed",
            InstallEvent::IndexChecked { .. } => "index_checked",
            InstallEvent::IndexCreated { .. } => "index_created",
            InstallEvent::IndexDeleted { .. } => "index_deleted",
            InstallEvent::IndexNotFound { .. } => "index_not_found",
            InstallEvent::InstallFinished { .. } => "install_finished",
            InstallEvent::UninstallFinished { .. } => "uninstall_finished",
        }
    }

    /// The table the event concerns, if it concerns a single table.
    pub fn table(&self) -> Option<&TableDefine> {
        match self {
            InstallEvent::MappingBuilt { table, .. }
            | InstallEvent::MappingFailed { table, .. }
            | InstallEvent::IndexChecked { table, .. }
            | InstallEvent::IndexCreated { table, .. }
            | InstallEvent::IndexDeleted { table, .. }
            | InstallEvent::IndexNotFound { table } => Some(*table),
            InstallEvent::InstallFinished { .. } | InstallEvent::UninstallFinished { .. } => None,
        }
    }
}

/// Receives installer events.
pub trait InstallObserver: Send + Sync + Debug {
    /// Called after each installer step.
    fn notify(&self, event: &InstallEvent<'_>);
}

/// Observer that records events with `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl InstallObserver for TracingObserver {
    fn notify(&self, event: &InstallEvent<'_>) {
        match *event {
            InstallEvent::MappingBuilt { table, mapping } => {
                tracing::debug!(
                    index = %table.name(),
                    mapping = %mapping,
                    "Built index mapping"
                );
            }
            InstallEvent::MappingFailed { table, error } => {
                tracing::error!(
                    index = %table.name(),
                    error = %error,
                    "Failed to build index mapping"
                );
            }
            InstallEvent::IndexChecked { table, exists } => {
                tracing::debug!(index = %table.name(), exists, "Checked index existence");
            }
            InstallEvent::IndexCreated {
                table,
                type_name,
                acknowledged,
                with_mapping,
            } => {
                tracing::info!(
                    index = %table.name(),
                    type_name,
                    acknowledged,
                    with_mapping,
                    "Create index finished"
                );
            }
            InstallEvent::IndexDeleted {
                table,
                acknowledged,
            } => {
                tracing::info!(index = %table.name(), acknowledged, "Delete index finished");
            }
            InstallEvent::IndexNotFound { table } => {
                tracing::info!(index = %table.name(), "Index not found");
            }
            InstallEvent::InstallFinished { dialect, report } => {
                tracing::info!(
                    dialect = %dialect,
                    considered = report.considered,
                    created = report.created.len(),
                    already_present = report.already_present.len(),
                    not_acknowledged = report.not_acknowledged.len(),
                    "Storage install pass finished"
                );
            }
            InstallEvent::UninstallFinished { dialect, report } => {
                tracing::info!(
                    dialect = %dialect,
                    deleted = report.deleted.len(),
                    not_deleted = report.not_deleted.len(),
                    "Storage uninstall pass finished"
                );
            }
        }
    }
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl InstallObserver for NoopObserver {
    fn notify(&self, _event: &InstallEvent<'_>) {}
}
