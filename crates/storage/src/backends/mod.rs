//! Storage backend installers.
//!
//! Each backend turns the logical table definitions tagged with its dialect
//! into physical storage structures.
//!
//! | Backend | Dialect | Client feature | Description |
//! |---------|---------|----------------|-------------|
//! | Elasticsearch | `elasticsearch` | `elasticsearch` | One index per table, with settings and field mappings |
//!
//! The installer, settings and mapping builders are always available; only the
//! network client is gated behind the `elasticsearch` feature.

pub mod elasticsearch;
