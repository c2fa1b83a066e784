//! Field mappings derived from a table's columns.
//!
//! Each column becomes one entry under `properties`, keyed by the column name,
//! with the lowercase type name. Text columns also get `fielddata: true` so
//! they can be sorted and aggregated on.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::define::TableDefine;
use crate::error::MappingBuildError;

/// Column types understood by the Elasticsearch dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EsColumnType {
    /// Analyzed full-text field.
    Text,
    /// Exact-value string.
    Keyword,
    /// 64-bit integer.
    Long,
    /// 32-bit integer.
    Integer,
    /// 64-bit float.
    Double,
    /// Boolean.
    Boolean,
    /// Date or timestamp.
    Date,
    /// Base64-encoded binary blob.
    Binary,
}

impl EsColumnType {
    /// The mapping type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EsColumnType::Text => "text",
            EsColumnType::Keyword => "keyword",
            EsColumnType::Long => "long",
            EsColumnType::Integer => "integer",
            EsColumnType::Double => "double",
            EsColumnType::Boolean => "boolean",
            EsColumnType::Date => "date",
            EsColumnType::Binary => "binary",
        }
    }

    /// Whether the field is mapped with `fielddata` enabled.
    pub fn enables_fielddata(&self) -> bool {
        matches!(self, EsColumnType::Text)
    }
}

impl fmt::Display for EsColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type tag that names no [`EsColumnType`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown Elasticsearch column type '{tag}'")]
pub struct ParseColumnTypeError {
    tag: String,
}

impl ParseColumnTypeError {
    /// The tag as it was written.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl FromStr for EsColumnType {
    type Err = ParseColumnTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(EsColumnType::Text),
            "keyword" => Ok(EsColumnType::Keyword),
            "long" => Ok(EsColumnType::Long),
            "integer" => Ok(EsColumnType::Integer),
            "double" => Ok(EsColumnType::Double),
            "boolean" => Ok(EsColumnType::Boolean),
            "date" => Ok(EsColumnType::Date),
            "binary" => Ok(EsColumnType::Binary),
            _ => Err(ParseColumnTypeError { tag: s.to_string() }),
        }
    }
}

/// The field mapping of one index: `{"properties": {<column>: {"type": ..}}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingDocument {
    body: Value,
}

impl MappingDocument {
    /// Renders the columns of `table`, in order.
    ///
    /// Fails on the first column with an empty name, a repeated name, or a type
    /// tag that is not an [`EsColumnType`].
    pub fn build(table: &TableDefine) -> Result<Self, MappingBuildError> {
        let mut properties = Map::new();
        let mut seen = HashSet::new();

        for (position, column) in table.columns().iter().enumerate() {
            if column.name().is_empty() {
                return Err(MappingBuildError::EmptyColumnName {
                    table: table.name().to_string(),
                    position,
                });
            }

            if !seen.insert(column.name()) {
                return Err(MappingBuildError::DuplicateColumn {
                    table: table.name().to_string(),
                    column: column.name().to_string(),
                });
            }

            let column_type: EsColumnType = column.column_type().parse().map_err(|_| {
                MappingBuildError::UnknownColumnType {
                    table: table.name().to_string(),
                    column: column.name().to_string(),
                    column_type: column.column_type().to_string(),
                }
            })?;

            let mut field = json!({ "type": column_type.as_str() });
            if column_type.enables_fielddata() {
                field["fielddata"] = Value::Bool(true);
            }
            properties.insert(column.name().to_string(), field);
        }

        Ok(Self {
            body: json!({ "properties": properties }),
        })
    }

    /// The mapping entry for `column`, if present.
    pub fn field(&self, column: &str) -> Option<&Value> {
        self.body["properties"].get(column)
    }

    /// Mapped field names in column order.
    pub fn field_names(&self) -> Vec<&str> {
        self.body["properties"]
            .as_object()
            .map(|properties| properties.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// The mapping body as JSON.
    pub fn as_json(&self) -> &Value {
        &self.body
    }

    /// Consumes the document, returning the mapping body.
    pub fn into_json(self) -> Value {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define::{ColumnDefine, StorageDialect};

    fn table(columns: &[(&str, &str)]) -> TableDefine {
        TableDefine::new(StorageDialect::Elasticsearch, "segment_duration").with_columns(
            columns
                .iter()
                .map(|(name, column_type)| ColumnDefine::new(*name, *column_type)),
        )
    }

    #[test]
    fn test_text_field_gets_fielddata() {
        let mapping =
            MappingDocument::build(&table(&[("service_name", "Text"), ("duration", "Long")]))
                .unwrap();

        assert_eq!(
            mapping.field("service_name"),
            Some(&json!({"type": "text", "fielddata": true}))
        );
        assert_eq!(mapping.field("duration"), Some(&json!({"type": "long"})));
        assert!(mapping.field("duration").unwrap().get("fielddata").is_none());
    }

    #[test]
    fn test_only_text_gets_fielddata() {
        let mapping = MappingDocument::build(&table(&[
            ("a", "Keyword"),
            ("b", "Integer"),
            ("c", "Double"),
            ("d", "Boolean"),
            ("e", "Date"),
            ("f", "Binary"),
        ]))
        .unwrap();

        let expected = [
            ("a", "keyword"),
            ("b", "integer"),
            ("c", "double"),
            ("d", "boolean"),
            ("e", "date"),
            ("f", "binary"),
        ];
        for (name, mapped_type) in expected {
            assert_eq!(
                mapping.field(name),
                Some(&json!({ "type": mapped_type })),
                "{name}"
            );
        }
    }

    #[test]
    fn test_parse_column_type() {
        assert_eq!("Double".parse::<EsColumnType>(), Ok(EsColumnType::Double));
        assert_eq!(EsColumnType::Date.to_string(), "date");

        let err = "Blob".parse::<EsColumnType>().unwrap_err();
        assert_eq!(err.tag(), "Blob");
        assert_eq!(err.to_string(), "unknown Elasticsearch column type 'Blob'");
    }

    #[test]
    fn test_type_tags_are_case_folded() {
        let mapping =
            MappingDocument::build(&table(&[("trace_id", "KEYWORD"), ("body", "text")])).unwrap();
        assert_eq!(mapping.field("trace_id").unwrap()["type"], "keyword");
        assert_eq!(mapping.field("body").unwrap()["fielddata"], true);
    }

    #[test]
    fn test_field_names_follow_column_order() {
        let mapping = MappingDocument::build(&table(&[
            ("time_bucket", "Long"),
            ("segment_id", "Keyword"),
            ("application_id", "Integer"),
        ]))
        .unwrap();
        assert_eq!(
            mapping.field_names(),
            vec!["time_bucket", "segment_id", "application_id"]
        );
    }

    #[test]
    fn test_document_shape() {
        let mapping = MappingDocument::build(&table(&[("duration", "Long")])).unwrap();
        assert_eq!(
            mapping.into_json(),
            json!({"properties": {"duration": {"type": "long"}}})
        );
    }

    #[test]
    fn test_empty_table_has_empty_properties() {
        let mapping = MappingDocument::build(&table(&[])).unwrap();
        assert!(mapping.field_names().is_empty());
        assert!(mapping.as_json()["properties"].is_object());
    }

    #[test]
    fn test_unknown_type_fails() {
        let err = MappingDocument::build(&table(&[("duration", "Long"), ("data", "Blob")]))
            .unwrap_err();
        assert_eq!(
            err,
            MappingBuildError::UnknownColumnType {
                table: "segment_duration".to_string(),
                column: "data".to_string(),
                column_type: "Blob".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_and_empty_columns_fail() {
        let err = MappingDocument::build(&table(&[("duration", "Long"), ("duration", "Long")]))
            .unwrap_err();
        assert!(matches!(err, MappingBuildError::DuplicateColumn { .. }));

        let err = MappingDocument::build(&table(&[("duration", "Long"), ("", "Long")]))
            .unwrap_err();
        assert_eq!(
            err,
            MappingBuildError::EmptyColumnName {
                table: "segment_duration".to_string(),
                position: 1,
            }
        );
    }
}
