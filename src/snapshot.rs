//! Entity contract and storage-neutral field normalization.
//!
//! A [`Snapshot`] is an immutable domain entity reconstructable from a flat result
//! row and exportable back to a field map. [`normalize`] turns an exported field
//! map into backend-storable primitives: temporals become a fixed wire format,
//! booleans become `"1"`/`"0"`, nested exports recurse, nulls stay null and
//! everything else is stringified.

use crate::errors::SnapstoreError;
use crate::row::Row;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// Wire format for temporal values, matching the storage datetime column layout.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An exported entity field before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Integer(i64),
    Float(f64),
    Text(String),
    /// A nested exportable entity's field map.
    Nested(FieldMap),
}

/// An entity's exported fields, keyed by column name.
pub type FieldMap = BTreeMap<String, FieldValue>;

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// Normalizes every field into `Null`, `Text` or a recursively normalized `Nested`
/// map, so all scalars handed to a write operation are backend-storable.
///
/// Idempotent: normalizing an already-normalized map is a no-op.
pub fn normalize(fields: FieldMap) -> FieldMap {
    fields
        .into_iter()
        .map(|(name, value)| (name, normalize_value(value)))
        .collect()
}

fn normalize_value(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Null => FieldValue::Null,
        FieldValue::Timestamp(ts) => FieldValue::Text(ts.format(DATETIME_FORMAT).to_string()),
        FieldValue::Bool(b) => FieldValue::Text(if b { "1" } else { "0" }.to_string()),
        FieldValue::Nested(nested) => FieldValue::Nested(normalize(nested)),
        FieldValue::Integer(i) => FieldValue::Text(i.to_string()),
        FieldValue::Float(f) => FieldValue::Text(f.to_string()),
        FieldValue::Text(s) => FieldValue::Text(s),
    }
}

/// Flattens a normalized field map into a [`Row`] for the query engine.
///
/// Nested maps are carried as JSON objects; the caller picks between flattening
/// and nesting to match the target column layout.
pub fn to_row(fields: &FieldMap) -> Row {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), field_to_value(value)))
        .collect()
}

fn field_to_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::Bool(b) => Value::String(if *b { "1" } else { "0" }.to_string()),
        FieldValue::Timestamp(ts) => Value::String(ts.format(DATETIME_FORMAT).to_string()),
        FieldValue::Integer(i) => Value::String(i.to_string()),
        FieldValue::Float(f) => Value::String(f.to_string()),
        FieldValue::Nested(nested) => {
            Value::Object(nested.iter().map(|(k, v)| (k.clone(), field_to_value(v))).collect())
        }
    }
}

/// An immutable domain entity reconstructable from a flat row.
pub trait Snapshot: Sized + Send + Sync {
    /// Rebuilds the entity from a result row.
    fn from_row(row: &Row) -> Result<Self, SnapstoreError>;

    /// Exports the entity's fields; `include_derived` adds computed fields that
    /// have no backing column.
    fn export(&self, include_derived: bool) -> FieldMap;
}

/// Declared scalar type of a source's identifier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Integer,
    Text,
}

/// Table metadata for one snapshot source.
///
/// Mirrors the storage layout a store instance reads from: the primary table and
/// alias, any joined tables participating in filter handlers, and the identifier
/// column contract.
pub trait SnapshotSource: Send + Sync {
    /// Entity type produced from this source's rows.
    type Item: Snapshot;

    /// Primary table name.
    fn table() -> &'static str;

    /// All tables participating in this source's queries, primary first.
    fn tables() -> Vec<String> {
        vec![Self::table().to_string()]
    }

    /// Alias of the primary table in generated SQL.
    fn primary_alias() -> &'static str {
        "t"
    }

    /// Primary identifier column name.
    fn identifier_name() -> &'static str {
        "id"
    }

    /// Primary identifier column type.
    fn identifier_kind() -> IdentifierKind {
        IdentifierKind::Integer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> FieldMap {
        let mut nested = FieldMap::new();
        nested.insert("enabled".into(), FieldValue::Bool(false));
        nested.insert("note".into(), FieldValue::Null);

        let mut fields = FieldMap::new();
        fields.insert("id".into(), FieldValue::Integer(42));
        fields.insert("active".into(), FieldValue::Bool(true));
        fields.insert(
            "created_at".into(),
            FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 5).unwrap()),
        );
        fields.insert("title".into(), FieldValue::text("hello"));
        fields.insert("deleted_at".into(), FieldValue::Null);
        fields.insert("profile".into(), FieldValue::Nested(nested));
        fields
    }

    #[test]
    fn normalize_maps_each_field_kind() {
        let normalized = normalize(sample());

        assert_eq!(normalized["id"], FieldValue::text("42"));
        assert_eq!(normalized["active"], FieldValue::text("1"));
        assert_eq!(normalized["created_at"], FieldValue::text("2024-03-09 12:30:05"));
        assert_eq!(normalized["title"], FieldValue::text("hello"));
        assert_eq!(normalized["deleted_at"], FieldValue::Null);

        let FieldValue::Nested(profile) = &normalized["profile"] else {
            panic!("nested entity should stay nested");
        };
        assert_eq!(profile["enabled"], FieldValue::text("0"));
        assert_eq!(profile["note"], FieldValue::Null);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(sample());
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn to_row_keeps_nulls_unstringified() {
        let row = to_row(&normalize(sample()));
        assert_eq!(row["deleted_at"], serde_json::Value::Null);
        assert_eq!(row["active"], serde_json::json!("1"));
    }
}
