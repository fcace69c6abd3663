//! Lazily-materialized snapshot sequences.

use crate::errors::SnapstoreError;
use crate::pagination::PaginationResult;
use crate::row::Row;
use crate::snapshot::Snapshot;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Key a snapshot is yielded under: its identifier column value, or its
/// positional index when the row carries no identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotKey {
    Id(Value),
    Index(usize),
}

/// An ordered, single-pass sequence of snapshots with its pagination metadata.
///
/// Rows are fetched eagerly by the query engine when the store executes; snapshot
/// construction is deferred until iteration. The sequence is finite, bounded by
/// the page size, and not restartable once consumed — matching the store's
/// one-shot pending-query contract. Dropping the collection releases the
/// remaining rows.
pub struct SnapshotCollection<S: Snapshot> {
    identifier: &'static str,
    pagination: PaginationResult,
    rows: std::vec::IntoIter<Row>,
    position: usize,
    _marker: PhantomData<S>,
}

impl<S: Snapshot> SnapshotCollection<S> {
    pub(crate) fn new(identifier: &'static str, pagination: PaginationResult, rows: Vec<Row>) -> Self {
        Self {
            identifier,
            pagination,
            rows: rows.into_iter(),
            position: 0,
            _marker: PhantomData,
        }
    }

    /// Pagination metadata attached at execution time.
    pub fn pagination(&self) -> &PaginationResult {
        &self.pagination
    }

    /// Number of rows not yet materialized.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.len() == 0
    }

    /// Consumes the sequence into a concrete keyed list.
    pub fn materialize(self) -> Result<Vec<(SnapshotKey, S)>, SnapstoreError> {
        self.collect()
    }
}

// Unmaterialized rows stay opaque, so no bound on the snapshot type is needed.
impl<S: Snapshot> fmt::Debug for SnapshotCollection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotCollection")
            .field("identifier", &self.identifier)
            .field("pagination", &self.pagination)
            .field("remaining", &self.rows.len())
            .finish()
    }
}

impl<S: Snapshot> Iterator for SnapshotCollection<S> {
    type Item = Result<(SnapshotKey, S), SnapstoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        let key = match row.get(self.identifier) {
            Some(value) if !value.is_null() => SnapshotKey::Id(value.clone()),
            _ => SnapshotKey::Index(self.position),
        };
        self.position += 1;

        Some(S::from_row(&row).map(|snapshot| (key, snapshot)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::row;
    use crate::snapshot::{FieldMap, FieldValue};
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: Option<i64>,
    }

    impl Snapshot for Item {
        fn from_row(row: &Row) -> Result<Self, SnapstoreError> {
            Ok(Self {
                id: row.get("id").and_then(Value::as_i64),
            })
        }

        fn export(&self, _include_derived: bool) -> FieldMap {
            let mut fields = FieldMap::new();
            fields.insert(
                "id".into(),
                self.id.map_or(FieldValue::Null, FieldValue::Integer),
            );
            fields
        }
    }

    #[test]
    fn keys_by_identifier_with_positional_fallback() {
        let rows = vec![
            row([("id", json!(7))]),
            row([("id", json!(Value::Null))]),
            row([("name", json!("no id column"))]),
        ];
        let collection =
            SnapshotCollection::<Item>::new("id", PaginationResult::default(), rows);

        let keys: Vec<SnapshotKey> = collection.map(|item| item.unwrap().0).collect();
        assert_eq!(
            keys,
            vec![
                SnapshotKey::Id(json!(7)),
                SnapshotKey::Index(1),
                SnapshotKey::Index(2),
            ]
        );
    }

    #[test]
    fn debug_reports_remaining_rows_not_contents() {
        let rows = vec![row([("id", json!(1))]), row([("id", json!(2))])];
        let collection =
            SnapshotCollection::<Item>::new("id", PaginationResult::default(), rows);

        let rendered = format!("{collection:?}");
        assert!(rendered.starts_with("SnapshotCollection"), "{rendered}");
        assert!(rendered.contains("remaining: 2"), "{rendered}");
    }

    #[test]
    fn iteration_is_single_pass() {
        let rows = vec![row([("id", json!(1))]), row([("id", json!(2))])];
        let mut collection =
            SnapshotCollection::<Item>::new("id", PaginationResult::default(), rows);

        assert_eq!(collection.remaining(), 2);
        collection.next().unwrap().unwrap();
        assert_eq!(collection.remaining(), 1);
        collection.next().unwrap().unwrap();
        assert!(collection.next().is_none());
    }
}
