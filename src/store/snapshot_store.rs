//! Store orchestration: base selects, filter application, paginated execution
//! and lazy snapshot materialization.

use crate::collection::SnapshotCollection;
use crate::engine::QueryEngine;
use crate::errors::SnapstoreError;
use crate::filters::{FilterHandlerRegistry, Filters, HandlerContext};
use crate::pagination::{Paginator, Pagination};
use crate::query::{QueryFilter, SelectQuery};
use crate::row::Row;
use crate::snapshot::{IdentifierKind, SnapshotSource};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Repository of immutable domain snapshots over one [`SnapshotSource`].
///
/// A selection call (`select_by_ids`, `select_all`) opens a pending query; filter
/// application mutates it; `fetch` executes it exactly once and clears it. The
/// pending query is per-instance mutable state, so concurrent call sequences need
/// distinct store instances (`&mut self` makes shared misuse impossible).
pub struct SnapshotStore<Src: SnapshotSource, E: QueryEngine> {
    engine: Arc<E>,
    registry: Arc<FilterHandlerRegistry>,
    pending: Option<SelectQuery>,
    _marker: PhantomData<Src>,
}

impl<Src: SnapshotSource, E: QueryEngine> SnapshotStore<Src, E> {
    pub fn new(engine: Arc<E>, registry: Arc<FilterHandlerRegistry>) -> Self {
        Self {
            engine,
            registry,
            pending: None,
            _marker: PhantomData,
        }
    }

    /// Base select over the primary table and alias.
    fn base_select(&self) -> SelectQuery {
        SelectQuery::new(Src::table(), Src::primary_alias())
    }

    /// Whether a selection call has opened a query that `fetch` has not consumed.
    pub fn has_pending_query(&self) -> bool {
        self.pending.is_some()
    }

    /// Opens a select restricted to `identifier IN (ids)`.
    ///
    /// Ids are coerced to the source's declared identifier scalar type. An empty
    /// id list is not an error; it fetches an empty collection.
    pub fn select_by_ids(&mut self, ids: &[Value]) -> &mut Self {
        let ids: Vec<Value> = ids.iter().map(|id| coerce_id::<Src>(id)).collect();
        let identifier = format!("{}.{}", Src::primary_alias(), Src::identifier_name());

        let mut query = self.base_select();
        query.and_where(QueryFilter::in_values(&identifier, ids));
        self.pending = Some(query);
        self
    }

    /// Opens an unrestricted select over the primary table.
    pub fn select_all(&mut self) -> &mut Self {
        self.pending = Some(self.base_select());
        self
    }

    /// Applies filters to the pending query in input order.
    ///
    /// Each filter's handler is resolved by kind from the registry and invoked
    /// with the injected context; filters compose conjunctively unless a handler
    /// introduces disjunction inside its own predicate.
    pub fn apply_filters(&mut self, filters: &Filters) -> Result<&mut Self, SnapstoreError> {
        let query = self.pending.as_mut().ok_or(SnapstoreError::NoActiveQuery)?;
        let tables = Src::tables();

        for filter in filters.iter() {
            let handler = self.registry.resolve(filter.kind())?;
            let mut ctx = HandlerContext::new(query, &tables, Some(Src::primary_alias()));
            handler.apply(filter, &mut ctx)?;
        }

        Ok(self)
    }

    /// Executes the pending query through the selected pagination strategy and
    /// returns a lazy snapshot sequence with its pagination metadata.
    ///
    /// One-shot: the pending query is cleared, so a second fetch without a new
    /// selection call fails with `NoActiveQuery`.
    pub async fn fetch(
        &mut self,
        pagination: Option<&Pagination>,
    ) -> Result<SnapshotCollection<Src::Item>, SnapstoreError> {
        let query = self.pending.take().ok_or(SnapstoreError::NoActiveQuery)?;

        let paginator = Paginator::select(pagination)?;
        let (result, rows) = paginator.paginate(self.engine.as_ref(), query).await?;
        tracing::debug!(
            table = Src::table(),
            rows = rows.len(),
            has_next = result.has_next,
            "fetched snapshot page"
        );

        Ok(SnapshotCollection::new(Src::identifier_name(), result, rows))
    }

    /// Inserts `data` when no row matches `unique_key`, otherwise updates the
    /// matching rows with `data`. Returns the affected row count.
    ///
    /// Not atomic: the existence check and the write are two backend round-trips
    /// with no transaction scope, so concurrent writers on the same key can race.
    /// Callers needing strict atomicity should use [`Self::upsert_atomic`] or a
    /// backend uniqueness constraint.
    pub async fn upsert(
        &self,
        table: &str,
        data: &Row,
        unique_key: &Row,
    ) -> Result<u64, SnapstoreError> {
        let mut check = SelectQuery::unaliased(table);
        check.select(unique_key.keys().map(|k| format!("\"{k}\"")).collect());
        for (column, value) in unique_key {
            check.and_where(QueryFilter::eq(&format!("\"{column}\""), value.clone()));
        }

        let (sql, params) = check.build();
        tracing::debug!(table, sql = %sql, "upsert existence check");
        let existing = self.engine.fetch(&sql, &params).await?;

        if existing.is_empty() {
            self.engine.insert(table, data).await
        } else {
            self.engine.update_where(table, data, unique_key).await
        }
    }

    /// Single-round-trip upsert through the engine's native conflict clause.
    ///
    /// `unique_key` columns are merged into the inserted row and name the
    /// conflict target; a backend uniqueness constraint over them is required.
    pub async fn upsert_atomic(
        &self,
        table: &str,
        data: &Row,
        unique_key: &Row,
    ) -> Result<u64, SnapstoreError> {
        let mut full: Row = unique_key.clone();
        full.extend(data.clone());
        let key_columns: Vec<&str> = unique_key.keys().map(String::as_str).collect();

        self.engine.insert_on_conflict(table, &full, &key_columns).await
    }
}

// The engine is an opaque collaborator; the pending query is the interesting
// state.
impl<Src: SnapshotSource, E: QueryEngine> fmt::Debug for SnapshotStore<Src, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("table", &Src::table())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn coerce_id<Src: SnapshotSource>(id: &Value) -> Value {
    match Src::identifier_kind() {
        IdentifierKind::Integer => match id {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or_else(|_| id.clone()),
            other => other.clone(),
        },
        IdentifierKind::Text => match id {
            Value::String(_) => id.clone(),
            other => Value::String(other.to_string()),
        },
    }
}
