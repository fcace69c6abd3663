//! Pagination descriptors, result metadata and strategy selection.
//!
//! A fetch runs through exactly one strategy, chosen once from the optional
//! [`Pagination`] descriptor: no descriptor executes the query as-is, cursor mode
//! pages by opaque boundary tokens, anything else pages by numeric offset.

pub mod cursor;
pub mod offset;

use crate::engine::QueryEngine;
use crate::errors::SnapstoreError;
use crate::query::{SelectQuery, SortOrder};
use crate::row::Row;
use serde::{Deserialize, Serialize};

pub use cursor::CursorPaginator;
pub use offset::OffsetPaginator;

/// One ordering term of a pagination descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub property: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(property: impl Into<String>, order: SortOrder) -> Self {
        Self {
            property: property.into(),
            order,
        }
    }
}

/// Immutable pagination descriptor supplied by the caller.
///
/// Cursor tokens are opaque, strategy-defined encodings of the sort key's value
/// at a page boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub cursor_mode: bool,
    pub max_results: i64,
    /// Offset strategy: current position token (numeric offset).
    pub current_cursor: Option<String>,
    /// Cursor strategy: forward boundary (`after`).
    pub next_cursor: Option<String>,
    /// Cursor strategy: backward boundary (`before`).
    pub previous_cursor: Option<String>,
    pub reverse_results: bool,
    pub primary_sort: Option<Sort>,
    pub backup_sort: Option<Sort>,
}

impl Pagination {
    /// Offset-based paging with the given page size.
    pub fn offset(max_results: i64) -> Self {
        Self {
            max_results,
            ..Self::default()
        }
    }

    /// Cursor-based paging with the given page size.
    pub fn cursor(max_results: i64) -> Self {
        Self {
            cursor_mode: true,
            max_results,
            ..Self::default()
        }
    }

    pub fn is_cursor_pagination(&self) -> bool {
        self.cursor_mode
    }

    /// Offset strategy: start at `offset` rows in.
    pub fn starting_at(mut self, offset: i64) -> Self {
        self.current_cursor = Some(offset.to_string());
        self
    }

    /// Cursor strategy: page forward from this boundary token.
    pub fn after(mut self, token: impl Into<String>) -> Self {
        self.next_cursor = Some(token.into());
        self
    }

    /// Cursor strategy: page backward from this boundary token.
    pub fn before(mut self, token: impl Into<String>) -> Self {
        self.previous_cursor = Some(token.into());
        self
    }

    /// Invert row ordering before materialization.
    pub fn reversed(mut self) -> Self {
        self.reverse_results = true;
        self
    }

    pub fn with_primary_sort(mut self, property: impl Into<String>, order: SortOrder) -> Self {
        self.primary_sort = Some(Sort::new(property, order));
        self
    }

    pub fn with_backup_sort(mut self, property: impl Into<String>, order: SortOrder) -> Self {
        self.backup_sort = Some(Sort::new(property, order));
        self
    }

    /// Effective ordering terms: primary first, backup second.
    ///
    /// A backup sort supplied without a primary sort is promoted to primary
    /// instead of being rejected.
    pub fn sort_terms(&self) -> Vec<Sort> {
        match (&self.primary_sort, &self.backup_sort) {
            (Some(primary), Some(backup)) => vec![primary.clone(), backup.clone()],
            (Some(primary), None) => vec![primary.clone()],
            (None, Some(backup)) => vec![backup.clone()],
            (None, None) => Vec::new(),
        }
    }
}

/// Strategy-specific metadata attached to a materialized result collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResult {
    pub next_cursor: Option<String>,
    pub previous_cursor: Option<String>,
    pub has_next: bool,
    pub has_previous: bool,
}

/// The strategy chosen for one fetch. Selection is one-shot; there is no
/// mid-flight transition.
pub(crate) enum Paginator {
    Null,
    Offset(OffsetPaginator),
    Cursor(CursorPaginator),
}

impl Paginator {
    pub(crate) fn select(pagination: Option<&Pagination>) -> Result<Self, SnapstoreError> {
        let Some(pagination) = pagination else {
            return Ok(Self::Null);
        };

        if pagination.is_cursor_pagination() {
            Ok(Self::Cursor(CursorPaginator::configure(pagination)?))
        } else {
            Ok(Self::Offset(OffsetPaginator::configure(pagination)?))
        }
    }

    /// Executes the query under this strategy, returning page metadata and rows.
    pub(crate) async fn paginate(
        self,
        engine: &dyn QueryEngine,
        query: SelectQuery,
    ) -> Result<(PaginationResult, Vec<Row>), SnapstoreError> {
        match self {
            Self::Null => {
                let (sql, params) = query.build();
                tracing::debug!(sql = %sql, "unbounded fetch");
                let rows = engine.fetch(&sql, &params).await?;
                Ok((PaginationResult::default(), rows))
            }
            Self::Offset(paginator) => paginator.paginate(engine, query).await,
            Self::Cursor(paginator) => paginator.paginate(engine, query).await,
        }
    }
}
