//! Snapstore - a data-access layer over a relational query engine
//!
//! This crate turns a query engine into a repository of immutable domain
//! snapshots: records are requested by identifier or by a composable sequence of
//! filters, paginated with offset or cursor semantics, and materialized lazily
//! into strongly-typed entities. Query execution itself lives behind the
//! [`QueryEngine`] trait; a sqlx PostgreSQL implementation is provided.

pub mod aliases;
pub mod collection;
pub mod engine;
pub mod errors;
pub mod filters;
pub mod pagination;
pub mod prelude;
pub mod query;
pub mod row;
pub mod snapshot;
pub mod store;

pub use collection::{SnapshotCollection, SnapshotKey};
pub use engine::{PgEngine, QueryEngine};
pub use errors::SnapstoreError;
pub use filters::{Filter, FilterHandler, FilterHandlerRegistry, Filters, HandlerContext};
pub use pagination::{Pagination, PaginationResult, Sort};
pub use query::{QueryFilter, QueryOperator, SelectQuery, SortOrder};
pub use row::Row;
pub use snapshot::{FieldMap, FieldValue, IdentifierKind, Snapshot, SnapshotSource};
pub use store::SnapshotStore;
