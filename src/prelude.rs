//! Convenience re-exports for common snapstore usage

// Entity and source contracts
pub use crate::snapshot::{FieldMap, FieldValue, IdentifierKind, Snapshot, SnapshotSource};

// Error type
pub use crate::errors::SnapstoreError;

// Store and collections
pub use crate::collection::{SnapshotCollection, SnapshotKey};
pub use crate::store::SnapshotStore;

// Filter plumbing
pub use crate::filters::{Filter, FilterHandler, FilterHandlerRegistry, Filters, HandlerContext};

// Query building
pub use crate::query::{QueryFilter, QueryOperator, SelectQuery, SortOrder};

// Pagination
pub use crate::pagination::{Pagination, PaginationResult, Sort};

// Engine boundary
pub use crate::engine::{PgEngine, QueryEngine};
pub use crate::row::Row;

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde_json::Value;
