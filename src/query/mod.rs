//! Pending-query construction
//!
//! This module provides SQL query construction for the snapshot store: predicate
//! composition, joins, ordering and final clause assembly with `$n` placeholders.

pub mod filter;
pub mod join;
pub mod ordering;
pub mod select;
pub mod sql;

#[cfg(test)]
mod tests;

pub use filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use join::{JoinClause, JoinCondition, JoinType};
pub use ordering::SortOrder;
pub use select::SelectQuery;
