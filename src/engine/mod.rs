//! The external query-execution collaborator.
//!
//! The store core never talks to a database directly; it hands finished SQL and
//! bound parameters to a [`QueryEngine`]. Backend failures surface unchanged as
//! [`SnapstoreError::Engine`]; no retry, timeout or cancellation lives here.

pub mod postgres;

use crate::errors::SnapstoreError;
use crate::row::Row;
use async_trait::async_trait;
use serde_json::Value;

pub use postgres::PgEngine;

/// Minimal execution surface required by the snapshot store.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Runs a select and returns its rows.
    async fn fetch(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SnapstoreError>;

    /// Runs a statement and returns the affected row count.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, SnapstoreError>;

    /// Plain insert primitive for the upsert path.
    async fn insert(&self, table: &str, data: &Row) -> Result<u64, SnapstoreError> {
        let columns: Vec<&str> = data.keys().map(String::as_str).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("${n}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );
        let params: Vec<Value> = data.values().cloned().collect();

        tracing::debug!(table, sql = %sql, "engine insert");
        self.execute(&sql, &params).await
    }

    /// Update-by-criteria primitive for the upsert path.
    ///
    /// SET parameters are numbered before WHERE parameters, in SQL order.
    async fn update_where(
        &self,
        table: &str,
        data: &Row,
        criteria: &Row,
    ) -> Result<u64, SnapstoreError> {
        let set_clause: Vec<String> = data
            .keys()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();
        let where_clause: Vec<String> = criteria
            .keys()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, data.len() + i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            table,
            set_clause.join(", "),
            where_clause.join(" AND ")
        );
        let params: Vec<Value> = data.values().chain(criteria.values()).cloned().collect();

        tracing::debug!(table, sql = %sql, "engine update");
        self.execute(&sql, &params).await
    }

    /// Conditional write with a native conflict clause; the atomic alternative to
    /// the store's check-then-write upsert.
    async fn insert_on_conflict(
        &self,
        table: &str,
        data: &Row,
        key_columns: &[&str],
    ) -> Result<u64, SnapstoreError> {
        let columns: Vec<&str> = data.keys().map(String::as_str).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("${n}")).collect();
        let updates: Vec<String> = columns
            .iter()
            .copied()
            .filter(|c| !key_columns.contains(c))
            .map(|c| format!("{c} = EXCLUDED.{c}"))
            .collect();
        let conflict_action = if updates.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {}", updates.join(", "))
        };
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {}",
            table,
            columns.join(", "),
            placeholders.join(", "),
            key_columns.join(", "),
            conflict_action
        );
        let params: Vec<Value> = data.values().cloned().collect();

        tracing::debug!(table, sql = %sql, "engine conditional insert");
        self.execute(&sql, &params).await
    }
}
