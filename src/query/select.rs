//! The pending query: a select under construction, owned by one store call
//! sequence between a selection call and the terminal fetch.

use crate::query::filter::QueryFilter;
use crate::query::join::JoinClause;
use crate::query::ordering::SortOrder;
use crate::query::sql::SqlGenerator;
use serde_json::Value;

/// A mutable select-query-under-construction.
///
/// Conditions compose conjunctively in insertion order; adding a condition never
/// replaces or discards earlier ones.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pub(crate) columns: Vec<String>,
    pub(crate) table: String,
    pub(crate) alias: Option<String>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) conditions: Vec<QueryFilter>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
}

impl SelectQuery {
    /// Base select over `table` under `alias`, selecting `alias.*`.
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            columns: vec![format!("{alias}.*")],
            table: table.into(),
            alias: Some(alias),
            joins: Vec::new(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Base select over `table` with no alias, selecting `*`.
    pub fn unaliased(table: impl Into<String>) -> Self {
        Self {
            columns: vec!["*".to_string()],
            table: table.into(),
            alias: None,
            joins: Vec::new(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Replace the select list.
    pub fn select(&mut self, columns: Vec<String>) -> &mut Self {
        self.columns = columns;
        self
    }

    /// Add a condition (combined with AND against earlier ones).
    pub fn and_where(&mut self, filter: QueryFilter) -> &mut Self {
        self.conditions.push(filter);
        self
    }

    /// Add a JOIN clause.
    pub fn join(&mut self, join: JoinClause) -> &mut Self {
        self.joins.push(join);
        self
    }

    /// Append an ordering term.
    pub fn order_by(&mut self, field: &str, order: SortOrder) -> &mut Self {
        self.order_by.push((field.to_string(), order));
        self
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Assemble the final SQL and its bound parameters.
    pub fn build(&self) -> (String, Vec<Value>) {
        let select_list = self.columns.join(", ");
        let from_part = match &self.alias {
            Some(alias) => format!("{} AS {}", self.table, alias),
            None => self.table.clone(),
        };
        let join_clause = SqlGenerator::build_join_clause(&self.joins);
        let (where_clause, values) = SqlGenerator::build_where_clause(&self.conditions);
        let order_clause = SqlGenerator::build_order_clause(&self.order_by);
        let limit_clause = SqlGenerator::build_limit_clause(self.limit, self.offset);

        let mut sql = String::with_capacity(
            16 + select_list.len()
                + from_part.len()
                + join_clause.len()
                + where_clause.len()
                + order_clause.len()
                + limit_clause.len(),
        );
        sql.push_str("SELECT ");
        sql.push_str(&select_list);
        sql.push_str(" FROM ");
        sql.push_str(&from_part);
        for clause in [&join_clause, &where_clause, &order_clause, &limit_clause] {
            if !clause.is_empty() {
                sql.push(' ');
                sql.push_str(clause);
            }
        }

        (sql, values)
    }
}
