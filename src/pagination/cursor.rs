//! Cursor-based pagination: paging by opaque boundary tokens instead of numeric
//! offsets, stable under concurrent writes.
//!
//! A token encodes the sort key's values at a page boundary. Forward paging adds
//! a strict lexicographic "after" predicate over the sort terms; backward paging
//! fetches under inverted ordering with a strict "before" predicate. With
//! duplicate primary sort values a unique backup sort term is required for
//! gapless paging.

use crate::engine::QueryEngine;
use crate::errors::SnapstoreError;
use crate::pagination::{Pagination, PaginationResult, Sort};
use crate::query::{QueryFilter, SelectQuery, SortOrder};
use crate::row::Row;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;

pub struct CursorPaginator {
    max_results: i64,
    after: Option<Vec<Value>>,
    before: Option<Vec<Value>>,
    reverse_results: bool,
    sorts: Vec<Sort>,
}

impl CursorPaginator {
    pub(crate) fn configure(pagination: &Pagination) -> Result<Self, SnapstoreError> {
        Ok(Self {
            // A page always holds at least one row; non-positive sizes would
            // turn the probe limit and truncation into nonsense.
            max_results: pagination.max_results.max(1),
            after: pagination.next_cursor.as_deref().map(decode_token).transpose()?,
            before: pagination
                .previous_cursor
                .as_deref()
                .map(decode_token)
                .transpose()?,
            reverse_results: pagination.reverse_results,
            sorts: pagination.sort_terms(),
        })
    }

    pub(crate) async fn paginate(
        self,
        engine: &dyn QueryEngine,
        mut query: SelectQuery,
    ) -> Result<(PaginationResult, Vec<Row>), SnapstoreError> {
        // Backward paging fetches under inverted ordering so LIMIT trims at the
        // far side of the boundary.
        let backward = self.before.is_some() && self.after.is_none();

        // Boundary tokens are only meaningful against sort terms.
        if !self.sorts.is_empty() {
            if let Some(values) = &self.after {
                query.and_where(boundary_filter(&self.sorts, values, true));
            }
            if let Some(values) = &self.before {
                query.and_where(boundary_filter(&self.sorts, values, false));
            }
        }

        for sort in &self.sorts {
            let order = if backward { sort.order.reversed() } else { sort.order };
            query.order_by(&sort.property, order);
        }
        query.limit(self.max_results + 1);

        let (sql, params) = query.build();
        tracing::debug!(sql = %sql, backward, "cursor page fetch");
        let mut rows = engine.fetch(&sql, &params).await?;

        let has_more = rows.len() as i64 > self.max_results;
        rows.truncate(self.max_results as usize);

        // Boundary tokens always describe the page in natural sort order.
        let natural: Vec<&Row> = if backward {
            rows.iter().rev().collect()
        } else {
            rows.iter().collect()
        };
        let previous_cursor = natural.first().and_then(|row| self.token_for(row));
        let next_cursor = natural.last().and_then(|row| self.token_for(row));

        let result = if backward {
            PaginationResult {
                next_cursor,
                previous_cursor,
                has_next: true,
                has_previous: has_more,
            }
        } else {
            PaginationResult {
                next_cursor,
                previous_cursor,
                has_next: has_more,
                has_previous: self.after.is_some(),
            }
        };

        if self.reverse_results {
            rows.reverse();
        }

        Ok((result, rows))
    }

    fn token_for(&self, row: &Row) -> Option<String> {
        if self.sorts.is_empty() {
            return None;
        }
        let values: Vec<Value> = self
            .sorts
            .iter()
            .map(|sort| sort_key_value(row, &sort.property))
            .collect();
        Some(encode_token(&values))
    }
}

/// Strict lexicographic comparison of the sort terms against boundary values.
///
/// `forward` selects the "after" side of the boundary; the comparison direction
/// of each term follows its sort order.
fn boundary_filter(sorts: &[Sort], values: &[Value], forward: bool) -> QueryFilter {
    let terms: Vec<(&Sort, &Value)> = sorts.iter().zip(values.iter()).collect();

    let mut alternatives = Vec::with_capacity(terms.len());
    for (i, (sort, value)) in terms.iter().enumerate() {
        let strict = strict_condition(sort, value, forward);
        if i == 0 {
            alternatives.push(strict);
        } else {
            let mut conjuncts: Vec<QueryFilter> = terms[..i]
                .iter()
                .map(|(s, v)| QueryFilter::eq(&s.property, (*v).clone()))
                .collect();
            conjuncts.push(strict);
            alternatives.push(QueryFilter::and(conjuncts));
        }
    }

    if alternatives.len() == 1 {
        alternatives.swap_remove(0)
    } else {
        QueryFilter::or(alternatives)
    }
}

fn strict_condition(sort: &Sort, value: &Value, forward: bool) -> QueryFilter {
    let ascending = sort.order == SortOrder::Asc;
    if ascending == forward {
        QueryFilter::gt(&sort.property, value.clone())
    } else {
        QueryFilter::lt(&sort.property, value.clone())
    }
}

/// Result rows carry unqualified column names even when the sort property is
/// alias-qualified.
fn sort_key_value(row: &Row, property: &str) -> Value {
    let column = property.rsplit_once('.').map_or(property, |(_, col)| col);
    row.get(column).cloned().unwrap_or(Value::Null)
}

fn encode_token(values: &[Value]) -> String {
    let json = serde_json::to_vec(values).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode_token(token: &str) -> Result<Vec<Value>, SnapstoreError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| SnapstoreError::MalformedCursor(token.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|_| SnapstoreError::MalformedCursor(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_round_trips_sort_key_values() {
        let values = vec![json!("active"), json!(42)];
        let token = encode_token(&values);
        assert_eq!(decode_token(&token).unwrap(), values);
    }

    #[test]
    fn non_positive_page_size_is_clamped_to_one() {
        let paginator = CursorPaginator::configure(&Pagination::cursor(0)).unwrap();
        assert_eq!(paginator.max_results, 1);

        let paginator = CursorPaginator::configure(&Pagination::cursor(-5)).unwrap();
        assert_eq!(paginator.max_results, 1);
    }

    #[test]
    fn malformed_token_is_rejected() {
        let err = decode_token("not~base64~at~all").unwrap_err();
        assert!(matches!(err, SnapstoreError::MalformedCursor(_)));
    }

    #[test]
    fn single_term_boundary_is_a_strict_comparison() {
        let sorts = vec![Sort::new("id", SortOrder::Asc)];
        let filter = boundary_filter(&sorts, &[json!(5)], true);

        let mut query = SelectQuery::new("items", "t");
        query.and_where(filter);
        let (sql, params) = query.build();
        assert!(sql.ends_with("WHERE id > $1"));
        assert_eq!(params, vec![json!(5)]);
    }

    #[test]
    fn two_term_boundary_breaks_ties_on_backup_sort() {
        let sorts = vec![
            Sort::new("rank", SortOrder::Asc),
            Sort::new("id", SortOrder::Asc),
        ];
        let filter = boundary_filter(&sorts, &[json!(3), json!(17)], true);

        let mut query = SelectQuery::new("items", "t");
        query.and_where(filter);
        let (sql, params) = query.build();
        assert!(sql.ends_with("WHERE (rank > $1 OR (rank = $2 AND id > $3))"));
        assert_eq!(params, vec![json!(3), json!(3), json!(17)]);
    }

    #[test]
    fn descending_sort_inverts_the_comparison() {
        let sorts = vec![Sort::new("created_at", SortOrder::Desc)];
        let filter = boundary_filter(&sorts, &[json!("2024-01-01 00:00:00")], true);

        let mut query = SelectQuery::new("items", "t");
        query.and_where(filter);
        let (sql, _) = query.build();
        assert!(sql.ends_with("WHERE created_at < $1"));
    }

    #[test]
    fn before_boundary_flips_the_direction() {
        let sorts = vec![Sort::new("id", SortOrder::Asc)];
        let filter = boundary_filter(&sorts, &[json!(5)], false);

        let mut query = SelectQuery::new("items", "t");
        query.and_where(filter);
        let (sql, _) = query.build();
        assert!(sql.ends_with("WHERE id < $1"));
    }
}
