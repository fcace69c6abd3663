//! Offset-based pagination: page size plus a numeric position token.

use crate::engine::QueryEngine;
use crate::errors::SnapstoreError;
use crate::pagination::{Pagination, PaginationResult, Sort};
use crate::query::SelectQuery;
use crate::row::Row;

pub struct OffsetPaginator {
    offset: i64,
    max_results: i64,
    sorts: Vec<Sort>,
}

impl OffsetPaginator {
    pub(crate) fn configure(pagination: &Pagination) -> Result<Self, SnapstoreError> {
        let offset = match &pagination.current_cursor {
            Some(token) => token
                .parse::<i64>()
                .map_err(|_| SnapstoreError::MalformedCursor(token.clone()))?
                .max(0),
            None => 0,
        };

        Ok(Self {
            offset,
            // A page always holds at least one row.
            max_results: pagination.max_results.max(1),
            sorts: pagination.sort_terms(),
        })
    }

    pub(crate) async fn paginate(
        self,
        engine: &dyn QueryEngine,
        mut query: SelectQuery,
    ) -> Result<(PaginationResult, Vec<Row>), SnapstoreError> {
        for sort in &self.sorts {
            query.order_by(&sort.property, sort.order);
        }
        // One extra row decides has_next without a separate count query.
        query.limit(self.max_results + 1).offset(self.offset);

        let (sql, params) = query.build();
        tracing::debug!(sql = %sql, offset = self.offset, "offset page fetch");
        let mut rows = engine.fetch(&sql, &params).await?;

        let has_next = rows.len() as i64 > self.max_results;
        rows.truncate(self.max_results as usize);

        let has_previous = self.offset > 0;
        let result = PaginationResult {
            next_cursor: has_next.then(|| (self.offset + self.max_results).to_string()),
            previous_cursor: has_previous
                .then(|| (self.offset - self.max_results).max(0).to_string()),
            has_next,
            has_previous,
        };

        Ok((result, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_page_size_is_clamped_to_one() {
        let paginator = OffsetPaginator::configure(&Pagination::offset(-3)).unwrap();
        assert_eq!(paginator.max_results, 1);
    }

    #[test]
    fn negative_position_token_is_clamped_to_start() {
        let paginator =
            OffsetPaginator::configure(&Pagination::offset(3).starting_at(-9)).unwrap();
        assert_eq!(paginator.offset, 0);
    }
}
