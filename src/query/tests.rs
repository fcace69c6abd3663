#[cfg(test)]
mod tests {
    use crate::query::{JoinClause, JoinType, QueryFilter, SelectQuery, SortOrder};
    use serde_json::json;

    // ========================================
    // WHERE clause generation
    // ========================================

    #[test]
    fn test_conditions_join_with_and_in_insertion_order() {
        let mut query = SelectQuery::new("users", "t");
        query
            .and_where(QueryFilter::eq("t.status", json!("active")))
            .and_where(QueryFilter::gt("t.age", json!(18)));

        let (sql, params) = query.build();
        assert_eq!(
            sql,
            "SELECT t.* FROM users AS t WHERE t.status = $1 AND t.age > $2"
        );
        assert_eq!(params, vec![json!("active"), json!(18)]);
    }

    #[test]
    fn test_or_group_keeps_surrounding_and_composition() {
        let mut query = SelectQuery::new("users", "t");
        query
            .and_where(QueryFilter::eq("t.tenant", json!(3)))
            .and_where(QueryFilter::or(vec![
                QueryFilter::eq("t.status", json!("active")),
                QueryFilter::eq("t.status", json!("pending")),
            ]));

        let (sql, params) = query.build();
        assert_eq!(
            sql,
            "SELECT t.* FROM users AS t WHERE t.tenant = $1 AND (t.status = $2 OR t.status = $3)"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_in_condition_numbers_each_placeholder() {
        let mut query = SelectQuery::new("users", "t");
        query.and_where(QueryFilter::in_values(
            "t.id",
            vec![json!(1), json!(2), json!(3)],
        ));

        let (sql, params) = query.build();
        assert!(sql.ends_with("WHERE t.id IN ($1, $2, $3)"));
        assert_eq!(params, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_empty_in_condition_matches_nothing() {
        let mut query = SelectQuery::new("users", "t");
        query.and_where(QueryFilter::in_values("t.id", vec![]));

        let (sql, params) = query.build();
        assert!(sql.ends_with("WHERE 1=0"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_null_conditions_bind_no_params() {
        let mut query = SelectQuery::new("users", "t");
        query
            .and_where(QueryFilter::is_null("t.deleted_at"))
            .and_where(QueryFilter::is_not_null("t.email"));

        let (sql, params) = query.build();
        assert!(sql.ends_with("WHERE t.deleted_at IS NULL AND t.email IS NOT NULL"));
        assert!(params.is_empty());
    }

    // ========================================
    // Full statement assembly
    // ========================================

    #[test]
    fn test_bare_base_select() {
        let (sql, params) = SelectQuery::new("users", "t").build();
        assert_eq!(sql, "SELECT t.* FROM users AS t");
        assert!(params.is_empty());
    }

    #[test]
    fn test_unaliased_select() {
        let (sql, _) = SelectQuery::unaliased("users").build();
        assert_eq!(sql, "SELECT * FROM users");
    }

    #[test]
    fn test_clause_ordering_join_where_order_limit() {
        let mut query = SelectQuery::new("users", "t");
        query
            .join(JoinClause::new_on(JoinType::Left, "profiles", "t.id", "p.user_id").with_alias("p"))
            .and_where(QueryFilter::eq("t.status", json!("active")))
            .order_by("t.id", SortOrder::Asc)
            .limit(10)
            .offset(20);

        let (sql, _) = query.build();
        assert_eq!(
            sql,
            "SELECT t.* FROM users AS t LEFT JOIN profiles AS p ON t.id = p.user_id \
             WHERE t.status = $1 ORDER BY t.id ASC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_order_terms_keep_insertion_order() {
        let mut query = SelectQuery::new("users", "t");
        query
            .order_by("t.created_at", SortOrder::Desc)
            .order_by("t.id", SortOrder::Asc);

        let (sql, _) = query.build();
        assert!(sql.ends_with("ORDER BY t.created_at DESC, t.id ASC"));
    }

    #[test]
    fn test_custom_select_list() {
        let mut query = SelectQuery::new("users", "t");
        query.select(vec!["t.id".to_string(), "t.name".to_string()]);

        let (sql, _) = query.build();
        assert!(sql.starts_with("SELECT t.id, t.name FROM"));
    }
}
