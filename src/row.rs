//! Flat result-row representation shared between the query engine and the store.

use serde_json::Value;
use std::collections::BTreeMap;

/// A single result row: column name to scalar value.
///
/// Ordered so generated SQL (column lists, SET clauses) is deterministic.
pub type Row = BTreeMap<String, Value>;

/// Builds a row from `(column, value)` pairs.
pub fn row<I, K>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_builder_keeps_column_order_stable() {
        let r = row([("b", json!(2)), ("a", json!(1))]);
        let keys: Vec<&str> = r.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
