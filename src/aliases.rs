//! Alias namespacing for joined selects.
//!
//! Encodes a nested per-alias column specification into flat, namespaced select
//! expressions (`alias."col" AS "alias.col"`) and decodes a flat result row back
//! into per-alias buckets.

use crate::row::Row;
use std::collections::BTreeMap;

/// Separator between the table alias and the column name in flattened names.
const GLUE: char = '.';

/// One selected column under an alias, optionally renamed in the output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasedColumn {
    /// Read `column`, expose it as `alias.column`.
    Plain(String),
    /// Read `column`, expose it as `alias.rename`.
    Renamed { column: String, rename: String },
}

impl AliasedColumn {
    pub fn plain(column: impl Into<String>) -> Self {
        Self::Plain(column.into())
    }

    pub fn renamed(column: impl Into<String>, rename: impl Into<String>) -> Self {
        Self::Renamed {
            column: column.into(),
            rename: rename.into(),
        }
    }
}

/// Converts a nested alias/column specification into namespaced select expressions.
///
/// Identifiers are double-quoted to tolerate reserved words. Two aliases must not
/// flatten to the same output name; supplying a collision is a caller error and the
/// resulting row shape is undefined.
pub fn encode(spec: &BTreeMap<String, Vec<AliasedColumn>>) -> Vec<String> {
    let mut columns = Vec::new();

    for (alias, cols) in spec {
        for col in cols {
            let (source, out_name) = match col {
                AliasedColumn::Plain(column) => (column, column),
                AliasedColumn::Renamed { column, rename } => (column, rename),
            };
            columns.push(format!(
                "{alias}.\"{source}\" AS \"{alias}{GLUE}{out_name}\""
            ));
        }
    }

    columns
}

/// Converts a namespaced result row back into per-alias column maps.
///
/// Keys without the namespace separator are dropped. With `merge_into` set, every
/// other alias's bucket is attached under its alias name inside the `merge_into`
/// bucket and that single bucket is returned (used to hang joined side-data off a
/// primary entity's field map).
pub fn decode(row: &Row, merge_into: Option<&str>) -> BTreeMap<String, Row> {
    let mut buckets: BTreeMap<String, Row> = BTreeMap::new();

    for (name, value) in row {
        if let Some((alias, column)) = name.split_once(GLUE) {
            buckets
                .entry(alias.to_string())
                .or_default()
                .insert(column.to_string(), value.clone());
        }
    }

    if let Some(primary) = merge_into {
        let mut merged = buckets.remove(primary).unwrap_or_default();
        for (alias, fields) in buckets {
            merged.insert(alias, serde_json::to_value(fields).unwrap_or_default());
        }
        let mut out = BTreeMap::new();
        out.insert(primary.to_string(), merged);
        return out;
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::row;
    use serde_json::json;

    fn spec() -> BTreeMap<String, Vec<AliasedColumn>> {
        let mut spec = BTreeMap::new();
        spec.insert(
            "t".to_string(),
            vec![AliasedColumn::plain("id"), AliasedColumn::plain("status")],
        );
        spec.insert(
            "u".to_string(),
            vec![
                AliasedColumn::plain("name"),
                AliasedColumn::renamed("created_at", "joined_at"),
            ],
        );
        spec
    }

    #[test]
    fn encode_namespaces_and_quotes_columns() {
        let columns = encode(&spec());
        assert_eq!(
            columns,
            vec![
                r#"t."id" AS "t.id""#,
                r#"t."status" AS "t.status""#,
                r#"u."name" AS "u.name""#,
                r#"u."created_at" AS "u.joined_at""#,
            ]
        );
    }

    #[test]
    fn decode_round_trips_encoded_spec() {
        // A row shaped like what the encoded select list would return.
        let result = row([
            ("t.id", json!(7)),
            ("t.status", json!("active")),
            ("u.name", json!("ada")),
            ("u.joined_at", json!("2024-01-01 00:00:00")),
            ("stray", json!("dropped")),
        ]);

        let decoded = decode(&result, None);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded["t"]["id"], json!(7));
        assert_eq!(decoded["t"]["status"], json!("active"));
        assert_eq!(decoded["u"]["name"], json!("ada"));
        assert_eq!(decoded["u"]["joined_at"], json!("2024-01-01 00:00:00"));
        assert!(!decoded.contains_key("stray"));
    }

    #[test]
    fn decode_drops_keys_without_separator() {
        let result = row([("plain", json!(1)), ("t.id", json!(2))]);
        let decoded = decode(&result, None);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded["t"]["id"], json!(2));
    }

    #[test]
    fn decode_merges_side_aliases_into_primary_bucket() {
        let result = row([
            ("t.id", json!(7)),
            ("u.name", json!("ada")),
        ]);

        let decoded = decode(&result, Some("t"));
        assert_eq!(decoded.len(), 1);
        let primary = &decoded["t"];
        assert_eq!(primary["id"], json!(7));
        assert_eq!(primary["u"], json!({ "name": "ada" }));
    }
}
