use crate::errors::SnapstoreError;
use crate::query::SelectQuery;
use std::any::Any;
use std::fmt;

/// An opaque predicate description, tagged with the kind its handler is
/// registered under.
///
/// Concrete filters are plain value objects created by the caller and consumed
/// once by a handler, which downcasts them through [`Filter::as_any`].
pub trait Filter: Send + Sync {
    /// Kind discriminant used for handler lookup.
    fn kind(&self) -> &'static str;

    /// Downcast hook for concrete handlers.
    fn as_any(&self) -> &dyn Any;
}

/// An ordered sequence of filters; insertion order is application order.
#[derive(Default)]
pub struct Filters(Vec<Box<dyn Filter>>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.0.push(Box::new(filter));
        self
    }

    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.push(filter);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Filter> {
        self.0.iter().map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-invocation state injected into a handler: the pending query, the
/// participating table names and the primary table alias.
pub struct HandlerContext<'a> {
    query: &'a mut SelectQuery,
    tables: &'a [String],
    primary_alias: Option<&'a str>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        query: &'a mut SelectQuery,
        tables: &'a [String],
        primary_alias: Option<&'a str>,
    ) -> Self {
        Self {
            query,
            tables,
            primary_alias,
        }
    }

    /// The pending query to mutate.
    pub fn query(&mut self) -> &mut SelectQuery {
        &mut *self.query
    }

    /// Tables participating in the current query, primary first.
    pub fn tables(&self) -> &[String] {
        self.tables
    }

    /// Primary table alias, if one is set.
    pub fn primary_alias(&self) -> Option<&str> {
        self.primary_alias
    }

    /// Qualifies a column with the primary alias (`alias.column`), or returns it
    /// unchanged when no alias is set.
    pub fn qualify(&self, column: &str) -> String {
        match self.primary_alias {
            Some(alias) => format!("{alias}.{column}"),
            None => column.to_string(),
        }
    }
}

/// Turns one [`Filter`] into concrete pending-query mutations.
///
/// `apply` must only add predicates or joins; it must never replace or discard
/// predicates added by earlier filters in the same sequence.
pub trait FilterHandler: Send + Sync {
    fn apply(&self, filter: &dyn Filter, ctx: &mut HandlerContext<'_>)
        -> Result<(), SnapstoreError>;
}

// Handlers are stateless dispatch targets; there is nothing to show beyond the
// trait itself.
impl fmt::Debug for dyn FilterHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FilterHandler")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualify_prefixes_with_primary_alias() {
        let mut query = SelectQuery::new("users", "t");
        let tables = vec!["users".to_string()];
        let ctx = HandlerContext::new(&mut query, &tables, Some("t"));
        assert_eq!(ctx.qualify("status"), "t.status");
    }

    #[test]
    fn qualify_passes_column_through_without_alias() {
        let mut query = SelectQuery::unaliased("users");
        let tables = vec!["users".to_string()];
        let ctx = HandlerContext::new(&mut query, &tables, None);
        assert_eq!(ctx.qualify("status"), "status");
    }
}
