use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapstoreError {
    /// A terminal operation was called before `select_by_ids` or `select_all`.
    #[error("no active query: call select_by_ids or select_all first")]
    NoActiveQuery,

    /// A filter's kind has no handler in the registry.
    #[error("no filter handler registered for kind `{kind}`")]
    UnregisteredFilterKind { kind: String },

    /// A row could not be rebuilt into a snapshot.
    #[error("failed to materialize snapshot: {0}")]
    Materialize(String),

    /// An opaque pagination cursor token could not be decoded.
    #[error("malformed cursor token: {0}")]
    MalformedCursor(String),

    /// Backend failure, propagated unchanged from the query engine.
    #[error("query engine error: {0}")]
    Engine(Box<dyn std::error::Error + Send + Sync>),
}

impl SnapstoreError {
    /// Wraps a backend error without masking its source.
    pub fn engine<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Engine(Box::new(source))
    }
}
