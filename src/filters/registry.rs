use crate::errors::SnapstoreError;
use crate::filters::handler::FilterHandler;
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup from filter kind to handler.
///
/// Populated once at process-configuration time, read-only afterwards; handlers
/// are shared across store instances. Registration is last-write-wins.
#[derive(Default, Clone)]
pub struct FilterHandlerRegistry {
    handlers: HashMap<&'static str, Arc<dyn FilterHandler>>,
}

impl FilterHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for `kind`, replacing any previous registration.
    pub fn register(&mut self, kind: &'static str, handler: impl FilterHandler + 'static) -> &mut Self {
        self.handlers.insert(kind, Arc::new(handler));
        self
    }

    /// Resolves the handler for `kind`.
    pub fn resolve(&self, kind: &str) -> Result<Arc<dyn FilterHandler>, SnapstoreError> {
        self.handlers
            .get(kind)
            .cloned()
            .ok_or_else(|| SnapstoreError::UnregisteredFilterKind {
                kind: kind.to_string(),
            })
    }
}

impl std::fmt::Debug for FilterHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("FilterHandlerRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::handler::{Filter, HandlerContext};

    struct NoopHandler;

    impl FilterHandler for NoopHandler {
        fn apply(
            &self,
            _filter: &dyn Filter,
            _ctx: &mut HandlerContext<'_>,
        ) -> Result<(), SnapstoreError> {
            Ok(())
        }
    }

    #[test]
    fn resolve_unknown_kind_fails() {
        let registry = FilterHandlerRegistry::new();
        let err = registry.resolve("by_status").unwrap_err();
        assert!(matches!(
            err,
            SnapstoreError::UnregisteredFilterKind { kind } if kind == "by_status"
        ));
    }

    #[test]
    fn register_then_resolve() {
        let mut registry = FilterHandlerRegistry::new();
        registry.register("by_status", NoopHandler);
        assert!(registry.resolve("by_status").is_ok());
    }

    #[test]
    fn resolved_handlers_are_debuggable() {
        let mut registry = FilterHandlerRegistry::new();
        registry.register("by_status", NoopHandler);
        let handler = registry.resolve("by_status").unwrap();
        assert_eq!(format!("{handler:?}"), "FilterHandler");
    }
}
