//! Filter handler plumbing
//!
//! A [`Filter`](handler::Filter) is an opaque, kind-tagged predicate description.
//! The store resolves a [`FilterHandler`](handler::FilterHandler) for each filter's
//! kind through the [`FilterHandlerRegistry`](registry::FilterHandlerRegistry) and
//! invokes it with a per-call [`HandlerContext`](handler::HandlerContext).

pub mod handler;
pub mod registry;

pub use handler::{Filter, FilterHandler, Filters, HandlerContext};
pub use registry::FilterHandlerRegistry;
