//! The snapshot store: query composition and materialization pipeline.

pub mod snapshot_store;

pub use snapshot_store::SnapshotStore;
