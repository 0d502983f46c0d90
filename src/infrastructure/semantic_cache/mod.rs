//! Semantic cache snapshot storage

mod file_snapshot;
mod in_memory;

pub use file_snapshot::FileSnapshotStore;
pub use in_memory::InMemorySnapshotStore;
