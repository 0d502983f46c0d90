//! Project repository implementations

mod in_memory;

pub use in_memory::InMemoryProjectRepository;
