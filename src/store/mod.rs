// ============================================================================
// Store Layer - Abstract Document Store
// ============================================================================
//
// Generic, reusable persistence abstraction for the order service.
// Domain code depends only on the `DocumentStore` trait; the concrete
// backend is chosen at startup.
//
// Structure:
// - contract.rs     - DocumentStore trait, write ops, preconditions, errors
// - paths.rs        - persisted document layout (collections + indexes)
// - memory.rs       - in-memory store (tests, local runs)
// - scylla_store.rs - ScyllaDB-backed store (production)
//
// ============================================================================

mod contract;
mod memory;
mod scylla_store;

pub mod paths;

pub use contract::{DocPath, DocumentStore, Precondition, StoreError, WriteOp};
pub use memory::MemoryStore;
pub use scylla_store::ScyllaStore;
