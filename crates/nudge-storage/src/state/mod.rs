//! Durable homes for `CumulativeState`.

mod envelope;
mod json_store;
mod memory_store;

pub use envelope::StateEnvelope;
pub use json_store::JsonStateStore;
pub use memory_store::MemoryStateStore;
