//! Storage backend traits.

mod counters;
mod repository;

pub use counters::{CounterStore, ListCache};
pub use repository::TodoRepository;
