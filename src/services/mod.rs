//! Business logic services.
//!
//! Services orchestrate the storage backends and provide the operations the
//! HTTP layer exposes.

mod todo;

pub use todo::TodoService;
