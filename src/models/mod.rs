//! Data models for todo-backend.
//!
//! These types double as the JSON wire format of the HTTP API.

mod stats;
mod todo;

pub use stats::{StatName, Stats};
pub use todo::{NewTodo, Todo, TodoId};
