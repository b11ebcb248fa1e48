//! # todo-backend
//!
//! A small REST backend for todo items.
//!
//! Todos are persisted in a relational store (`SQLite`), while operational
//! counters and a cached copy of the full todo list live in a key-value store
//! (Redis, or an in-process map for local runs and tests).
//!
//! ## Layers
//!
//! - [`storage`]: the [`TodoRepository`] and [`CounterStore`]/[`ListCache`] backends
//! - [`services`]: [`TodoService`], cache-aside reads and counter bookkeeping
//! - [`http`]: the axum router exposing `/api/todos`
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use todo_backend::storage::{InMemoryCounterStore, SqliteTodoRepository};
//! use todo_backend::{NewTodo, TodoService};
//!
//! let counters = Arc::new(InMemoryCounterStore::new());
//! let service = TodoService::new(
//!     Arc::new(SqliteTodoRepository::in_memory()?),
//!     counters.clone(),
//!     counters,
//! );
//! let todo = service.create(NewTodo::titled("Write docs"))?;
//! assert!(todo.id.is_some());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod http;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::TodoConfig;
pub use models::{NewTodo, StatName, Stats, Todo, TodoId};
pub use services::TodoService;
pub use storage::{CounterStore, ListCache, TodoRepository};

/// Error type for todo-backend operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotFound` | Updating a todo id that does not exist |
/// | `InvalidInput` | Bad configuration values, unparsable request data |
/// | `OperationFailed` | `SQLite` or Redis calls fail, (de)serialization fails |
/// | `FeatureNotEnabled` | Redis backend requested without the `redis` feature |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The requested todo does not exist.
    #[error("todo {id} not found")]
    NotFound {
        /// The missing identifier.
        id: TodoId,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation against one of the stores failed.
    ///
    /// Raised when:
    /// - The `SQLite` database cannot be opened or queried
    /// - Redis is unreachable or rejects a command
    /// - A cached snapshot cannot be (de)serialized
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Feature not enabled (requires feature flag).
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from an operation name and any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for todo-backend operations.
pub type Result<T> = std::result::Result<T, Error>;
