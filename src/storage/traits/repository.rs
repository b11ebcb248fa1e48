//! Persistent todo repository trait.

use crate::Result;
use crate::models::{Todo, TodoId};

/// Trait for the persistent todo store.
///
/// The repository is the source of truth for todos. It knows nothing about
/// the list cache or the stats counters.
pub trait TodoRepository: Send + Sync {
    /// Returns every todo, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_all(&self) -> Result<Vec<Todo>>;

    /// Returns the todo with the given id, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>>;

    /// Returns every todo whose `completed` flag equals `completed`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_by_completed(&self, completed: bool) -> Result<Vec<Todo>>;

    /// Inserts or overwrites a todo.
    ///
    /// A todo without an id is inserted under a freshly assigned id. A todo
    /// with an id replaces the stored record with that id entirely.
    ///
    /// # Returns
    ///
    /// The stored todo, always carrying its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save(&self, todo: &Todo) -> Result<Todo>;

    /// Deletes the todo with the given id.
    ///
    /// Deleting a missing id is not an error.
    ///
    /// # Returns
    ///
    /// True if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn delete_by_id(&self, id: TodoId) -> Result<bool>;
}
