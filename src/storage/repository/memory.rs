//! In-memory todo repository.

use crate::models::{Todo, TodoId};
use crate::storage::TodoRepository;
use crate::storage::acquire_lock;
use std::collections::BTreeMap;
use crate::{Error, Result};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    todos: BTreeMap<TodoId, Todo>,
    last_id: i64,
}

/// Todo repository kept in process memory.
///
/// Ids start at 1 and are never reused, matching the `SQLite` backend.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    state: Mutex<State>,
}

impl InMemoryTodoRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn find_all(&self) -> Result<Vec<Todo>> {
        Ok(acquire_lock(&self.state).todos.values().cloned().collect())
    }

    fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        Ok(acquire_lock(&self.state).todos.get(&id).cloned())
    }

    fn find_by_completed(&self, completed: bool) -> Result<Vec<Todo>> {
        Ok(acquire_lock(&self.state)
            .todos
            .values()
            .filter(|todo| todo.completed == completed)
            .cloned()
            .collect())
    }

    fn save(&self, todo: &Todo) -> Result<Todo> {
        let mut state = acquire_lock(&self.state);

        let id = match todo.id {
            Some(id) => {
                state.last_id = state.last_id.max(id.get());
                id
            },
            None => {
                state.last_id = state
                    .last_id
                    .checked_add(1)
                    .ok_or_else(|| Error::operation("insert_todo", "id space exhausted"))?;
                TodoId::new(state.last_id)
            },
        };

        let stored = Todo {
            id: Some(id),
            ..todo.clone()
        };
        state.todos.insert(id, stored.clone());
        Ok(stored)
    }

    fn delete_by_id(&self, id: TodoId) -> Result<bool> {
        Ok(acquire_lock(&self.state).todos.remove(&id).is_some())
    }
}
