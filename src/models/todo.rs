//! Todo records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Creates a todo ID from its raw value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A todo item.
///
/// `id` is `None` until the repository has stored the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier, assigned on first save.
    pub id: Option<TodoId>,
    /// Short title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Whether the todo is done.
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Builds an unsaved todo from client-supplied fields.
    #[must_use]
    pub fn from_new(fields: NewTodo) -> Self {
        Self {
            id: None,
            title: fields.title,
            description: fields.description,
            completed: fields.completed,
        }
    }

    /// Replaces every mutable field with the supplied values, keeping the id.
    pub fn apply(&mut self, fields: NewTodo) {
        self.title = fields.title;
        self.description = fields.description;
        self.completed = fields.completed;
    }
}

/// Client-supplied todo fields for create and update.
///
/// An `id` in the request body is accepted and ignored: on create the store
/// assigns one, on update the path identifies the record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewTodo {
    /// Short title.
    pub title: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the todo is done. Defaults to `false`.
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    /// Creates open todo fields with just a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the completed flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_json_shape() {
        let todo = Todo {
            id: Some(TodoId::new(3)),
            title: "Buy milk".to_string(),
            description: None,
            completed: true,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "title": "Buy milk",
                "description": null,
                "completed": true
            })
        );
    }

    #[test]
    fn test_new_todo_defaults_and_ignores_id() {
        let fields: NewTodo =
            serde_json::from_str(r#"{"id": 42, "title": "Write tests"}"#).unwrap();
        assert_eq!(fields, NewTodo::titled("Write tests"));
        assert!(!fields.completed);
    }

    #[test]
    fn test_new_todo_requires_title() {
        let result: std::result::Result<NewTodo, _> =
            serde_json::from_str(r#"{"description": "no title"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_keeps_id() {
        let mut todo = Todo::from_new(NewTodo::titled("A").with_description("first"));
        todo.id = Some(TodoId::new(1));

        todo.apply(NewTodo::titled("B").with_completed(true));

        assert_eq!(todo.id, Some(TodoId::new(1)));
        assert_eq!(todo.title, "B");
        assert_eq!(todo.description, None);
        assert!(todo.completed);
    }
}
