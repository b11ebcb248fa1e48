//! Todo repository backends.
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`SqliteTodoRepository`] | Default, file-backed or `:memory:` |
//! | [`InMemoryTodoRepository`] | Tests and throwaway runs |

mod memory;
mod sqlite;

pub use memory::InMemoryTodoRepository;
pub use sqlite::SqliteTodoRepository;
