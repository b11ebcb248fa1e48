//! SQLite-based todo repository.
//!
//! Stores todos in a single `todos` table, by default at
//! `<data_dir>/todo-backend/todos.db`.

use crate::models::{Todo, TodoId};
use crate::storage::TodoRepository;
use crate::storage::acquire_lock;
use crate::storage::sqlite::configure_connection;
use crate::{Error, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Column list shared by every select.
const SELECT_COLUMNS: &str = "SELECT id, title, description, completed FROM todos";

/// `SQLite`-based todo repository.
pub struct SqliteTodoRepository {
    /// Connection to the `SQLite` database.
    conn: Mutex<Connection>,
    /// Path to the `SQLite` database.
    db_path: PathBuf,
}

impl SqliteTodoRepository {
    /// Opens (or creates) the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::operation("create_db_dir", e))?;
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::operation("open_todo_db", e))?;
        configure_connection(&conn)?;

        let repo = Self {
            conn: Mutex::new(conn),
            db_path,
        };
        repo.initialize()?;
        Ok(repo)
    }

    /// Creates an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::operation("open_todo_db_memory", e))?;

        let repo = Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        };
        repo.initialize()?;
        Ok(repo)
    }

    /// Returns the default database path for the current user.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|d| d.data_dir().join("todo-backend").join("todos.db"))
    }

    /// Returns the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Creates the schema.
    fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                completed INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_todos_completed ON todos(completed);",
        )
        .map_err(|e| Error::operation("create_todos_table", e))
    }

    fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
        Ok(Todo {
            id: Some(TodoId::new(row.get(0)?)),
            title: row.get(1)?,
            description: row.get(2)?,
            completed: row.get(3)?,
        })
    }

    fn query_list(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Todo>> {
        let conn = acquire_lock(&self.conn);

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| Error::operation("prepare_list_todos", e))?;

        let rows = stmt
            .query_map(params, Self::todo_from_row)
            .map_err(|e| Error::operation("list_todos", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::operation("read_todo_row", e))
    }
}

impl TodoRepository for SqliteTodoRepository {
    fn find_all(&self) -> Result<Vec<Todo>> {
        self.query_list(&format!("{SELECT_COLUMNS} ORDER BY id"), params![])
    }

    fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        let conn = acquire_lock(&self.conn);

        conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            params![id.get()],
            Self::todo_from_row,
        )
        .optional()
        .map_err(|e| Error::operation("get_todo", e))
    }

    fn find_by_completed(&self, completed: bool) -> Result<Vec<Todo>> {
        self.query_list(
            &format!("{SELECT_COLUMNS} WHERE completed = ?1 ORDER BY id"),
            params![completed],
        )
    }

    fn save(&self, todo: &Todo) -> Result<Todo> {
        let conn = acquire_lock(&self.conn);

        let id = match todo.id {
            None => {
                conn.execute(
                    "INSERT INTO todos (title, description, completed) VALUES (?1, ?2, ?3)",
                    params![todo.title, todo.description, todo.completed],
                )
                .map_err(|e| Error::operation("insert_todo", e))?;
                TodoId::new(conn.last_insert_rowid())
            },
            Some(id) => {
                conn.execute(
                    "INSERT OR REPLACE INTO todos (id, title, description, completed)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![id.get(), todo.title, todo.description, todo.completed],
                )
                .map_err(|e| Error::operation("upsert_todo", e))?;
                id
            },
        };

        Ok(Todo {
            id: Some(id),
            ..todo.clone()
        })
    }

    fn delete_by_id(&self, id: TodoId) -> Result<bool> {
        let conn = acquire_lock(&self.conn);

        let rows_affected = conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id.get()])
            .map_err(|e| Error::operation("delete_todo", e))?;

        Ok(rows_affected > 0)
    }
}
