//! Shared `SQLite` connection handling.

mod connection;

pub use connection::configure_connection;
