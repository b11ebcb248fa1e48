//! Connection configuration for `SQLite`.

use crate::{Error, Result};
use rusqlite::Connection;

/// Busy timeout applied to every connection, in milliseconds.
const BUSY_TIMEOUT_MS: &str = "5000";

/// Configures a connection for concurrent request handling.
///
/// - **WAL mode** for concurrent readers with a single writer
/// - **NORMAL synchronous**
/// - **`busy_timeout`** of 5 seconds instead of failing with `SQLITE_BUSY`
///
/// In-memory databases silently keep the `memory` journal mode.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    // journal_mode returns a row, so pragma_update is used and the value ignored
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    conn.pragma_update(None, "synchronous", "NORMAL")
        .map_err(|e| Error::operation("sqlite_pragma_synchronous", e))?;
    conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)
        .map_err(|e| Error::operation("sqlite_pragma_busy_timeout", e))?;
    Ok(())
}
