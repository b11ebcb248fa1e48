//! Operational counters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a tracked counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatName {
    /// Todos created.
    TodosCreated,
    /// Todos updated.
    TodosUpdated,
    /// Todos deleted.
    TodosDeleted,
    /// Full-list reads that missed the cache and hit the database.
    DbReads,
}

impl StatName {
    /// Every tracked counter, in reporting order.
    pub const ALL: [Self; 4] = [
        Self::TodosCreated,
        Self::TodosUpdated,
        Self::TodosDeleted,
        Self::DbReads,
    ];

    /// Returns the counter name as stored and reported.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TodosCreated => "todos_created",
            Self::TodosUpdated => "todos_updated",
            Self::TodosDeleted => "todos_deleted",
            Self::DbReads => "db_reads",
        }
    }

    /// Parses a counter name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == s)
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of all tracked counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Todos created.
    pub todos_created: i64,
    /// Todos updated.
    pub todos_updated: i64,
    /// Todos deleted.
    pub todos_deleted: i64,
    /// Database reads caused by list cache misses.
    pub db_reads: i64,
}

impl Stats {
    /// Returns the value of a single counter.
    #[must_use]
    pub const fn get(&self, name: StatName) -> i64 {
        match name {
            StatName::TodosCreated => self.todos_created,
            StatName::TodosUpdated => self.todos_updated,
            StatName::TodosDeleted => self.todos_deleted,
            StatName::DbReads => self.db_reads,
        }
    }

    /// Sets the value of a single counter.
    pub const fn set(&mut self, name: StatName, value: i64) {
        match name {
            StatName::TodosCreated => self.todos_created = value,
            StatName::TodosUpdated => self.todos_updated = value,
            StatName::TodosDeleted => self.todos_deleted = value,
            StatName::DbReads => self.db_reads = value,
        }
    }
}
