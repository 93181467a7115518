//! # Database Builder
//!
//! `DatabaseBuilder` configures and opens a SQLite-backed [`Database`].
//! Settings are chained before calling `open()`.
//!
//! ## Configuration Options
//!
//! | Option                | Default  | Description                               |
//! |-----------------------|----------|-------------------------------------------|
//! | path / in_memory      | required | Where the database lives                  |
//! | busy_timeout          | 5s       | How long a locked database is retried     |
//! | schema_cache_capacity | 32       | Initial capacity of the query schema cache |
//!
//! ## Usage Examples
//!
//! ```ignore
//! let db = Database::builder()
//!     .path("./app.db")
//!     .busy_timeout(Duration::from_secs(1))
//!     .open()?;
//!
//! let scratch = Database::builder().in_memory().open()?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use eyre::Result;
use tracing::debug;

use super::Database;
use crate::annotation::SchemaCache;
use crate::config::{DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_SCHEMA_CACHE_CAPACITY};
use crate::engine::SqliteConnection;

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Builder for configuring and opening a [`Database`].
#[derive(Debug, Clone, Default)]
pub struct DatabaseBuilder {
    location: Option<Location>,
    busy_timeout: Option<Duration>,
    schema_cache_capacity: Option<usize>,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (or creates) the database file at `path`.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(Location::File(path.into()));
        self
    }

    /// Uses a private in-memory database, discarded when closed.
    pub fn in_memory(mut self) -> Self {
        self.location = Some(Location::Memory);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }

    pub fn schema_cache_capacity(mut self, capacity: usize) -> Self {
        self.schema_cache_capacity = Some(capacity);
        self
    }

    /// Opens the database with the configured settings.
    pub fn open(self) -> Result<Database<SqliteConnection>> {
        let location = self.location.ok_or_else(|| {
            eyre::eyre!("database location not specified: call .path() or .in_memory() first")
        })?;

        let conn = match &location {
            Location::File(path) => SqliteConnection::open(path)?,
            Location::Memory => SqliteConnection::open_in_memory()?,
        };

        let timeout = self
            .busy_timeout
            .unwrap_or(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS));
        conn.set_busy_timeout(timeout)?;

        let capacity = self
            .schema_cache_capacity
            .unwrap_or(DEFAULT_SCHEMA_CACHE_CAPACITY);

        debug!(?location, ?timeout, capacity, "opened database");
        Ok(Database::from_parts(conn, SchemaCache::with_capacity(capacity)))
    }
}
