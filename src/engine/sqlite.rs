//! # SQLite Engine
//!
//! `rusqlite`-backed implementation of the engine traits.
//!
//! ## Reset Semantics
//!
//! `rusqlite` resets a statement when the `Rows` stepping it is dropped, and
//! a [`SqliteCursor`] owns that `Rows`. Since a cursor mutably borrows its
//! statement, by the time `reset` can be called any previous cursor is gone
//! and the statement is already back in its initial state.
//!
//! Clearing bindings binds `NULL` at every position, which is what
//! `sqlite3_clear_bindings` does.

use super::{Connection, Cursor, RawStatement, Step};
use crate::error::Error;
use crate::types::SqlValue;
use eyre::{Result, WrapErr};
use std::path::Path;
use std::time::Duration;
use tracing::trace;

pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = rusqlite::Connection::open(path)
            .map_err(|e| Error::engine("open", e))
            .wrap_err_with(|| format!("failed to open database at {}", path.display()))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn =
            rusqlite::Connection::open_in_memory().map_err(|e| Error::engine("open", e))?;
        Ok(Self { conn })
    }

    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn
            .busy_timeout(timeout)
            .map_err(|e| Error::engine("busy_timeout", e))?;
        Ok(())
    }

    /// The underlying `rusqlite` connection.
    pub fn raw(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl From<rusqlite::Connection> for SqliteConnection {
    fn from(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }
}

impl Connection for SqliteConnection {
    fn prepare<'c>(&'c self, sql: &str) -> Result<Box<dyn RawStatement + 'c>> {
        let stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| Error::engine("prepare", e))?;
        Ok(Box::new(SqliteStatement { stmt }))
    }
}

pub struct SqliteStatement<'c> {
    stmt: rusqlite::Statement<'c>,
}

impl RawStatement for SqliteStatement<'_> {
    fn parameter_count(&self) -> usize {
        self.stmt.parameter_count()
    }

    fn column_count(&self) -> usize {
        self.stmt.column_count()
    }

    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    fn clear_bindings(&mut self) -> Result<()> {
        for index in 1..=self.stmt.parameter_count() {
            self.stmt
                .raw_bind_parameter(index, rusqlite::types::Null)
                .map_err(|e| Error::engine("clear_bindings", e))?;
        }
        Ok(())
    }

    fn bind(&mut self, index: usize, value: SqlValue) -> Result<()> {
        trace!(index, kind = value.kind_name(), "bind");
        self.stmt
            .raw_bind_parameter(index, rusqlite::types::Value::from(value))
            .map_err(|e| Error::engine("bind", e))?;
        Ok(())
    }

    fn query(&mut self) -> Result<Box<dyn Cursor + '_>> {
        let columns = self.stmt.column_count();
        Ok(Box::new(SqliteCursor {
            rows: self.stmt.raw_query(),
            columns,
        }))
    }
}

pub struct SqliteCursor<'s> {
    rows: rusqlite::Rows<'s>,
    columns: usize,
}

impl Cursor for SqliteCursor<'_> {
    fn step(&mut self) -> Result<Step> {
        let row = match self.rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(Step::Done),
            Err(e) => return Err(Error::engine("step", e).into()),
        };
        let values = (0..self.columns)
            .map(|i| {
                row.get_ref(i)
                    .map_err(|e| Error::engine("column", e))
                    .and_then(SqlValue::try_from)
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Step::Row(values))
    }
}
