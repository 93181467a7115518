//! # Database Module
//!
//! `Database` is a thin manager over one engine connection. It prepares
//! annotated queries through a per-database schema cache and generates the
//! everyday table statements from [`ColumnDecl`] lists.
//!
//! ## Generated Statements
//!
//! ```text
//! create_table("person", [id, name])
//!     CREATE TABLE IF NOT EXISTS person(id INTEGER NOT NULL, name TEXT);
//!
//! prepared_insert("person", [id, name])
//!     INSERT INTO person(id, name) VALUES(?/*:id:integer*/, ?/*:name:text?*/);
//!
//! prepared_select_where("person", [id, name], "id > ?/*:min:integer*/")
//!     SELECT id/*:integer*/, name/*:text?*/ FROM person WHERE id > ?/*:min:integer*/;
//! ```
//!
//! Generated text carries annotations, so its schemas derive exactly like a
//! hand-written query: an insert's parameter record has one field per
//! column, a select's rows have one field per column.
//!
//! ## Usage Example
//!
//! ```ignore
//! let db = Database::builder().in_memory().open()?;
//! let columns = [
//!     ColumnDecl::new("id", ValueType::Integer),
//!     ColumnDecl::optional("name", ValueType::Text),
//! ];
//! db.create_table("person", &columns)?;
//!
//! let mut insert = db.prepared_insert("person", &columns)?;
//! insert.execute(args! { "id" => 1_i64, "name" => "Alice" })?;
//!
//! let mut select = db.prepared_select("person", &columns)?;
//! for row in select.execute_rows_unbound()? {
//!     println!("{}", row?);
//! }
//! ```
//!
//! ## Thread Safety
//!
//! A `Database` is used from one thread at a time; its schema cache is not
//! synchronized. Open one `Database` per thread to share a file.

mod builder;
mod column;

pub use builder::DatabaseBuilder;
pub use column::ColumnDecl;

use crate::annotation::SchemaCache;
use crate::config::{EXIST_FIELD, USER_VERSION_FIELD};
use crate::engine::{Connection, SqliteConnection};
use crate::record::Args;
use crate::statement::PreparedStatement;
use column::{column_list, decl_list, definition_list, name_list};
use eyre::{ensure, Result, WrapErr};
use std::path::Path;
use tracing::debug;

pub struct Database<C: Connection = SqliteConnection> {
    conn: C,
    cache: SchemaCache,
}

impl Database<SqliteConnection> {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Opens the database file at `path` with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path.as_ref()).open()
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::builder().in_memory().open()
    }
}

impl<C: Connection> Database<C> {
    /// Wraps an already opened connection.
    pub fn with_connection(conn: C) -> Self {
        Self::from_parts(conn, SchemaCache::new())
    }

    pub(crate) fn from_parts(conn: C, cache: SchemaCache) -> Self {
        Self { conn, cache }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn schema_cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Prepares an annotated query; its schemas are derived once per text.
    pub fn prepare(&self, sql: &str) -> Result<PreparedStatement<'_>> {
        let schema = self.cache.get_or_derive(sql)?;
        let raw = self
            .conn
            .prepare(sql)
            .wrap_err_with(|| format!("failed to prepare `{}`", sql))?;
        PreparedStatement::new(raw, schema)
    }

    /// Reads `PRAGMA user_version`.
    pub fn user_version(&self) -> Result<i32> {
        let sql = format!("PRAGMA {}/*:int*/;", USER_VERSION_FIELD);
        let row = self.prepare(&sql)?.execute_single_row_unbound()?;
        match row {
            Some(row) => row.get(USER_VERSION_FIELD),
            None => Ok(0),
        }
    }

    pub fn set_user_version(&self, version: i32) -> Result<()> {
        let sql = format!("PRAGMA {} = {};", USER_VERSION_FIELD, version);
        PreparedStatement::prepare(&self.conn, &sql)?.execute_unbound()?;
        debug!(version, "set user_version");
        Ok(())
    }

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let sql = format!(
            "SELECT count(*) AS {}/*:bool*/ FROM sqlite_master WHERE type = 'table' AND name = ?/*:name:text*/;",
            EXIST_FIELD
        );
        let row = self
            .prepare(&sql)?
            .execute_single_row(Args::new().with("name", name))?;
        match row {
            Some(row) => row.get(EXIST_FIELD),
            None => Ok(false),
        }
    }

    pub fn create_table(&self, name: &str, columns: &[ColumnDecl]) -> Result<()> {
        ensure!(!columns.is_empty(), "table '{}' needs at least one column", name);
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {}({});",
            name,
            definition_list(columns)
        );
        PreparedStatement::prepare(&self.conn, &sql)?.execute_unbound()?;
        debug!(table = name, columns = columns.len(), "created table");
        Ok(())
    }

    pub fn drop_table(&self, name: &str) -> Result<()> {
        let sql = format!("DROP TABLE IF EXISTS {};", name);
        PreparedStatement::prepare(&self.conn, &sql)?.execute_unbound()?;
        debug!(table = name, "dropped table");
        Ok(())
    }

    /// `INSERT INTO name(..) VALUES(..)`, one parameter per column.
    pub fn prepared_insert(
        &self,
        name: &str,
        columns: &[ColumnDecl],
    ) -> Result<PreparedStatement<'_>> {
        self.insert_statement("INSERT", name, columns)
    }

    pub fn prepared_insert_or_replace(
        &self,
        name: &str,
        columns: &[ColumnDecl],
    ) -> Result<PreparedStatement<'_>> {
        self.insert_statement("INSERT OR REPLACE", name, columns)
    }

    /// `SELECT .. FROM name`, one row field per column.
    pub fn prepared_select(
        &self,
        name: &str,
        columns: &[ColumnDecl],
    ) -> Result<PreparedStatement<'_>> {
        ensure!(!columns.is_empty(), "select from '{}' needs a column", name);
        self.prepare(&format!("SELECT {} FROM {};", column_list(columns), name))
    }

    /// Like [`Self::prepared_select`] with an annotated `WHERE` clause, e.g.
    /// `"id > ?/*:min:integer*/"`.
    pub fn prepared_select_where(
        &self,
        name: &str,
        columns: &[ColumnDecl],
        where_clause: &str,
    ) -> Result<PreparedStatement<'_>> {
        ensure!(!columns.is_empty(), "select from '{}' needs a column", name);
        self.prepare(&format!(
            "SELECT {} FROM {} WHERE {};",
            column_list(columns),
            name,
            where_clause
        ))
    }

    pub fn prepared_delete(&self, name: &str) -> Result<PreparedStatement<'_>> {
        self.prepare(&format!("DELETE FROM {};", name))
    }

    pub fn prepared_delete_where(
        &self,
        name: &str,
        where_clause: &str,
    ) -> Result<PreparedStatement<'_>> {
        self.prepare(&format!("DELETE FROM {} WHERE {};", name, where_clause))
    }

    fn insert_statement(
        &self,
        verb: &str,
        name: &str,
        columns: &[ColumnDecl],
    ) -> Result<PreparedStatement<'_>> {
        ensure!(!columns.is_empty(), "insert into '{}' needs a column", name);
        self.prepare(&format!(
            "{} INTO {}({}) VALUES({});",
            verb,
            name,
            name_list(columns),
            decl_list(columns)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::types::ValueType;

    fn person() -> [ColumnDecl; 2] {
        [
            ColumnDecl::new("id", ValueType::Integer)
                .with_constraint("NOT NULL PRIMARY KEY")
                .unwrap(),
            ColumnDecl::optional("name", ValueType::Text),
        ]
    }

    fn names(db: &Database) -> Vec<Option<String>> {
        db.prepared_select("person", &person())
            .unwrap()
            .execute_rows_unbound()
            .unwrap()
            .map(|row| row.unwrap().get::<Option<String>>("name").unwrap())
            .collect()
    }

    #[test]
    fn user_version_defaults_to_zero_and_updates() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.user_version().unwrap(), 0);
        db.set_user_version(7).unwrap();
        assert_eq!(db.user_version().unwrap(), 7);
    }

    #[test]
    fn table_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.table_exists("person").unwrap());

        db.create_table("person", &person()).unwrap();
        assert!(db.table_exists("person").unwrap());
        db.create_table("person", &person()).unwrap();

        db.drop_table("person").unwrap();
        assert!(!db.table_exists("person").unwrap());
        db.drop_table("person").unwrap();
    }

    #[test]
    fn create_table_needs_columns() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.create_table("empty", &[]).is_err());
    }

    #[test]
    fn insert_select_delete() {
        let db = Database::open_in_memory().unwrap();
        db.create_table("person", &person()).unwrap();

        let mut insert = db.prepared_insert("person", &person()).unwrap();
        insert
            .execute(Args::new().with("id", 1_i64).with("name", "Alice"))
            .unwrap();
        insert.execute(Args::new().with("id", 2_i64)).unwrap();
        drop(insert);
        assert_eq!(names(&db), [Some("Alice".to_owned()), None]);

        let mut select = db
            .prepared_select_where("person", &person(), "id > ?/*:min:integer*/")
            .unwrap();
        let rows: Vec<Record> = select
            .execute_rows(Args::new().with("min", 1_i64))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get::<i64>("id").unwrap(), 2);
        drop(select);

        db.prepared_delete_where("person", "id = ?/*:id:integer*/")
            .unwrap()
            .execute(Args::new().with("id", 1_i64))
            .unwrap();
        assert_eq!(names(&db), [None]);

        db.prepared_delete("person")
            .unwrap()
            .execute_unbound()
            .unwrap();
        assert!(names(&db).is_empty());
    }

    #[test]
    fn insert_or_replace_overwrites_by_key() {
        let db = Database::open_in_memory().unwrap();
        db.create_table("person", &person()).unwrap();

        let mut upsert = db.prepared_insert_or_replace("person", &person()).unwrap();
        upsert
            .execute(Args::new().with("id", 1_i64).with("name", "Alice"))
            .unwrap();
        upsert
            .execute(Args::new().with("id", 1_i64).with("name", "Bob"))
            .unwrap();
        drop(upsert);
        assert_eq!(names(&db), [Some("Bob".to_owned())]);
    }

    #[test]
    fn prepared_queries_share_cached_schemas() {
        let db = Database::open_in_memory().unwrap();
        db.create_table("person", &person()).unwrap();

        let first = db.prepared_select("person", &person()).unwrap();
        let second = db.prepared_select("person", &person()).unwrap();
        assert!(std::sync::Arc::ptr_eq(first.row_schema(), second.row_schema()));
    }
}
