//! # tagsql - Typed Records over Annotated SQL
//!
//! tagsql gives SQL query text a typed face. Result columns and bind
//! parameters are annotated inline with ordinary block comments, and the
//! annotations are enough to derive a record schema for each side of the
//! query:
//!
//! ```text
//! SELECT id/*:integer*/, name/*:text?*/ FROM person WHERE id > ?/*:min:integer*/;
//!        └── row field ┘ └── row field ┘                  └── parameter ──────┘
//! ```
//!
//! The engine never sees anything but comments, so annotated text stays
//! valid SQL.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tagsql::{args, Database};
//!
//! let db = Database::builder().path("./app.db").open()?;
//! let mut stmt = db.prepare(
//!     "SELECT id/*:integer*/, name/*:text?*/ FROM person WHERE id > ?/*:min:integer*/;",
//! )?;
//!
//! for row in stmt.execute_rows(args! { "min" => 10_i64 })? {
//!     let row = row?;
//!     println!("{} {:?}", row.get::<i64>("id")?, row.get::<Option<String>>("name")?);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Database (DDL/DML helpers, cache)  │
//! ├─────────────────────────────────────┤
//! │ PreparedStatement (bind, materialize)│
//! ├──────────────────┬──────────────────┤
//! │ Annotation parser │ Records + defaults│
//! ├──────────────────┴──────────────────┤
//! │   Engine traits (rusqlite adapter)   │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`record`]: named-field records, schemas, lazy defaults, predicates
//! - [`annotation`]: annotation scanner and schema derivation
//! - [`statement`]: prepared statements, parameter binding, row decoding
//! - [`engine`]: the engine seam and its SQLite implementation
//! - [`database`]: connection manager and generated table statements
//! - [`types`]: value types, values, storage values
//! - [`config`]: grammar constants and defaults
//! - [`error`]: typed error kinds carried inside `eyre::Report`

#[macro_use]
mod macros;

pub mod annotation;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod record;
pub mod statement;
pub mod types;

pub use annotation::{derive_schema, QuerySchema, SchemaCache};
pub use database::{ColumnDecl, Database, DatabaseBuilder};
pub use engine::{Connection, SqliteConnection};
pub use error::Error;
pub use record::{tag, Arg, Args, FieldDef, FieldTag, Predicate, Record, RecordSchema};
pub use statement::{PreparedStatement, Rows, StatementState};
pub use types::{FieldType, FieldValue, Value, ValueType};
