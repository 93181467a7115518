//! # Engine Seam
//!
//! The relational engine is an external collaborator. tagsql only needs a
//! handful of operations from it, expressed by three traits:
//!
//! | Trait | Provides |
//! |-------|----------|
//! | [`Connection`] | compiling query text into a statement |
//! | [`RawStatement`] | parameter/column counts, reset, binding, stepping |
//! | [`Cursor`] | one step at a time: a row of storage values or done |
//!
//! Values cross the seam as [`SqlValue`] storage classes. Encoding record
//! values into them, and decoding rows back, is the statement layer's job.
//!
//! Parameter positions are 1-based, matching the engine convention.
//!
//! ## Lifetimes
//!
//! A statement borrows its connection and a cursor borrows its statement
//! mutably, so a statement can neither outlive the connection nor be rebound
//! while a cursor over it is alive. Dropping a statement finalizes it.
//!
//! The shipped implementation is [`sqlite`], over `rusqlite`.

pub mod sqlite;

use crate::types::SqlValue;
use eyre::Result;

pub use sqlite::{SqliteConnection, SqliteCursor, SqliteStatement};

/// Outcome of one engine step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A result row; one storage value per result column.
    Row(Vec<SqlValue>),
    Done,
}

pub trait Connection {
    fn prepare<'c>(&'c self, sql: &str) -> Result<Box<dyn RawStatement + 'c>>;
}

pub trait RawStatement {
    fn parameter_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Returns the statement to its initial, not-yet-stepped state.
    fn reset(&mut self) -> Result<()>;

    /// Sets every parameter back to null.
    fn clear_bindings(&mut self) -> Result<()>;

    /// Binds `value` at the 1-based position `index`.
    fn bind(&mut self, index: usize, value: SqlValue) -> Result<()>;

    /// Starts stepping the statement with its current bindings.
    fn query(&mut self) -> Result<Box<dyn Cursor + '_>>;
}

pub trait Cursor {
    fn step(&mut self) -> Result<Step>;
}
