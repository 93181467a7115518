//! # Prepared Statements
//!
//! A [`PreparedStatement`] owns one engine statement together with the
//! schemas derived from its query text. It binds parameter records into the
//! statement and materializes result rows as records.
//!
//! ## Lifecycle
//!
//! ```text
//!            ┌─────────── execute / execute_rows ───────────┐
//!            v                                              │
//! Prepared ──> Bound ──> Stepping ──> HasRow ──> ... ──> Done
//!                           │            │
//!                           └────────────┴──> Failed (engine error)
//! ```
//!
//! Every execution restarts from `Bound`: the statement is reset and all its
//! bindings cleared before the new parameters are bound, so a parameter
//! left out of one execution can never pick up the previous execution's
//! value. `Failed` lasts until the next execution resets the statement.
//! A row schema whose arity differs from the engine's column count fails
//! the execution before the first step.
//!
//! ## Entry Points
//!
//! | Method | Returns | Expects |
//! |--------|---------|---------|
//! | `execute` | `()` | the engine to finish without a row |
//! | `execute_rows` | [`Rows`] iterator | any number of rows |
//! | `execute_single_row` | `Option<Record>` | zero or one row (extra rows ignored) |
//!
//! Each has an `_unbound` variant for statements without parameters.
//!
//! ## Usage
//!
//! ```ignore
//! let mut stmt = PreparedStatement::prepare(&conn, "SELECT id/*:integer*/, name/*:text*/ FROM t WHERE id = ?/*:target:integer*/")?;
//! for row in stmt.execute_rows(Args::new().with("target", 1_i64))? {
//!     let row = row?;
//!     println!("{}", row.get::<String>("name")?);
//! }
//! ```

pub mod binder;
pub mod codec;
pub mod materializer;

pub use binder::IntoParams;
pub use codec::{decode, encode, parse_date};
pub use materializer::Rows;

use crate::annotation::{derive_schema, QuerySchema};
use crate::engine::{Connection, RawStatement, Step};
use crate::error::Error;
use crate::record::{Record, RecordSchema};
use eyre::{Result, WrapErr};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementState {
    Prepared,
    Bound,
    Stepping,
    HasRow,
    Done,
    Failed,
}

pub struct PreparedStatement<'c> {
    raw: Box<dyn RawStatement + 'c>,
    schema: QuerySchema,
    state: StatementState,
}

impl<'c> PreparedStatement<'c> {
    /// Compiles `sql` on `conn` and derives its schemas from the annotations.
    pub fn prepare<C: Connection + ?Sized>(conn: &'c C, sql: &str) -> Result<Self> {
        let schema = derive_schema(sql)?;
        let raw = conn
            .prepare(sql)
            .wrap_err_with(|| format!("failed to prepare `{}`", sql))?;
        Self::new(raw, schema)
    }

    /// Wraps an engine statement whose schemas are already known.
    pub fn new(raw: Box<dyn RawStatement + 'c>, schema: QuerySchema) -> Result<Self> {
        let placeholders = raw.parameter_count();
        if placeholders != schema.params.len() {
            return Err(Error::SchemaMismatch {
                what: "parameter schema",
                expected: schema.params.len(),
                actual: placeholders,
            }
            .into());
        }
        debug!(
            params = %schema.params,
            row = %schema.row,
            columns = raw.column_count(),
            "prepared statement"
        );
        Ok(Self {
            raw,
            schema,
            state: StatementState::Prepared,
        })
    }

    pub fn schema(&self) -> &QuerySchema {
        &self.schema
    }

    pub fn row_schema(&self) -> &Arc<RecordSchema> {
        &self.schema.row
    }

    pub fn param_schema(&self) -> &Arc<RecordSchema> {
        &self.schema.params
    }

    pub fn state(&self) -> StatementState {
        self.state
    }

    /// Runs a statement that produces no rows.
    pub fn execute<'r>(&mut self, params: impl IntoParams<'r>) -> Result<()> {
        self.bind(params)?;
        self.run_to_done()
    }

    /// Runs a statement and iterates its result rows.
    pub fn execute_rows<'r>(&mut self, params: impl IntoParams<'r>) -> Result<Rows<'_>> {
        self.bind(params)?;
        self.rows()
    }

    /// Runs a statement and returns its first row, if any.
    pub fn execute_single_row<'r>(
        &mut self,
        params: impl IntoParams<'r>,
    ) -> Result<Option<Record>> {
        self.execute_rows(params)?.next().transpose()
    }

    pub fn execute_unbound(&mut self) -> Result<()> {
        self.bind_nothing()?;
        self.run_to_done()
    }

    pub fn execute_rows_unbound(&mut self) -> Result<Rows<'_>> {
        self.bind_nothing()?;
        self.rows()
    }

    pub fn execute_single_row_unbound(&mut self) -> Result<Option<Record>> {
        self.execute_rows_unbound()?.next().transpose()
    }

    fn bind<'r>(&mut self, params: impl IntoParams<'r>) -> Result<()> {
        let record = params.into_params(&self.schema.params)?;
        let bound = binder::bind_record(self.raw.as_mut(), &record);
        self.settle(bound, StatementState::Bound)
    }

    fn bind_nothing(&mut self) -> Result<()> {
        if !self.schema.params.is_empty() {
            return Err(Error::SchemaMismatch {
                what: "unbound execution",
                expected: 0,
                actual: self.schema.params.len(),
            }
            .into());
        }
        let empty = Record::from_parts(Arc::clone(&self.schema.params), Vec::new());
        let bound = binder::bind_record(self.raw.as_mut(), &empty);
        self.settle(bound, StatementState::Bound)
    }

    fn rows(&mut self) -> Result<Rows<'_>> {
        let Self { raw, schema, state } = self;
        let columns = raw.column_count();
        if !schema.row.is_empty() && columns != schema.row.len() {
            *state = StatementState::Failed;
            return Err(Error::SchemaMismatch {
                what: "row schema",
                expected: schema.row.len(),
                actual: columns,
            }
            .into());
        }
        match raw.query() {
            Ok(cursor) => Ok(Rows::new(cursor, Arc::clone(&schema.row), state)),
            Err(e) => {
                *state = StatementState::Failed;
                Err(e)
            }
        }
    }

    fn run_to_done(&mut self) -> Result<()> {
        let stepped = self.raw.query().and_then(|mut cursor| cursor.step());
        match stepped {
            Ok(Step::Done) => {
                self.state = StatementState::Done;
                Ok(())
            }
            Ok(Step::Row(_)) => {
                self.state = StatementState::Failed;
                Err(Error::Engine {
                    operation: "execute",
                    message: "statement produced a row; use execute_rows".to_owned(),
                }
                .into())
            }
            Err(e) => {
                self.state = StatementState::Failed;
                Err(e)
            }
        }
    }

    fn settle(&mut self, result: Result<()>, next: StatementState) -> Result<()> {
        self.state = if result.is_ok() {
            next
        } else {
            StatementState::Failed
        };
        result
    }
}
