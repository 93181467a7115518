//! # Row Materialization
//!
//! Turns the storage values of one result row into a record of the row
//! schema. The engine must report exactly as many columns as the schema has
//! fields; column `i` decodes into field `i` by that field's declared type.

use super::codec::decode;
use crate::engine::{Cursor, Step};
use crate::error::Error;
use crate::record::{Record, RecordSchema};
use crate::types::SqlValue;
use eyre::{Result, WrapErr};
use std::sync::Arc;
use tracing::trace;

use super::StatementState;

pub(crate) fn materialize(schema: &Arc<RecordSchema>, columns: Vec<SqlValue>) -> Result<Record> {
    if columns.len() != schema.len() {
        return Err(Error::SchemaMismatch {
            what: "row schema",
            expected: schema.len(),
            actual: columns.len(),
        }
        .into());
    }

    let values = columns
        .into_iter()
        .zip(schema.tags().zip(schema.types()))
        .map(|(column, (tag, ty))| decode(column, *ty, tag))
        .collect();
    Ok(Record::from_parts(Arc::clone(schema), values))
}

/// Result rows of one execution, materialized lazily.
///
/// The iterator ends after `Done` or after the first error; the statement is
/// reset the next time it is executed.
pub struct Rows<'s> {
    cursor: Box<dyn Cursor + 's>,
    schema: Arc<RecordSchema>,
    state: &'s mut StatementState,
    finished: bool,
}

impl<'s> Rows<'s> {
    pub(crate) fn new(
        cursor: Box<dyn Cursor + 's>,
        schema: Arc<RecordSchema>,
        state: &'s mut StatementState,
    ) -> Self {
        *state = StatementState::Stepping;
        Self {
            cursor,
            schema,
            state,
            finished: false,
        }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    fn step(&mut self) -> Result<Option<Record>> {
        match self.cursor.step()? {
            Step::Done => {
                *self.state = StatementState::Done;
                Ok(None)
            }
            Step::Row(columns) => {
                *self.state = StatementState::HasRow;
                trace!(columns = columns.len(), "row");
                materialize(&self.schema, columns)
                    .wrap_err("failed to materialize result row")
                    .map(Some)
            }
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        if self.finished {
            return None;
        }
        match self.step() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                *self.state = StatementState::Failed;
                Some(Err(e))
            }
        }
    }
}
