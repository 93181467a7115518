//! # Parameter Binding
//!
//! Writes a parameter record into a statement. Every bind starts from a
//! clean slate (`reset` then `clear_bindings`) so nothing bound by a
//! previous execution can leak into this one. Fields are bound in schema
//! order at 1-based positions.
//!
//! Anything that implements [`IntoParams`] can be bound: a record of the
//! statement's parameter schema, a record of some other schema (converted
//! structurally first), or plain named [`Args`].

use super::codec::encode;
use crate::engine::RawStatement;
use crate::record::{Args, Record, RecordSchema};
use eyre::Result;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::trace;

/// Values that can become the parameter record of a statement.
pub trait IntoParams<'r> {
    fn into_params(self, schema: &Arc<RecordSchema>) -> Result<Cow<'r, Record>>;
}

fn matches_schema(record: &Record, schema: &Arc<RecordSchema>) -> bool {
    Arc::ptr_eq(record.schema(), schema)
        || (record.schema().same_layout(schema) && record.schema().types() == schema.types())
}

impl<'r> IntoParams<'r> for &'r Record {
    fn into_params(self, schema: &Arc<RecordSchema>) -> Result<Cow<'r, Record>> {
        if matches_schema(self, schema) {
            Ok(Cow::Borrowed(self))
        } else {
            self.convert(schema).map(Cow::Owned)
        }
    }
}

impl IntoParams<'static> for Record {
    fn into_params(self, schema: &Arc<RecordSchema>) -> Result<Cow<'static, Record>> {
        if matches_schema(&self, schema) {
            Ok(Cow::Owned(self))
        } else {
            self.convert(schema).map(Cow::Owned)
        }
    }
}

impl IntoParams<'static> for Args {
    fn into_params(self, schema: &Arc<RecordSchema>) -> Result<Cow<'static, Record>> {
        Record::new(schema, self).map(Cow::Owned)
    }
}

/// Resets `raw`, clears its bindings and binds every field of `params`.
pub(crate) fn bind_record(raw: &mut (dyn RawStatement + '_), params: &Record) -> Result<()> {
    raw.reset()?;
    raw.clear_bindings()?;
    for (position, (tag, value)) in params.iter().enumerate() {
        trace!(field = %tag, position = position + 1, "binding parameter");
        raw.bind(position + 1, encode(value, tag)?)?;
    }
    Ok(())
}
