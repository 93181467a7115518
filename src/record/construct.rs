//! # Record Construction
//!
//! Resolves one value per declared field, in declaration order:
//!
//! 1. a supplied value (`Arg::Value`, or `Arg::Optional(Some(_))`) wins;
//! 2. otherwise a `Default` rule is invoked with no arguments;
//! 3. otherwise a `Derived` rule is invoked with a [`PartialRecord`] holding
//!    only the fields declared before the current one;
//! 4. otherwise the field is `Required` and construction fails.
//!
//! `Arg::Optional(None)` is treated exactly like an omitted tag. Every value,
//! supplied or produced, is converted to the field's type before it is
//! stored, so a later derived rule always sees typed values.
//!
//! ## Forward References
//!
//! The partial view is a prefix slice of the slots filled so far. Asking it
//! for the current field or a later one fails with `ForwardReference`; the
//! value simply does not exist yet.

use super::{Arg, Args, FieldTag, InitRule, RecordSchema};
use crate::error::Error;
use crate::types::{FieldValue, Value};
use eyre::Result;
use smallvec::SmallVec;
use tracing::trace;

/// Read-only view of a record under construction.
pub struct PartialRecord<'a> {
    schema: &'a RecordSchema,
    resolved: &'a [Value],
}

impl<'a> PartialRecord<'a> {
    /// Tag of the field whose default is being computed.
    pub fn current(&self) -> &'a FieldTag {
        &self.schema.fields()[self.resolved.len()].tag
    }

    /// Number of fields already resolved.
    pub fn resolved(&self) -> usize {
        self.resolved.len()
    }

    pub fn get_value(&self, tag: &str) -> Result<&'a Value> {
        let index = self
            .schema
            .index_of(tag)
            .ok_or_else(|| Error::UnknownField(tag.to_owned()))?;
        match self.resolved.get(index) {
            Some(value) => Ok(value),
            None => Err(Error::ForwardReference {
                current: self.current().to_string(),
                requested: tag.to_owned(),
            }
            .into()),
        }
    }

    pub fn get<T: FieldValue>(&self, tag: &str) -> Result<T> {
        extract(tag, self.get_value(tag)?)
    }
}

pub(crate) fn extract<T: FieldValue>(tag: &str, value: &Value) -> Result<T> {
    T::from_value(value).ok_or_else(|| {
        Error::TypeMismatch {
            field: tag.to_owned(),
            expected: T::FIELD_TYPE,
            actual: value.kind_name().to_owned(),
        }
        .into()
    })
}

/// Resolves the slot values of a `schema` record from `args`.
pub(crate) fn resolve(schema: &RecordSchema, args: Args) -> Result<Vec<Value>> {
    let mut supplied: SmallVec<[Option<Arg>; 8]> = SmallVec::new();
    supplied.resize(schema.len(), None);

    for (tag, arg) in args {
        let index = schema
            .index_of(&tag)
            .ok_or_else(|| Error::UnknownField(tag.to_string()))?;
        if supplied[index].replace(arg).is_some() {
            return Err(Error::DuplicateField(tag.to_string()).into());
        }
    }

    let mut values = Vec::with_capacity(schema.len());
    for (index, (field, arg)) in schema.fields().iter().zip(supplied).enumerate() {
        let value = match arg.and_then(Arg::into_supplied) {
            Some(value) => value,
            None => produce(schema, &field.init, &values, &field.tag)?,
        };
        values.push(value.convert_to(schema.field_type(index), &field.tag)?);
    }
    Ok(values)
}

fn produce(
    schema: &RecordSchema,
    init: &InitRule,
    resolved: &[Value],
    tag: &FieldTag,
) -> Result<Value> {
    match init {
        InitRule::Required => Err(Error::MissingRequiredField(tag.to_string()).into()),
        InitRule::Default { produce, .. } => {
            trace!(field = %tag, "applying default");
            Ok(produce())
        }
        InitRule::Derived { produce, .. } => {
            trace!(field = %tag, resolved = resolved.len(), "deriving default");
            produce(&PartialRecord { schema, resolved })
        }
    }
}
