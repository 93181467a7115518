//! Record instances: construction, lookup, mutation, conversion between
//! schemas, comparison and display.

use super::construct::{extract, resolve};
use super::{Arg, Args, FieldDef, FieldTag, RecordSchema};
use crate::error::Error;
use crate::types::{FieldType, FieldValue, Value, ValueType};
use eyre::Result;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// An instance of a [`RecordSchema`]: one value per declared field.
#[derive(Clone)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

impl Record {
    /// Constructs a record from named arguments, applying defaults for every
    /// field the arguments leave out.
    pub fn new(schema: &Arc<RecordSchema>, args: Args) -> Result<Self> {
        let values = resolve(schema, args)?;
        Ok(Self {
            schema: Arc::clone(schema),
            values,
        })
    }

    /// A record built from defaults alone.
    pub fn defaults(schema: &Arc<RecordSchema>) -> Result<Self> {
        Self::new(schema, Args::new())
    }

    /// Builds a record whose schema is inferred from the values themselves.
    /// A `Null` value makes an optional text field.
    pub fn from_values<K, V, I>(pairs: I) -> Result<Self>
    where
        K: Into<FieldTag>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut builder = RecordSchema::builder();
        let mut values = Vec::new();
        for (tag, value) in pairs {
            let value = value.into();
            let ty = value
                .inferred_field_type()
                .unwrap_or(FieldType::optional(ValueType::Text));
            builder.push(FieldDef::new(tag, ty));
            values.push(value);
        }
        Ok(Self {
            schema: builder.build()?,
            values,
        })
    }

    /// Assembles a record from values already typed for `schema`.
    pub(crate) fn from_parts(schema: Arc<RecordSchema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_value(&self, tag: &str) -> Result<&Value> {
        self.schema
            .index_of(tag)
            .map(|i| &self.values[i])
            .ok_or_else(|| Error::UnknownField(tag.to_owned()).into())
    }

    pub fn get<T: FieldValue>(&self, tag: &str) -> Result<T> {
        extract(tag, self.get_value(tag)?)
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Replaces a field's value, converting it to the field's type.
    pub fn set(&mut self, tag: &str, value: impl Into<Value>) -> Result<()> {
        let index = self
            .schema
            .index_of(tag)
            .ok_or_else(|| Error::UnknownField(tag.to_owned()))?;
        self.values[index] = value.into().convert_to(self.schema.field_type(index), tag)?;
        Ok(())
    }

    /// Fields in declaration order.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&FieldTag, &Value)> + ExactSizeIterator + '_ {
        self.schema.tags().zip(self.values.iter())
    }

    pub fn fields(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&FieldDef, &Value)> + ExactSizeIterator + '_ {
        self.schema.fields().iter().zip(self.values.iter())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Builds a record of `target` from this one. Shared tags whose value
    /// converts to the target's type carry it over; every other field of
    /// `target` falls back to its own init rule.
    pub fn convert(&self, target: &Arc<RecordSchema>) -> Result<Record> {
        if Arc::ptr_eq(&self.schema, target) {
            return Ok(self.clone());
        }
        let args = self
            .iter()
            .filter_map(|(tag, value)| {
                let index = target.index_of(tag)?;
                match value.clone().convert_to(target.field_type(index), tag) {
                    Ok(converted) => Some((tag.clone(), Arg::Value(converted))),
                    Err(_) => {
                        trace!(field = %tag, "not convertible, using target init rule");
                        None
                    }
                }
            })
            .collect();
        Record::new(target, args)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.same_layout(&other.schema) && self.values == other.values
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.schema.same_layout(&other.schema) {
            return None;
        }
        for (a, b) in self.values.iter().zip(&other.values) {
            match a.partial_cmp(b) {
                Some(Ordering::Equal) => continue,
                decided => return decided,
            }
        }
        Some(Ordering::Equal)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(t, v)| (t.as_str(), v)))
            .finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (tag, value) in self.iter() {
            writeln!(f, "{}:{}", tag, value)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a FieldTag, &'a Value);
    type IntoIter = std::iter::Zip<
        std::iter::Map<std::slice::Iter<'a, FieldDef>, fn(&'a FieldDef) -> &'a FieldTag>,
        std::slice::Iter<'a, Value>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        let tag_of: fn(&'a FieldDef) -> &'a FieldTag = |f| &f.tag;
        self.schema.fields().iter().map(tag_of).zip(self.values.iter())
    }
}
