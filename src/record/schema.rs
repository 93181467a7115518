//! # Record Schemas
//!
//! A `RecordSchema` is the type of a record: an ordered, fixed list of field
//! declarations with unique tags. Declaration order is also evaluation order
//! for defaults, so it is semantically visible.
//!
//! ## Registration
//!
//! Schemas are built once through [`RecordSchemaBuilder`] and then shared
//! behind an `Arc`. Building:
//!
//! 1. rejects duplicate tags,
//! 2. resolves every `Auto` field to the declared return type of its init
//!    rule (an `Auto` field without a producer is an error),
//! 3. builds the tag → index lookup table used by every record of the schema.
//!
//! None of this is repeated per record instance.
//!
//! ```ignore
//! let schema = RecordSchema::builder()
//!     .field(FieldDef::auto("hello").with_default_fn(|| 5_i64))
//!     .field(FieldDef::new("world", ValueType::Text).with_default("world"))
//!     .field(FieldDef::auto("test").with_derived(|r| {
//!         Ok(2 * r.get::<i64>("hello")? + r.get::<String>("world")?.len() as i64)
//!     }))
//!     .field(FieldDef::new("last", ValueType::Int).with_default(0))
//!     .build()?;
//! ```

use super::{Args, FieldDef, FieldTag, Record};
use crate::error::Error;
use crate::types::{FieldType, ValueType};
use eyre::Result;
use hashbrown::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
pub struct RecordSchema {
    fields: Vec<FieldDef>,
    types: Vec<FieldType>,
    index: HashMap<FieldTag, usize>,
}

impl RecordSchema {
    pub fn builder() -> RecordSchemaBuilder {
        RecordSchemaBuilder::default()
    }

    /// Registers a schema from an already ordered list of declarations.
    pub fn new(fields: Vec<FieldDef>) -> Result<Arc<Self>> {
        RecordSchemaBuilder { fields }.build()
    }

    /// The schema with no fields.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            fields: Vec::new(),
            types: Vec::new(),
            index: HashMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDef> {
        self.fields.get(index)
    }

    pub fn index_of(&self, tag: &str) -> Option<usize> {
        self.index.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// Resolved type of the field at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn field_type(&self, index: usize) -> FieldType {
        self.types[index]
    }

    pub fn type_of(&self, tag: &str) -> Option<FieldType> {
        self.index_of(tag).map(|i| self.types[i])
    }

    pub fn types(&self) -> &[FieldType] {
        &self.types
    }

    pub fn tags(&self) -> impl DoubleEndedIterator<Item = &FieldTag> + ExactSizeIterator + '_ {
        self.fields.iter().map(|f| &f.tag)
    }

    pub fn attributes(&self, tag: &str) -> Option<&super::Attributes> {
        self.index_of(tag).map(|i| &self.fields[i].attributes)
    }

    /// True when both schemas declare the same tags in the same order.
    pub fn same_layout(&self, other: &RecordSchema) -> bool {
        self.len() == other.len() && self.tags().zip(other.tags()).all(|(a, b)| a == b)
    }

    /// Constructs a record of this schema from named arguments.
    pub fn construct(self: &Arc<Self>, args: Args) -> Result<Record> {
        Record::new(self, args)
    }
}

impl fmt::Display for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.tag, self.types[i])?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Default)]
pub struct RecordSchemaBuilder {
    fields: Vec<FieldDef>,
}

impl RecordSchemaBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: FieldDef) {
        self.fields.push(field);
    }

    /// Shorthand for a required field.
    pub fn required(self, tag: impl Into<FieldTag>, ty: ValueType) -> Self {
        self.field(FieldDef::new(tag, ty))
    }

    /// Shorthand for an optional field defaulting to `Null`.
    pub fn optional(self, tag: impl Into<FieldTag>, ty: ValueType) -> Self {
        self.field(FieldDef::optional(tag, ty))
    }

    pub fn build(self) -> Result<Arc<RecordSchema>> {
        let mut index = HashMap::with_capacity(self.fields.len());
        let mut types = Vec::with_capacity(self.fields.len());
        let mut fields = self.fields;

        for (i, field) in fields.iter_mut().enumerate() {
            if index.insert(field.tag.clone(), i).is_some() {
                return Err(Error::DuplicateField(field.tag.to_string()).into());
            }

            let ty = match field.ty {
                Some(ty) => ty,
                None => field
                    .init
                    .returns()
                    .ok_or_else(|| Error::AutoWithoutInit(field.tag.to_string()))?,
            };
            field.ty = Some(ty);
            types.push(ty);
        }

        Ok(Arc::new(RecordSchema {
            fields,
            types,
            index,
        }))
    }
}
