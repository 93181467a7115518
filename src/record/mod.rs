//! # Named-Field Records with Lazy Defaults
//!
//! A record is an ordered set of named fields. Each field is identified by a
//! string tag, has a type, and may carry an initialization rule that supplies
//! its value when construction doesn't. Rules may read fields declared
//! earlier in the same record, so declaration order matters.
//!
//! ## Layers
//!
//! | Type | Lives | Holds |
//! |------|-------|-------|
//! | [`FieldDef`] | inside a schema | tag, type or `Auto`, init rule, attributes |
//! | [`RecordSchema`] | `Arc`, shared | ordered fields, tag → index table |
//! | [`Record`] | per instance | the schema plus one [`Value`] per field |
//! | [`Args`] | construction input | `(tag, Arg)` pairs, any order |
//!
//! ## Construction
//!
//! ```ignore
//! let schema = RecordSchema::builder()
//!     .required("a", ValueType::Integer)
//!     .field(FieldDef::auto("b").with_derived(|r| Ok(r.get::<i64>("a")? + 2)))
//!     .field(FieldDef::optional("note", ValueType::Text))
//!     .build()?;
//!
//! let r = Record::new(&schema, Args::new().with("a", 5_i64))?;
//! assert_eq!(r.get::<i64>("b")?, 7);
//! ```
//!
//! Resolution order and the forward-reference guard are described in
//! [`construct`]. Records of one schema convert into another with
//! [`Record::convert`]: shared tags are copied, everything else defaults.
//!
//! ## Module Structure
//!
//! - `tag`: `FieldTag` and the argument/predicate builders hanging off it
//! - `field`: `FieldDef`, `InitRule`, `Attributes`
//! - `schema`: `RecordSchema` and its builder
//! - `args`: `Args` and `Arg`
//! - `construct`: default resolution and `PartialRecord`
//! - `instance`: `Record`
//! - `predicate`: comparisons of fields against values or other fields

pub mod args;
pub mod construct;
pub mod field;
pub mod instance;
pub mod predicate;
pub mod schema;
pub mod tag;

#[cfg(test)]
mod tests;

pub use args::{Arg, Args};
pub use construct::PartialRecord;
pub use field::{Attributes, DefaultFn, DerivedFn, FieldDef, InitRule};
pub use instance::Record;
pub use predicate::{Comparison, Operand, Predicate};
pub use schema::{RecordSchema, RecordSchemaBuilder};
pub use tag::{tag, FieldTag};
