//! # Field Tags
//!
//! A `FieldTag` is the sole identity of a field: two tags name the same field
//! iff their strings are equal. Static tags borrow their `&'static str`;
//! tags built at run time (derived schemas) own their string.
//!
//! Tags double as small builders for named arguments and predicates:
//!
//! ```ignore
//! let args = Args::from_iter([tag("id").set(1_i64), tag("name").set("x")]);
//! let is_adult = tag("age").greater_or_equal(18);
//! ```

use super::{Arg, Comparison, Operand, Predicate};
use crate::types::Value;
use std::borrow::{Borrow, Cow};
use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldTag(Cow<'static, str>);

/// Shorthand for a static tag.
pub const fn tag(name: &'static str) -> FieldTag {
    FieldTag::new(name)
}

impl FieldTag {
    pub const fn new(name: &'static str) -> Self {
        FieldTag(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Named argument supplying `value` for this field.
    pub fn set(&self, value: impl Into<Value>) -> (FieldTag, Arg) {
        (self.clone(), Arg::Value(value.into()))
    }

    /// Optional-wrapped named argument; `None` asks for the field's default.
    pub fn set_optional<V: Into<Value>>(&self, value: Option<V>) -> (FieldTag, Arg) {
        (self.clone(), Arg::Optional(value.map(Into::into)))
    }

    fn compare(&self, op: Comparison, value: impl Into<Value>) -> Predicate {
        Predicate::new(
            Operand::Field(self.clone()),
            op,
            Operand::Value(value.into()),
        )
    }

    pub fn equals(&self, value: impl Into<Value>) -> Predicate {
        self.compare(Comparison::Equal, value)
    }

    pub fn not_equals(&self, value: impl Into<Value>) -> Predicate {
        self.compare(Comparison::NotEqual, value)
    }

    pub fn less_than(&self, value: impl Into<Value>) -> Predicate {
        self.compare(Comparison::LessThan, value)
    }

    pub fn less_or_equal(&self, value: impl Into<Value>) -> Predicate {
        self.compare(Comparison::LessThanOrEqual, value)
    }

    pub fn greater_than(&self, value: impl Into<Value>) -> Predicate {
        self.compare(Comparison::GreaterThan, value)
    }

    pub fn greater_or_equal(&self, value: impl Into<Value>) -> Predicate {
        self.compare(Comparison::GreaterThanOrEqual, value)
    }
}

impl From<&'static str> for FieldTag {
    fn from(name: &'static str) -> Self {
        FieldTag::new(name)
    }
}

impl From<String> for FieldTag {
    fn from(name: String) -> Self {
        FieldTag(Cow::Owned(name))
    }
}

impl Deref for FieldTag {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
