//! # Field Predicates
//!
//! A `Predicate` compares two operands, each either a field of the record
//! under test or a literal value. Predicates are usually built from tags:
//!
//! ```ignore
//! let p = tag("age").greater_or_equal(18);
//! assert!(p.matches(&record)?);
//! ```
//!
//! A literal compared against a field is first converted to the field's type,
//! so `tag("count").equals(3_i32)` works for an `integer` field. Values of
//! different types, or a `Null` against a non-null, are incomparable: every
//! comparison is false except `NotEqual`.

use super::{FieldTag, Record};
use crate::types::Value;
use eyre::Result;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Comparison {
    fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Comparison::NotEqual, None) => true,
            (_, None) => false,
            (Comparison::Equal, Some(o)) => o == Ordering::Equal,
            (Comparison::NotEqual, Some(o)) => o != Ordering::Equal,
            (Comparison::LessThan, Some(o)) => o == Ordering::Less,
            (Comparison::LessThanOrEqual, Some(o)) => o != Ordering::Greater,
            (Comparison::GreaterThan, Some(o)) => o == Ordering::Greater,
            (Comparison::GreaterThanOrEqual, Some(o)) => o != Ordering::Less,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::LessThan => "<",
            Comparison::LessThanOrEqual => "<=",
            Comparison::GreaterThan => ">",
            Comparison::GreaterThanOrEqual => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Field(FieldTag),
    Value(Value),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(tag) => write!(f, "{}", tag),
            Operand::Value(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    lhs: Operand,
    op: Comparison,
    rhs: Operand,
}

impl Predicate {
    pub fn new(lhs: Operand, op: Comparison, rhs: Operand) -> Self {
        Self { lhs, op, rhs }
    }

    /// Compares two fields of the same record.
    pub fn fields(lhs: impl Into<FieldTag>, op: Comparison, rhs: impl Into<FieldTag>) -> Self {
        Self::new(Operand::Field(lhs.into()), op, Operand::Field(rhs.into()))
    }

    pub fn comparison(&self) -> Comparison {
        self.op
    }

    /// Evaluates the predicate against `record`. Fails only when a named
    /// field is missing or a literal cannot take the field's type.
    pub fn matches(&self, record: &Record) -> Result<bool> {
        let (lhs, rhs) = match (&self.lhs, &self.rhs) {
            (Operand::Field(a), Operand::Field(b)) => (
                Cow::Borrowed(record.get_value(a)?),
                Cow::Borrowed(record.get_value(b)?),
            ),
            (Operand::Field(a), Operand::Value(v)) => {
                let (field, literal) = field_and_literal(record, a, v)?;
                (Cow::Borrowed(field), Cow::Owned(literal))
            }
            (Operand::Value(v), Operand::Field(b)) => {
                let (field, literal) = field_and_literal(record, b, v)?;
                (Cow::Owned(literal), Cow::Borrowed(field))
            }
            (Operand::Value(a), Operand::Value(b)) => (Cow::Borrowed(a), Cow::Borrowed(b)),
        };
        Ok(self.op.holds(compare_values(&lhs, &rhs)))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

fn field_and_literal<'r>(
    record: &'r Record,
    tag: &FieldTag,
    literal: &Value,
) -> Result<(&'r Value, Value)> {
    let field = record.get_value(tag)?;
    let ty = record.schema().type_of(tag).map(|mut ty| {
        ty.optional = true;
        ty
    });
    let literal = match ty {
        Some(ty) => literal.clone().convert_to(ty, tag)?,
        None => literal.clone(),
    };
    Ok((field, literal))
}

/// Orders two values of the same type; `None` when they are incomparable.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    if a.value_type() != b.value_type() {
        return None;
    }
    a.partial_cmp(b)
}
