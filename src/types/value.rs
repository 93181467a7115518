//! # Record Field Values
//!
//! `Value` is the owned runtime value held by one record slot. `Null` is
//! only legal in optional fields; every other variant corresponds to exactly
//! one [`ValueType`].
//!
//! ## Conversion
//!
//! Values supplied for a field are converted to the field's declared type
//! with [`Value::convert_to`]:
//!
//! | From | To | Rule |
//! |------|----|------|
//! | `Integer` | `Int` | range-checked narrowing |
//! | `Int` | `Integer` | widening |
//! | `Integer`, `Int` | `Real` | `as f64` |
//! | `Integer`, `Int` | `Bool` | non-zero is true |
//! | `Bool` | `Integer`, `Int` | 0 / 1 |
//! | `Ansi`, `Text`, `Path`, `Utf16` | each other | transcoded |
//! | anything | optional field | kept, `Null` allowed |
//!
//! Everything else is an [`Error::TypeMismatch`].
//!
//! ## Typed Access
//!
//! [`FieldValue`] connects Rust types to value types. It is what lets a
//! default producer declare its return type and what `Record::get::<T>` uses
//! to extract values:
//!
//! ```ignore
//! let id: i64 = record.get("id")?;
//! let email: Option<String> = record.get("email")?;
//! ```

use super::{FieldType, ValueType};
use crate::error::Error;
use chrono::{DateTime, Utc};
use eyre::Result;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    Null,
    Integer(i64),
    Int(i32),
    Real(f64),
    Ansi(String),
    Text(String),
    Utf16(Vec<u16>),
    Bool(bool),
    Date(DateTime<Utc>),
    Path(PathBuf),
    Blob(Vec<u8>),
}

impl Value {
    pub fn ansi(s: impl Into<String>) -> Self {
        Value::Ansi(s.into())
    }

    pub fn utf16(s: &str) -> Self {
        Value::Utf16(s.encode_utf16().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The value type of this value; `None` for `Null`.
    pub fn value_type(&self) -> Option<ValueType> {
        let ty = match self {
            Value::Null => return None,
            Value::Integer(_) => ValueType::Integer,
            Value::Int(_) => ValueType::Int,
            Value::Real(_) => ValueType::Real,
            Value::Ansi(_) => ValueType::Ansi,
            Value::Text(_) => ValueType::Text,
            Value::Utf16(_) => ValueType::Utf16,
            Value::Bool(_) => ValueType::Bool,
            Value::Date(_) => ValueType::Date,
            Value::Path(_) => ValueType::Path,
            Value::Blob(_) => ValueType::Blob,
        };
        Some(ty)
    }

    /// Short name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        self.value_type().map_or("null", ValueType::type_name)
    }

    /// The field type a value of this variant would get when its field's
    /// type is inferred from it.
    pub fn inferred_field_type(&self) -> Option<FieldType> {
        self.value_type().map(FieldType::required)
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Int(i) => Some(i64::from(*i)),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Borrows string-like values as UTF-8 where no transcoding is needed.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Ansi(s) | Value::Text(s) => Some(s),
            Value::Path(p) => p.to_str(),
            _ => None,
        }
    }

    fn to_string_value(&self) -> Option<String> {
        match self {
            Value::Utf16(units) => String::from_utf16(units).ok(),
            other => other.as_str().map(str::to_owned),
        }
    }

    /// Converts this value to `ty`, naming `field` in the error.
    pub fn convert_to(self, ty: FieldType, field: &str) -> Result<Value> {
        let mismatch = |actual: &Value| Error::TypeMismatch {
            field: field.to_owned(),
            expected: ty,
            actual: actual.kind_name().to_owned(),
        };

        if self.is_null() {
            if ty.optional {
                return Ok(Value::Null);
            }
            return Err(mismatch(&self).into());
        }

        if self.value_type() == Some(ty.base) {
            return Ok(self);
        }

        let converted = match ty.base {
            ValueType::Integer => self.as_i64().map(Value::Integer),
            ValueType::Int => self
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(Value::Int),
            ValueType::Real => match &self {
                Value::Integer(i) => Some(Value::Real(*i as f64)),
                Value::Int(i) => Some(Value::Real(f64::from(*i))),
                _ => None,
            },
            ValueType::Bool => match &self {
                Value::Integer(_) | Value::Int(_) => self.as_i64().map(|i| Value::Bool(i != 0)),
                _ => None,
            },
            ValueType::Ansi => self.to_string_value().map(Value::Ansi),
            ValueType::Text => self.to_string_value().map(Value::Text),
            ValueType::Utf16 => self
                .to_string_value()
                .map(|s| Value::Utf16(s.encode_utf16().collect())),
            ValueType::Path => self.to_string_value().map(|s| Value::Path(PathBuf::from(s))),
            ValueType::Date | ValueType::Blob => None,
        };

        match converted {
            Some(value) => Ok(value),
            None => Err(mismatch(&self).into()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Int(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Ansi(s) | Value::Text(s) => f.write_str(s),
            Value::Utf16(units) => write!(f, "{}", String::from_utf16_lossy(units)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format(crate::config::DATE_FORMAT)),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::Blob(b) => {
                for (i, byte) in b.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u16>> for Value {
    fn from(v: Vec<u16>) -> Self {
        Value::Utf16(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Date(v)
    }
}

impl From<PathBuf> for Value {
    fn from(v: PathBuf) -> Self {
        Value::Path(v)
    }
}

impl From<&Path> for Value {
    fn from(v: &Path) -> Self {
        Value::Path(v.to_path_buf())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A Rust type that can live in a record field.
pub trait FieldValue: Sized {
    /// The field type this Rust type maps to. Used to infer `Auto` fields.
    const FIELD_TYPE: FieldType;

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FieldValue for i64 {
    const FIELD_TYPE: FieldType = FieldType::required(ValueType::Integer);

    fn into_value(self) -> Value {
        Value::Integer(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(*i),
            Value::Int(i) => Some(i64::from(*i)),
            _ => None,
        }
    }
}

impl FieldValue for i32 {
    const FIELD_TYPE: FieldType = FieldType::required(ValueType::Int);

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            Value::Integer(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    const FIELD_TYPE: FieldType = FieldType::required(ValueType::Real);

    fn into_value(self) -> Value {
        Value::Real(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => Some(*i as f64),
            Value::Int(i) => Some(f64::from(*i)),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    const FIELD_TYPE: FieldType = FieldType::required(ValueType::Bool);

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::Int(i) => Some(*i != 0),
            _ => None,
        }
    }
}

impl FieldValue for String {
    const FIELD_TYPE: FieldType = FieldType::required(ValueType::Text);

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.to_string_value()
    }
}

impl FieldValue for Vec<u16> {
    const FIELD_TYPE: FieldType = FieldType::required(ValueType::Utf16);

    fn into_value(self) -> Value {
        Value::Utf16(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Utf16(units) => Some(units.clone()),
            other => other.as_str().map(|s| s.encode_utf16().collect()),
        }
    }
}

impl FieldValue for DateTime<Utc> {
    const FIELD_TYPE: FieldType = FieldType::required(ValueType::Date);

    fn into_value(self) -> Value {
        Value::Date(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl FieldValue for PathBuf {
    const FIELD_TYPE: FieldType = FieldType::required(ValueType::Path);

    fn into_value(self) -> Value {
        Value::Path(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Path(p) => Some(p.clone()),
            other => other.to_string_value().map(PathBuf::from),
        }
    }
}

impl FieldValue for Vec<u8> {
    const FIELD_TYPE: FieldType = FieldType::required(ValueType::Blob);

    fn into_value(self) -> Value {
        Value::Blob(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(b) => Some(b.clone()),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const FIELD_TYPE: FieldType = FieldType::optional(T::FIELD_TYPE.base);

    fn into_value(self) -> Value {
        self.map_or(Value::Null, FieldValue::into_value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
