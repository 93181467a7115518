//! # Value Codec
//!
//! Encodes record values into engine storage values and decodes result
//! columns back by the declared field type.
//!
//! ## Encoding
//!
//! | Value type | Storage | Form |
//! |------------|---------|------|
//! | `integer`, `int` | INTEGER | as is |
//! | `bool` | INTEGER | 0 / 1 |
//! | `real` | REAL | as is |
//! | `ansi`, `text`, `path` | TEXT | UTF-8 |
//! | `utf16` | TEXT | transcoded to UTF-8 |
//! | `date` | TEXT | `%Y-%m-%d %H:%M:%S%.f`, UTC |
//! | `blob` | BLOB | as is |
//!
//! `Null` encodes to the null marker.
//!
//! ## Decoding
//!
//! Decoding is the mirror image, with a few lenient readings: an INTEGER
//! column may feed a `real` field, a `date` field also reads date-only text
//! and INTEGER unix seconds. Any other column the field cannot read (a null
//! marker into a non-optional field, a foreign storage class, an out of range
//! `int`, unparsable date text) leaves the field at its type default: `Null`
//! for an optional field, the base type's default otherwise. This is logged
//! at `trace`, never an error.

use crate::config::{DATE_FALLBACK_FORMATS, DATE_FORMAT, DATE_ONLY_FORMAT};
use crate::error::Error;
use crate::types::{FieldType, SqlValue, Value, ValueType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use eyre::Result;
use std::path::PathBuf;
use tracing::trace;

/// Encodes `value` for the engine. `field` names the value in errors.
pub fn encode(value: &Value, field: &str) -> Result<SqlValue> {
    let encoded = match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Int(i) => SqlValue::Integer(i64::from(*i)),
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Ansi(s) | Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Utf16(units) => SqlValue::Text(String::from_utf16(units).map_err(|_| {
            Error::TypeMismatch {
                field: field.to_owned(),
                expected: FieldType::required(ValueType::Text),
                actual: "invalid utf16".to_owned(),
            }
        })?),
        Value::Path(p) => SqlValue::Text(
            p.to_str()
                .ok_or_else(|| Error::TypeMismatch {
                    field: field.to_owned(),
                    expected: FieldType::required(ValueType::Text),
                    actual: "non UTF-8 path".to_owned(),
                })?
                .to_owned(),
        ),
        Value::Date(d) => SqlValue::Text(d.format(DATE_FORMAT).to_string()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    };
    Ok(encoded)
}

/// Decodes one result column into a value of type `ty`.
pub fn decode(column: SqlValue, ty: FieldType, field: &str) -> Value {
    if column.is_null() {
        if ty.optional {
            return Value::Null;
        }
        trace!(
            reason = %Error::NullIntoNonOptional(field.to_owned()),
            "substituting type default"
        );
        return ty.base.default_value();
    }

    let kind = column.kind_name();
    let value = match (ty.base, column) {
        (ValueType::Integer, SqlValue::Integer(i)) => Some(Value::Integer(i)),
        (ValueType::Int, SqlValue::Integer(i)) => i32::try_from(i).ok().map(Value::Int),
        (ValueType::Bool, SqlValue::Integer(i)) => Some(Value::Bool(i != 0)),
        (ValueType::Real, SqlValue::Real(r)) => Some(Value::Real(r)),
        (ValueType::Real, SqlValue::Integer(i)) => Some(Value::Real(i as f64)),
        (ValueType::Ansi, SqlValue::Text(s)) => Some(Value::Ansi(s)),
        (ValueType::Text, SqlValue::Text(s)) => Some(Value::Text(s)),
        (ValueType::Utf16, SqlValue::Text(s)) => Some(Value::Utf16(s.encode_utf16().collect())),
        (ValueType::Path, SqlValue::Text(s)) => Some(Value::Path(PathBuf::from(s))),
        (ValueType::Date, SqlValue::Text(s)) => parse_date(&s).map(Value::Date),
        (ValueType::Date, SqlValue::Integer(secs)) => {
            DateTime::from_timestamp(secs, 0).map(Value::Date)
        }
        (ValueType::Blob, SqlValue::Blob(b)) => Some(Value::Blob(b)),
        _ => None,
    };

    value.unwrap_or_else(|| {
        trace!(
            reason = %Error::TypeMismatch {
                field: field.to_owned(),
                expected: ty,
                actual: kind.to_owned(),
            },
            "substituting type default"
        );
        ty.default_value()
    })
}

/// Parses date text written by [`encode`] or by common SQL tooling.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    std::iter::once(DATE_FORMAT)
        .chain(DATE_FALLBACK_FORMATS.iter().copied())
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_ONLY_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}
