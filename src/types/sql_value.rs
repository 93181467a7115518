//! # Engine Storage Values
//!
//! `SqlValue` is what crosses the engine seam: the five storage classes a
//! SQLite-style engine reads and writes. Record values are encoded into and
//! decoded from it by the statement codec, never by the engine.

use super::StorageClass;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// `None` for the null marker.
    pub fn storage_class(&self) -> Option<StorageClass> {
        match self {
            SqlValue::Null => None,
            SqlValue::Integer(_) => Some(StorageClass::Integer),
            SqlValue::Real(_) => Some(StorageClass::Real),
            SqlValue::Text(_) => Some(StorageClass::Text),
            SqlValue::Blob(_) => Some(StorageClass::Blob),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Integer(_) => "INTEGER",
            SqlValue::Real(_) => "REAL",
            SqlValue::Text(_) => "TEXT",
            SqlValue::Blob(_) => "BLOB",
        }
    }
}

/// TEXT must be valid UTF-8; anything else is an `Engine` error rather than
/// a silently repaired string.
impl TryFrom<rusqlite::types::ValueRef<'_>> for SqlValue {
    type Error = Error;

    fn try_from(v: rusqlite::types::ValueRef<'_>) -> Result<Self, Error> {
        use rusqlite::types::ValueRef;

        let value = match v {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(r) => SqlValue::Real(r),
            ValueRef::Text(t) => SqlValue::Text(
                std::str::from_utf8(t)
                    .map_err(|e| Error::engine("column", e))?
                    .to_owned(),
            ),
            ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
        };
        Ok(value)
    }
}

impl From<SqlValue> for rusqlite::types::Value {
    fn from(v: SqlValue) -> Self {
        use rusqlite::types::Value;

        match v {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(i) => Value::Integer(i),
            SqlValue::Real(r) => Value::Real(r),
            SqlValue::Text(t) => Value::Text(t),
            SqlValue::Blob(b) => Value::Blob(b),
        }
    }
}
