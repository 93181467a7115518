//! # Semantic Value Types
//!
//! `ValueType` is the closed vocabulary a query annotation can name. The
//! mapping from annotation type-names is fixed and case-sensitive:
//!
//! | Type name | `ValueType` | Rust value | Storage class |
//! |-----------|-------------|------------|---------------|
//! | `integer` | `Integer` | `i64` | INTEGER |
//! | `int` | `Int` | `i32` | INTEGER |
//! | `real` | `Real` | `f64` | REAL |
//! | `ansi` | `Ansi` | `String` | TEXT |
//! | `text` | `Text` | `String` | TEXT |
//! | `utf16` | `Utf16` | `Vec<u16>` | TEXT |
//! | `bool` | `Bool` | `bool` | INTEGER |
//! | `date` | `Date` | `DateTime<Utc>` | TEXT |
//! | `path` | `Path` | `PathBuf` | TEXT |
//! | `blob` | `Blob` | `Vec<u8>` | BLOB |
//!
//! A `FieldType` adds the optional flag carried by a trailing `?`.

use super::Value;
use std::fmt;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Integer = 0,
    Int = 1,
    Real = 2,
    Ansi = 3,
    Text = 4,
    Utf16 = 5,
    Bool = 6,
    Date = 7,
    Path = 8,
    Blob = 9,
}

/// Storage class the engine uses for a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Integer,
    Real,
    Text,
    Blob,
}

impl ValueType {
    pub const ALL: [ValueType; 10] = [
        ValueType::Integer,
        ValueType::Int,
        ValueType::Real,
        ValueType::Ansi,
        ValueType::Text,
        ValueType::Utf16,
        ValueType::Bool,
        ValueType::Date,
        ValueType::Path,
        ValueType::Blob,
    ];

    /// Maps an annotation type-name to its value type.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let ty = match name {
            "integer" => ValueType::Integer,
            "int" => ValueType::Int,
            "real" => ValueType::Real,
            "ansi" => ValueType::Ansi,
            "text" => ValueType::Text,
            "utf16" => ValueType::Utf16,
            "bool" => ValueType::Bool,
            "date" => ValueType::Date,
            "path" => ValueType::Path,
            "blob" => ValueType::Blob,
            _ => return None,
        };
        Some(ty)
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Int => "int",
            ValueType::Real => "real",
            ValueType::Ansi => "ansi",
            ValueType::Text => "text",
            ValueType::Utf16 => "utf16",
            ValueType::Bool => "bool",
            ValueType::Date => "date",
            ValueType::Path => "path",
            ValueType::Blob => "blob",
        }
    }

    pub fn storage_class(self) -> StorageClass {
        match self {
            ValueType::Integer | ValueType::Int | ValueType::Bool => StorageClass::Integer,
            ValueType::Real => StorageClass::Real,
            ValueType::Ansi
            | ValueType::Text
            | ValueType::Utf16
            | ValueType::Date
            | ValueType::Path => StorageClass::Text,
            ValueType::Blob => StorageClass::Blob,
        }
    }

    /// SQL column type used when generating table definitions.
    pub fn sql_type(self) -> &'static str {
        match self.storage_class() {
            StorageClass::Integer => "INTEGER",
            StorageClass::Real => "REAL",
            StorageClass::Text => "TEXT",
            StorageClass::Blob => "BLOB",
        }
    }

    /// The value a non-optional field of this type takes when the engine
    /// hands back a null or a column it cannot read.
    pub fn default_value(self) -> Value {
        match self {
            ValueType::Integer => Value::Integer(0),
            ValueType::Int => Value::Int(0),
            ValueType::Real => Value::Real(0.0),
            ValueType::Ansi => Value::Ansi(String::new()),
            ValueType::Text => Value::Text(String::new()),
            ValueType::Utf16 => Value::Utf16(Vec::new()),
            ValueType::Bool => Value::Bool(false),
            ValueType::Date => Value::Date(Default::default()),
            ValueType::Path => Value::Path(Default::default()),
            ValueType::Blob => Value::Blob(Vec::new()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A value type plus the optional flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
    pub base: ValueType,
    pub optional: bool,
}

impl FieldType {
    pub const fn required(base: ValueType) -> Self {
        Self {
            base,
            optional: false,
        }
    }

    pub const fn optional(base: ValueType) -> Self {
        Self {
            base,
            optional: true,
        }
    }

    /// Parses `name` or `name?`.
    pub fn parse(spec: &str) -> Option<Self> {
        match spec.strip_suffix('?') {
            Some(base) => ValueType::from_type_name(base).map(Self::optional),
            None => ValueType::from_type_name(spec).map(Self::required),
        }
    }

    pub fn default_value(self) -> Value {
        if self.optional {
            Value::Null
        } else {
            self.base.default_value()
        }
    }
}

impl From<ValueType> for FieldType {
    fn from(base: ValueType) -> Self {
        Self::required(base)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.type_name())?;
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}
