//! # Type System for tagsql
//!
//! This module provides the value vocabulary shared by records, the schema
//! builder and the statement codec.
//!
//! ## Module Structure
//!
//! - `value_type`: Closed `ValueType` vocabulary and `FieldType` (type + optional flag)
//! - `value`: Owned `Value` held by record slots, `FieldValue` for typed access
//! - `sql_value`: `SqlValue` storage classes exchanged with the engine
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `ValueType` | Semantic type named by an annotation |
//! | `FieldType` | `ValueType` plus optional flag |
//! | `Value` | Runtime value of one record field |
//! | `SqlValue` | Engine-side storage value |
//! | `FieldValue` | Rust type ↔ `Value` bridge |
//!
//! ## Usage
//!
//! ```ignore
//! use tagsql::types::{FieldType, Value, ValueType};
//!
//! let ty = FieldType::parse("text?").unwrap();
//! let v = Value::from("hello").convert_to(ty, "greeting")?;
//! ```

mod sql_value;
mod value;
mod value_type;

pub use sql_value::SqlValue;
pub use value::{FieldValue, Value};
pub use value_type::{FieldType, StorageClass, ValueType};
