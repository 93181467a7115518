//! # Column Declarations
//!
//! A [`ColumnDecl`] names one table column together with its field type and
//! its constraint text. It renders the three fragments the manager splices
//! into generated SQL:
//!
//! | Method | Example (`id: integer`) | Used by |
//! |--------|-------------------------|---------|
//! | `decl()` | `?/*:id:integer*/` | INSERT value lists |
//! | `column()` | `id/*:integer*/` | SELECT column lists |
//! | `definition()` | `id INTEGER NOT NULL` | CREATE TABLE |
//!
//! Optional columns append `?` to the annotated type and default to an empty
//! constraint. A non-optional column must keep `NOT NULL` somewhere in its
//! constraint, otherwise a null could be stored in a column whose values
//! decode to a non-optional field.

use crate::config::NOT_NULL;
use crate::error::Error;
use crate::types::{FieldType, ValueType};
use eyre::Result;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDecl {
    name: String,
    ty: FieldType,
    constraint: String,
}

impl ColumnDecl {
    /// A non-optional column constrained `NOT NULL`.
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::required(ty),
            constraint: NOT_NULL.to_owned(),
        }
    }

    /// An optional column without constraint.
    pub fn optional(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::optional(ty),
            constraint: String::new(),
        }
    }

    /// Replaces the constraint text, e.g. `NOT NULL PRIMARY KEY`.
    ///
    /// Fails with `MissingNotNull` when the column is not optional and the
    /// new text drops `NOT NULL`.
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Result<Self> {
        let constraint = constraint.into();
        if !self.ty.optional && !constraint.to_ascii_uppercase().contains(NOT_NULL) {
            return Err(Error::MissingNotNull(self.name).into());
        }
        self.constraint = constraint;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    pub fn constraint(&self) -> &str {
        &self.constraint
    }

    /// Bind placeholder carrying a parameter annotation.
    pub fn decl(&self) -> String {
        format!("?/*:{}:{}*/", self.name, self.ty)
    }

    /// Column reference carrying a field annotation.
    pub fn column(&self) -> String {
        format!("{}/*:{}*/", self.name, self.ty)
    }

    /// Column definition for `CREATE TABLE`.
    pub fn definition(&self) -> String {
        let mut out = format!("{} {}", self.name, self.ty.base.sql_type());
        if !self.constraint.is_empty() {
            out.push(' ');
            out.push_str(&self.constraint);
        }
        out
    }
}

impl fmt::Display for ColumnDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column())
    }
}

/// `a, b, c`
pub(crate) fn name_list(columns: &[ColumnDecl]) -> String {
    join(columns, |c, out| out.push_str(&c.name))
}

/// `a/*:integer*/, b/*:text?*/`
pub(crate) fn column_list(columns: &[ColumnDecl]) -> String {
    join(columns, |c, out| out.push_str(&c.column()))
}

/// `?/*:a:integer*/, ?/*:b:text?*/`
pub(crate) fn decl_list(columns: &[ColumnDecl]) -> String {
    join(columns, |c, out| out.push_str(&c.decl()))
}

/// `a INTEGER NOT NULL, b TEXT`
pub(crate) fn definition_list(columns: &[ColumnDecl]) -> String {
    join(columns, |c, out| out.push_str(&c.definition()))
}

fn join(columns: &[ColumnDecl], mut render: impl FnMut(&ColumnDecl, &mut String)) -> String {
    let mut out = String::new();
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        render(column, &mut out);
    }
    out
}
