//! # Error Kinds
//!
//! Every fallible operation in tagsql returns `eyre::Result`. The kinds a
//! caller may want to branch on are the variants of [`Error`], which travel
//! inside the `eyre::Report` and are recovered with `downcast_ref`:
//!
//! ```ignore
//! match stmt.execute(&params) {
//!     Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::Engine { .. })) => { ... }
//!     other => other?,
//! }
//! ```
//!
//! ## Fatality
//!
//! | Kind | Raised by | Fatal |
//! |------|-----------|-------|
//! | `SchemaMismatch` | statement preparation / stepping | yes |
//! | `Engine` | any engine call | yes |
//! | `MissingRequiredField` | record construction | yes |
//! | `UnrecognizedType` | schema derivation | yes |
//! | `ForwardReference` | derived defaults | yes |
//! | `NullIntoNonOptional` | never returned; logged when a default is substituted | no |
//!
//! Nothing is retried internally; callers choose retry/abort policy.

use crate::types::FieldType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("schema mismatch: {what} expects {expected} but the engine reports {actual}")]
    SchemaMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("engine error during {operation}: {message}")]
    Engine {
        operation: &'static str,
        message: String,
    },

    #[error("missing required field '{0}'")]
    MissingRequiredField(String),

    #[error("unrecognized type name '{0}'")]
    UnrecognizedType(String),

    #[error("null value for non-optional field '{0}'")]
    NullIntoNonOptional(String),

    #[error("field '{requested}' is not resolved yet while computing '{current}'")]
    ForwardReference { current: String, requested: String },

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("duplicate field '{0}'")]
    DuplicateField(String),

    #[error("field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: String,
    },

    #[error("annotation at byte {0} has no name")]
    EmptyFieldName(usize),

    #[error("field '{0}' has no declared type and no default to infer it from")]
    AutoWithoutInit(String),

    #[error("column '{0}' is not optional and its constraint lacks NOT NULL")]
    MissingNotNull(String),
}

impl Error {
    pub(crate) fn engine(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Error::Engine {
            operation,
            message: err.to_string(),
        }
    }

    /// Returns true for the kinds that abort the current operation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::NullIntoNonOptional(_))
    }
}

/// Recovers the typed kind carried by a report, if any.
pub fn kind(report: &eyre::Report) -> Option<&Error> {
    report.downcast_ref::<Error>()
}
