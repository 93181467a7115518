//! # tagsql Configuration Constants
//!
//! This module holds the bit-exact pieces of the annotation grammar and the
//! defaults used when opening a database.
//!
//! ## Annotation Grammar
//!
//! ```text
//! start_marker   = "/*:"
//! end_marker     = "*/"
//! optional_mark  = "?"            (immediately before end_marker)
//! field_anno     = <identifier> start_marker <type_name> [optional_mark] end_marker
//! param_anno     = "?" start_marker <param_name> ":" <type_name> [optional_mark] end_marker
//! identifier_chr = 'A'-'Z' | 'a'-'z' | '0'-'9' | '_' | '.'
//! ```
//!
//! The start marker opens an ordinary SQL block comment, so annotated query
//! text is still valid SQL for the engine.
//!
//! ## Critical Invariants
//!
//! 1. `START_MARKER` begins with `"/*"` (the engine must see a comment)
//! 2. `END_MARKER == "*/"`
//! 3. `PARAM_SEPARATOR` is a single byte and not an identifier character
//!
//! ## Usage
//!
//! ```ignore
//! use tagsql::config::{START_MARKER, END_MARKER};
//! ```

// ============================================================================
// ANNOTATION GRAMMAR
// ============================================================================

/// Opens an inline type annotation.
pub const START_MARKER: &str = "/*:";

/// Closes an inline type annotation.
pub const END_MARKER: &str = "*/";

/// Separates the bind-parameter name from its type inside a parameter
/// annotation. Its presence is what classifies an annotation as a parameter.
pub const PARAM_SEPARATOR: u8 = b':';

/// Trailing mark on a type name that makes the field optional.
pub const OPTIONAL_MARK: u8 = b'?';

const _: () = assert!(
    START_MARKER.as_bytes()[0] == b'/' && START_MARKER.as_bytes()[1] == b'*',
    "START_MARKER must open a SQL block comment"
);

const _: () = assert!(
    END_MARKER.as_bytes()[0] == b'*' && END_MARKER.as_bytes()[1] == b'/',
    "END_MARKER must close a SQL block comment"
);

const _: () = assert!(
    !is_identifier_byte(PARAM_SEPARATOR),
    "PARAM_SEPARATOR must not be an identifier character"
);

/// Identifier characters recovered by the backward scan of a field annotation.
#[inline]
pub const fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

/// Whitespace skipped between an identifier and its field annotation.
#[inline]
pub const fn is_annotation_space(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\r' | b'\t')
}

// ============================================================================
// VALUE CODECS
// ============================================================================

/// Text layout used to store `date` values. Always UTC.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Accepted when reading `date` values written without fractional seconds
/// or by other tools.
pub const DATE_FALLBACK_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Date-only text; read as midnight UTC.
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// DATABASE DEFAULTS
// ============================================================================

/// Default busy timeout applied to new connections, in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Initial capacity of the per-database schema cache.
pub const DEFAULT_SCHEMA_CACHE_CAPACITY: usize = 32;

/// Constraint text every non-optional column declaration must carry.
pub const NOT_NULL: &str = "NOT NULL";

/// Field tag used by the `PRAGMA user_version` helpers.
pub const USER_VERSION_FIELD: &str = "user_version";

/// Field tag used by the table existence probe.
pub const EXIST_FIELD: &str = "exist";
