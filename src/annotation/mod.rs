//! # Annotated Query Text
//!
//! Queries carry their own types. Every selected column and every bind
//! parameter is followed by a block comment the engine ignores but tagsql
//! reads:
//!
//! ```text
//! SELECT id/*:integer*/, email/*:text?*/ FROM users WHERE id = ?/*:target:integer*/
//! ```
//!
//! From that text alone the crate derives the schema of a result row
//! (`id: integer, email: text?`) and the schema of the parameters
//! (`target: integer`).
//!
//! ## Pipeline
//!
//! ```text
//! query text ──> parser::AnnotationScanner ──> Annotation descriptors
//!                                                   │
//!                            schema::derive_schema <┘
//!                                   │
//!                     QuerySchema { row, params }
//! ```
//!
//! ## Module Structure
//!
//! - `parser`: byte-range descriptors, counting pre-pass
//! - `schema`: descriptor → `RecordSchema` mapping and the per-text cache

pub mod parser;
pub mod schema;

pub use parser::{
    count_annotations, parse_annotations, Annotation, AnnotationCounts, AnnotationKind,
    AnnotationScanner, ParsedAnnotations,
};
pub use schema::{derive_schema, QuerySchema, SchemaCache};
