//! # Query Schema Derivation
//!
//! Turns the annotations of a query into two record schemas:
//!
//! - the **row schema**, one field per field annotation, in query order;
//! - the **parameter schema**, one field per parameter annotation, in query
//!   order (which is also bind order).
//!
//! Type names come from the closed vocabulary of [`ValueType`]; anything else
//! is `UnrecognizedType`. Row fields are always `Required`: the materializer
//! supplies every one of them. Non-optional parameters are `Required` too, so
//! forgetting to bind one is an error rather than a silent zero. Optional
//! parameters default to `Null`.
//!
//! ## Caching
//!
//! Derivation is pure, so its result depends on the query text alone.
//! [`SchemaCache`] memoizes it per distinct text; every statement prepared
//! from the same text shares the same `Arc<RecordSchema>`s.

use super::parser::{parse_annotations, Annotation};
use crate::error::Error;
use crate::record::{FieldDef, RecordSchema, RecordSchemaBuilder};
use crate::types::FieldType;
use eyre::Result;
use hashbrown::HashMap;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct QuerySchema {
    pub row: Arc<RecordSchema>,
    pub params: Arc<RecordSchema>,
}

/// Derives the row and parameter schemas of `query`.
pub fn derive_schema(query: &str) -> Result<QuerySchema> {
    let parsed = parse_annotations(query);

    let mut row = RecordSchemaBuilder::with_capacity(parsed.fields.len());
    for annotation in &parsed.fields {
        let (name, ty) = resolve(query, annotation)?;
        row.push(FieldDef::new(name, ty));
    }

    let mut params = RecordSchemaBuilder::with_capacity(parsed.params.len());
    for annotation in &parsed.params {
        let (name, ty) = resolve(query, annotation)?;
        params.push(if ty.optional {
            FieldDef::optional(name, ty.base)
        } else {
            FieldDef::new(name, ty)
        });
    }

    let schema = QuerySchema {
        row: row.build()?,
        params: params.build()?,
    };
    debug!(
        row = %schema.row,
        params = %schema.params,
        "derived query schema"
    );
    Ok(schema)
}

fn resolve(query: &str, annotation: &Annotation) -> Result<(String, FieldType)> {
    let name = annotation.name_in(query);
    if name.is_empty() {
        return Err(Error::EmptyFieldName(annotation.offset).into());
    }
    let type_name = annotation.type_in(query);
    let mut ty = FieldType::parse(type_name)
        .ok_or_else(|| Error::UnrecognizedType(type_name.to_owned()))?;
    ty.optional = annotation.optional;
    Ok((name.to_owned(), ty))
}

/// Memoized `derive_schema`, keyed by query text.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RefCell<HashMap<String, QuerySchema>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RefCell::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Returns the cached schemas of `query`, deriving them on first use.
    /// A failed derivation is not cached.
    pub fn get_or_derive(&self, query: &str) -> Result<QuerySchema> {
        if let Some(schema) = self.entries.borrow().get(query) {
            return Ok(schema.clone());
        }
        debug!(query, "schema cache miss");
        let schema = derive_schema(query)?;
        self.entries
            .borrow_mut()
            .insert(query.to_owned(), schema.clone());
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Args, Record};
    use crate::types::{Value, ValueType};

    #[test]
    fn row_and_parameter_schemas_follow_query_order() {
        let schema = derive_schema(
            "SELECT id/*:integer*/, name/*:text*/ FROM t WHERE id = ?/*:target:integer*/;",
        )
        .unwrap();

        let row: Vec<String> = schema.row.tags().map(|t| t.to_string()).collect();
        assert_eq!(row, ["id", "name"]);
        assert_eq!(schema.row.types()[0], FieldType::required(ValueType::Integer));
        assert_eq!(schema.row.types()[1], FieldType::required(ValueType::Text));

        assert_eq!(schema.params.len(), 1);
        assert_eq!(
            schema.params.type_of("target"),
            Some(FieldType::required(ValueType::Integer))
        );
    }

    #[test]
    fn optional_flag_reaches_field_type() {
        let schema = derive_schema("SELECT email/*:text?*/, ts/*:date*/ FROM t").unwrap();
        assert_eq!(
            schema.row.type_of("email"),
            Some(FieldType::optional(ValueType::Text))
        );
        assert_eq!(
            schema.row.type_of("ts"),
            Some(FieldType::required(ValueType::Date))
        );
    }

    #[test]
    fn whole_vocabulary_is_accepted() {
        for ty in ValueType::ALL {
            let q = format!("SELECT c/*:{}*/", ty.type_name());
            let schema = derive_schema(&q).unwrap();
            assert_eq!(schema.row.type_of("c"), Some(FieldType::required(ty)));
        }
    }

    #[test]
    fn unknown_type_name_is_rejected() {
        let err = derive_schema("SELECT c/*:varchar*/").unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::UnrecognizedType("varchar".into()))
        );

        let err = derive_schema("SELECT c/*:Integer*/").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnrecognizedType(_))
        ));
    }

    #[test]
    fn nameless_field_annotation_is_rejected() {
        let err = derive_schema("SELECT count(*)/*:integer*/ FROM t").unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::EmptyFieldName(15)));
    }

    #[test]
    fn optional_parameter_defaults_to_null() {
        let schema = derive_schema("INSERT INTO t VALUES (?/*:id:integer*/, ?/*:email:text?*/)").unwrap();

        let params = Record::new(&schema.params, Args::new().with("id", 1_i64)).unwrap();
        assert_eq!(params.get_value("email").unwrap(), &Value::Null);

        let err = Record::new(&schema.params, Args::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::MissingRequiredField("id".into()))
        );
    }

    #[test]
    fn query_without_annotations_has_empty_schemas() {
        let schema = derive_schema("DELETE FROM t").unwrap();
        assert!(schema.row.is_empty());
        assert!(schema.params.is_empty());
    }

    #[test]
    fn cache_returns_shared_schemas() {
        let cache = SchemaCache::new();
        let q = "SELECT a/*:int*/ FROM t";

        let first = cache.get_or_derive(q).unwrap();
        let second = cache.get_or_derive(q).unwrap();
        assert!(Arc::ptr_eq(&first.row, &second.row));
        assert_eq!(cache.len(), 1);

        cache.get_or_derive("SELECT b/*:real*/ FROM t").unwrap();
        assert_eq!(cache.len(), 2);

        assert!(cache.get_or_derive("SELECT c/*:nope*/").is_err());
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
