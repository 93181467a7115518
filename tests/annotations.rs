//! Schema derivation from annotated query text.

use proptest::prelude::*;
use tagsql::annotation::{count_annotations, parse_annotations, AnnotationKind};
use tagsql::error::kind;
use tagsql::{derive_schema, Error, FieldType, SchemaCache, ValueType};

fn tags(schema: &tagsql::RecordSchema) -> Vec<String> {
    schema.tags().map(|t| t.to_string()).collect()
}

#[test]
fn select_derives_row_and_parameter_schemas() {
    let schema = derive_schema(
        "SELECT p.id/*:integer*/, p.name/*:text?*/, p.born /*:date*/ \
         FROM person p WHERE p.id >= ?/*:low:integer*/ AND p.id < ?/*:high:integer*/;",
    )
    .unwrap();

    assert_eq!(tags(&schema.row), ["p.id", "p.name", "p.born"]);
    assert_eq!(
        schema.row.types(),
        [
            FieldType::required(ValueType::Integer),
            FieldType::optional(ValueType::Text),
            FieldType::required(ValueType::Date),
        ]
    );
    assert_eq!(tags(&schema.params), ["low", "high"]);
}

#[test]
fn insert_has_parameters_only() {
    let schema = derive_schema(
        "INSERT INTO file(path, size, digest) \
         VALUES(?/*:path:path*/, ?/*:size:integer*/, ?/*:digest:blob?*/);",
    )
    .unwrap();

    assert!(schema.row.is_empty());
    assert_eq!(tags(&schema.params), ["path", "size", "digest"]);
    assert_eq!(
        schema.params.type_of("digest"),
        Some(FieldType::optional(ValueType::Blob))
    );
}

#[test]
fn every_type_name_is_recognized() {
    for ty in ValueType::ALL {
        let query = format!("SELECT v/*:{}*/", ty.type_name());
        let schema = derive_schema(&query).unwrap();
        assert_eq!(schema.row.types(), [FieldType::required(ty)]);
    }
}

#[test]
fn type_names_are_case_sensitive() {
    let err = derive_schema("SELECT v/*:Integer*/").unwrap_err();
    assert_eq!(kind(&err), Some(&Error::UnrecognizedType("Integer".into())));

    let err = derive_schema("SELECT 1 WHERE ?/*:p:varchar*/").unwrap_err();
    assert_eq!(kind(&err), Some(&Error::UnrecognizedType("varchar".into())));
}

#[test]
fn annotation_without_identifier_is_rejected() {
    let err = derive_schema("SELECT count(*)/*:integer*/ FROM t").unwrap_err();
    assert_eq!(kind(&err), Some(&Error::EmptyFieldName(15)));

    let err = derive_schema("SELECT ?/*::integer*/").unwrap_err();
    assert_eq!(kind(&err), Some(&Error::EmptyFieldName(8)));
}

#[test]
fn repeated_name_is_a_duplicate() {
    let err = derive_schema("SELECT a/*:int*/, a/*:int*/").unwrap_err();
    assert_eq!(kind(&err), Some(&Error::DuplicateField("a".into())));
}

#[test]
fn unannotated_query_has_empty_schemas() {
    let schema = derive_schema("SELECT 1 /* plain comment */ FROM t WHERE x = ?").unwrap();
    assert!(schema.row.is_empty());
    assert!(schema.params.is_empty());
}

#[test]
fn scanner_reports_kinds_in_text_order() {
    let query = "SELECT a/*:int*/ FROM t WHERE b = ?/*:b:int*/ AND c/*:int?*/ > 0";
    let parsed = parse_annotations(query);
    assert_eq!(parsed.fields.len(), 2);
    assert_eq!(parsed.params.len(), 1);
    assert_eq!(parsed.params[0].kind, AnnotationKind::Parameter);
    assert!(parsed.fields[1].optional);
    assert!(parsed.fields[0].offset < parsed.params[0].offset);
    assert!(parsed.params[0].offset < parsed.fields[1].offset);
}

#[test]
fn cache_derives_each_text_once() {
    let cache = SchemaCache::new();
    let query = "SELECT id/*:integer*/ FROM t";

    let first = cache.get_or_derive(query).unwrap();
    let second = cache.get_or_derive(query).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first.row, &second.row));
    assert_eq!(cache.len(), 1);

    assert!(cache.get_or_derive("SELECT x/*:nope*/").is_err());
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

proptest! {
    #[test]
    fn scanning_never_panics(query in ".{0,200}") {
        let counts = count_annotations(&query);
        let parsed = parse_annotations(&query);
        prop_assert_eq!(parsed.fields.len(), counts.fields);
        prop_assert_eq!(parsed.params.len(), counts.params);
        for a in parsed.fields.iter().chain(parsed.params.iter()) {
            let _ = a.name_in(&query);
            let _ = a.type_in(&query);
        }
        let _ = derive_schema(&query);
    }

    #[test]
    fn generated_annotations_round_trip(
        names in prop::collection::hash_set("[a-z][a-z0-9_]{0,8}", 1..6),
        optional in any::<bool>(),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let mark = if optional { "?" } else { "" };
        let columns: Vec<String> = names
            .iter()
            .map(|n| format!("{}/*:text{}*/", n, mark))
            .collect();
        let query = format!("SELECT {} FROM t", columns.join(", "));

        let schema = derive_schema(&query).unwrap();
        prop_assert_eq!(tags(&schema.row), names);
        for ty in schema.row.types() {
            prop_assert_eq!(ty.optional, optional);
        }
    }
}
