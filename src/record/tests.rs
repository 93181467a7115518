//! Tests for the record module

use super::*;
use crate::error::Error;
use crate::types::{FieldType, Value, ValueType};
use proptest::prelude::*;
use std::sync::Arc;

fn greeting_schema() -> Arc<RecordSchema> {
    RecordSchema::builder()
        .field(FieldDef::auto("hello").with_default_fn(|| 5_i64))
        .field(FieldDef::new("world", ValueType::Text).with_default("world"))
        .field(FieldDef::auto("test").with_derived(|r| {
            Ok(2 * r.get::<i64>("hello")? + r.get::<String>("world")?.len() as i64)
        }))
        .field(FieldDef::new("last", ValueType::Int).with_default(0))
        .build()
        .unwrap()
}

fn chained_schema() -> Arc<RecordSchema> {
    RecordSchema::builder()
        .required("a", ValueType::Int)
        .field(FieldDef::auto("b").with_derived(|r| Ok(r.get::<i32>("a")? + 2)))
        .field(FieldDef::auto("c").with_derived(|r| Ok(r.get::<i32>("b")? + 2)))
        .field(FieldDef::auto("d").with_default_fn(|| 5_i32))
        .build()
        .unwrap()
}

#[test]
fn supplied_field_feeds_later_defaults() {
    let r = Record::new(&greeting_schema(), Args::new().with("hello", 1_i64)).unwrap();

    assert_eq!(r.get::<i64>("hello").unwrap(), 1);
    assert_eq!(r.get::<String>("world").unwrap(), "world");
    assert_eq!(r.get::<i64>("test").unwrap(), 7);
    assert_eq!(r.get::<i32>("last").unwrap(), 0);
}

#[test]
fn copies_keep_resolved_values() {
    let r = Record::new(&greeting_schema(), Args::new().with("hello", 1_i64)).unwrap();
    let copy = r.clone();
    assert_eq!(copy, r);
    assert_eq!(copy.get::<i64>("test").unwrap(), 7);
}

#[test]
fn arguments_in_any_order() {
    let r = Record::new(
        &greeting_schema(),
        Args::new().with("world", "Universe").with("hello", 1_i64),
    )
    .unwrap();

    assert_eq!(r.get::<i64>("hello").unwrap(), 1);
    assert_eq!(r.get::<String>("world").unwrap(), "Universe");
    assert_eq!(r.get::<i64>("test").unwrap(), 10);
}

#[test]
fn named_arguments_chain_through_derived_fields() {
    let r = Record::new(
        &chained_schema(),
        Args::new().with("d", 1_i32).with("a", 5_i32),
    )
    .unwrap();

    assert_eq!(r.get::<i32>("a").unwrap(), 5);
    assert_eq!(r.get::<i32>("b").unwrap(), 7);
    assert_eq!(r.get::<i32>("c").unwrap(), 9);
    assert_eq!(r.get::<i32>("d").unwrap(), 1);
}

#[test]
fn defaults_only_construction() {
    let schema = RecordSchema::builder()
        .field(FieldDef::new("a", ValueType::Int).with_default(1))
        .field(FieldDef::new("b", ValueType::Real).with_default(5.0))
        .field(FieldDef::auto("c").with_derived(|r| Ok(r.get::<i32>("a")? + 1)))
        .build()
        .unwrap();

    let r = Record::defaults(&schema).unwrap();
    assert_eq!(r.values(), [Value::Int(1), Value::Real(5.0), Value::Int(2)]);

    let r = Record::new(&schema, Args::new().with("a", 5)).unwrap();
    assert_eq!(r.values(), [Value::Int(5), Value::Real(5.0), Value::Int(6)]);
}

#[test]
fn explicit_none_behaves_like_omission() {
    let schema = RecordSchema::builder()
        .required("id", ValueType::Integer)
        .field(FieldDef::new("score", ValueType::Real).with_default(100.0))
        .build()
        .unwrap();

    let omitted = Record::new(&schema, Args::new().with("id", 1_i64)).unwrap();
    let absent = Record::new(
        &schema,
        Args::new().with("id", 1_i64).with_optional("score", None::<f64>),
    )
    .unwrap();
    let supplied = Record::new(
        &schema,
        Args::new().with("id", 1_i64).with_optional("score", Some(15.0)),
    )
    .unwrap();

    assert_eq!(omitted, absent);
    assert_eq!(absent.get::<f64>("score").unwrap(), 100.0);
    assert_eq!(supplied.get::<f64>("score").unwrap(), 15.0);
}

#[test]
fn explicit_none_runs_derived_rule() {
    let r = Record::new(
        &chained_schema(),
        Args::new().with("a", 5_i32).with_optional("b", None::<i32>),
    )
    .unwrap();
    assert_eq!(r.get::<i32>("b").unwrap(), 7);
    assert_eq!(r.get::<i32>("c").unwrap(), 9);

    let r = Record::new(&chained_schema(), Args::new().with("a", 5_i32).with_absent("c")).unwrap();
    assert_eq!(r.get::<i32>("c").unwrap(), 9);
}

#[test]
fn default_derived_from_required_field() {
    let schema = RecordSchema::builder()
        .required("name", ValueType::Text)
        .required("id", ValueType::Integer)
        .field(
            FieldDef::new("score", ValueType::Real)
                .with_derived(|r| Ok(r.get::<i64>("id")? as f64 + 1.0)),
        )
        .build()
        .unwrap();

    let full = Record::new(
        &schema,
        Args::new()
            .with("name", "John")
            .with("id", 1_i64)
            .with("score", 15.0),
    )
    .unwrap();
    let mut partial = Record::new(&schema, Args::new().with("name", "John").with("id", 1_i64)).unwrap();

    assert_ne!(full, partial);
    assert_eq!(partial.get::<f64>("score").unwrap(), 2.0);

    partial.set("score", 15.0).unwrap();
    assert_eq!(full, partial);
}

#[test]
fn set_converts_and_rejects_mismatches() {
    let mut r = Record::from_values([("a", Value::Integer(15)), ("b", Value::from("x"))]).unwrap();
    r.set("a", 10_i32).unwrap();
    assert_eq!(r.get_value("a").unwrap(), &Value::Integer(10));

    let err = r.set("a", vec![1_u8]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::TypeMismatch { .. })
    ));

    let err = r.set("zzz", 1_i64).unwrap_err();
    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::UnknownField("zzz".into()))
    );
}

#[test]
fn ad_hoc_records_infer_their_schema() {
    let r = Record::from_values([
        ("a", Value::Int(15)),
        ("b", Value::from("Hello ctad")),
        ("c", Value::Null),
    ])
    .unwrap();

    assert_eq!(r.get::<i32>("a").unwrap(), 15);
    assert_eq!(r.get::<String>("b").unwrap(), "Hello ctad");
    assert_eq!(r.get::<Option<String>>("c").unwrap(), None);
    assert_eq!(
        r.schema().type_of("c"),
        Some(FieldType::optional(ValueType::Text))
    );
}

#[test]
fn iteration_follows_declaration_order() {
    let r = Record::new(&greeting_schema(), Args::new().with("hello", 1_i64)).unwrap();
    let seen: Vec<(String, Value)> = r.iter().map(|(t, v)| (t.to_string(), v.clone())).collect();

    assert_eq!(
        seen,
        vec![
            ("hello".to_string(), Value::Integer(1)),
            ("world".to_string(), Value::from("world")),
            ("test".to_string(), Value::Integer(7)),
            ("last".to_string(), Value::Int(0)),
        ]
    );

    let tags: Vec<&str> = (&r).into_iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(tags, ["hello", "world", "test", "last"]);
}

#[test]
fn convert_copies_shared_tags_and_defaults_the_rest() {
    let source = Record::from_values([
        ("id", Value::Integer(3)),
        ("name", Value::from("ann")),
        ("extra", Value::Bool(true)),
    ])
    .unwrap();

    let target = RecordSchema::builder()
        .required("name", ValueType::Ansi)
        .required("id", ValueType::Int)
        .field(FieldDef::new("score", ValueType::Real).with_default(1.5))
        .build()
        .unwrap();

    let converted = source.convert(&target).unwrap();
    assert_eq!(
        converted.values(),
        [Value::ansi("ann"), Value::Int(3), Value::Real(1.5)]
    );
}

#[test]
fn convert_fails_when_target_requires_missing_field() {
    let source = Record::from_values([("id", Value::Integer(3))]).unwrap();
    let target = RecordSchema::builder()
        .required("id", ValueType::Integer)
        .required("name", ValueType::Text)
        .build()
        .unwrap();

    let err = source.convert(&target).unwrap_err();
    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::MissingRequiredField("name".into()))
    );
}

#[test]
fn ordering_is_field_by_field() {
    let schema = RecordSchema::builder()
        .required("a", ValueType::Integer)
        .required("b", ValueType::Text)
        .build()
        .unwrap();
    let make = |a: i64, b: &str| Record::new(&schema, Args::new().with("a", a).with("b", b)).unwrap();

    assert!(make(1, "z") < make(2, "a"));
    assert!(make(1, "a") < make(1, "b"));
    assert_eq!(
        make(1, "a").partial_cmp(&make(1, "a")),
        Some(std::cmp::Ordering::Equal)
    );

    let other = Record::from_values([("b", Value::from("a")), ("a", Value::Integer(1))]).unwrap();
    assert_eq!(make(1, "a").partial_cmp(&other), None);
    assert_ne!(make(1, "a"), other);
}

#[test]
fn display_prints_tag_value_lines() {
    let r = Record::from_values([("a", Value::Integer(15)), ("b", Value::Null)]).unwrap();
    assert_eq!(r.to_string(), "a:15\nb:NULL\n");
}

#[test]
fn relational_predicates_on_ad_hoc_record() {
    let r = Record::from_values([
        ("a", Value::Integer(15)),
        ("b", Value::from("Hello ctad")),
    ])
    .unwrap();

    assert!(tag("a").equals(15_i64).matches(&r).unwrap());
    assert!(!tag("a").not_equals(15_i64).matches(&r).unwrap());
    assert!(tag("b").equals("Hello ctad").matches(&r).unwrap());
    assert!(!tag("a").less_than(15_i64).matches(&r).unwrap());
    assert!(!tag("a").greater_than(15_i64).matches(&r).unwrap());
    assert!(tag("a").less_or_equal(15_i64).matches(&r).unwrap());
    assert!(tag("a").greater_or_equal(15_i64).matches(&r).unwrap());

    let reversed = Predicate::new(
        Operand::Value(Value::Integer(15)),
        Comparison::LessThan,
        Operand::Field(tag("a")),
    );
    assert!(!reversed.matches(&r).unwrap());
}

#[test]
fn tag_builders_construct_records() {
    let schema = chained_schema();
    let args: Args = [tag("a").set(5_i32), tag("d").set_optional(None::<i32>)]
        .into_iter()
        .collect();
    let r = Record::new(&schema, args).unwrap();
    assert_eq!(r.get::<i32>("d").unwrap(), 5);
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        any::<i32>().prop_map(Value::Int),
        (-1.0e9..1.0e9f64).prop_map(Value::Real),
        "[a-z]{0,12}".prop_map(Value::Text),
        any::<bool>().prop_map(Value::Bool),
        proptest::collection::vec(any::<u8>(), 0..16).prop_map(Value::Blob),
    ]
}

proptest! {
    #[test]
    fn iterate_and_convert_round_trips(values in proptest::collection::vec(arb_value(), 1..8)) {
        let pairs: Vec<(String, Value)> = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (format!("f{}", i), v))
            .collect();
        let original = Record::from_values(pairs).unwrap();

        let reversed = RecordSchema::new(
            original
                .fields()
                .rev()
                .map(|(def, _)| def.clone())
                .collect(),
        )
        .unwrap();

        let there = original.convert(&reversed).unwrap();
        let back = there.convert(original.schema()).unwrap();
        prop_assert_eq!(back, original);
    }
}
