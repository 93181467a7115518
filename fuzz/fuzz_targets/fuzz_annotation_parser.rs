//! Fuzz testing for the annotation scanner and schema derivation.
//!
//! Query text is assembled from arbitrary fragments biased toward the
//! annotation markers, so the scanner sees nested, truncated and
//! overlapping markers far more often than random bytes would produce.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tagsql::annotation::{count_annotations, parse_annotations};
use tagsql::derive_schema;

#[derive(Debug, Arbitrary)]
enum Fragment {
    Start,
    End,
    Colon,
    Question,
    Ident(u8),
    TypeName(u8),
    Raw(String),
}

const TYPE_NAMES: [&str; 11] = [
    "integer", "int", "real", "ansi", "text", "utf16", "bool", "date", "path", "blob", "varchar",
];

fn render(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Start => out.push_str("/*:"),
            Fragment::End => out.push_str("*/"),
            Fragment::Colon => out.push(':'),
            Fragment::Question => out.push('?'),
            Fragment::Ident(n) => out.push_str(&format!("c{}", n)),
            Fragment::TypeName(n) => out.push_str(TYPE_NAMES[*n as usize % TYPE_NAMES.len()]),
            Fragment::Raw(s) => out.push_str(s),
        }
    }
    out
}

fuzz_target!(|fragments: Vec<Fragment>| {
    let query = render(&fragments);

    let counts = count_annotations(&query);
    let parsed = parse_annotations(&query);
    assert_eq!(parsed.fields.len(), counts.fields);
    assert_eq!(parsed.params.len(), counts.params);

    for annotation in parsed.fields.iter().chain(parsed.params.iter()) {
        let _ = annotation.name_in(&query);
        let _ = annotation.type_in(&query);
    }

    if let Ok(schema) = derive_schema(&query) {
        assert_eq!(schema.row.len(), counts.fields);
        assert_eq!(schema.params.len(), counts.params);
    }
});
