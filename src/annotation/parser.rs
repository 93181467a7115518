//! # Annotation Scanner
//!
//! Finds the inline type annotations embedded in query text. Nothing else in
//! the query is interpreted: the scanner does not tokenize SQL, it only looks
//! for the start marker, the end marker, and (for field annotations) the
//! identifier written right before the start marker.
//!
//! ## Classification
//!
//! | Body | Kind | Name | Type |
//! |------|------|------|------|
//! | `integer` | Field | identifier before `/*:` | whole body |
//! | `target:integer` | Parameter | body before first `:` | body after first `:` |
//!
//! A trailing `?` on the type marks the field optional and is excluded from
//! the type range.
//!
//! ## Field Names
//!
//! The name of a field annotation is recovered by scanning backward from the
//! start marker: whitespace directly in front of the marker is skipped, then
//! the longest run of identifier bytes (`A-Z a-z 0-9 _ .`) is taken. When no
//! identifier byte is found the name range is empty; the schema builder
//! rejects that.
//!
//! ## Truncation
//!
//! A start marker with no end marker after it ends the scan silently; the
//! annotations found so far are kept.
//!
//! ## Usage
//!
//! ```ignore
//! let query = "SELECT id/*:integer*/ FROM t WHERE id = ?/*:target:integer*/";
//! for annotation in AnnotationScanner::new(query) {
//!     println!("{:?} {} {}", annotation.kind, annotation.name_in(query), annotation.type_in(query));
//! }
//! ```

use crate::config::{
    is_annotation_space, is_identifier_byte, END_MARKER, OPTIONAL_MARK, PARAM_SEPARATOR,
    START_MARKER,
};
use smallvec::SmallVec;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// Names a result column.
    Field,
    /// Names a bind parameter.
    Parameter,
}

/// One annotation, as byte ranges into the query it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub name: Range<usize>,
    pub type_name: Range<usize>,
    pub optional: bool,
    /// Byte offset of the start marker.
    pub offset: usize,
}

impl Annotation {
    pub fn name_in<'q>(&self, query: &'q str) -> &'q str {
        &query[self.name.clone()]
    }

    pub fn type_in<'q>(&self, query: &'q str) -> &'q str {
        &query[self.type_name.clone()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationCounts {
    pub fields: usize,
    pub params: usize,
}

/// Field and parameter annotations, each in query order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAnnotations {
    pub fields: SmallVec<[Annotation; 8]>,
    pub params: SmallVec<[Annotation; 8]>,
}

/// Iterator over the annotations of a query, left to right.
pub struct AnnotationScanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> AnnotationScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn find_from(&self, from: usize, marker: &str) -> Option<usize> {
        self.input.get(from..)?.find(marker).map(|i| i + from)
    }

    /// Start of the identifier that ends right before `marker_pos`.
    fn field_name(&self, marker_pos: usize) -> Range<usize> {
        let mut end = marker_pos;
        while end > 0 && is_annotation_space(self.bytes[end - 1]) {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && is_identifier_byte(self.bytes[start - 1]) {
            start -= 1;
        }
        start..end
    }
}

fn split_optional(bytes: &[u8], mut type_name: Range<usize>) -> (Range<usize>, bool) {
    if type_name.end > type_name.start && bytes[type_name.end - 1] == OPTIONAL_MARK {
        type_name.end -= 1;
        (type_name, true)
    } else {
        (type_name, false)
    }
}

impl Iterator for AnnotationScanner<'_> {
    type Item = Annotation;

    fn next(&mut self) -> Option<Annotation> {
        let offset = self.find_from(self.pos, START_MARKER)?;
        let body_start = offset + START_MARKER.len();
        let Some(body_end) = self.find_from(body_start, END_MARKER) else {
            self.pos = self.bytes.len();
            return None;
        };
        self.pos = body_end + END_MARKER.len();

        let body = &self.bytes[body_start..body_end];
        let annotation = match body.iter().position(|&b| b == PARAM_SEPARATOR) {
            Some(colon) => {
                let separator = body_start + colon;
                let (type_name, optional) = split_optional(self.bytes, separator + 1..body_end);
                Annotation {
                    kind: AnnotationKind::Parameter,
                    name: body_start..separator,
                    type_name,
                    optional,
                    offset,
                }
            }
            None => {
                let (type_name, optional) = split_optional(self.bytes, body_start..body_end);
                Annotation {
                    kind: AnnotationKind::Field,
                    name: self.field_name(offset),
                    type_name,
                    optional,
                    offset,
                }
            }
        };
        Some(annotation)
    }
}

/// Counts field and parameter annotations without resolving names.
pub fn count_annotations(query: &str) -> AnnotationCounts {
    let bytes = query.as_bytes();
    let mut counts = AnnotationCounts::default();
    let mut pos = 0;

    while let Some(found) = query.get(pos..).and_then(|rest| rest.find(START_MARKER)) {
        let body_start = pos + found + START_MARKER.len();
        let Some(len) = query[body_start..].find(END_MARKER) else {
            break;
        };
        if bytes[body_start..body_start + len].contains(&PARAM_SEPARATOR) {
            counts.params += 1;
        } else {
            counts.fields += 1;
        }
        pos = body_start + len + END_MARKER.len();
    }
    counts
}

/// Scans `query` once and splits its annotations by kind.
pub fn parse_annotations(query: &str) -> ParsedAnnotations {
    let counts = count_annotations(query);
    let mut parsed = ParsedAnnotations {
        fields: SmallVec::with_capacity(counts.fields),
        params: SmallVec::with_capacity(counts.params),
    };
    for annotation in AnnotationScanner::new(query) {
        match annotation.kind {
            AnnotationKind::Field => parsed.fields.push(annotation),
            AnnotationKind::Parameter => parsed.params.push(annotation),
        }
    }
    parsed
}
