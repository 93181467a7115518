//! # Named Arguments
//!
//! `Args` is the tag-to-value list a record is constructed from. Entries may
//! arrive in any order. An `Arg::Optional(None)` entry counts as "not
//! supplied": the field falls back to its init rule as if the tag were absent.
//!
//! ```ignore
//! let args = Args::new()
//!     .with("name", "Alice")
//!     .with_optional("email", None::<String>);
//! // or
//! let args = args! { "name" => "Alice", "id" => 7_i64 };
//! ```

use super::FieldTag;
use crate::types::Value;
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(Value),
    /// Absent when `None`; the field's default applies.
    Optional(Option<Value>),
}

impl Arg {
    /// The supplied value, `None` when the argument is an absent optional.
    pub fn into_supplied(self) -> Option<Value> {
        match self {
            Arg::Value(v) => Some(v),
            Arg::Optional(v) => v,
        }
    }

    pub fn is_supplied(&self) -> bool {
        !matches!(self, Arg::Optional(None))
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    entries: SmallVec<[(FieldTag, Arg); 8]>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tag: impl Into<FieldTag>, value: impl Into<Value>) -> Self {
        self.push(tag, Arg::Value(value.into()));
        self
    }

    pub fn with_optional<V: Into<Value>>(
        mut self,
        tag: impl Into<FieldTag>,
        value: Option<V>,
    ) -> Self {
        self.push(tag, Arg::Optional(value.map(Into::into)));
        self
    }

    /// Marks `tag` as explicitly absent.
    pub fn with_absent(mut self, tag: impl Into<FieldTag>) -> Self {
        self.push(tag, Arg::Optional(None));
        self
    }

    /// Appends an argument. Supplying the same tag twice is rejected when the
    /// record is constructed.
    pub fn push(&mut self, tag: impl Into<FieldTag>, arg: Arg) {
        self.entries.push((tag.into(), arg));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, tag: &str) -> Option<&Arg> {
        self.entries
            .iter()
            .find(|(t, _)| t.as_str() == tag)
            .map(|(_, a)| a)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldTag, &Arg)> {
        self.entries.iter().map(|(t, a)| (t, a))
    }
}

impl IntoIterator for Args {
    type Item = (FieldTag, Arg);
    type IntoIter = smallvec::IntoIter<[(FieldTag, Arg); 8]>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<FieldTag>> FromIterator<(K, Arg)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, Arg)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, a)| (k.into(), a)).collect(),
        }
    }
}

impl<K: Into<FieldTag>> Extend<(K, Arg)> for Args {
    fn extend<I: IntoIterator<Item = (K, Arg)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, a)| (k.into(), a)));
    }
}
