//! # Field Declarations
//!
//! A `FieldDef` declares one named field of a record schema: its tag, its
//! type (or `Auto`), how it is initialized when construction doesn't supply a
//! value, and an optional side-map of attributes.
//!
//! ## Init Rules
//!
//! | Rule | Invoked with | Typical use |
//! |------|--------------|-------------|
//! | `Required` | never; omission is an error | keys, mandatory inputs |
//! | `Default` | nothing | constants, timestamps |
//! | `Derived` | the fields declared before this one | `count = len(str) - offset` |
//!
//! Producers carry the field type of what they return. A field declared as
//! `Auto` takes that type when its schema is built.
//!
//! ```ignore
//! FieldDef::auto("hello").with_default_fn(|| 5_i64);
//! FieldDef::auto("test").with_derived(|r| Ok(2 * r.get::<i64>("hello")?));
//! ```

use super::{FieldTag, PartialRecord};
use crate::types::{FieldType, FieldValue, Value, ValueType};
use eyre::Result;
use std::fmt;
use std::sync::Arc;

pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;
pub type DerivedFn = Arc<dyn Fn(&PartialRecord<'_>) -> Result<Value> + Send + Sync>;

#[derive(Clone)]
pub enum InitRule {
    Required,
    Default { returns: FieldType, produce: DefaultFn },
    Derived { returns: FieldType, produce: DerivedFn },
}

impl InitRule {
    /// Zero-argument producer whose return type is known statically.
    pub fn default_fn<T, F>(f: F) -> Self
    where
        T: FieldValue,
        F: Fn() -> T + Send + Sync + 'static,
    {
        InitRule::Default {
            returns: T::FIELD_TYPE,
            produce: Arc::new(move || f().into_value()),
        }
    }

    /// Producer that returns a clone of a constant.
    ///
    /// A `Null` constant has no type of its own; it is typed as optional text
    /// and only fits fields with a declared optional type.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        let returns = value
            .inferred_field_type()
            .unwrap_or(FieldType::optional(ValueType::Text));
        InitRule::Default {
            returns,
            produce: Arc::new(move || value.clone()),
        }
    }

    /// Producer that reads fields declared earlier in the same record.
    pub fn derived_fn<T, F>(f: F) -> Self
    where
        T: FieldValue,
        F: Fn(&PartialRecord<'_>) -> Result<T> + Send + Sync + 'static,
    {
        InitRule::Derived {
            returns: T::FIELD_TYPE,
            produce: Arc::new(move |partial| f(partial).map(FieldValue::into_value)),
        }
    }

    /// Declared return type of the producer, `None` for `Required`.
    pub fn returns(&self) -> Option<FieldType> {
        match self {
            InitRule::Required => None,
            InitRule::Default { returns, .. } | InitRule::Derived { returns, .. } => {
                Some(*returns)
            }
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, InitRule::Required)
    }
}

impl fmt::Debug for InitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitRule::Required => f.write_str("Required"),
            InitRule::Default { returns, .. } => write!(f, "Default(-> {})", returns),
            InitRule::Derived { returns, .. } => write!(f, "Derived(-> {})", returns),
        }
    }
}

/// Auxiliary key/value attributes attached to a field declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(FieldTag, Value)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an attribute.
    pub fn insert(&mut self, key: impl Into<FieldTag>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldTag, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) tag: FieldTag,
    pub(crate) ty: Option<FieldType>,
    pub(crate) init: InitRule,
    pub(crate) attributes: Attributes,
}

impl FieldDef {
    /// A required field of the given type.
    pub fn new(tag: impl Into<FieldTag>, ty: impl Into<FieldType>) -> Self {
        Self {
            tag: tag.into(),
            ty: Some(ty.into()),
            init: InitRule::Required,
            attributes: Attributes::new(),
        }
    }

    /// An optional field; it defaults to `Null` unless given another rule.
    pub fn optional(tag: impl Into<FieldTag>, base: ValueType) -> Self {
        Self::new(tag, FieldType::optional(base)).with_init(InitRule::constant(Value::Null))
    }

    /// A field whose type is taken from its init rule when the schema is built.
    pub fn auto(tag: impl Into<FieldTag>) -> Self {
        Self {
            tag: tag.into(),
            ty: None,
            init: InitRule::Required,
            attributes: Attributes::new(),
        }
    }

    pub fn with_init(mut self, init: InitRule) -> Self {
        self.init = init;
        self
    }

    pub fn with_default(self, value: impl Into<Value>) -> Self {
        self.with_init(InitRule::constant(value))
    }

    pub fn with_default_fn<T, F>(self, f: F) -> Self
    where
        T: FieldValue,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.with_init(InitRule::default_fn(f))
    }

    pub fn with_derived<T, F>(self, f: F) -> Self
    where
        T: FieldValue,
        F: Fn(&PartialRecord<'_>) -> Result<T> + Send + Sync + 'static,
    {
        self.with_init(InitRule::derived_fn(f))
    }

    pub fn attribute(mut self, key: impl Into<FieldTag>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn tag(&self) -> &FieldTag {
        &self.tag
    }

    /// Declared type; `None` while an `Auto` field is not yet registered.
    pub fn declared_type(&self) -> Option<FieldType> {
        self.ty
    }

    pub fn init(&self) -> &InitRule {
        &self.init
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}
