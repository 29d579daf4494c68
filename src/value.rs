//! Application values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use indexmap::IndexMap;


//------------ Value ---------------------------------------------------------

/// A value in its application representation.
///
/// Which variant a schema node produces and accepts depends on the kind of
/// the node:
///
/// | schema kind          | value                                   |
/// |----------------------|-----------------------------------------|
/// | BOOLEAN              | `Bool`                                  |
/// | INTEGER              | `Int`                                   |
/// | ENUMERATED           | `Text` with the item name or `Int`      |
/// | REAL                 | `Bytes` with the raw content octets     |
/// | BIT STRING           | `Record` of `Bool`s keyed by bit name   |
/// | OCTET STRING         | `Bytes`                                 |
/// | character strings    | `Text`                                  |
/// | NULL                 | `Null`                                  |
/// | OBJECT IDENTIFIER    | `ObjectId` in dotted notation           |
/// | ANY                  | `Bytes` with a complete encoded value   |
/// | SEQUENCE, SET        | `Record`                                |
/// | SEQUENCE OF, SET OF  | `List`                                  |
/// | CHOICE               | `Choice` with the alternative’s name    |
/// | EXTERNAL             | `Record`                                |
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Bytes(Bytes),
    Text(String),
    Null,
    ObjectId(String),
    Record(Record),
    List(Vec<Value>),
    Choice(String, Box<Value>),
}

impl Value {
    /// Creates a record value from name and value pairs.
    pub fn record<I, S>(fields: I) -> Self
    where I: IntoIterator<Item = (S, Value)>, S: Into<String> {
        Value::Record(fields.into_iter().collect())
    }

    /// Creates a choice value.
    pub fn choice(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Value::Choice(name.into(), Box::new(value.into()))
    }

    /// Creates a text value.
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Creates an octets value from a static slice.
    pub fn bytes(bytes: &'static [u8]) -> Self {
        Value::Bytes(Bytes::from_static(bytes))
    }

    /// Creates an object identifier value.
    pub fn oid(oid: impl Into<String>) -> Self {
        Value::ObjectId(oid.into())
    }

    /// Returns the name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Bytes(_) => "Bytes",
            Value::Text(_) => "Text",
            Value::Null => "Null",
            Value::ObjectId(_) => "ObjectId",
            Value::Record(_) => "Record",
            Value::List(_) => "List",
            Value::Choice(..) => "Choice",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(value) => Some(value),
            _ => None
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(value) => Some(value),
            _ => None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(value) => Some(value),
            _ => None
        }
    }

    /// Returns the alternative name and value of a choice value.
    pub fn as_choice(&self) -> Option<(&str, &Value)> {
        match self {
            Value::Choice(name, value) => Some((name, value)),
            _ => None
        }
    }
}


//--- From

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Bytes(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}


//------------ Record --------------------------------------------------------

/// A map from field names to values that keeps insertion order.
///
/// Records are compared as maps: two records are equal if they contain the
/// same names with equal values, no matter in which order.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Creates a new, empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns whether the record has a field of the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Sets the value of a field.
    ///
    /// If the field exists, its value is replaced and its position is kept.
    /// Otherwise the field is added at the end. Returns the old value.
    pub fn insert(
        &mut self, name: impl Into<String>, value: Value
    ) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns an iterator over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns an iterator over the field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}


//--- FromIterator

impl<S: Into<String>> FromIterator<(S, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().map(|(name, value)| {
                (name.into(), value)
            }).collect()
        }
    }
}


//--- Debug

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}


//============ Tests =========================================================
