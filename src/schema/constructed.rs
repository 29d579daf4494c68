//! The components of constructed schemas and their builders.
//!
//! This is a private module. Its public items are re-exported by the parent.

use thiserror::Error;
use crate::tag::Tag;
use crate::value::Value;
use super::{Kind, Schema};


//------------ Field ---------------------------------------------------------

/// A field of a SEQUENCE or SET.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    name: String,
    schema: Schema,
    optional: bool,
    default: Option<Value>,
}

impl Field {
    /// Returns the name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the schema of the field’s value.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns whether the field may be absent.
    ///
    /// A field with a default value is always optional.
    pub fn is_optional(&self) -> bool {
        self.optional || self.default.is_some()
    }

    /// Returns the default value of the field.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}


//------------ Alternative ---------------------------------------------------

/// An alternative of a CHOICE.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alternative {
    name: String,
    schema: Schema,
}

impl Alternative {
    /// Returns the name of the alternative.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the schema of the alternative.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}


//------------ SequenceBuilder -----------------------------------------------

/// A builder for SEQUENCE and SET schemas.
///
/// The order in which fields are added is the order of the elements in the
/// encoded sequence.
#[derive(Clone, Debug)]
pub struct SequenceBuilder {
    set: bool,
    fields: Vec<Field>,
}

impl SequenceBuilder {
    pub(super) fn new(set: bool) -> Self {
        SequenceBuilder { set, fields: Vec::new() }
    }

    /// Adds a field.
    ///
    /// If `default` is given, the field is optional and is filled with the
    /// default value when absent from decoded data.
    pub fn add_field(
        mut self,
        name: impl Into<String>,
        schema: Schema,
        optional: bool,
        default: Option<Value>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if self.fields.iter().any(|field| field.name == name) {
            return Err(SchemaError::DuplicateName(name))
        }
        self.fields.push(Field { name, schema, optional, default });
        Ok(self)
    }

    /// Finishes the schema.
    pub fn build(self) -> Schema {
        if self.set {
            Schema::new(Kind::Set { fields: self.fields })
        }
        else {
            Schema::new(Kind::Sequence { fields: self.fields })
        }
    }
}


//------------ ChoiceBuilder -------------------------------------------------

/// A builder for CHOICE schemas.
///
/// When decoding, the alternatives are tried in the order they were added.
#[derive(Clone, Debug, Default)]
pub struct ChoiceBuilder {
    alternatives: Vec<Alternative>,
}

impl ChoiceBuilder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Adds an alternative.
    pub fn add_choice(
        mut self, name: impl Into<String>, schema: Schema
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if self.alternatives.iter().any(|item| item.name == name) {
            return Err(SchemaError::DuplicateName(name))
        }
        self.alternatives.push(Alternative { name, schema });
        Ok(self)
    }

    /// Finishes the schema.
    pub fn build(self) -> Schema {
        Schema::new(Kind::Choice { alternatives: self.alternatives })
    }
}


//------------ External ------------------------------------------------------

/// Returns the fields of the EXTERNAL type.
pub(super) fn external_fields() -> Vec<Field> {
    let encoding = Kind::Choice {
        alternatives: vec![
            Alternative {
                name: "single-ASN1-type".into(),
                schema: Schema::any().with_explicit_tag(Tag::ctx(0)),
            },
            Alternative {
                name: "octet-aligned".into(),
                schema: Schema::octet_string().with_implicit_tag(Tag::ctx(1)),
            },
            Alternative {
                name: "arbitrary".into(),
                schema: Schema::bit_string::<_, String>([])
                    .with_implicit_tag(Tag::ctx(2)),
            },
        ]
    };
    vec![
        Field {
            name: "direct-reference".into(),
            schema: Schema::object_identifier(),
            optional: true,
            default: None,
        },
        Field {
            name: "indirect-reference".into(),
            schema: Schema::integer(),
            optional: true,
            default: None,
        },
        Field {
            name: "encoding".into(),
            schema: Schema::new(encoding),
            optional: true,
            default: None,
        },
    ]
}


//------------ SchemaError ---------------------------------------------------

/// An error happened while building a schema.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SchemaError {
    /// A field or alternative name is used twice.
    #[error("duplicate name '{0}'")]
    DuplicateName(String),
}


//============ Tests =========================================================
