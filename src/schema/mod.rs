//! Type schemas.
//!
//! A [`Schema`] describes the ASN.1 type of a value: its [`Kind`] and how
//! it is tagged. Schemas are built once, bottom up, and then used for any
//! number of encoding and decoding operations.
//!
//! Simple types are created through the associated functions of
//! [`Schema`], e.g., [`Schema::integer`]. Sequences, sets and choices are
//! assembled with the builders returned by [`Schema::sequence`],
//! [`Schema::set`] and [`Schema::choice`]. Tagging a schema through
//! [`Schema::with_implicit_tag`] or [`Schema::with_explicit_tag`] returns
//! a new schema and leaves the original untouched, so a schema can be
//! shared by several trees that tag it differently.
//!
//! ```
//! use berschema::{Schema, Tag};
//!
//! let schema = Schema::sequence()
//!     .add_field("id", Schema::integer(), false, None).unwrap()
//!     .add_field(
//!         "flag", Schema::boolean().with_implicit_tag(Tag::ctx(0)),
//!         true, None
//!     ).unwrap()
//!     .build();
//! assert_eq!(
//!     schema.to_string(),
//!     "SEQUENCE { id INTEGER, flag [0] IMPLICIT BOOLEAN OPTIONAL }"
//! );
//! ```

pub use self::constructed::{
    Alternative, ChoiceBuilder, Field, SchemaError, SequenceBuilder
};

mod constructed;

use std::fmt;
use std::sync::Arc;
use smallvec::SmallVec;
use crate::int::{Bounds, Enumeration};
use crate::string::{Flavor, NamedBits};
use crate::tag::{Form, Tag};


//------------ Schema --------------------------------------------------------

/// The description of an ASN.1 type.
///
/// A schema consists of the kind of the type, which is shared between all
/// clones of the schema, and the tags applied to it. Cloning a schema is
/// cheap.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    kind: Arc<Kind>,
    tagging: Tagging,
}

/// # Creating Schemas
///
impl Schema {
    fn new(kind: Kind) -> Self {
        Schema { kind: Arc::new(kind), tagging: Tagging::default() }
    }

    /// Creates a BOOLEAN schema.
    pub fn boolean() -> Self {
        Self::new(Kind::Boolean)
    }

    /// Creates an unconstrained INTEGER schema.
    pub fn integer() -> Self {
        Self::new(Kind::Integer { range: Bounds::unbounded() })
    }

    /// Creates an INTEGER schema with a value range.
    ///
    /// A missing bound leaves the range open on that side.
    pub fn integer_in(min: Option<i64>, max: Option<i64>) -> Self {
        Self::new(Kind::Integer { range: Bounds::new(min, max) })
    }

    /// Creates an ENUMERATED schema from pairs of names and numbers.
    pub fn enumerated<I, S>(values: I) -> Self
    where I: IntoIterator<Item = (S, i64)>, S: Into<String> {
        Self::new(Kind::Enumerated { values: values.into_iter().collect() })
    }

    /// Creates a REAL schema.
    pub fn real() -> Self {
        Self::new(Kind::Real)
    }

    /// Creates a BIT STRING schema from pairs of names and bit positions.
    pub fn bit_string<I, S>(positions: I) -> Self
    where I: IntoIterator<Item = (S, u32)>, S: Into<String> {
        Self::new(Kind::BitString {
            positions: positions.into_iter().collect()
        })
    }

    /// Creates an unconstrained OCTET STRING schema.
    pub fn octet_string() -> Self {
        Self::string(Flavor::Generic)
    }

    /// Creates an unconstrained schema for a flavor of octet string.
    pub fn string(flavor: Flavor) -> Self {
        Self::new(Kind::OctetString { flavor, size: Bounds::unbounded() })
    }

    /// Creates a schema for a flavor of octet string with a size range.
    pub fn octet_string_sized(
        flavor: Flavor, min: Option<i64>, max: Option<i64>
    ) -> Self {
        Self::new(Kind::OctetString { flavor, size: Bounds::new(min, max) })
    }

    /// Creates a NULL schema.
    pub fn null() -> Self {
        Self::new(Kind::Null)
    }

    /// Creates an OBJECT IDENTIFIER schema.
    pub fn object_identifier() -> Self {
        Self::new(Kind::ObjectIdentifier)
    }

    /// Creates an ANY schema.
    pub fn any() -> Self {
        Self::new(Kind::Any)
    }

    /// Starts building a SEQUENCE schema.
    pub fn sequence() -> SequenceBuilder {
        SequenceBuilder::new(false)
    }

    /// Starts building a SET schema.
    pub fn set() -> SequenceBuilder {
        SequenceBuilder::new(true)
    }

    /// Creates a SEQUENCE OF schema.
    pub fn sequence_of(element: Schema) -> Self {
        Self::new(Kind::SequenceOf { element })
    }

    /// Creates a SET OF schema.
    pub fn set_of(element: Schema) -> Self {
        Self::new(Kind::SetOf { element })
    }

    /// Starts building a CHOICE schema.
    pub fn choice() -> ChoiceBuilder {
        ChoiceBuilder::new()
    }

    /// Creates the schema of the EXTERNAL type.
    ///
    /// The type is defined in X.690 as:
    ///
    /// ```text
    /// [UNIVERSAL 8] IMPLICIT SEQUENCE {
    ///     direct-reference    OBJECT IDENTIFIER OPTIONAL,
    ///     indirect-reference  INTEGER OPTIONAL,
    ///     encoding            CHOICE {
    ///         single-ASN1-type  [0] EXPLICIT ANY,
    ///         octet-aligned     [1] IMPLICIT OCTET STRING,
    ///         arbitrary         [2] IMPLICIT BIT STRING
    ///     }
    /// }
    /// ```
    ///
    /// The data-value-descriptor field is not supported. The bit string of
    /// the `arbitrary` alternative has no named bits.
    pub fn external() -> Self {
        Self::new(Kind::External { fields: constructed::external_fields() })
    }
}

/// # Tagging
///
impl Schema {
    /// Returns a new schema with an implicit tag.
    ///
    /// The tag replaces the outermost tag of the schema. The form of the
    /// tag is ignored; the encoding keeps the form of the replaced type.
    ///
    /// A CHOICE has no tag of its own that could be replaced, so an
    /// untagged choice receives an explicit tag instead.
    pub fn with_implicit_tag(&self, tag: Tag) -> Self {
        let mut res = self.clone();
        if let Some(outer) = res.tagging.explicit.first_mut() {
            *outer = tag;
        }
        else if matches!(*res.kind, Kind::Choice { .. }) {
            res.tagging.explicit.push(tag);
        }
        else {
            res.tagging.implicit = Some(tag);
        }
        res
    }

    /// Returns a new schema with an explicit tag.
    ///
    /// The encoding of the schema is wrapped into an additional constructed
    /// value with this tag. The form of the tag is ignored.
    pub fn with_explicit_tag(&self, tag: Tag) -> Self {
        let mut res = self.clone();
        res.tagging.explicit.insert(0, tag);
        res
    }

    /// Returns the outermost tag override.
    pub fn tag_override(&self) -> TagOverride {
        if let Some(tag) = self.tagging.explicit.first() {
            TagOverride::Explicit(*tag)
        }
        else if let Some(tag) = self.tagging.implicit {
            TagOverride::Implicit(tag)
        }
        else {
            TagOverride::None
        }
    }

    /// Returns whether a value with the given tag is described by the
    /// schema.
    ///
    /// A schema with an explicit tag matches that tag. Otherwise, an
    /// untagged choice matches the tags of all its alternatives while all
    /// other schemas match their implicit tag or, lacking one, the natural
    /// tag of their kind.
    pub fn matches(&self, tag: Tag) -> bool {
        if let Some(outer) = self.tagging.explicit.first() {
            return outer.matches(tag)
        }
        if self.tagging.implicit.is_none() {
            if let Kind::Choice { alternatives } = self.kind() {
                return alternatives.iter().any(|alternative| {
                    alternative.schema().matches(tag)
                })
            }
        }
        self.identifier_tag().matches(tag)
    }
}

/// # Access to Schema Properties
///
impl Schema {
    /// Returns the kind of the schema.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Returns the explicit tags, outermost first.
    pub fn explicit_tags(&self) -> &[Tag] {
        &self.tagging.explicit
    }

    /// Returns the implicit tag.
    pub fn implicit_tag(&self) -> Option<Tag> {
        self.tagging.implicit
    }

    /// Returns the tag of the value inside all explicit tags.
    ///
    /// This is the implicit tag, if there is one, or the natural tag of
    /// the kind otherwise.
    pub fn identifier_tag(&self) -> Tag {
        self.tagging.implicit.unwrap_or_else(|| self.kind.base_tag())
    }
}


//--- Display

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for tag in &self.tagging.explicit {
            write!(f, "{} EXPLICIT ", tag)?;
        }
        if let Some(tag) = self.tagging.implicit {
            write!(f, "{} IMPLICIT ", tag)?;
        }
        fmt::Display::fmt(&self.kind, f)
    }
}


//------------ Tagging -------------------------------------------------------

/// The tags applied to a schema.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Tagging {
    /// The tag replacing the natural tag of the kind.
    implicit: Option<Tag>,

    /// The explicit tags, outermost first.
    explicit: SmallVec<[Tag; 2]>,
}


//------------ TagOverride ---------------------------------------------------

/// The outermost tagging of a schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagOverride {
    /// The schema is not tagged.
    None,

    /// The schema has an implicit tag but no explicit tag.
    Implicit(Tag),

    /// The schema has an explicit tag.
    Explicit(Tag),
}


//------------ Kind ----------------------------------------------------------

/// The kind of type described by a schema.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    Boolean,
    Integer { range: Bounds },
    Enumerated { values: Enumeration },

    /// REAL values are passed through as their raw content octets.
    Real,

    BitString { positions: NamedBits },

    /// An OCTET STRING or one of the character strings sharing its
    /// encoding.
    OctetString { flavor: Flavor, size: Bounds },

    Null,
    ObjectIdentifier,

    /// Any complete encoded value.
    Any,

    Sequence { fields: Vec<Field> },

    /// Like a sequence but with the elements in any order.
    Set { fields: Vec<Field> },

    SequenceOf { element: Schema },
    SetOf { element: Schema },
    Choice { alternatives: Vec<Alternative> },

    /// The EXTERNAL type, a sequence with a natural tag of its own.
    External { fields: Vec<Field> },
}

impl Kind {
    /// Returns the natural tag of the kind.
    ///
    /// Choices and ANY have no tag of their own and return [`Tag::ANY`].
    pub fn base_tag(&self) -> Tag {
        match self {
            Kind::Boolean => Tag::BOOLEAN,
            Kind::Integer { .. } => Tag::INTEGER,
            Kind::Enumerated { .. } => Tag::ENUMERATED,
            Kind::Real => Tag::REAL,
            Kind::BitString { .. } => Tag::BIT_STRING,
            Kind::OctetString { flavor, .. } => flavor.tag(),
            Kind::Null => Tag::NULL,
            Kind::ObjectIdentifier => Tag::OID,
            Kind::Any | Kind::Choice { .. } => Tag::ANY,
            Kind::Sequence { .. } | Kind::SequenceOf { .. } => Tag::SEQUENCE,
            Kind::Set { .. } | Kind::SetOf { .. } => Tag::SET,
            Kind::External { .. } => Tag::EXTERNAL,
        }
    }

    /// Returns the form the kind is encoded in.
    pub fn form(&self) -> Form {
        match self {
            Kind::Sequence { .. } | Kind::Set { .. }
            | Kind::SequenceOf { .. } | Kind::SetOf { .. }
            | Kind::External { .. } => Form::Constructed,
            _ => Form::Primitive,
        }
    }
}


//--- Display

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Kind::Boolean => f.write_str("BOOLEAN"),
            Kind::Integer { range } => {
                if range.is_unbounded() {
                    f.write_str("INTEGER")
                }
                else {
                    write!(f, "INTEGER {}", range)
                }
            }
            Kind::Enumerated { values } => {
                f.write_str("ENUMERATED {")?;
                for (i, (name, number)) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}({})", name, number)?;
                }
                f.write_str(" }")
            }
            Kind::Real => f.write_str("REAL"),
            Kind::BitString { .. } => f.write_str("BIT STRING"),
            Kind::OctetString { flavor, size } => {
                if size.is_unbounded() {
                    write!(f, "{}", flavor)
                }
                else {
                    write!(f, "{} (SIZE {})", flavor, size)
                }
            }
            Kind::Null => f.write_str("NULL"),
            Kind::ObjectIdentifier => f.write_str("OBJECT IDENTIFIER"),
            Kind::Any => f.write_str("ANY"),
            Kind::Sequence { fields } => fmt_fields(f, "SEQUENCE", fields),
            Kind::Set { fields } => fmt_fields(f, "SET", fields),
            Kind::SequenceOf { element } => {
                write!(f, "SEQUENCE OF {}", element)
            }
            Kind::SetOf { element } => write!(f, "SET OF {}", element),
            Kind::Choice { alternatives } => {
                f.write_str("CHOICE {")?;
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(
                        f, " {} {}", alternative.name(), alternative.schema()
                    )?;
                }
                f.write_str(" }")
            }
            Kind::External { .. } => f.write_str("EXTERNAL"),
        }
    }
}

fn fmt_fields(
    f: &mut fmt::Formatter, name: &str, fields: &[Field]
) -> fmt::Result {
    write!(f, "{} {{", name)?;
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, " {} {}", field.name(), field.schema())?;
        if field.default().is_some() {
            f.write_str(" DEFAULT")?;
        }
        else if field.is_optional() {
            f.write_str(" OPTIONAL")?;
        }
    }
    f.write_str(" }")
}


//============ Tests =========================================================
