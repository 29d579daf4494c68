//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};
use thiserror::Error;
use crate::int::Bounds;
use crate::path::{Path, Segment};
use crate::string::Flavor;
use crate::tag::Tag;


//------------ DecodeErrorKind -----------------------------------------------

/// The reason why decoding failed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecodeErrorKind {
    /// The data ended inside the identifier octets.
    #[error("truncated identifier octets")]
    TagTruncated,

    /// The tag number does not fit into 32 bits.
    #[error("tag number too large")]
    TagOverflow,

    /// The data ended inside the length octets.
    #[error("truncated length octets")]
    LengthTruncated,

    /// The length does not fit into a `usize`.
    #[error("excessive length")]
    LengthOverflow,

    /// The length promises more content octets than there are.
    #[error("expected {expected} content octets but only {available} left")]
    MissingBytes { expected: usize, available: usize },

    /// An indefinite length value is not terminated.
    #[error("no end-of-contents marker for indefinite length {tag}")]
    NoEndOfContent { tag: Tag },

    /// A value has a different tag than the schema asks for.
    #[error("expected {expected}, found {found}")]
    TagMismatch { expected: String, found: Tag },

    /// A value with a fixed size has the wrong number of octets.
    #[error("invalid {what} length {found}")]
    InvalidLength { what: &'static str, found: usize },

    /// A value has content where none is allowed.
    #[error("unexpected content in {what}")]
    UnexpectedContent { what: &'static str },

    /// A value is outside of the range permitted by the schema.
    #[error("{value} violates constraint {bounds}")]
    ConstraintViolation { value: i64, bounds: Bounds },

    /// An integer does not fit into 64 bits.
    #[error("integer of {len} octets too large")]
    IntegerOverflow { len: usize },

    /// A character string contains octets outside its character set.
    #[error("invalid character in {flavor}")]
    InvalidCharacter { flavor: Flavor },

    /// An object identifier is not correctly encoded.
    #[error("invalid object identifier: {0}")]
    InvalidOid(&'static str),

    /// A mandatory sequence field is missing.
    #[error("missing mandatory field '{0}'")]
    MissingMandatoryField(String),

    /// A sequence field appeared more than once.
    #[error("duplicate field '{0}'")]
    DuplicateField(String),

    /// The tag of a value selects none of the choice’s alternatives.
    #[error("unsupported tag {0} in choice")]
    UnsupportedChoice(Tag),

    /// A constructed value contains an element the schema does not allow.
    #[error("unexpected element {0}")]
    UnexpectedElement(Tag),

    /// The encoding is legal but not supported.
    #[error("{0} not implemented")]
    NotImplemented(&'static str),

    /// Values are nested deeper than the codec permits.
    #[error("values nested deeper than {0} levels")]
    NestingTooDeep(usize),

    /// There is data left after the value.
    #[error("{0} octets of trailing data")]
    TrailingData(usize),
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error consists of its [kind][DecodeErrorKind] and the [path][Path]
/// to the value that could not be decoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    path: Path,
}

impl DecodeError {
    /// Returns the reason for the error.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Returns the path to the value that caused the error.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Converts the error into its kind, dropping the path.
    pub fn into_kind(self) -> DecodeErrorKind {
        self.kind
    }

    /// Returns the error located one level further out.
    pub(crate) fn within(mut self, segment: impl Into<Segment>) -> Self {
        self.path.push_outer(segment.into());
        self
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        DecodeError { kind, path: Path::new() }
    }
}


//--- Display and Error

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        }
        else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl error::Error for DecodeError { }


//============ Tests =========================================================
