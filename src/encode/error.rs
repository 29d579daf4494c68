//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};
use thiserror::Error;
use crate::int::Bounds;
use crate::path::{Path, Segment};
use crate::string::Flavor;


//------------ EncodeErrorKind -----------------------------------------------

/// The reason why encoding failed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EncodeErrorKind {
    /// The value has a different shape than the schema expects.
    #[error("expected {expected} value, found {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },

    /// A record lacks a mandatory sequence field.
    #[error("missing mandatory field '{0}'")]
    MissingMandatoryField(String),

    /// A record contains a field the sequence does not declare.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A choice value names an alternative the choice does not have.
    #[error("unknown choice '{0}'")]
    UnknownChoice(String),

    /// An enumerated value names an unknown item.
    #[error("unknown enumeration item '{0}'")]
    UnknownEnumeration(String),

    /// A bit string value names an unknown bit.
    #[error("unknown bit '{0}'")]
    UnknownBit(String),

    /// A value is outside of the range permitted by the schema.
    #[error("{value} violates constraint {bounds}")]
    ConstraintViolation { value: i64, bounds: Bounds },

    /// A character string contains characters outside its character set.
    #[error("invalid character in {flavor}")]
    InvalidCharacter { flavor: Flavor },

    /// An object identifier is not given in dotted decimal notation.
    #[error("invalid object identifier '{0}'")]
    InvalidOid(String),

    /// The requested encoding is not supported.
    #[error("{0} not implemented")]
    NotImplemented(&'static str),
}


//------------ EncodeError ---------------------------------------------------

/// An error happened while encoding a value.
///
/// The error consists of its [kind][EncodeErrorKind] and the [path][Path]
/// to the value that could not be encoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodeError {
    kind: EncodeErrorKind,
    path: Path,
}

impl EncodeError {
    /// Returns the reason for the error.
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.kind
    }

    /// Returns the path to the value that caused the error.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Converts the error into its kind, dropping the path.
    pub fn into_kind(self) -> EncodeErrorKind {
        self.kind
    }

    /// Returns the error located one level further out.
    pub(crate) fn within(mut self, segment: impl Into<Segment>) -> Self {
        self.path.push_outer(segment.into());
        self
    }
}

impl From<EncodeErrorKind> for EncodeError {
    fn from(kind: EncodeErrorKind) -> Self {
        EncodeError { kind, path: Path::new() }
    }
}


//--- Display and Error

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        }
        else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl error::Error for EncodeError { }
