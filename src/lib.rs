//! Schema-driven encoding and decoding of data in Basic Encoding Rules.
//!
//! This crate converts between structured application values and data
//! encoded in the Basic Encoding Rules (BER) defined by ITU-T X.690. Unlike
//! codecs that are generated from or hand-written for particular ASN.1
//! types, the conversion here is driven by a [`Schema`] that describes the
//! type at runtime. Schemas are assembled from the constructors of the
//! [`Schema`] type, possibly with implicit or explicit tags, and can then be
//! used for any number of conversions.
//!
//! Values are represented by the [`Value`] type. Sequences and sets are
//! [`Record`]s of named fields, choices carry the name of the selected
//! alternative.
//!
//! ```
//! use berschema::{Schema, Tag, Value};
//!
//! let schema = Schema::sequence()
//!     .add_field("version", Schema::integer(), false, None).unwrap()
//!     .add_field(
//!         "name", Schema::octet_string().with_implicit_tag(Tag::ctx(0)),
//!         true, None
//!     ).unwrap()
//!     .build();
//!
//! let value = Value::record([("version", Value::Int(1))]);
//! let data = berschema::encode(&schema, &value).unwrap();
//! assert_eq!(data.as_ref(), b"\x30\x03\x02\x01\x01");
//! assert_eq!(berschema::decode(&schema, &data).unwrap(), value);
//! ```
//!
//! The functions [`encode()`], [`decode()`], [`decode_prefix`], and
//! [`decode_all`] use the default settings. Use a [`Codec`] to change
//! them, e.g., to reject unexpected elements via [`Mode::Strict`] or to
//! observe the decoding process through an [`Observer`].
//!
//! The types [`Tag`], [`Length`], and [`Element`] provide access to the
//! basic building blocks of encoded data.
//!
//! Diagnostic output is provided through the `log` crate.

pub use self::codec::{Codec, Observer};
pub use self::decode::{DecodeError, DecodeErrorKind};
pub use self::element::Element;
pub use self::encode::{EncodeError, EncodeErrorKind};
pub use self::int::Bounds;
pub use self::length::Length;
pub use self::mode::Mode;
pub use self::path::{Path, Segment};
pub use self::schema::{Kind, Schema, SchemaError, TagOverride};
pub use self::string::Flavor;
pub use self::tag::{Class, Form, Tag};
pub use self::value::{Record, Value};

pub mod decode;
pub mod encode;
pub mod int;
pub mod oid;
pub mod schema;
pub mod string;

mod codec;
mod element;
mod length;
mod mode;
mod path;
mod tag;
mod value;

use bytes::Bytes;


//------------ Functions -----------------------------------------------------

/// Encodes a value with the default settings.
pub fn encode(schema: &Schema, value: &Value) -> Result<Bytes, EncodeError> {
    Codec::default().encode(schema, value)
}

/// Decodes a value from the beginning of the data with the default settings.
///
/// Data following the value is ignored.
pub fn decode(schema: &Schema, data: &[u8]) -> Result<Value, DecodeError> {
    Codec::default().decode(schema, data)
}

/// Decodes a value from the beginning of the data with the default settings.
///
/// Returns the value and the number of octets it took up.
pub fn decode_prefix(
    schema: &Schema, data: &[u8]
) -> Result<(Value, usize), DecodeError> {
    Codec::default().decode_prefix(schema, data)
}

/// Decodes a value that takes up all of the data.
///
/// Fails with [`DecodeErrorKind::TrailingData`] if there is data left
/// after the value.
pub fn decode_all(
    schema: &Schema, data: &[u8]
) -> Result<Value, DecodeError> {
    Codec::default().decode_all(schema, data)
}
