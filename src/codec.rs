//! Configured encoding and decoding.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::decode::{self, DecodeError};
use crate::element::Element;
use crate::encode::{self, EncodeError};
use crate::mode::Mode;
use crate::path::Path;
use crate::schema::Schema;
use crate::tag::Tag;
use crate::value::Value;


//------------ Observer ------------------------------------------------------

/// A hook receiving notifications while data is decoded.
///
/// All methods have an empty default implementation, so an observer only
/// needs to implement those it is interested in. The path given to each
/// method is the path of the value currently being decoded.
pub trait Observer {
    /// An element with the given tag and content length was extracted.
    fn element(&self, path: &Path, tag: Tag, len: usize) {
        let _ = (path, tag, len);
    }

    /// An element of a sequence or set matched none of its fields and was
    /// skipped.
    fn skipped(&self, path: &Path, tag: Tag) {
        let _ = (path, tag);
    }

    /// An absent sequence or set field was filled with its default value.
    fn defaulted(&self, path: &Path, field: &str) {
        let _ = (path, field);
    }
}


//------------ Codec ---------------------------------------------------------

/// The settings for encoding and decoding.
///
/// The crate’s [`encode`][crate::encode()], [`decode`][crate::decode()],
/// and [`decode_all`][crate::decode_all()] functions use the default
/// settings. A codec allows changing them:
///
/// ```
/// use berschema::{Codec, Mode, Schema};
///
/// let codec = Codec::new().with_mode(Mode::Strict).with_max_depth(8);
/// let value = codec.decode(&Schema::integer(), b"\x02\x01\x05").unwrap();
/// assert_eq!(value.as_int(), Some(5));
/// ```
#[derive(Clone, Copy)]
pub struct Codec<'a> {
    mode: Mode,
    max_depth: usize,
    observer: Option<&'a dyn Observer>,
}

impl<'a> Codec<'a> {
    /// The default maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Creates a codec with the default settings.
    pub fn new() -> Self {
        Codec {
            mode: Mode::default(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
            observer: None,
        }
    }

    /// Sets the decoding mode.
    pub fn with_mode(self, mode: Mode) -> Self {
        Codec { mode, ..self }
    }

    /// Sets the maximum depth of nested values accepted when decoding.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Codec { max_depth, ..self }
    }

    /// Sets an observer to be notified during decoding.
    pub fn with_observer(self, observer: &'a dyn Observer) -> Self {
        Codec { observer: Some(observer), ..self }
    }

    /// Returns the decoding mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the maximum nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn observer(&self) -> Option<&'a dyn Observer> {
        self.observer
    }

    /// Encodes a value.
    pub fn encode(
        &self, schema: &Schema, value: &Value
    ) -> Result<Bytes, EncodeError> {
        let mut target = Vec::new();
        encode::encode_value(schema, value, &mut target)?;
        log::trace!("encoded {} into {} octets", schema, target.len());
        Ok(target.into())
    }

    /// Decodes a value from the beginning of a slice.
    ///
    /// Only the octets of the value are copied. Octet string values of the
    /// result share this copy. Data following the value is ignored.
    pub fn decode(
        &self, schema: &Schema, data: &[u8]
    ) -> Result<Value, DecodeError> {
        self.decode_prefix(schema, data).map(|(value, _)| value)
    }

    /// Decodes a value from the beginning of a slice.
    ///
    /// Returns the value and the number of octets it took up, so that
    /// further values can be decoded from the remaining data.
    ///
    /// ```
    /// use berschema::{Codec, Schema, Value};
    ///
    /// let data = b"\x02\x01\x05\x02\x01\x06";
    /// let codec = Codec::new();
    /// let (first, used) = codec.decode_prefix(&Schema::integer(), data)
    ///     .unwrap();
    /// let (second, _) = codec.decode_prefix(
    ///     &Schema::integer(), &data[used..]
    /// ).unwrap();
    /// assert_eq!((first, second), (Value::Int(5), Value::Int(6)));
    /// ```
    pub fn decode_prefix(
        &self, schema: &Schema, data: &[u8]
    ) -> Result<(Value, usize), DecodeError> {
        let element = Element::take_from(data)?;
        let data = Bytes::copy_from_slice(&data[..element.consumed()]);
        decode::decode_value(self, schema, &data)
    }

    /// Decodes a value from the beginning of a bytes value.
    ///
    /// Octet string values of the result share the data without copying.
    /// Data following the value is ignored.
    pub fn decode_bytes(
        &self, schema: &Schema, data: Bytes
    ) -> Result<Value, DecodeError> {
        decode::decode_value(self, schema, &data).map(|(value, _)| value)
    }

    /// Decodes a value that has to take up all of the data.
    pub fn decode_all(
        &self, schema: &Schema, data: &[u8]
    ) -> Result<Value, DecodeError> {
        let (value, consumed) = self.decode_prefix(schema, data)?;
        if consumed < data.len() {
            return Err(decode::DecodeErrorKind::TrailingData(
                data.len() - consumed
            ).into())
        }
        Ok(value)
    }
}


//--- Default

impl Default for Codec<'_> {
    fn default() -> Self {
        Self::new()
    }
}


//--- Debug

impl fmt::Debug for Codec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Codec")
            .field("mode", &self.mode)
            .field("max_depth", &self.max_depth)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
