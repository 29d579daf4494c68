//! The content of octet strings and their character string flavors.
//!
//! An octet string can be encoded in two ways. In primitive form, the
//! content octets are the octets of the string. In constructed form, the
//! content is a sequence of encoded values whose content, in turn, is
//! concatenated to form the string. These fragments may themselves be
//! constructed.
//!
//! We only ever produce the primitive form but accept both.

use bytes::{Bytes, BytesMut};
use crate::decode::DecodeErrorKind;
use crate::element::Element;
use crate::encode::EncodeErrorKind;
use crate::int::Bounds;
use crate::value::Value;
use super::Flavor;


//------------ Encoding ------------------------------------------------------

/// Appends the content octets for a value to the target.
///
/// The generic flavor expects a `Value::Bytes`, all others a
/// `Value::Text`.
pub fn append_content(
    flavor: Flavor, size: Bounds, value: &Value, target: &mut Vec<u8>
) -> Result<(), EncodeErrorKind> {
    let octets = match (flavor.is_text(), value) {
        (false, Value::Bytes(bytes)) => bytes.as_ref(),
        (true, Value::Text(text)) => text.as_bytes(),
        (text, value) => {
            return Err(EncodeErrorKind::TypeMismatch {
                expected: if text { "Text" } else { "Bytes" },
                found: value.kind_name(),
            })
        }
    };
    if !flavor.check(octets) {
        return Err(EncodeErrorKind::InvalidCharacter { flavor })
    }
    check_size(size, octets.len()).map_err(|value| {
        EncodeErrorKind::ConstraintViolation { value, bounds: size }
    })?;
    target.extend_from_slice(octets);
    Ok(())
}


//------------ Decoding ------------------------------------------------------

/// Converts the octets of a string into a value.
pub fn from_octets(
    flavor: Flavor, size: Bounds, octets: Bytes
) -> Result<Value, DecodeErrorKind> {
    check_size(size, octets.len()).map_err(|value| {
        DecodeErrorKind::ConstraintViolation { value, bounds: size }
    })?;
    if !flavor.is_text() {
        return Ok(Value::Bytes(octets))
    }
    if !flavor.check(&octets) {
        return Err(DecodeErrorKind::InvalidCharacter { flavor })
    }
    match String::from_utf8(octets.to_vec()) {
        Ok(text) => Ok(Value::Text(text)),
        Err(_) => Err(DecodeErrorKind::InvalidCharacter { flavor })
    }
}

/// Appends the octets of the fragments of a constructed string.
///
/// `content` is the content of the constructed value found `depth` levels
/// below the root. Constructed fragments are descended into as long as
/// they stay within `max_depth` levels.
pub fn append_fragments(
    content: &[u8], depth: usize, max_depth: usize, target: &mut BytesMut
) -> Result<(), DecodeErrorKind> {
    let mut pos = 0;
    while pos < content.len() {
        let fragment = Element::take_from(&content[pos..])?;
        if fragment.tag().is_constructed() {
            if depth + 1 >= max_depth {
                return Err(DecodeErrorKind::NestingTooDeep(max_depth))
            }
            append_fragments(
                fragment.content(), depth + 1, max_depth, target
            )?
        }
        else {
            target.extend_from_slice(fragment.content());
        }
        pos += fragment.consumed();
    }
    Ok(())
}

/// Checks the length of a string against a size constraint.
///
/// Returns the offending length as the error.
fn check_size(size: Bounds, len: usize) -> Result<(), i64> {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    if size.contains(len) {
        Ok(())
    }
    else {
        Err(len)
    }
}


//============ Tests =========================================================
