//! ASN.1 Object Identifiers.
//!
//! Object identifiers are globally unique, hierarchical values that are used
//! to identify objects or their type. When written, they are presented as a
//! sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’. This
//! is also how they appear as a [`Value::ObjectId`][crate::Value::ObjectId].
//!
//! # BER Encoding
//!
//! The content octets are a sequence of subidentifiers. Each subidentifier
//! is an unsigned integer in base 128, most significant digit first, with
//! bit 8 set in all octets but the last one. The first two components
//! `a.b` are combined into the single subidentifier `40 * a + b`, every
//! other component is a subidentifier of its own.
//!
//! The base 128 helpers in here are shared with the high tag number form of
//! the identifier octets.

use smallvec::SmallVec;
use crate::decode::DecodeErrorKind;
use crate::encode::EncodeErrorKind;


//------------ Subidentifiers ------------------------------------------------

/// The ways reading a base 128 number can fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SubidError {
    /// The last octet still has bit 8 set.
    Truncated,

    /// The number does not fit into a `u64`.
    Overflow,
}

/// Appends a number in base 128 to the target.
pub(crate) fn append_subidentifier(mut value: u64, target: &mut Vec<u8>) {
    let mut octets = SmallVec::<[u8; 10]>::new();
    octets.push((value & 0x7f) as u8);
    value >>= 7;
    while value > 0 {
        octets.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    target.extend(octets.iter().rev());
}

/// Takes a base 128 number from the beginning of a buffer.
///
/// Returns the number and the number of octets it took up.
pub(crate) fn take_subidentifier(
    buf: &[u8]
) -> Result<(u64, usize), SubidError> {
    let mut res = 0u64;
    for (i, octet) in buf.iter().enumerate() {
        if res > (u64::MAX >> 7) {
            return Err(SubidError::Overflow)
        }
        res = (res << 7) | u64::from(octet & 0x7f);
        if octet & 0x80 == 0 {
            return Ok((res, i + 1))
        }
    }
    Err(SubidError::Truncated)
}


//------------ Content -------------------------------------------------------

/// Appends the content octets of an object identifier in dotted notation.
pub fn append_content(
    oid: &str, target: &mut Vec<u8>
) -> Result<(), EncodeErrorKind> {
    let invalid = || EncodeErrorKind::InvalidOid(oid.into());
    let mut components = oid.split('.').map(|item| {
        item.trim().parse::<u64>().map_err(|_| invalid())
    });
    let (first, second) = match (components.next(), components.next()) {
        (Some(first), Some(second)) => (first?, second?),
        _ => return Err(invalid())
    };
    if first > 2 || (first < 2 && second >= 40) {
        return Err(invalid())
    }
    let head = second.checked_add(first * 40).ok_or_else(invalid)?;
    append_subidentifier(head, target);
    for component in components {
        append_subidentifier(component?, target);
    }
    Ok(())
}

/// Converts content octets into an object identifier in dotted notation.
pub fn from_content(content: &[u8]) -> Result<String, DecodeErrorKind> {
    if content.is_empty() {
        return Err(DecodeErrorKind::InvalidOid("empty content"))
    }
    let mut res = String::new();
    let mut pos = 0;
    while pos < content.len() {
        let (value, len) = take_subidentifier(&content[pos..]).map_err(|err| {
            match err {
                SubidError::Truncated => {
                    DecodeErrorKind::InvalidOid("truncated subidentifier")
                }
                SubidError::Overflow => {
                    DecodeErrorKind::InvalidOid("subidentifier too large")
                }
            }
        })?;
        if pos == 0 {
            let (first, second) = match value {
                0..=39 => (0, value),
                40..=79 => (1, value - 40),
                _ => (2, value - 80),
            };
            res.push_str(&format!("{}.{}", first, second));
        }
        else {
            res.push_str(&format!(".{}", value));
        }
        pos += len;
    }
    Ok(res)
}


//============ Tests =========================================================
