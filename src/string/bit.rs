//! BER-encoded bit strings with named bits.
//!
//! Bit strings are a sequence of bits. Unlike octet strings, they do not
//! need to contain a multiple of eight bits. In a schema, a bit string
//! carries a table of named bit positions and its value is a record that
//! maps these names to booleans.
//!
//! # BER Encoding
//!
//! When encoded in BER, bit strings can either be a primitive or
//! constructed value.
//!
//! If encoded as a primitive value, the first octet of the content contains
//! the number of unused bits in the last octet and the following octets
//! contain the bits with the first bit in the most significant bit of the
//! octet.
//!
//! In the constructed encoding, the bit string is represented as a
//! sequence of bit strings which in turn may either be constructed or
//! primitive encodings.
//!
//! # Limitation
//!
//! The constructed encoding is not implemented.

use indexmap::IndexMap;
use smallvec::SmallVec;
use crate::decode::DecodeErrorKind;
use crate::encode::EncodeErrorKind;
use crate::value::{Record, Value};


//------------ NamedBits -----------------------------------------------------

/// The named bits of a BIT STRING type.
///
/// Position 0 is the most significant bit of the first octet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NamedBits {
    bits: IndexMap<String, u32>,
}

impl NamedBits {
    /// Returns the position of a named bit.
    pub fn position(&self, name: &str) -> Option<u32> {
        self.bits.get(name).copied()
    }

    /// Returns an iterator over the names and positions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.bits.iter().map(|(name, pos)| (name.as_str(), *pos))
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for NamedBits {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut bits = IndexMap::new();
        for (name, pos) in iter {
            bits.entry(name.into()).or_insert(pos);
        }
        NamedBits { bits }
    }
}


//------------ Encoding ------------------------------------------------------

/// Appends the content octets for a bit string value to the target.
///
/// The value is a record of booleans keyed by bit name. The content uses as
/// few octets as necessary to include the highest set bit.
pub fn append_content(
    names: &NamedBits, value: &Value, target: &mut Vec<u8>
) -> Result<(), EncodeErrorKind> {
    let record = match value {
        Value::Record(record) => record,
        Value::List(_) => {
            return Err(EncodeErrorKind::NotImplemented(
                "segmented bit string"
            ))
        }
        value => {
            return Err(EncodeErrorKind::TypeMismatch {
                expected: "Record", found: value.kind_name()
            })
        }
    };
    let mut set = SmallVec::<[u32; 16]>::new();
    for (name, value) in record.iter() {
        let pos = names.position(name).ok_or_else(|| {
            EncodeErrorKind::UnknownBit(name.into())
        })?;
        match value {
            Value::Bool(true) => set.push(pos),
            Value::Bool(false) => { }
            value => {
                return Err(EncodeErrorKind::TypeMismatch {
                    expected: "Bool", found: value.kind_name()
                })
            }
        }
    }
    let highest = match set.iter().max() {
        Some(highest) => *highest as usize,
        None => {
            target.push(0);
            return Ok(())
        }
    };
    target.push(7 - (highest & 7) as u8);
    let start = target.len();
    target.resize(start + (highest >> 3) + 1, 0);
    for pos in set {
        let pos = pos as usize;
        target[start + (pos >> 3)] |= 0x80 >> (pos & 7);
    }
    Ok(())
}


//------------ Decoding ------------------------------------------------------

/// Converts the content octets of a primitive bit string into a value.
///
/// Every named bit whose position lies within the content octets is
/// present in the resulting record.
pub fn from_content(
    names: &NamedBits, content: &[u8]
) -> Result<Value, DecodeErrorKind> {
    let (unused, bits) = match content.split_first() {
        Some((unused, bits)) => (*unused, bits),
        None => {
            return Err(DecodeErrorKind::InvalidLength {
                what: "bit string", found: 0
            })
        }
    };
    if unused > 7 {
        return Err(DecodeErrorKind::UnexpectedContent {
            what: "unused bits octet"
        })
    }
    let mut res = Record::new();
    for (name, pos) in names.iter() {
        let pos = pos as usize;
        if let Some(octet) = bits.get(pos >> 3) {
            res.insert(name, Value::Bool(octet & (0x80 >> (pos & 7)) != 0));
        }
    }
    Ok(Value::Record(res))
}


//============ Tests =========================================================
