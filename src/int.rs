//! BER encoded integers.
//!
//! This module contains the content codec shared by the INTEGER and
//! ENUMERATED types, the range constraint [`Bounds`] and the name table of
//! an enumerated type, [`Enumeration`].
//!
//! # BER Encoding
//!
//! In BER, an INTEGER is encoded as a primitive value with the content
//! octets providing a variable-length, big-endian, two‘s complement byte
//! sequence of that integer. Thus, the most-significant bit of the first
//! octet serves as the sign bit. The encoding always uses the minimal
//! number of octets, i.e., the first nine bits of a multi-octet integer
//! are never all the same.
//!
//! Integers are represented as `i64`. Content of more than eight octets
//! can’t be represented and is rejected when decoding.

use std::fmt;
use indexmap::IndexMap;
use crate::decode::DecodeErrorKind;


//------------ Content -------------------------------------------------------

/// Appends the content octets of an integer to the target.
pub fn append_content(value: i64, target: &mut Vec<u8>) {
    let octets = value.to_be_bytes();
    let mut start = 0;
    while start < octets.len() - 1 {
        let (first, next) = (octets[start], octets[start + 1] & 0x80 != 0);
        match (first, next) {
            (0, false) | (0xFF, true) => start += 1,
            _ => break
        }
    }
    target.extend_from_slice(&octets[start..]);
}

/// Converts content octets into an integer.
///
/// Non-minimal encodings are accepted. Content longer than eight octets is
/// rejected even if the value would fit.
pub fn from_content(content: &[u8]) -> Result<i64, DecodeErrorKind> {
    let first = match content.first() {
        Some(first) => *first,
        None => {
            return Err(DecodeErrorKind::InvalidLength {
                what: "integer", found: 0
            })
        }
    };
    if content.len() > 8 {
        return Err(DecodeErrorKind::IntegerOverflow { len: content.len() })
    }
    let init: i64 = if first & 0x80 != 0 { -1 } else { 0 };
    Ok(content.iter().fold(init, |res, &octet| {
        (res << 8) | i64::from(octet)
    }))
}


//------------ Bounds --------------------------------------------------------

/// A range constraint with optional lower and upper bounds.
///
/// Both bounds are inclusive. A missing bound leaves the range open on
/// that side. The same type is used for the value range of integers and
/// the size range of octet strings.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Bounds {
    min: Option<i64>,
    max: Option<i64>,
}

impl Bounds {
    /// Creates new bounds.
    pub const fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Bounds { min, max }
    }

    /// Creates bounds that allow every value.
    pub const fn unbounded() -> Self {
        Bounds { min: None, max: None }
    }

    /// Returns the lower bound.
    pub fn min(self) -> Option<i64> {
        self.min
    }

    /// Returns the upper bound.
    pub fn max(self) -> Option<i64> {
        self.max
    }

    /// Returns whether neither bound is set.
    pub fn is_unbounded(self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns whether a value lies within the bounds.
    pub fn contains(self, value: i64) -> bool {
        self.min.map(|min| value >= min).unwrap_or(true)
            && self.max.map(|max| value <= max).unwrap_or(true)
    }
}


//--- Display

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("(")?;
        match self.min {
            Some(min) => write!(f, "{}", min)?,
            None => f.write_str("MIN")?,
        }
        f.write_str("..")?;
        match self.max {
            Some(max) => write!(f, "{}", max)?,
            None => f.write_str("MAX")?,
        }
        f.write_str(")")
    }
}


//------------ Enumeration ---------------------------------------------------

/// The named items of an ENUMERATED type.
///
/// Lookups go both ways. If a name or number appears more than once, the
/// first item wins.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Enumeration {
    items: IndexMap<String, i64>,
}

impl Enumeration {
    /// Returns the number of the item with the given name.
    pub fn number(&self, name: &str) -> Option<i64> {
        self.items.get(name).copied()
    }

    /// Returns the name of the item with the given number.
    pub fn name(&self, number: i64) -> Option<&str> {
        self.items.iter().find(|item| *item.1 == number).map(|item| {
            item.0.as_str()
        })
    }

    /// Returns an iterator over the items in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.items.iter().map(|(name, number)| (name.as_str(), *number))
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for Enumeration {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut items = IndexMap::new();
        for (name, number) in iter {
            items.entry(name.into()).or_insert(number);
        }
        Enumeration { items }
    }
}


//============ Tests =========================================================
