//! The flavors of octet strings and their character sets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, str};
use crate::tag::Tag;


//------------ Flavor --------------------------------------------------------

/// The flavor of an octet string.
///
/// All flavors share the OCTET STRING encoding but have their own natural
/// tag. The generic flavor carries arbitrary octets as a
/// [`Value::Bytes`][crate::Value::Bytes]. All other flavors are character
/// strings that carry a [`Value::Text`][crate::Value::Text] and restrict
/// the octets to their character set.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Flavor {
    /// OCTET STRING, any octets.
    Generic,

    /// IA5String, the ASCII characters `0x00` to `0x7F`.
    Ia5,

    /// VisibleString, the printing ASCII characters `0x20` to `0x7E`.
    Visible,

    /// NumericString, the digits `0` to `9` and space.
    Numeric,

    /// PrintableString.
    ///
    /// The letters `A` to `Z` and `a` to `z`, the digits `0` to `9`, space,
    /// and the symbols `'`, `(`, `)`, `+`, `,`, `-`, `.`, `/`, `:`, `=`,
    /// and `?`.
    Printable,

    /// UTF8String, any Unicode text encoded in UTF-8.
    Utf8,
}

impl Flavor {
    /// Returns the natural tag of the flavor.
    pub fn tag(self) -> Tag {
        match self {
            Flavor::Generic => Tag::OCTET_STRING,
            Flavor::Ia5 => Tag::IA5_STRING,
            Flavor::Visible => Tag::VISIBLE_STRING,
            Flavor::Numeric => Tag::NUMERIC_STRING,
            Flavor::Printable => Tag::PRINTABLE_STRING,
            Flavor::Utf8 => Tag::UTF8_STRING,
        }
    }

    /// Returns whether values of this flavor are text.
    pub fn is_text(self) -> bool {
        !matches!(self, Flavor::Generic)
    }

    /// Returns whether the octets are all within the character set.
    pub fn check(self, octets: &[u8]) -> bool {
        match self {
            Flavor::Generic => true,
            Flavor::Ia5 => octets.is_ascii(),
            Flavor::Visible => {
                octets.iter().all(|&ch| (0x20..=0x7E).contains(&ch))
            }
            Flavor::Numeric => {
                octets.iter().all(|&ch| ch == b' ' || ch.is_ascii_digit())
            }
            Flavor::Printable => {
                octets.iter().copied().all(|x| {
                    x.is_ascii_alphanumeric() || // A-Z a-z 0-9
                    x == b' ' || x == b'\'' || x == b'(' || x == b')' ||
                    x == b'+' || x == b',' || x == b'-' || x == b'.' ||
                    x == b'/' || x == b':' || x == b'=' || x == b'?'
                })
            }
            Flavor::Utf8 => str::from_utf8(octets).is_ok(),
        }
    }
}


//--- Display

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Flavor::Generic => "OCTET STRING",
            Flavor::Ia5 => "IA5String",
            Flavor::Visible => "VisibleString",
            Flavor::Numeric => "NumericString",
            Flavor::Printable => "PrintableString",
            Flavor::Utf8 => "UTF8String",
        })
    }
}


//============ Tests =========================================================
