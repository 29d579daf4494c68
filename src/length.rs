//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::DecodeErrorKind;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-contents marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// When decoding, leading zero octets in the long form are accepted. When
/// encoding, the minimal number of octets is always used.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Length {
    /// A definite length of the given number of octets.
    Definite(usize),

    /// An indefinite length.
    Indefinite,
}

impl Length {
    /// The size of a `usize` in octets.
    const USIZE_LEN: usize = 0usize.to_ne_bytes().len();

    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns whether the length is indefinite.
    pub fn is_indefinite(self) -> bool {
        matches!(self, Length::Indefinite)
    }

    /// Takes the length octets from the beginning of a buffer.
    ///
    /// Returns the length and the number of length octets.
    pub fn take_from(buf: &[u8]) -> Result<(Self, usize), DecodeErrorKind> {
        let first = match buf.first() {
            Some(first) => *first,
            None => return Err(DecodeErrorKind::LengthTruncated)
        };
        let count = match first {
            // Bit 8 clear: single.
            n if n & 0x80 == 0 => {
                return Ok((Length::Definite(usize::from(n)), 1))
            }

            // 0x80: indefinite.
            0x80 => return Ok((Length::Indefinite, 1)),

            // 0xFF: reserved.
            0xFF => {
                return Err(DecodeErrorKind::UnexpectedContent {
                    what: "length octets"
                })
            }

            // anything else: clear left bit, number of octets.
            n => usize::from(n & 0x7F)
        };
        let octets = match buf.get(1..=count) {
            Some(octets) => octets,
            None => return Err(DecodeErrorKind::LengthTruncated)
        };
        let start = octets.iter().position(|&x| x != 0).unwrap_or(count);
        let significant = &octets[start..];
        if significant.len() > Self::USIZE_LEN {
            return Err(DecodeErrorKind::LengthOverflow)
        }
        let len = significant.iter().fold(0usize, |len, &octet| {
            (len << 8) | usize::from(octet)
        });
        Ok((Length::Definite(len), count + 1))
    }

    /// Returns the number of length octets.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Definite(len) if len > 0x7F => {
                Self::USIZE_LEN - Self::encoded_start_idx(len) + 1
            }
            _ => 1
        }
    }

    /// Appends the length octets to a target.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        match self {
            Length::Definite(len) if len > 0x7F => {
                let idx = Self::encoded_start_idx(len);

                // USIZE_LEN will never be greater than 126 octets, so this
                // fits the first octet.
                target.push(((Self::USIZE_LEN - idx) | 0x80) as u8);
                target.extend_from_slice(&len.to_be_bytes()[idx..]);
            }
            Length::Definite(len) => target.push(len as u8),
            Length::Indefinite => target.push(0x80),
        }
    }

    /// Returns the index of the first non-zero octet of `len`.
    fn encoded_start_idx(len: usize) -> usize {
        (len.leading_zeros() / 8) as usize
    }
}


//============ Tests =========================================================
