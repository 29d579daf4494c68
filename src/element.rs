//! Extracting a single encoded value from a buffer.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::DecodeErrorKind;
use crate::length::Length;
use crate::tag::Tag;


//------------ Element -------------------------------------------------------

/// A single BER encoded value found at the start of a buffer.
///
/// The element is a view into the buffer it was taken from. It keeps the
/// tag, the content octets and the total number of octets the value
/// occupies in the buffer including its identifier and length octets and,
/// for indefinite length values, the end-of-contents marker.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Element<'a> {
    tag: Tag,
    length: Length,
    content: &'a [u8],
    consumed: usize,
}

impl<'a> Element<'a> {
    /// Takes the element from the beginning of a buffer.
    ///
    /// If the element has a definite length, the content is the given
    /// number of octets following the length octets. If it has an
    /// indefinite length, the content extends to the matching
    /// end-of-contents marker.
    ///
    /// For a constructed value, the matching marker is found by skipping
    /// over the nested values, so that an end-of-contents marker of a
    /// nested indefinite length value or a pair of zero octets inside
    /// nested content isn’t mistaken for the end. A primitive value has no
    /// nested values and ends at the first pair of zero octets.
    pub fn take_from(buf: &'a [u8]) -> Result<Self, DecodeErrorKind> {
        let (tag, tag_len) = Tag::take_from(buf)?;
        let (length, len_len) = Length::take_from(&buf[tag_len..])?;
        let start = tag_len + len_len;
        let rest = &buf[start..];
        let (content, consumed) = match length {
            Length::Definite(len) => {
                if len > rest.len() {
                    return Err(DecodeErrorKind::MissingBytes {
                        expected: len, available: rest.len()
                    })
                }
                (&rest[..len], start + len)
            }
            Length::Indefinite => {
                let end = if tag.is_constructed() {
                    constructed_end(rest, tag)?
                }
                else {
                    primitive_end(rest).ok_or(
                        DecodeErrorKind::NoEndOfContent { tag }
                    )?
                };
                (&rest[..end], start + end + 2)
            }
        };
        log::trace!(
            "extracted {} with {} content octets ({} total)",
            tag, content.len(), consumed
        );
        Ok(Element { tag, length, content, consumed })
    }

    /// Returns the tag of the element.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the length octets of the element.
    pub fn length(&self) -> Length {
        self.length
    }

    /// Returns the content octets of the element.
    pub fn content(&self) -> &'a [u8] {
        self.content
    }

    /// Returns the number of octets the element occupied in the buffer.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns the position of the first pair of zero octets.
fn primitive_end(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|pair| pair == [0, 0])
}

/// Returns the position of the end-of-contents marker of constructed content.
///
/// Walks over the nested values without recursion, counting open nested
/// indefinite length values.
fn constructed_end(buf: &[u8], tag: Tag) -> Result<usize, DecodeErrorKind> {
    let mut pos = 0;
    let mut open = 0usize;
    loop {
        let rest = &buf[pos..];
        if rest.len() < 2 {
            return Err(DecodeErrorKind::NoEndOfContent { tag })
        }
        if rest[0] == 0 && rest[1] == 0 {
            if open == 0 {
                return Ok(pos)
            }
            open -= 1;
            pos += 2;
            continue
        }
        let (nested, tag_len) = Tag::take_from(rest)?;
        let (length, len_len) = Length::take_from(&rest[tag_len..])?;
        pos += tag_len + len_len;
        match length {
            Length::Definite(len) => {
                let available = buf.len() - pos;
                if len > available {
                    return Err(DecodeErrorKind::MissingBytes {
                        expected: len, available
                    })
                }
                pos += len;
            }
            Length::Indefinite if nested.is_constructed() => open += 1,
            Length::Indefinite => {
                match primitive_end(&buf[pos..]) {
                    Some(end) => pos += end + 2,
                    None => {
                        return Err(
                            DecodeErrorKind::NoEndOfContent { tag: nested }
                        )
                    }
                }
            }
        }
    }
}


//============ Tests =========================================================
