//! The identifier octets of a BER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::decode::DecodeErrorKind;
use crate::oid::{append_subidentifier, take_subidentifier, SubidError};


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    /// The universal class for the types defined by ASN.1 itself.
    Universal,

    /// The application class.
    Application,

    /// The context-specific class.
    Context,

    /// The private class.
    Private,
}

impl Class {
    /// Returns the class bits of the first identifier octet.
    const fn bits(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::Context => 0x80,
            Class::Private => 0xc0,
        }
    }

    /// Returns the class encoded in the first identifier octet.
    const fn from_octet(octet: u8) -> Self {
        match octet & Tag::CLASS_MASK {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }
}


//------------ Form ----------------------------------------------------------

/// The encoding form of a value.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Form {
    /// The content octets are the value itself.
    Primitive,

    /// The content octets are a sequence of encoded values.
    Constructed,
}

impl Form {
    /// Returns whether this is the constructed form.
    pub const fn is_constructed(self) -> bool {
        matches!(self, Form::Constructed)
    }
}


//------------ Tag -----------------------------------------------------------

/// The tag of a BER encoded value.
///
/// Each BER encoded value starts with a sequence of one or more octets
/// called the _identifier octets._ They encode the class and number of the
/// tag as well as whether the value uses primitive or constructed encoding.
/// The `Tag` type keeps all three.
///
/// Two tags are considered equal by [`matches`][Self::matches] if their
/// class and number are equal. Whether a value is primitive or constructed
/// is a property of the encoding, not of the type, and is therefore
/// ignored when looking for the schema that describes a value.
///
/// The special tag [`Tag::ANY`] matches every other tag. It is the natural
/// tag of the ANY type and never appears in encoded data.
///
/// # BER Encoding
///
/// There are two forms:
/// * low tag number (for tag numbers between 0 and 30):
///     One octet. Bits 8 and 7 specify the class, bit 6 indicates whether
///     the encoding is primitive (0), and bits 5-1 give the tag number.
/// * high tag number (for tag numbers 31 and greater):
///     Two or more octets. First octet is as in low-tag-number form,
///     except that bits 5-1 all have value 1. Second and following octets
///     give the tag number, base 128, most significant digit first, with
///     as few digits as possible, and with the bit 8 of each octet except
///     the last set to 1.
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32` minus one, the last
/// value is taken by [`Tag::ANY`].
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Tag {
    class: Class,
    form: Form,
    number: u32,
}

/// # Constants for Often Used Tag Values
///
impl Tag {
    /// The mask for checking the class.
    const CLASS_MASK: u8 = 0xc0;

    /// The mask for checking whether the value is constructed.
    ///
    /// A value of 0 indicates primitive.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The mask for the tag number in the first octet.
    ///
    /// (5 bits – 0b0001_1111). If all bits are set, the number follows.
    const SINGLEBYTE_DATA_MASK: u8 = 0x1f;

    /// The tag number reserved for the wildcard tag.
    pub const ANY_NUMBER: u32 = u32::MAX;

    /// The wildcard tag matching all other tags.
    pub const ANY: Self = Self::universal(Tag::ANY_NUMBER);

    /// The tag marking the end of an indefinite length value, UNIVERSAL 0.
    pub const END_OF_CONTENTS: Self = Self::universal(0);

    //--- Universal Tags
    //
    // See clause 8.4 of X.690.

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::universal(6);

    /// The tag for the EXTERNAL type, UNIVERSAL 8, always constructed.
    pub const EXTERNAL: Self = Self::universal(8).constructed();

    /// The tag for the REAL type, UNIVERSAL 9.
    pub const REAL: Self = Self::universal(9);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::universal(10);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Self::universal(12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::universal(16).constructed();

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::universal(17).constructed();

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::universal(18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::universal(19);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::universal(22);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::universal(26);
}

impl Tag {
    /// Creates a new tag from its components.
    pub const fn new(class: Class, form: Form, number: u32) -> Self {
        Tag { class, form, number }
    }

    /// Creates a new primitive tag in the universal class.
    pub const fn universal(number: u32) -> Self {
        Tag::new(Class::Universal, Form::Primitive, number)
    }

    /// Creates a new primitive tag in the application class.
    pub const fn application(number: u32) -> Self {
        Tag::new(Class::Application, Form::Primitive, number)
    }

    /// Creates a new primitive tag in the context specific class.
    pub const fn ctx(number: u32) -> Self {
        Tag::new(Class::Context, Form::Primitive, number)
    }

    /// Creates a new primitive tag in the private class.
    pub const fn private(number: u32) -> Self {
        Tag::new(Class::Private, Form::Primitive, number)
    }

    /// Returns the same tag in constructed form.
    pub const fn constructed(self) -> Self {
        self.with_form(Form::Constructed)
    }

    /// Returns the same tag with the given form.
    pub const fn with_form(self, form: Form) -> Self {
        Tag::new(self.class, form, self.number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the form of the tag.
    pub const fn form(self) -> Form {
        self.form
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns whether the tag signals constructed encoding.
    pub const fn is_constructed(self) -> bool {
        self.form.is_constructed()
    }

    /// Returns whether this is the wildcard tag.
    pub const fn is_any(self) -> bool {
        self.number == Tag::ANY_NUMBER
    }

    /// Returns whether two tags identify the same type.
    ///
    /// This is the case if the class and number are equal or if either tag
    /// is the wildcard tag. The form is ignored.
    pub fn matches(self, other: Tag) -> bool {
        if self.is_any() || other.is_any() {
            return true
        }
        self.class == other.class && self.number == other.number
    }
}

/// # Decoding and Encoding
///
impl Tag {
    /// Takes a tag from the beginning of a buffer.
    ///
    /// Returns the tag and the number of identifier octets.
    pub fn take_from(buf: &[u8]) -> Result<(Self, usize), DecodeErrorKind> {
        let first = match buf.first() {
            Some(first) => *first,
            None => return Err(DecodeErrorKind::TagTruncated),
        };
        let class = Class::from_octet(first);
        let form = if first & Tag::CONSTRUCTED_MASK != 0 {
            Form::Constructed
        }
        else {
            Form::Primitive
        };
        let number = first & Tag::SINGLEBYTE_DATA_MASK;
        if number != Tag::SINGLEBYTE_DATA_MASK {
            return Ok((Tag::new(class, form, u32::from(number)), 1))
        }
        let (number, len) = take_subidentifier(&buf[1..]).map_err(|err| {
            match err {
                SubidError::Truncated => DecodeErrorKind::TagTruncated,
                SubidError::Overflow => DecodeErrorKind::TagOverflow,
            }
        })?;
        match u32::try_from(number) {
            Ok(number) if number != Tag::ANY_NUMBER => {
                Ok((Tag::new(class, form, number), len + 1))
            }
            _ => Err(DecodeErrorKind::TagOverflow)
        }
    }

    /// Returns the number of identifier octets of the tag.
    pub fn encoded_len(self) -> usize {
        let mut number = self.number;
        if number < u32::from(Tag::SINGLEBYTE_DATA_MASK) {
            return 1
        }
        let mut len = 1;
        while number > 0 {
            len += 1;
            number >>= 7;
        }
        len
    }

    /// Appends the identifier octets to a target.
    ///
    /// The constructed bit is set if the tag itself is constructed or if
    /// `inherited` is the constructed form. The latter is how an implicit
    /// tag keeps the form of the type it replaces.
    pub fn append_encoded(self, inherited: Option<Form>, target: &mut Vec<u8>) {
        let constructed = self.is_constructed()
            || inherited.map(Form::is_constructed).unwrap_or(false);
        let mut first = self.class.bits();
        if constructed {
            first |= Tag::CONSTRUCTED_MASK
        }
        if self.number < u32::from(Tag::SINGLEBYTE_DATA_MASK) {
            target.push(first | self.number as u8);
        }
        else {
            target.push(first | Tag::SINGLEBYTE_DATA_MASK);
            append_subidentifier(u64::from(self.number), target);
        }
    }
}


//--- Display and Debug

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_any() {
            return write!(f, "ANY")
        }
        if self.class == Class::Universal {
            let name = match self.number {
                0 => Some("END-OF-CONTENTS"),
                1 => Some("BOOLEAN"),
                2 => Some("INTEGER"),
                3 => Some("BIT STRING"),
                4 => Some("OCTET STRING"),
                5 => Some("NULL"),
                6 => Some("OBJECT IDENTIFIER"),
                8 => Some("EXTERNAL"),
                9 => Some("REAL"),
                10 => Some("ENUMERATED"),
                12 => Some("UTF8String"),
                16 => Some("SEQUENCE"),
                17 => Some("SET"),
                18 => Some("NumericString"),
                19 => Some("PrintableString"),
                22 => Some("IA5String"),
                26 => Some("VisibleString"),
                _ => None
            };
            if let Some(name) = name {
                return f.write_str(name)
            }
        }
        match self.class {
            Class::Universal => write!(f, "[UNIVERSAL {}]", self.number),
            Class::Application => write!(f, "[APPLICATION {}]", self.number),
            Class::Context => write!(f, "[{}]", self.number),
            Class::Private => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.form {
            Form::Primitive => write!(f, "Tag({})", self),
            Form::Constructed => write!(f, "Tag({}, constructed)", self),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const CLASSES: &[Class] = &[
        Class::Universal, Class::Application, Class::Context, Class::Private
    ];

    fn encode(tag: Tag, inherited: Option<Form>) -> Vec<u8> {
        let mut res = Vec::new();
        tag.append_encoded(inherited, &mut res);
        assert_eq!(res.len(), tag.encoded_len());
        res
    }

    #[test]
    fn single_octet_tags() {
        assert_eq!(encode(Tag::INTEGER, None), b"\x02");
        assert_eq!(encode(Tag::SEQUENCE, None), b"\x30");
        assert_eq!(encode(Tag::ctx(0), None), b"\x80");
        assert_eq!(encode(Tag::ctx(0).constructed(), None), b"\xa0");
        assert_eq!(encode(Tag::application(30), None), b"\x5e");
        assert_eq!(encode(Tag::private(3), None), b"\xc3");

        for &class in CLASSES {
            for number in 0..31 {
                let tag = Tag::new(class, Form::Primitive, number);
                let encoded = encode(tag, None);
                assert_eq!(encoded.len(), 1);
                assert_eq!(Tag::take_from(&encoded), Ok((tag, 1)));
            }
        }
    }

    #[test]
    fn multi_octet_tags() {
        assert_eq!(encode(Tag::ctx(31), None), b"\x9f\x1f");
        assert_eq!(encode(Tag::ctx(127), None), b"\x9f\x7f");
        assert_eq!(encode(Tag::ctx(128), None), b"\x9f\x81\x00");
        assert_eq!(encode(Tag::application(201), None), b"\x5f\x81\x49");

        for &class in CLASSES {
            for &number in &[31, 100, 127, 128, 0x3fff, 0x4000, 0x1f_ffff] {
                let tag = Tag::new(class, Form::Constructed, number);
                let encoded = encode(tag, None);
                assert_eq!(
                    Tag::take_from(&encoded), Ok((tag, encoded.len()))
                );
            }
        }
    }

    #[test]
    fn inherited_form() {
        assert_eq!(
            encode(Tag::ctx(1), Some(Form::Constructed)), b"\xa1"
        );
        assert_eq!(
            encode(Tag::ctx(1), Some(Form::Primitive)), b"\x81"
        );
        assert_eq!(
            encode(Tag::ctx(1).constructed(), Some(Form::Primitive)),
            b"\xa1"
        );
    }

    #[test]
    fn take_failures() {
        assert_eq!(Tag::take_from(b""), Err(DecodeErrorKind::TagTruncated));
        assert_eq!(
            Tag::take_from(b"\x9f\x81"), Err(DecodeErrorKind::TagTruncated)
        );
        assert_eq!(
            Tag::take_from(b"\x9f\x90\x80\x80\x80\x00"),
            Err(DecodeErrorKind::TagOverflow)
        );
        assert_eq!(
            Tag::take_from(b"\x9f\x8f\xff\xff\xff\x7f"),
            Err(DecodeErrorKind::TagOverflow)
        );
    }

    #[test]
    fn matching() {
        assert!(Tag::INTEGER.matches(Tag::INTEGER));
        assert!(Tag::ctx(0).matches(Tag::ctx(0).constructed()));
        assert!(!Tag::ctx(0).matches(Tag::application(0)));
        assert!(!Tag::ctx(0).matches(Tag::ctx(1)));
        assert!(Tag::ANY.matches(Tag::private(7)));
        assert!(Tag::ctx(3).matches(Tag::ANY));
    }

    #[test]
    fn display() {
        assert_eq!(Tag::INTEGER.to_string(), "INTEGER");
        assert_eq!(Tag::ctx(2).to_string(), "[2]");
        assert_eq!(Tag::application(1).to_string(), "[APPLICATION 1]");
        assert_eq!(Tag::universal(30).to_string(), "[UNIVERSAL 30]");
        assert_eq!(
            format!("{:?}", Tag::SEQUENCE), "Tag(SEQUENCE, constructed)"
        );
    }
}
