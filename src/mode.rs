//! The decoding mode.

use crate::codec::Codec;
use crate::decode::DecodeError;
use crate::schema::Schema;
use crate::value::Value;


//------------ Mode ----------------------------------------------------------

/// How strictly data is held to its schema when decoding.
///
/// Encoding always produces the same data regardless of mode.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Mode {
    /// Elements of a sequence that match none of its remaining fields are
    /// skipped, as are elements of a set that match none of its fields.
    ///
    /// This is the default.
    #[default]
    Lenient,

    /// Unexpected elements are rejected.
    ///
    /// This covers elements of a sequence or set that match none of its
    /// remaining fields and data following the value inside an explicit
    /// tag.
    Strict,
}

impl Mode {
    /// Returns whether this is the strict mode.
    pub fn is_strict(self) -> bool {
        matches!(self, Mode::Strict)
    }

    /// Decodes a value using this mode and otherwise default settings.
    ///
    /// Data following the value is ignored.
    pub fn decode(
        self, schema: &Schema, data: &[u8]
    ) -> Result<Value, DecodeError> {
        Codec::new().with_mode(self).decode(schema, data)
    }
}


//============ Tests =========================================================
