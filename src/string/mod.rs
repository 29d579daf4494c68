//! BER encoding for the string types.
//!
//! There are two types of strings for binary data. Octet strings contain
//! an unrestricted sequence of octets while bit strings contain a sequence
//! of bits that does not need to be of a length divisible by eight.
//!
//! In addition, there are a number of so-called restricted character
//! strings that share the encoding of octet strings but each contain a
//! sequence of characters according to a pre-defined character set. The
//! [`Flavor`] type names all variants of octet strings supported by the
//! crate.

//--- Re-exports

pub use self::bit::NamedBits;
pub use self::charset::Flavor;

//--- Modules

pub mod bit;
pub mod octet;
mod charset;
