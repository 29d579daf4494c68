//! Decoding data in Basic Encoding Rules.
//!
//! Decoding is driven by the schema. The decoder takes a single element
//! from the data, checks that its tag matches the schema and then turns its
//! content into a [`Value`] according to the kind of the schema, descending
//! into nested elements for constructed types.
//!
//! Errors are reported as a [`DecodeError`] which combines the reason for
//! the failure with the path to the value that could not be decoded.

pub use self::error::{DecodeError, DecodeErrorKind};

mod error;
mod test;

use bytes::{Bytes, BytesMut};
use log::{debug, trace};
use crate::{int, oid};
use crate::codec::{Codec, Observer};
use crate::element::Element;
use crate::length::Length;
use crate::mode::Mode;
use crate::path::{Path, Segment};
use crate::schema::{Alternative, Field, Kind, Schema};
use crate::string::{bit, octet};
use crate::tag::Tag;
use crate::value::{Record, Value};


//------------ decode_value --------------------------------------------------

/// Decodes a value from the beginning of the data.
///
/// Returns the value and the number of octets it took up.
pub(crate) fn decode_value(
    codec: &Codec, schema: &Schema, data: &Bytes
) -> Result<(Value, usize), DecodeError> {
    let mut decoder = Decoder {
        source: data,
        mode: codec.mode(),
        max_depth: codec.max_depth(),
        observer: codec.observer(),
        path: Path::new(),
        depth: 0,
    };
    let element = decoder.take_element(data)?;
    if !schema.matches(element.tag()) {
        let untagged_choice = schema.explicit_tags().is_empty()
            && matches!(schema.kind(), Kind::Choice { .. });
        if untagged_choice {
            return Err(
                DecodeErrorKind::UnsupportedChoice(element.tag()).into()
            )
        }
        return Err(DecodeErrorKind::TagMismatch {
            expected: schema.to_string(), found: element.tag()
        }.into())
    }
    let value = decoder.decode_element(schema, element)?;
    Ok((value, element.consumed()))
}


//------------ Decoder -------------------------------------------------------

/// The state of a decoding operation.
///
/// All content slices handled by the decoder are slices of `source`, so
/// octet string values can share it.
struct Decoder<'s, 'o> {
    source: &'s Bytes,
    mode: Mode,
    max_depth: usize,
    observer: Option<&'o dyn Observer>,

    /// The path of the value currently being decoded.
    path: Path,

    /// The number of values currently being decoded.
    depth: usize,
}

impl<'s, 'o> Decoder<'s, 'o> {
    /// Takes an element from the beginning of `buf`.
    fn take_element(
        &self, buf: &'s [u8]
    ) -> Result<Element<'s>, DecodeError> {
        let element = Element::take_from(buf)?;
        if let Some(observer) = self.observer {
            observer.element(
                &self.path, element.tag(), element.content().len()
            );
        }
        Ok(element)
    }

    /// Runs an operation one level further down the path.
    fn nested<T>(
        &mut self,
        segment: Segment,
        op: impl FnOnce(&mut Self) -> Result<T, DecodeError>
    ) -> Result<T, DecodeError> {
        self.path.push(segment.clone());
        let res = op(self);
        self.path.pop();
        res.map_err(|err| err.within(segment))
    }

    /// Returns the octets as a bytes value sharing the source.
    fn share(&self, octets: &[u8]) -> Bytes {
        if octets.is_empty() {
            Bytes::new()
        }
        else {
            self.source.slice_ref(octets)
        }
    }

    /// Decodes an element whose outermost tag matches the schema.
    fn decode_element(
        &mut self, schema: &Schema, element: Element<'s>
    ) -> Result<Value, DecodeError> {
        if self.depth >= self.max_depth {
            return Err(DecodeErrorKind::NestingTooDeep(self.max_depth).into())
        }
        self.depth += 1;
        let res = self.decode_tagged(schema, element);
        self.depth -= 1;
        res
    }

    /// Removes the explicit tags and decodes the remaining element.
    fn decode_tagged(
        &mut self, schema: &Schema, mut element: Element<'s>
    ) -> Result<Value, DecodeError> {
        trace!("decoding {} at '{}'", schema, self.path);
        let explicit = schema.explicit_tags();
        for (i, tag) in explicit.iter().enumerate() {
            if i > 0 && !tag.matches(element.tag()) {
                return Err(DecodeErrorKind::TagMismatch {
                    expected: tag.to_string(), found: element.tag()
                }.into())
            }
            if i + 1 == explicit.len() && matches!(schema.kind(), Kind::Any) {
                return Ok(Value::Bytes(self.share(element.content())))
            }
            let content = element.content();
            let inner = self.take_element(content)?;
            if self.mode.is_strict() && inner.consumed() < content.len() {
                return Err(DecodeErrorKind::TrailingData(
                    content.len() - inner.consumed()
                ).into())
            }
            element = inner;
        }
        if !explicit.is_empty()
            && !schema.identifier_tag().matches(element.tag())
        {
            return Err(DecodeErrorKind::TagMismatch {
                expected: schema.identifier_tag().to_string(),
                found: element.tag()
            }.into())
        }
        self.decode_content(schema, element)
    }

    /// Decodes the content of an element according to the schema’s kind.
    fn decode_content(
        &mut self, schema: &Schema, element: Element<'s>
    ) -> Result<Value, DecodeError> {
        let content = element.content();
        match schema.kind() {
            Kind::Boolean => {
                match content {
                    [octet] => Ok(Value::Bool(*octet != 0)),
                    _ => Err(DecodeErrorKind::InvalidLength {
                        what: "boolean", found: content.len()
                    }.into())
                }
            }
            Kind::Integer { range } => {
                let value = int::from_content(content)?;
                if !range.contains(value) {
                    return Err(DecodeErrorKind::ConstraintViolation {
                        value, bounds: *range
                    }.into())
                }
                Ok(Value::Int(value))
            }
            Kind::Enumerated { values } => {
                let value = int::from_content(content)?;
                match values.name(value) {
                    Some(name) => Ok(Value::Text(name.into())),
                    None => Ok(Value::Int(value)),
                }
            }
            Kind::Real => Ok(Value::Bytes(self.share(content))),
            Kind::BitString { positions } => {
                if element.tag().is_constructed() {
                    return Err(DecodeErrorKind::NotImplemented(
                        "constructed bit string"
                    ).into())
                }
                Ok(bit::from_content(positions, content)?)
            }
            Kind::OctetString { flavor, size } => {
                let octets = if element.tag().is_constructed() {
                    let mut octets = BytesMut::new();
                    octet::append_fragments(
                        content, self.depth, self.max_depth, &mut octets
                    )?;
                    octets.freeze()
                }
                else {
                    self.share(content)
                };
                Ok(octet::from_octets(*flavor, *size, octets)?)
            }
            Kind::Null => {
                if !content.is_empty() {
                    return Err(DecodeErrorKind::UnexpectedContent {
                        what: "null"
                    }.into())
                }
                Ok(Value::Null)
            }
            Kind::ObjectIdentifier => {
                Ok(Value::ObjectId(oid::from_content(content)?))
            }
            Kind::Any => {
                let mut res = Vec::with_capacity(content.len() + 8);
                element.tag().append_encoded(None, &mut res);
                Length::Definite(content.len()).append_encoded(&mut res);
                res.extend_from_slice(content);
                Ok(Value::Bytes(res.into()))
            }
            Kind::Sequence { fields } | Kind::External { fields } => {
                self.decode_fields(fields, content, true)
            }
            Kind::Set { fields } => self.decode_fields(fields, content, false),
            Kind::SequenceOf { element } | Kind::SetOf { element } => {
                self.decode_list(element, content)
            }
            Kind::Choice { alternatives } => {
                self.decode_choice(alternatives, element)
            }
        }
    }

    /// Decodes the content of a sequence or set.
    ///
    /// If `ordered` is true, each element is matched against the fields
    /// following the last decoded field. Otherwise it is matched against
    /// all fields not yet decoded.
    fn decode_fields(
        &mut self, fields: &[Field], content: &'s [u8], ordered: bool
    ) -> Result<Value, DecodeError> {
        let mut values: Vec<Option<Value>> = vec![None; fields.len()];
        let mut next = 0;
        let mut pos = 0;
        while pos < content.len() {
            let element = self.take_element(&content[pos..])?;
            pos += element.consumed();
            let tag = element.tag();
            let found = if ordered {
                fields[next..].iter().position(|field| {
                    field.schema().matches(tag)
                }).map(|idx| idx + next)
            }
            else {
                fields.iter().zip(&values).position(|(field, value)| {
                    value.is_none() && field.schema().matches(tag)
                })
            };
            match found {
                Some(idx) => {
                    let field = &fields[idx];
                    let value = self.nested(field.name().into(), |this| {
                        this.decode_element(field.schema(), element)
                    })?;
                    values[idx] = Some(value);
                    next = idx + 1;
                }
                None => self.unmatched(fields, &values, tag, ordered)?,
            }
        }

        let mut res = Record::new();
        for (field, value) in fields.iter().zip(values) {
            match value {
                Some(value) => {
                    res.insert(field.name(), value);
                }
                None => {
                    if let Some(default) = field.default() {
                        debug!(
                            "using default for '{}' at '{}'",
                            field.name(), self.path
                        );
                        if let Some(observer) = self.observer {
                            observer.defaulted(&self.path, field.name());
                        }
                        res.insert(field.name(), default.clone());
                    }
                    else if !field.is_optional() {
                        return Err(DecodeErrorKind::MissingMandatoryField(
                            field.name().into()
                        ).into())
                    }
                }
            }
        }
        Ok(Value::Record(res))
    }

    /// Deals with an element that matches none of the remaining fields.
    ///
    /// In a sequence, lenient mode skips the element even if it matches a
    /// field decoded earlier. A set or strict mode reports such an element
    /// as a duplicate.
    fn unmatched(
        &self,
        fields: &[Field],
        values: &[Option<Value>],
        tag: Tag,
        ordered: bool,
    ) -> Result<(), DecodeError> {
        if !ordered || self.mode.is_strict() {
            let duplicate = fields.iter().zip(values).find(|(field, value)| {
                value.is_some() && field.schema().matches(tag)
            });
            if let Some((field, _)) = duplicate {
                return Err(
                    DecodeErrorKind::DuplicateField(field.name().into())
                        .into()
                )
            }
        }
        if self.mode.is_strict() {
            return Err(DecodeErrorKind::UnexpectedElement(tag).into())
        }
        debug!("skipping unexpected {} at '{}'", tag, self.path);
        if let Some(observer) = self.observer {
            observer.skipped(&self.path, tag);
        }
        Ok(())
    }

    /// Decodes the content of a sequence of or set of.
    fn decode_list(
        &mut self, schema: &Schema, content: &'s [u8]
    ) -> Result<Value, DecodeError> {
        let mut res = Vec::new();
        let mut pos = 0;
        while pos < content.len() {
            let index = res.len();
            let element = self.take_element(&content[pos..]).map_err(|err| {
                err.within(index)
            })?;
            pos += element.consumed();
            if !schema.matches(element.tag()) {
                return Err(DecodeError::from(
                    DecodeErrorKind::UnexpectedElement(element.tag())
                ).within(index))
            }
            res.push(self.nested(index.into(), |this| {
                this.decode_element(schema, element)
            })?);
        }
        Ok(Value::List(res))
    }

    /// Decodes an element as the alternative of a choice it matches.
    fn decode_choice(
        &mut self, alternatives: &[Alternative], element: Element<'s>
    ) -> Result<Value, DecodeError> {
        let alternative = alternatives.iter().find(|alternative| {
            alternative.schema().matches(element.tag())
        });
        let alternative = match alternative {
            Some(alternative) => alternative,
            None => {
                return Err(
                    DecodeErrorKind::UnsupportedChoice(element.tag()).into()
                )
            }
        };
        let value = self.nested(alternative.name().into(), |this| {
            this.decode_element(alternative.schema(), element)
        })?;
        Ok(Value::Choice(alternative.name().into(), Box::new(value)))
    }
}
