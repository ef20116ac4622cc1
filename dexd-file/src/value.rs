//! Encoded constant values (`encoded_value` / `encoded_array`).
//!
//! Binary form: a header byte `(arg << 5) | type` followed by `arg + 1`
//! little-endian payload bytes for the sized kinds. Signed integers are
//! sign-extended, characters and pool indices zero-extended, and floating
//! point values are zero-extended on the right (the stored bytes are the
//! most significant ones).

use crate::annotation::EncodedAnnotation;
use crate::error::{Error, Result};
use crate::leb128::{decode_uleb128, encode_uleb128};

/// Deepest array or annotation nesting accepted by the parsers.
pub const MAX_NESTING: usize = 64;

/// Value type tags, the low five bits of the header byte.
pub mod value_type {
    pub const BYTE: u8 = 0x00;
    pub const SHORT: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const INT: u8 = 0x04;
    pub const LONG: u8 = 0x06;
    pub const FLOAT: u8 = 0x10;
    pub const DOUBLE: u8 = 0x11;
    pub const METHOD_TYPE: u8 = 0x15;
    pub const METHOD_HANDLE: u8 = 0x16;
    pub const STRING: u8 = 0x17;
    pub const TYPE: u8 = 0x18;
    pub const FIELD: u8 = 0x19;
    pub const METHOD: u8 = 0x1a;
    pub const ENUM: u8 = 0x1b;
    pub const ARRAY: u8 = 0x1c;
    pub const ANNOTATION: u8 = 0x1d;
    pub const NULL: u8 = 0x1e;
    pub const BOOLEAN: u8 = 0x1f;
}

/// A constant: a static field initializer or an annotation element value.
/// Pool references are kept as indices.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedValue {
    Byte(i8),
    Short(i16),
    Char(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    MethodType(u32),
    MethodHandle(u32),
    String(u32),
    Type(u32),
    Field(u32),
    Method(u32),
    Enum(u32),
    Array(Vec<EncodedValue>),
    Annotation(EncodedAnnotation),
    Null,
    Boolean(bool),
}

impl EncodedValue {
    pub fn value_type(&self) -> u8 {
        use value_type::*;
        match self {
            Self::Byte(_) => BYTE,
            Self::Short(_) => SHORT,
            Self::Char(_) => CHAR,
            Self::Int(_) => INT,
            Self::Long(_) => LONG,
            Self::Float(_) => FLOAT,
            Self::Double(_) => DOUBLE,
            Self::MethodType(_) => METHOD_TYPE,
            Self::MethodHandle(_) => METHOD_HANDLE,
            Self::String(_) => STRING,
            Self::Type(_) => TYPE,
            Self::Field(_) => FIELD,
            Self::Method(_) => METHOD,
            Self::Enum(_) => ENUM,
            Self::Array(_) => ARRAY,
            Self::Annotation(_) => ANNOTATION,
            Self::Null => NULL,
            Self::Boolean(_) => BOOLEAN,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Parse one value at `offset`. Returns (value, bytes_consumed).
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        Self::parse_nested(data, offset, 0)
    }

    /// `depth` counts the arrays and annotations enclosing `offset`.
    pub(crate) fn parse_nested(data: &[u8], offset: usize, depth: usize) -> Result<(Self, usize)> {
        use value_type::*;

        let header = *data
            .get(offset)
            .ok_or(Error::OffsetOutOfBounds(offset, data.len()))?;
        let ty = header & 0x1f;
        let arg = header >> 5;
        let bad_arg = || Error::InvalidValueArg {
            value_type: ty,
            arg,
            offset,
        };
        let max_arg = |max: u8| if arg > max { Err(bad_arg()) } else { Ok(()) };
        let body = offset + 1;
        let size = arg as usize + 1;

        let value = match ty {
            BYTE => {
                max_arg(0)?;
                Self::Byte(read_signed(data, body, size)? as i8)
            }
            SHORT => {
                max_arg(1)?;
                Self::Short(read_signed(data, body, size)? as i16)
            }
            CHAR => {
                max_arg(1)?;
                Self::Char(read_unsigned(data, body, size)? as u16)
            }
            INT => {
                max_arg(3)?;
                Self::Int(read_signed(data, body, size)? as i32)
            }
            LONG => {
                max_arg(7)?;
                Self::Long(read_signed(data, body, size)?)
            }
            FLOAT => {
                max_arg(3)?;
                let raw = read_unsigned(data, body, size)? << ((4 - size) * 8);
                Self::Float(f32::from_bits(raw as u32))
            }
            DOUBLE => {
                max_arg(7)?;
                let raw = read_unsigned(data, body, size)? << ((8 - size) * 8);
                Self::Double(f64::from_bits(raw))
            }
            METHOD_TYPE | METHOD_HANDLE | STRING | TYPE | FIELD | METHOD | ENUM => {
                max_arg(3)?;
                let index = read_unsigned(data, body, size)? as u32;
                match ty {
                    METHOD_TYPE => Self::MethodType(index),
                    METHOD_HANDLE => Self::MethodHandle(index),
                    STRING => Self::String(index),
                    TYPE => Self::Type(index),
                    FIELD => Self::Field(index),
                    METHOD => Self::Method(index),
                    _ => Self::Enum(index),
                }
            }
            ARRAY => {
                max_arg(0)?;
                let (values, len) = parse_array_nested(data, body, depth + 1)?;
                return Ok((Self::Array(values), 1 + len));
            }
            ANNOTATION => {
                max_arg(0)?;
                let (annotation, len) = EncodedAnnotation::parse_nested(data, body, depth + 1)?;
                return Ok((Self::Annotation(annotation), 1 + len));
            }
            NULL => {
                max_arg(0)?;
                return Ok((Self::Null, 1));
            }
            BOOLEAN => {
                max_arg(1)?;
                return Ok((Self::Boolean(arg == 1), 1));
            }
            _ => return Err(Error::InvalidValueType(ty, offset)),
        };
        Ok((value, 1 + size))
    }

    /// Append the minimal-width binary form.
    pub fn encode(&self, out: &mut Vec<u8>) {
        let ty = self.value_type();
        match self {
            Self::Byte(v) => write_sized(out, ty, &[*v as u8]),
            Self::Short(v) => write_sized(out, ty, &signed_bytes(*v as i64, 2)),
            Self::Char(v) => write_sized(out, ty, &unsigned_bytes(*v as u64, 2)),
            Self::Int(v) => write_sized(out, ty, &signed_bytes(*v as i64, 4)),
            Self::Long(v) => write_sized(out, ty, &signed_bytes(*v, 8)),
            Self::Float(v) => write_sized(out, ty, &right_trimmed(&v.to_bits().to_le_bytes())),
            Self::Double(v) => write_sized(out, ty, &right_trimmed(&v.to_bits().to_le_bytes())),
            Self::MethodType(i)
            | Self::MethodHandle(i)
            | Self::String(i)
            | Self::Type(i)
            | Self::Field(i)
            | Self::Method(i)
            | Self::Enum(i) => write_sized(out, ty, &unsigned_bytes(*i as u64, 4)),
            Self::Array(values) => {
                out.push(ty);
                encode_encoded_array(values, out);
            }
            Self::Annotation(annotation) => {
                out.push(ty);
                annotation.encode(out);
            }
            Self::Null => out.push(ty),
            Self::Boolean(b) => out.push(((*b as u8) << 5) | ty),
        }
    }
}

/// Parse an `encoded_array`: ULEB128 count followed by that many values.
/// Returns (values, bytes_consumed).
pub fn parse_encoded_array(data: &[u8], offset: usize) -> Result<(Vec<EncodedValue>, usize)> {
    parse_array_nested(data, offset, 0)
}

fn parse_array_nested(
    data: &[u8],
    offset: usize,
    depth: usize,
) -> Result<(Vec<EncodedValue>, usize)> {
    if depth > MAX_NESTING {
        return Err(Error::NestingTooDeep(offset));
    }
    let (count, mut pos) = decode_uleb128(data, offset)?;
    pos += offset;
    let mut values = Vec::with_capacity((count as usize).min(data.len()));
    for _ in 0..count {
        let (value, len) = EncodedValue::parse_nested(data, pos, depth)?;
        values.push(value);
        pos += len;
    }
    Ok((values, pos - offset))
}

pub fn encode_encoded_array(values: &[EncodedValue], out: &mut Vec<u8>) {
    encode_uleb128(values.len() as u32, out);
    for value in values {
        value.encode(out);
    }
}

fn payload(data: &[u8], offset: usize, size: usize) -> Result<&[u8]> {
    data.get(offset..offset + size)
        .ok_or(Error::OffsetOutOfBounds(offset + size, data.len()))
}

fn read_unsigned(data: &[u8], offset: usize, size: usize) -> Result<u64> {
    let bytes = payload(data, offset, size)?;
    Ok(bytes
        .iter()
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | b as u64))
}

fn read_signed(data: &[u8], offset: usize, size: usize) -> Result<i64> {
    let raw = read_unsigned(data, offset, size)?;
    let shift = 64 - size as u32 * 8;
    Ok(((raw << shift) as i64) >> shift)
}

fn write_sized(out: &mut Vec<u8>, ty: u8, bytes: &[u8]) {
    out.push(((bytes.len() as u8 - 1) << 5) | ty);
    out.extend_from_slice(bytes);
}

/// Little-endian bytes of a signed value, trimmed to the fewest bytes that
/// still sign-extend back to it.
fn signed_bytes(value: i64, max: usize) -> Vec<u8> {
    let bytes = value.to_le_bytes();
    let mut len = max;
    while len > 1 {
        let top = bytes[len - 1];
        let next_sign = bytes[len - 2] & 0x80;
        if (top == 0x00 && next_sign == 0) || (top == 0xff && next_sign != 0) {
            len -= 1;
        } else {
            break;
        }
    }
    bytes[..len].to_vec()
}

fn unsigned_bytes(value: u64, max: usize) -> Vec<u8> {
    let bytes = value.to_le_bytes();
    let len = bytes[..max].iter().rposition(|&b| b != 0).map_or(1, |i| i + 1);
    bytes[..len].to_vec()
}

/// Drops low-order zero bytes; the reader shifts the rest back up.
fn right_trimmed(bytes: &[u8]) -> Vec<u8> {
    let start = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    bytes[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(bytes: &[u8]) -> EncodedValue {
        let (value, len) = EncodedValue::parse(bytes, 0).unwrap();
        assert_eq!(len, bytes.len());
        value
    }

    #[test]
    fn signed_integers_are_sign_extended() {
        assert_eq!(parse_one(&[0x00, 0xff]), EncodedValue::Byte(-1));
        assert_eq!(parse_one(&[0x04, 0x80]), EncodedValue::Int(-128));
        assert_eq!(parse_one(&[0x24, 0x80, 0x00]), EncodedValue::Int(128));
        assert_eq!(parse_one(&[0x26, 0xfe, 0xff]), EncodedValue::Long(-2));
    }

    #[test]
    fn char_and_indices_are_zero_extended() {
        assert_eq!(parse_one(&[0x03, 0xff]), EncodedValue::Char(0xff));
        assert_eq!(parse_one(&[0x37, 0x01, 0x80]), EncodedValue::String(0x8001));
    }

    #[test]
    fn floats_are_right_zero_extended() {
        // 1.0f32 is 0x3f800000; only the top byte pair is stored.
        assert_eq!(parse_one(&[0x30, 0x80, 0x3f]), EncodedValue::Float(1.0));
        assert_eq!(parse_one(&[0x11, 0x40]), EncodedValue::Double(2.0));
    }

    #[test]
    fn argument_only_values() {
        assert_eq!(parse_one(&[0x1e]), EncodedValue::Null);
        assert_eq!(parse_one(&[0x3f]), EncodedValue::Boolean(true));
        assert_eq!(parse_one(&[0x1f]), EncodedValue::Boolean(false));
    }

    #[test]
    fn nested_array() {
        let value = parse_one(&[0x1c, 0x02, 0x04, 0x07, 0x1e]);
        assert_eq!(
            value,
            EncodedValue::Array(vec![EncodedValue::Int(7), EncodedValue::Null])
        );
    }

    fn nested_arrays(depth: usize) -> Vec<u8> {
        let mut bytes = [0x1c, 0x01].repeat(depth);
        bytes.push(0x1e);
        bytes
    }

    #[test]
    fn nesting_is_capped() {
        let ok = nested_arrays(MAX_NESTING);
        assert_eq!(EncodedValue::parse(&ok, 0).unwrap().1, ok.len());

        let deep = nested_arrays(MAX_NESTING + 1);
        assert_eq!(
            EncodedValue::parse(&deep, 0),
            Err(Error::NestingTooDeep(2 * MAX_NESTING + 1))
        );
    }

    #[test]
    fn nesting_counts_annotations() {
        // annotation type 0 with one element named 0, wrapping the next level
        let mut bytes = [0x1d, 0x00, 0x01, 0x00].repeat(MAX_NESTING + 1);
        bytes.push(0x1e);
        assert!(matches!(
            EncodedValue::parse(&bytes, 0),
            Err(Error::NestingTooDeep(_))
        ));
    }

    #[test]
    fn rejects_bad_headers() {
        assert_eq!(
            EncodedValue::parse(&[0x05], 0),
            Err(Error::InvalidValueType(0x05, 0))
        );
        assert!(matches!(
            EncodedValue::parse(&[0x20, 0x00, 0x00], 0),
            Err(Error::InvalidValueArg { value_type: 0, arg: 1, .. })
        ));
        assert!(matches!(
            EncodedValue::parse(&[0x64, 0x00], 0),
            Err(Error::OffsetOutOfBounds(..))
        ));
    }

    #[test]
    fn encoding_is_minimal() {
        let cases = [
            (EncodedValue::Int(-1), vec![0x04, 0xff]),
            (EncodedValue::Int(128), vec![0x24, 0x80, 0x00]),
            (EncodedValue::Char(0x41), vec![0x03, 0x41]),
            (EncodedValue::Float(1.0), vec![0x30, 0x80, 0x3f]),
            (EncodedValue::Boolean(true), vec![0x3f]),
        ];
        for (value, expected) in cases {
            let mut out = Vec::new();
            value.encode(&mut out);
            assert_eq!(out, expected, "{value:?}");
            assert_eq!(parse_one(&out), value);
        }
    }
}
