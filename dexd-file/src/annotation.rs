//! Annotations and the per-class annotation directory.

use std::fmt;

use crate::error::{Error, Result};
use crate::leb128::{decode_uleb128, encode_uleb128};
use crate::value::{EncodedValue, MAX_NESTING};

/// Retention of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Build,
    Runtime,
    System,
}

impl Visibility {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Self::Build),
            0x01 => Some(Self::Runtime),
            0x02 => Some(Self::System),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::Build => 0x00,
            Self::Runtime => 0x01,
            Self::System => 0x02,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Runtime => "runtime",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `name = value` pair of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationElement {
    pub name_idx: u32,
    pub value: EncodedValue,
}

/// An annotation body without visibility: its type and elements. Also the
/// payload of an annotation-typed [`EncodedValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedAnnotation {
    pub type_idx: u32,
    pub elements: Vec<AnnotationElement>,
}

impl EncodedAnnotation {
    pub fn new(type_idx: u32) -> Self {
        Self {
            type_idx,
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, name_idx: u32, value: EncodedValue) -> Self {
        self.elements.push(AnnotationElement { name_idx, value });
        self
    }

    /// Returns (annotation, bytes_consumed).
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        Self::parse_nested(data, offset, 0)
    }

    pub(crate) fn parse_nested(data: &[u8], offset: usize, depth: usize) -> Result<(Self, usize)> {
        if depth > MAX_NESTING {
            return Err(Error::NestingTooDeep(offset));
        }
        let mut pos = offset;
        let (type_idx, len) = decode_uleb128(data, pos)?;
        pos += len;
        let (size, len) = decode_uleb128(data, pos)?;
        pos += len;

        let mut elements = Vec::with_capacity((size as usize).min(data.len()));
        for _ in 0..size {
            let (name_idx, len) = decode_uleb128(data, pos)?;
            pos += len;
            let (value, len) = EncodedValue::parse_nested(data, pos, depth)?;
            pos += len;
            elements.push(AnnotationElement { name_idx, value });
        }
        Ok((Self { type_idx, elements }, pos - offset))
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        encode_uleb128(self.type_idx, out);
        encode_uleb128(self.elements.len() as u32, out);
        for element in &self.elements {
            encode_uleb128(element.name_idx, out);
            element.value.encode(out);
        }
    }
}

/// `annotation_item`: visibility plus body.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub visibility: Visibility,
    pub annotation: EncodedAnnotation,
}

impl Annotation {
    pub fn new(visibility: Visibility, annotation: EncodedAnnotation) -> Self {
        Self {
            visibility,
            annotation,
        }
    }

    /// Returns (annotation, bytes_consumed).
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let byte = *data
            .get(offset)
            .ok_or(Error::OffsetOutOfBounds(offset, data.len()))?;
        let visibility = Visibility::from_byte(byte).ok_or(Error::InvalidVisibility(byte, offset))?;
        let (annotation, len) = EncodedAnnotation::parse(data, offset + 1)?;
        Ok((Self::new(visibility, annotation), 1 + len))
    }
}

/// Annotations attached to one item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationSet {
    pub annotations: Vec<Annotation>,
}

impl AnnotationSet {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

/// Per-parameter annotation sets of one method; a parameter without
/// annotations has no set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationSetRefList {
    pub sets: Vec<Option<AnnotationSet>>,
}

impl AnnotationSetRefList {
    pub fn new(sets: Vec<Option<AnnotationSet>>) -> Self {
        Self { sets }
    }

    /// The set for parameter `index`, if that parameter is annotated.
    pub fn get(&self, index: usize) -> Option<&AnnotationSet> {
        self.sets.get(index).and_then(Option::as_ref)
    }
}

/// `annotations_directory_item` of a class.
///
/// Field and method associations are keyed by pool index (the Member
/// Index) and kept in the order the directory lists them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationDirectory {
    pub class_annotations: Option<AnnotationSet>,
    pub field_annotations: Vec<(u32, AnnotationSet)>,
    pub method_annotations: Vec<(u32, AnnotationSet)>,
    pub parameter_annotations: Vec<(u32, AnnotationSetRefList)>,
}

impl AnnotationDirectory {
    pub fn field_annotation_count(&self) -> usize {
        self.field_annotations.len()
    }

    pub fn method_annotation_count(&self) -> usize {
        self.method_annotations.len()
    }

    pub fn parameter_annotation_count(&self) -> usize {
        self.parameter_annotations.len()
    }

    pub fn iter_field_annotations(&self) -> impl Iterator<Item = (u32, &AnnotationSet)> {
        self.field_annotations.iter().map(|(idx, set)| (*idx, set))
    }

    pub fn iter_method_annotations(&self) -> impl Iterator<Item = (u32, &AnnotationSet)> {
        self.method_annotations.iter().map(|(idx, set)| (*idx, set))
    }

    pub fn iter_parameter_annotations(
        &self,
    ) -> impl Iterator<Item = (u32, &AnnotationSetRefList)> {
        self.parameter_annotations
            .iter()
            .map(|(idx, list)| (*idx, list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_annotation_item() {
        // runtime, type 3, one element: name 4 = int 9
        let bytes = [0x01, 0x03, 0x01, 0x04, 0x04, 0x09];
        let (annotation, len) = Annotation::parse(&bytes, 0).unwrap();
        assert_eq!(len, bytes.len());
        assert_eq!(annotation.visibility, Visibility::Runtime);
        assert_eq!(
            annotation.annotation,
            EncodedAnnotation::new(3).with_element(4, EncodedValue::Int(9))
        );
    }

    #[test]
    fn parse_rejects_unknown_visibility() {
        assert_eq!(
            Annotation::parse(&[0x07, 0x00, 0x00], 0),
            Err(Error::InvalidVisibility(0x07, 0))
        );
    }

    #[test]
    fn encode_matches_parse() {
        let annotation = EncodedAnnotation::new(200)
            .with_element(1, EncodedValue::Boolean(true))
            .with_element(2, EncodedValue::Array(vec![EncodedValue::Type(5)]));
        let mut out = Vec::new();
        annotation.encode(&mut out);
        assert_eq!(EncodedAnnotation::parse(&out, 0).unwrap(), (annotation, out.len()));
    }
}
