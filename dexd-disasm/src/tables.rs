use std::collections::BTreeMap;

use dexd_file::annotation::{AnnotationDirectory, AnnotationSet, AnnotationSetRefList};

/// Annotation lookups of one class, keyed by Member Index.
///
/// Entries borrow from the directory; an absent directory gives three
/// empty tables.
#[derive(Debug, Clone, Default)]
pub struct AnnotationTables<'a> {
    methods: BTreeMap<u32, &'a AnnotationSet>,
    fields: BTreeMap<u32, &'a AnnotationSet>,
    parameters: BTreeMap<u32, &'a AnnotationSetRefList>,
}

impl<'a> AnnotationTables<'a> {
    pub fn build(directory: Option<&'a AnnotationDirectory>) -> Self {
        let Some(directory) = directory else {
            return Self::default();
        };

        let tables = Self {
            methods: directory.iter_method_annotations().collect(),
            fields: directory.iter_field_annotations().collect(),
            parameters: directory.iter_parameter_annotations().collect(),
        };
        log::debug!(
            "annotation tables: {} method, {} field, {} parameter entries",
            tables.methods.len(),
            tables.fields.len(),
            tables.parameters.len()
        );
        tables
    }

    pub fn method(&self, method_idx: u32) -> Option<&'a AnnotationSet> {
        self.methods.get(&method_idx).copied()
    }

    pub fn field(&self, field_idx: u32) -> Option<&'a AnnotationSet> {
        self.fields.get(&field_idx).copied()
    }

    pub fn parameters(&self, method_idx: u32) -> Option<&'a AnnotationSetRefList> {
        self.parameters.get(&method_idx).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.fields.is_empty() && self.parameters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use dexd_file::annotation::{Annotation, EncodedAnnotation, Visibility};

    use super::*;

    fn set(type_idx: u32) -> AnnotationSet {
        AnnotationSet::new(vec![Annotation::new(
            Visibility::Runtime,
            EncodedAnnotation::new(type_idx),
        )])
    }

    #[test]
    fn absent_directory_gives_empty_tables() {
        let tables = AnnotationTables::build(None);
        assert!(tables.is_empty());
        for idx in [0, 1, 7, u32::MAX] {
            assert!(tables.method(idx).is_none());
            assert!(tables.field(idx).is_none());
            assert!(tables.parameters(idx).is_none());
        }
    }

    #[test]
    fn entries_are_keyed_by_member_index() {
        let directory = AnnotationDirectory {
            class_annotations: None,
            field_annotations: vec![(4, set(1))],
            method_annotations: vec![(9, set(2)), (2, set(3))],
            parameter_annotations: vec![(9, AnnotationSetRefList::new(vec![None, Some(set(5))]))],
        };
        let tables = AnnotationTables::build(Some(&directory));

        assert_eq!(tables.field(4), Some(&directory.field_annotations[0].1));
        assert_eq!(tables.method(2), Some(&directory.method_annotations[1].1));
        assert!(tables.method(4).is_none());
        let params = tables.parameters(9).unwrap();
        assert!(params.get(0).is_none());
        assert!(params.get(1).is_some());
    }
}
