//! Class definitions and class data.

use crate::access::AccessFlags;
use crate::annotation::AnnotationDirectory;
use crate::code::CodeItem;
use crate::value::EncodedValue;

/// A field declared by a class: its field-pool index and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedField {
    pub field_idx: u32,
    pub access_flags: AccessFlags,
}

impl EncodedField {
    pub fn new(field_idx: u32, access_flags: AccessFlags) -> Self {
        Self {
            field_idx,
            access_flags,
        }
    }
}

/// A method declared by a class. Abstract and native methods have no code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMethod {
    pub method_idx: u32,
    pub access_flags: AccessFlags,
    pub code: Option<CodeItem>,
}

impl EncodedMethod {
    pub fn new(method_idx: u32, access_flags: AccessFlags, code: Option<CodeItem>) -> Self {
        Self {
            method_idx,
            access_flags,
            code,
        }
    }
}

/// Members of a class, each partition in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassData {
    pub static_fields: Vec<EncodedField>,
    pub instance_fields: Vec<EncodedField>,
    pub direct_methods: Vec<EncodedMethod>,
    pub virtual_methods: Vec<EncodedMethod>,
}

impl ClassData {
    pub fn is_empty(&self) -> bool {
        self.static_fields.is_empty()
            && self.instance_fields.is_empty()
            && self.direct_methods.is_empty()
            && self.virtual_methods.is_empty()
    }
}

/// `class_def_item`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassDef {
    pub class_idx: u32,
    pub access_flags: AccessFlags,
    pub superclass_idx: Option<u32>,
    pub interfaces: Vec<u32>,
    pub source_file_idx: Option<u32>,
    pub annotations: Option<AnnotationDirectory>,
    pub class_data: Option<ClassData>,
    /// Initial values of the leading static fields, positionally aligned.
    pub static_values: Vec<EncodedValue>,
}

impl ClassDef {
    pub fn new(class_idx: u32, access_flags: AccessFlags) -> Self {
        Self {
            class_idx,
            access_flags,
            ..Self::default()
        }
    }

    /// Initializer of the static field at `position`, if the sequence is
    /// long enough to cover it.
    pub fn static_value(&self, position: usize) -> Option<&EncodedValue> {
        self.static_values.get(position)
    }
}
