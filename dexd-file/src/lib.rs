//! Dalvik class metadata: constant pools, class definitions, class data,
//! method bodies, annotations and encoded values.

pub mod access;
pub mod annotation;
pub mod builder;
pub mod class;
pub mod code;
pub mod error;
pub mod leb128;
pub mod pool;
pub mod value;

pub use access::{AccessFlags, AccessKind};
pub use builder::DexBuilder;
pub use error::{Error, Result};

use class::ClassDef;
use pool::{FieldId, MethodId, PoolKind, ProtoId};

/// A set of classes together with the pools their indices refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct DexFile {
    strings: Vec<String>,
    types: Vec<u32>,
    protos: Vec<ProtoId>,
    fields: Vec<FieldId>,
    methods: Vec<MethodId>,
    classes: Vec<ClassDef>,
}

fn lookup<T>(pool: &[T], kind: PoolKind, index: u32) -> Result<&T> {
    pool.get(index as usize).ok_or(Error::IndexOutOfRange {
        kind,
        index,
        len: pool.len(),
    })
}

impl DexFile {
    pub fn builder() -> DexBuilder {
        DexBuilder::new()
    }

    pub fn classes(&self) -> &[ClassDef] {
        &self.classes
    }

    pub fn class(&self, position: usize) -> Option<&ClassDef> {
        self.classes.get(position)
    }

    pub fn string(&self, index: u32) -> Result<&str> {
        lookup(&self.strings, PoolKind::String, index).map(String::as_str)
    }

    pub fn type_descriptor(&self, index: u32) -> Result<&str> {
        let string_idx = *lookup(&self.types, PoolKind::Type, index)?;
        self.string(string_idx)
    }

    pub fn proto_id(&self, index: u32) -> Result<&ProtoId> {
        lookup(&self.protos, PoolKind::Proto, index)
    }

    pub fn field_id(&self, index: u32) -> Result<&FieldId> {
        lookup(&self.fields, PoolKind::Field, index)
    }

    pub fn method_id(&self, index: u32) -> Result<&MethodId> {
        lookup(&self.methods, PoolKind::Method, index)
    }

    pub fn pool_len(&self, kind: PoolKind) -> usize {
        match kind {
            PoolKind::String => self.strings.len(),
            PoolKind::Type => self.types.len(),
            PoolKind::Proto => self.protos.len(),
            PoolKind::Field => self.fields.len(),
            PoolKind::Method => self.methods.len(),
        }
    }

    /// `(P)R` form of a prototype, e.g. `(ILjava/lang/String;)V`.
    pub fn proto_string(&self, index: u32) -> Result<String> {
        let proto = self.proto_id(index)?;
        let mut s = String::from("(");
        for &param in &proto.parameters {
            s.push_str(self.type_descriptor(param)?);
        }
        s.push(')');
        s.push_str(self.type_descriptor(proto.return_type_idx)?);
        Ok(s)
    }

    pub fn field_name(&self, index: u32) -> Result<&str> {
        self.string(self.field_id(index)?.name_idx)
    }

    pub fn field_type(&self, index: u32) -> Result<&str> {
        self.type_descriptor(self.field_id(index)?.type_idx)
    }

    /// `Lcls;->name:Type`.
    pub fn field_string(&self, index: u32) -> Result<String> {
        let field = self.field_id(index)?;
        Ok(format!(
            "{}->{}:{}",
            self.type_descriptor(field.class_idx)?,
            self.string(field.name_idx)?,
            self.type_descriptor(field.type_idx)?
        ))
    }

    pub fn method_name(&self, index: u32) -> Result<&str> {
        self.string(self.method_id(index)?.name_idx)
    }

    /// Parameter type descriptors of a method, in order.
    pub fn method_parameters(&self, index: u32) -> Result<Vec<&str>> {
        let proto = self.proto_id(self.method_id(index)?.proto_idx)?;
        proto
            .parameters
            .iter()
            .map(|&p| self.type_descriptor(p))
            .collect()
    }

    /// `Lcls;->name(P)R`.
    pub fn method_string(&self, index: u32) -> Result<String> {
        let method = self.method_id(index)?;
        Ok(format!(
            "{}->{}{}",
            self.type_descriptor(method.class_idx)?,
            self.string(method.name_idx)?,
            self.proto_string(method.proto_idx)?
        ))
    }
}
