//! In-memory assembly of a [`DexFile`].
//!
//! Every `intern_*` call returns the pool index of the item, adding it on
//! first use. Indices are assigned densely in insertion order.

use std::collections::HashMap;

use crate::DexFile;
use crate::class::ClassDef;
use crate::pool::{FieldId, MethodId, ProtoId, shorty};

#[derive(Debug, Default)]
pub struct DexBuilder {
    strings: Vec<String>,
    string_ids: HashMap<String, u32>,
    types: Vec<u32>,
    type_ids: HashMap<u32, u32>,
    protos: Vec<ProtoId>,
    proto_ids: HashMap<ProtoId, u32>,
    fields: Vec<FieldId>,
    field_ids: HashMap<FieldId, u32>,
    methods: Vec<MethodId>,
    method_ids: HashMap<MethodId, u32>,
    classes: Vec<ClassDef>,
}

fn intern<K: Clone + Eq + std::hash::Hash>(
    pool: &mut Vec<K>,
    ids: &mut HashMap<K, u32>,
    key: K,
) -> u32 {
    if let Some(&idx) = ids.get(&key) {
        return idx;
    }
    let idx = pool.len() as u32;
    pool.push(key.clone());
    ids.insert(key, idx);
    idx
}

impl DexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern_string(&mut self, value: &str) -> u32 {
        intern(&mut self.strings, &mut self.string_ids, value.to_owned())
    }

    /// Intern a type by descriptor, e.g. `Ljava/lang/Object;` or `[I`.
    pub fn intern_type(&mut self, descriptor: &str) -> u32 {
        let string_idx = self.intern_string(descriptor);
        intern(&mut self.types, &mut self.type_ids, string_idx)
    }

    pub fn intern_proto(&mut self, return_type: &str, parameters: &[&str]) -> u32 {
        let shorty_idx = self.intern_string(&shorty(return_type, parameters));
        let return_type_idx = self.intern_type(return_type);
        let parameters = parameters.iter().map(|p| self.intern_type(p)).collect();
        let proto = ProtoId {
            shorty_idx,
            return_type_idx,
            parameters,
        };
        intern(&mut self.protos, &mut self.proto_ids, proto)
    }

    pub fn intern_field(&mut self, class: &str, name: &str, field_type: &str) -> u32 {
        let field = FieldId {
            class_idx: self.intern_type(class),
            type_idx: self.intern_type(field_type),
            name_idx: self.intern_string(name),
        };
        intern(&mut self.fields, &mut self.field_ids, field)
    }

    pub fn intern_method(
        &mut self,
        class: &str,
        name: &str,
        return_type: &str,
        parameters: &[&str],
    ) -> u32 {
        let method = MethodId {
            class_idx: self.intern_type(class),
            proto_idx: self.intern_proto(return_type, parameters),
            name_idx: self.intern_string(name),
        };
        intern(&mut self.methods, &mut self.method_ids, method)
    }

    /// Append a class definition; returns its position in the file.
    pub fn add_class(&mut self, class: ClassDef) -> usize {
        self.classes.push(class);
        self.classes.len() - 1
    }

    pub fn build(self) -> DexFile {
        log::debug!(
            "built dex: {} strings, {} types, {} protos, {} fields, {} methods, {} classes",
            self.strings.len(),
            self.types.len(),
            self.protos.len(),
            self.fields.len(),
            self.methods.len(),
            self.classes.len()
        );
        DexFile {
            strings: self.strings,
            types: self.types,
            protos: self.protos,
            fields: self.fields,
            methods: self.methods,
            classes: self.classes,
        }
    }
}
