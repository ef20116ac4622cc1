//! Constant-pool id items.
//!
//! Every cross-reference in class metadata is an index into one of these
//! pools; resolution to text happens through [`DexFile`](crate::DexFile).

use std::fmt;

/// Which pool an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    String,
    Type,
    Proto,
    Field,
    Method,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Type => "type",
            Self::Proto => "proto",
            Self::Field => "field",
            Self::Method => "method",
        })
    }
}

/// Method prototype: return type plus parameter types, all type indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProtoId {
    pub shorty_idx: u32,
    pub return_type_idx: u32,
    pub parameters: Vec<u32>,
}

/// `Lcls;->name:Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId {
    pub class_idx: u32,
    pub type_idx: u32,
    pub name_idx: u32,
}

/// `Lcls;->name(P)R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId {
    pub class_idx: u32,
    pub proto_idx: u32,
    pub name_idx: u32,
}

/// Shorty form of a prototype: one character per type, references as `L`.
pub fn shorty(return_type: &str, parameters: &[&str]) -> String {
    std::iter::once(return_type)
        .chain(parameters.iter().copied())
        .map(|desc| match desc.as_bytes().first() {
            Some(b'[') | Some(b'L') => 'L',
            Some(&c) => c as char,
            None => 'V',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorty_collapses_references() {
        assert_eq!(shorty("V", &[]), "V");
        assert_eq!(shorty("Ljava/lang/String;", &["I", "[B", "J"]), "LILJ");
    }
}
