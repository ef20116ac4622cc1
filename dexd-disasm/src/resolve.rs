//! Pool lookups for text output.
//!
//! Outside method bodies a dangling index is not fatal: it renders as
//! `<invalid kind@N>` and is logged.

use std::borrow::Cow;

use dexd_file::pool::PoolKind;
use dexd_file::{DexFile, Result};

fn or_placeholder<'a, T: Into<Cow<'a, str>>>(
    result: Result<T>,
    kind: PoolKind,
    index: u32,
) -> Cow<'a, str> {
    match result {
        Ok(s) => s.into(),
        Err(e) => {
            log::warn!("{e}");
            Cow::Owned(format!("<invalid {kind}@{index}>"))
        }
    }
}

pub fn string(dex: &DexFile, index: u32) -> Cow<'_, str> {
    or_placeholder(dex.string(index), PoolKind::String, index)
}

pub fn type_descriptor(dex: &DexFile, index: u32) -> Cow<'_, str> {
    or_placeholder(dex.type_descriptor(index), PoolKind::Type, index)
}

pub fn field(dex: &DexFile, index: u32) -> Cow<'_, str> {
    or_placeholder(dex.field_string(index), PoolKind::Field, index)
}

pub fn method(dex: &DexFile, index: u32) -> Cow<'_, str> {
    or_placeholder(dex.method_string(index), PoolKind::Method, index)
}

pub fn proto(dex: &DexFile, index: u32) -> Cow<'_, str> {
    or_placeholder(dex.proto_string(index), PoolKind::Proto, index)
}

pub fn field_name(dex: &DexFile, index: u32) -> Cow<'_, str> {
    or_placeholder(dex.field_name(index), PoolKind::Field, index)
}

pub fn field_type(dex: &DexFile, index: u32) -> Cow<'_, str> {
    or_placeholder(dex.field_type(index), PoolKind::Field, index)
}

pub fn method_name(dex: &DexFile, index: u32) -> Cow<'_, str> {
    or_placeholder(dex.method_name(index), PoolKind::Method, index)
}
