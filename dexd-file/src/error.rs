use thiserror::Error;

use crate::pool::PoolKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Offset {0:#x} out of bounds (data size: {1:#x})")]
    OffsetOutOfBounds(usize, usize),

    #[error("Invalid LEB128 encoding at offset {0:#x}")]
    InvalidLeb128(usize),

    #[error("Invalid encoded value type {0:#04x} at offset {1:#x}")]
    InvalidValueType(u8, usize),

    #[error("Invalid value argument {arg} for type {value_type:#04x} at offset {offset:#x}")]
    InvalidValueArg {
        value_type: u8,
        arg: u8,
        offset: usize,
    },

    #[error("Encoded value nested too deeply at offset {0:#x}")]
    NestingTooDeep(usize),

    #[error("Invalid annotation visibility {0:#04x} at offset {1:#x}")]
    InvalidVisibility(u8, usize),

    #[error("{kind} index {index} out of range (pool size: {len})")]
    IndexOutOfRange {
        kind: PoolKind,
        index: u32,
        len: usize,
    },

    #[error("Instruction stream rejected: {0}")]
    Encode(#[from] dexd_isa::EncodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
