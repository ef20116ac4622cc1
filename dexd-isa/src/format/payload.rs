//! Variable-width payload pseudo-instructions.
//!
//! A payload starts with opcode byte `0x00` followed by an ident byte and is
//! referenced from a `packed-switch`, `sparse-switch` or `fill-array-data`
//! instruction through a relative code-unit offset. Payloads must start on an
//! even code-unit address; stream encoding enforces that.

use super::{Format, read_u16, read_u32};
use crate::decoder::DecodeError;
use crate::emitter::EncodeError;
use crate::opcode::Opcode;

fn ensure(buf: &[u8], offset: usize, len: usize) -> Result<(), DecodeError> {
    match offset.checked_add(len) {
        Some(end) if end <= buf.len() => Ok(()),
        _ => Err(DecodeError::Truncated(offset)),
    }
}

fn check_len(format: Format, len: usize, max: usize) -> Result<(), EncodeError> {
    if len > max {
        return Err(EncodeError::PayloadTooLarge { format, len, max });
    }
    Ok(())
}

/// `packed-switch` payload: consecutive keys starting at `first_key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackedSwitchPayload {
    first_key: i32,
    targets: Vec<i32>,
}

impl PackedSwitchPayload {
    pub const FORMAT: Format = Format::PackedSwitchPayload;
    pub const IDENT: u8 = 0x01;

    pub fn new(first_key: i32, targets: Vec<i32>) -> Result<Self, EncodeError> {
        check_len(Self::FORMAT, targets.len(), u16::MAX as usize)?;
        Ok(Self { first_key, targets })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        ensure(buf, offset, 8)?;
        if buf[offset + 1] != Self::IDENT {
            return Err(DecodeError::InvalidPayload(offset));
        }
        let size = read_u16(buf, offset + 2) as usize;
        ensure(buf, offset, 8 + size * 4)?;
        let first_key = read_u32(buf, offset + 4) as i32;
        let targets = (0..size)
            .map(|i| read_u32(buf, offset + 8 + i * 4) as i32)
            .collect();
        Ok(Self { first_key, targets })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0, Self::IDENT]);
        out.extend_from_slice(&(self.targets.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.first_key.to_le_bytes());
        for target in &self.targets {
            out.extend_from_slice(&target.to_le_bytes());
        }
    }

    pub fn opcode(&self) -> Opcode {
        Opcode::Nop
    }

    pub fn format(&self) -> Format {
        Self::FORMAT
    }

    pub fn size_in_code_units(&self) -> usize {
        4 + self.targets.len() * 2
    }

    pub fn first_key(&self) -> i32 {
        self.first_key
    }

    /// Code-unit offsets relative to the referencing switch instruction.
    pub fn targets(&self) -> &[i32] {
        &self.targets
    }

    /// `(key, target)` pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .map(|(i, &t)| (self.first_key.wrapping_add(i as i32), t))
    }
}

/// `sparse-switch` payload: sorted keys, each with its own target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SparseSwitchPayload {
    keys: Vec<i32>,
    targets: Vec<i32>,
}

impl SparseSwitchPayload {
    pub const FORMAT: Format = Format::SparseSwitchPayload;
    pub const IDENT: u8 = 0x02;

    pub fn new(keys: Vec<i32>, targets: Vec<i32>) -> Result<Self, EncodeError> {
        if keys.len() != targets.len() {
            return Err(EncodeError::SwitchLengthMismatch {
                keys: keys.len(),
                targets: targets.len(),
            });
        }
        check_len(Self::FORMAT, keys.len(), u16::MAX as usize)?;
        Ok(Self { keys, targets })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        ensure(buf, offset, 4)?;
        if buf[offset + 1] != Self::IDENT {
            return Err(DecodeError::InvalidPayload(offset));
        }
        let size = read_u16(buf, offset + 2) as usize;
        ensure(buf, offset, 4 + size * 8)?;
        let keys_at = offset + 4;
        let targets_at = keys_at + size * 4;
        let keys = (0..size).map(|i| read_u32(buf, keys_at + i * 4) as i32).collect();
        let targets = (0..size)
            .map(|i| read_u32(buf, targets_at + i * 4) as i32)
            .collect();
        Ok(Self { keys, targets })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0, Self::IDENT]);
        out.extend_from_slice(&(self.keys.len() as u16).to_le_bytes());
        for key in &self.keys {
            out.extend_from_slice(&key.to_le_bytes());
        }
        for target in &self.targets {
            out.extend_from_slice(&target.to_le_bytes());
        }
    }

    pub fn opcode(&self) -> Opcode {
        Opcode::Nop
    }

    pub fn format(&self) -> Format {
        Self::FORMAT
    }

    pub fn size_in_code_units(&self) -> usize {
        2 + self.keys.len() * 4
    }

    pub fn keys(&self) -> &[i32] {
        &self.keys
    }

    pub fn targets(&self) -> &[i32] {
        &self.targets
    }

    pub fn entries(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.keys.iter().copied().zip(self.targets.iter().copied())
    }
}

/// `fill-array-data` payload: `element_width`-byte elements, little-endian.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayPayload {
    element_width: u16,
    data: Vec<u8>,
}

impl ArrayPayload {
    pub const FORMAT: Format = Format::ArrayPayload;
    pub const IDENT: u8 = 0x03;

    /// `data` holds the raw element bytes; its length must be a multiple of
    /// `element_width`, which must be 1, 2, 4 or 8.
    pub fn new(element_width: u16, data: Vec<u8>) -> Result<Self, EncodeError> {
        if !matches!(element_width, 1 | 2 | 4 | 8) {
            return Err(EncodeError::InvalidElementWidth(element_width));
        }
        if data.len() % element_width as usize != 0 {
            return Err(EncodeError::RaggedArrayData {
                len: data.len(),
                element_width,
            });
        }
        check_len(
            Self::FORMAT,
            data.len() / element_width as usize,
            u32::MAX as usize,
        )?;
        Ok(Self {
            element_width,
            data,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        ensure(buf, offset, 8)?;
        if buf[offset + 1] != Self::IDENT {
            return Err(DecodeError::InvalidPayload(offset));
        }
        let element_width = read_u16(buf, offset + 2);
        if !matches!(element_width, 1 | 2 | 4 | 8) {
            return Err(DecodeError::InvalidPayload(offset));
        }
        let count = read_u32(buf, offset + 4) as usize;
        let len = count
            .checked_mul(element_width as usize)
            .ok_or(DecodeError::Truncated(offset))?;
        ensure(buf, offset + 8, len)?;
        Ok(Self {
            element_width,
            data: buf[offset + 8..offset + 8 + len].to_vec(),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0, Self::IDENT]);
        out.extend_from_slice(&self.element_width.to_le_bytes());
        out.extend_from_slice(&(self.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.data);
        if self.data.len() % 2 == 1 {
            out.push(0);
        }
    }

    pub fn opcode(&self) -> Opcode {
        Opcode::Nop
    }

    pub fn format(&self) -> Format {
        Self::FORMAT
    }

    pub fn size_in_code_units(&self) -> usize {
        4 + self.data.len().div_ceil(2)
    }

    pub fn element_width(&self) -> u16 {
        self.element_width
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.element_width as usize
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Elements sign-extended to `i64`.
    pub fn elements(&self) -> impl Iterator<Item = i64> + '_ {
        self.data
            .chunks_exact(self.element_width as usize)
            .map(|chunk| {
                let mut bytes = [0u8; 8];
                bytes[..chunk.len()].copy_from_slice(chunk);
                let shift = 64 - chunk.len() as u32 * 8;
                (i64::from_le_bytes(bytes) << shift) >> shift
            })
    }
}
