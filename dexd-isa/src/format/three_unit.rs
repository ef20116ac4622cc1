//! Three code-unit formats: 32x, 30t, 31t, 31i, 31c, 35c, 3rc.

use super::{Format, check_format, check_index, check_register, read_opcode, read_u16, read_u32};
use crate::decoder::DecodeError;
use crate::emitter::EncodeError;
use crate::opcode::Opcode;

/// `ØØ|op AAAA BBBB`: `op vAAAA, vBBBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction32x {
    opcode: Opcode,
    register_a: u16,
    register_b: u16,
}

impl Instruction32x {
    fixed_format!(Format32x, 3);

    pub fn new(opcode: Opcode, register_a: u32, register_b: u32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 16)? as u16,
            register_b: check_register(Self::FORMAT, "B", register_b, 16)? as u16,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: read_u16(buf, offset + 2),
            register_b: read_u16(buf, offset + 4),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), 0]);
        out.extend_from_slice(&self.register_a.to_le_bytes());
        out.extend_from_slice(&self.register_b.to_le_bytes());
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn register_b(&self) -> u32 {
        self.register_b as u32
    }
}

/// `ØØ|op AAAAlo AAAAhi`: `op +AAAAAAAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction30t {
    opcode: Opcode,
    offset: i32,
}

impl Instruction30t {
    fixed_format!(Format30t, 3);

    pub fn new(opcode: Opcode, offset: i32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self { opcode, offset })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            offset: read_u32(buf, offset + 2) as i32,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), 0]);
        out.extend_from_slice(&self.offset.to_le_bytes());
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

/// `AA|op BBBBlo BBBBhi`: `op vAA, +BBBBBBBB`, a payload reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction31t {
    opcode: Opcode,
    register_a: u8,
    offset: i32,
}

impl Instruction31t {
    fixed_format!(Format31t, 3);

    pub fn new(opcode: Opcode, register_a: u32, offset: i32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 8)? as u8,
            offset,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: buf[offset + 1],
            offset: read_u32(buf, offset + 2) as i32,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), self.register_a]);
        out.extend_from_slice(&self.offset.to_le_bytes());
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

/// `AA|op BBBBlo BBBBhi`: `op vAA, #+BBBBBBBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction31i {
    opcode: Opcode,
    register_a: u8,
    literal: i32,
}

impl Instruction31i {
    fixed_format!(Format31i, 3);

    pub fn new(opcode: Opcode, register_a: u32, literal: i32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 8)? as u8,
            literal,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: buf[offset + 1],
            literal: read_u32(buf, offset + 2) as i32,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), self.register_a]);
        out.extend_from_slice(&self.literal.to_le_bytes());
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn literal(&self) -> i64 {
        self.literal as i64
    }
}

/// `AA|op BBBBlo BBBBhi`: `op vAA, string@BBBBBBBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction31c {
    opcode: Opcode,
    register_a: u8,
    index: u32,
}

impl Instruction31c {
    fixed_format!(Format31c, 3);

    pub fn new(opcode: Opcode, register_a: u32, index: u32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 8)? as u8,
            index: check_index(Self::FORMAT, index, 32)?,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: buf[offset + 1],
            index: read_u32(buf, offset + 2),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), self.register_a]);
        out.extend_from_slice(&self.index.to_le_bytes());
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

/// `A|G|op BBBB F|E|D|C`: `op {vC, vD, vE, vF, vG}, kind@BBBB`.
///
/// Up to five 4-bit registers. The count nibble is kept as decoded, so a
/// count above five survives a decode/encode cycle; only the
/// first five registers are ever reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction35c {
    opcode: Opcode,
    count: u8,
    registers: [u8; 5],
    index: u16,
}

impl Instruction35c {
    fixed_format!(Format35c, 3);

    pub const MAX_REGISTERS: usize = 5;

    pub fn new(opcode: Opcode, registers: &[u32], index: u32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        if registers.len() > Self::MAX_REGISTERS {
            return Err(EncodeError::TooManyRegisters {
                format: Self::FORMAT,
                count: registers.len(),
                max: Self::MAX_REGISTERS,
            });
        }
        const FIELDS: [&str; 5] = ["C", "D", "E", "F", "G"];
        let mut packed = [0u8; 5];
        for (slot, (&reg, field)) in packed.iter_mut().zip(registers.iter().zip(FIELDS)) {
            *slot = check_register(Self::FORMAT, field, reg, 4)? as u8;
        }
        Ok(Self {
            opcode,
            count: registers.len() as u8,
            registers: packed,
            index: check_index(Self::FORMAT, index, 16)? as u16,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let high = buf[offset + 1];
        let low = read_u16(buf, offset + 4);
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            count: high >> 4,
            registers: [
                (low & 0x0f) as u8,
                ((low >> 4) & 0x0f) as u8,
                ((low >> 8) & 0x0f) as u8,
                (low >> 12) as u8,
                high & 0x0f,
            ],
            index: read_u16(buf, offset + 2),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        let [c, d, e, f, g] = self.registers;
        let low = (c as u16) | ((d as u16) << 4) | ((e as u16) << 8) | ((f as u16) << 12);
        out.extend_from_slice(&[self.opcode.value(), (self.count << 4) | g]);
        out.extend_from_slice(&self.index.to_le_bytes());
        out.extend_from_slice(&low.to_le_bytes());
    }

    /// The encoded register count, which may exceed five in malformed input.
    pub fn register_count(&self) -> u32 {
        self.count as u32
    }

    pub fn registers(&self) -> impl Iterator<Item = u32> + '_ {
        let n = (self.count as usize).min(Self::MAX_REGISTERS);
        self.registers[..n].iter().map(|&r| r as u32)
    }

    pub fn index(&self) -> u32 {
        self.index as u32
    }
}

/// `AA|op BBBB CCCC`: `op {vCCCC .. vNNNN}, kind@BBBB` where
/// `NNNN = CCCC + AA - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction3rc {
    opcode: Opcode,
    count: u8,
    index: u16,
    start: u16,
}

impl Instruction3rc {
    fixed_format!(Format3rc, 3);

    pub fn new(opcode: Opcode, start: u32, count: u32, index: u32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            count: check_register(Self::FORMAT, "A", count, 8)? as u8,
            index: check_index(Self::FORMAT, index, 16)? as u16,
            start: check_register(Self::FORMAT, "C", start, 16)? as u16,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            count: buf[offset + 1],
            index: read_u16(buf, offset + 2),
            start: read_u16(buf, offset + 4),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), self.count]);
        out.extend_from_slice(&self.index.to_le_bytes());
        out.extend_from_slice(&self.start.to_le_bytes());
    }

    pub fn start_register(&self) -> u32 {
        self.start as u32
    }

    pub fn register_count(&self) -> u32 {
        self.count as u32
    }

    pub fn index(&self) -> u32 {
        self.index as u32
    }
}
