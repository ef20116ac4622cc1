//! Two code-unit formats: 20t, 22x, 21t, 21s, 21h, 21c, 23x, 22b, 22t, 22s, 22c.

use super::{Format, check_format, check_index, check_register, read_opcode, read_u16};
use crate::decoder::DecodeError;
use crate::emitter::EncodeError;
use crate::opcode::{Opcode, OpcodeFlags};

/// `ØØ|op AAAA`: `op +AAAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction20t {
    opcode: Opcode,
    offset: i16,
}

impl Instruction20t {
    fixed_format!(Format20t, 2);

    pub fn new(opcode: Opcode, offset: i16) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self { opcode, offset })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            offset: read_u16(buf, offset + 2) as i16,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), 0]);
        out.extend_from_slice(&self.offset.to_le_bytes());
    }

    pub fn offset(&self) -> i32 {
        self.offset as i32
    }
}

/// `AA|op BBBB`: `op vAA, vBBBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction22x {
    opcode: Opcode,
    register_a: u8,
    register_b: u16,
}

impl Instruction22x {
    fixed_format!(Format22x, 2);

    pub fn new(opcode: Opcode, register_a: u32, register_b: u32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 8)? as u8,
            register_b: check_register(Self::FORMAT, "B", register_b, 16)? as u16,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: buf[offset + 1],
            register_b: read_u16(buf, offset + 2),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), self.register_a]);
        out.extend_from_slice(&self.register_b.to_le_bytes());
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn register_b(&self) -> u32 {
        self.register_b as u32
    }
}

/// `AA|op BBBB`: `op vAA, +BBBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction21t {
    opcode: Opcode,
    register_a: u8,
    offset: i16,
}

impl Instruction21t {
    fixed_format!(Format21t, 2);

    pub fn new(opcode: Opcode, register_a: u32, offset: i16) -> Result<Self, EncodeError> {
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
            offset: read_u16(buf, offset + 2) as i16,
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
        self.offset as i32
    }
}

/// `AA|op BBBB`: `op vAA, #+BBBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction21s {
    opcode: Opcode,
    register_a: u8,
    literal: i16,
}

impl Instruction21s {
    fixed_format!(Format21s, 2);

    pub fn new(opcode: Opcode, register_a: u32, literal: i16) -> Result<Self, EncodeError> {
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
            literal: read_u16(buf, offset + 2) as i16,
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

/// `AA|op BBBB`: `op vAA, #+BBBB0000` or `#+BBBB000000000000` for the wide
/// variant. Only the high 16 bits are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction21h {
    opcode: Opcode,
    register_a: u8,
    high: i16,
}

impl Instruction21h {
    fixed_format!(Format21h, 2);

    pub fn new(opcode: Opcode, register_a: u32, high: i16) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 8)? as u8,
            high,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: buf[offset + 1],
            high: read_u16(buf, offset + 2) as i16,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), self.register_a]);
        out.extend_from_slice(&self.high.to_le_bytes());
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    /// The literal as the instruction materializes it.
    pub fn literal(&self) -> i64 {
        if self.opcode.flags().contains(OpcodeFlags::WIDE_LITERAL) {
            (self.high as i64) << 48
        } else {
            (self.high as i64) << 16
        }
    }
}

/// `AA|op BBBB`: `op vAA, kind@BBBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction21c {
    opcode: Opcode,
    register_a: u8,
    index: u16,
}

impl Instruction21c {
    fixed_format!(Format21c, 2);

    pub fn new(opcode: Opcode, register_a: u32, index: u32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 8)? as u8,
            index: check_index(Self::FORMAT, index, 16)? as u16,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: buf[offset + 1],
            index: read_u16(buf, offset + 2),
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
        self.index as u32
    }
}

/// `AA|op CC|BB`: `op vAA, vBB, vCC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction23x {
    opcode: Opcode,
    register_a: u8,
    register_b: u8,
    register_c: u8,
}

impl Instruction23x {
    fixed_format!(Format23x, 2);

    pub fn new(
        opcode: Opcode,
        register_a: u32,
        register_b: u32,
        register_c: u32,
    ) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 8)? as u8,
            register_b: check_register(Self::FORMAT, "B", register_b, 8)? as u8,
            register_c: check_register(Self::FORMAT, "C", register_c, 8)? as u8,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: buf[offset + 1],
            register_b: buf[offset + 2],
            register_c: buf[offset + 3],
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[
            self.opcode.value(),
            self.register_a,
            self.register_b,
            self.register_c,
        ]);
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn register_b(&self) -> u32 {
        self.register_b as u32
    }

    pub fn register_c(&self) -> u32 {
        self.register_c as u32
    }
}

/// `AA|op CC|BB`: `op vAA, vBB, #+CC`.
///
/// Byte 0 opcode, byte 1 register A, byte 2 register B, byte 3 the signed
/// literal C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction22b {
    opcode: Opcode,
    register_a: u8,
    register_b: u8,
    literal: i8,
}

impl Instruction22b {
    fixed_format!(Format22b, 2);

    pub fn new(
        opcode: Opcode,
        register_a: u32,
        register_b: u32,
        literal: i8,
    ) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 8)? as u8,
            register_b: check_register(Self::FORMAT, "B", register_b, 8)? as u8,
            literal,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: buf[offset + 1],
            register_b: buf[offset + 2],
            literal: buf[offset + 3] as i8,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[
            self.opcode.value(),
            self.register_a,
            self.register_b,
            self.literal as u8,
        ]);
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn register_b(&self) -> u32 {
        self.register_b as u32
    }

    pub fn literal(&self) -> i64 {
        self.literal as i64
    }
}

/// `B|A|op CCCC`: `op vA, vB, +CCCC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction22t {
    opcode: Opcode,
    register_a: u8,
    register_b: u8,
    offset: i16,
}

impl Instruction22t {
    fixed_format!(Format22t, 2);

    pub fn new(
        opcode: Opcode,
        register_a: u32,
        register_b: u32,
        offset: i16,
    ) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 4)? as u8,
            register_b: check_register(Self::FORMAT, "B", register_b, 4)? as u8,
            offset,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let packed = buf[offset + 1];
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: packed & 0x0f,
            register_b: packed >> 4,
            offset: read_u16(buf, offset + 2) as i16,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), (self.register_b << 4) | self.register_a]);
        out.extend_from_slice(&self.offset.to_le_bytes());
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn register_b(&self) -> u32 {
        self.register_b as u32
    }

    pub fn offset(&self) -> i32 {
        self.offset as i32
    }
}

/// `B|A|op CCCC`: `op vA, vB, #+CCCC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction22s {
    opcode: Opcode,
    register_a: u8,
    register_b: u8,
    literal: i16,
}

impl Instruction22s {
    fixed_format!(Format22s, 2);

    pub fn new(
        opcode: Opcode,
        register_a: u32,
        register_b: u32,
        literal: i16,
    ) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 4)? as u8,
            register_b: check_register(Self::FORMAT, "B", register_b, 4)? as u8,
            literal,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let packed = buf[offset + 1];
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: packed & 0x0f,
            register_b: packed >> 4,
            literal: read_u16(buf, offset + 2) as i16,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), (self.register_b << 4) | self.register_a]);
        out.extend_from_slice(&self.literal.to_le_bytes());
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn register_b(&self) -> u32 {
        self.register_b as u32
    }

    pub fn literal(&self) -> i64 {
        self.literal as i64
    }
}

/// `B|A|op CCCC`: `op vA, vB, kind@CCCC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction22c {
    opcode: Opcode,
    register_a: u8,
    register_b: u8,
    index: u16,
}

impl Instruction22c {
    fixed_format!(Format22c, 2);

    pub fn new(
        opcode: Opcode,
        register_a: u32,
        register_b: u32,
        index: u32,
    ) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 4)? as u8,
            register_b: check_register(Self::FORMAT, "B", register_b, 4)? as u8,
            index: check_index(Self::FORMAT, index, 16)? as u16,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let packed = buf[offset + 1];
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: packed & 0x0f,
            register_b: packed >> 4,
            index: read_u16(buf, offset + 2),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), (self.register_b << 4) | self.register_a]);
        out.extend_from_slice(&self.index.to_le_bytes());
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn register_b(&self) -> u32 {
        self.register_b as u32
    }

    pub fn index(&self) -> u32 {
        self.index as u32
    }
}
