//! Single code-unit formats: 10x, 12x, 11n, 11x, 10t.

use super::{Format, check_format, check_literal, check_register, read_opcode};
use crate::decoder::DecodeError;
use crate::emitter::EncodeError;
use crate::opcode::Opcode;

/// `ØØ|op`: no operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction10x {
    opcode: Opcode,
}

impl Instruction10x {
    fixed_format!(Format10x, 1);

    pub fn new(opcode: Opcode) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self { opcode })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), 0]);
    }
}

/// `B|A|op`: `op vA, vB`, two 4-bit registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction12x {
    opcode: Opcode,
    register_a: u8,
    register_b: u8,
}

impl Instruction12x {
    fixed_format!(Format12x, 1);

    pub fn new(opcode: Opcode, register_a: u32, register_b: u32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 4)? as u8,
            register_b: check_register(Self::FORMAT, "B", register_b, 4)? as u8,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let packed = buf[offset + 1];
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: packed & 0x0f,
            register_b: packed >> 4,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), (self.register_b << 4) | self.register_a]);
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn register_b(&self) -> u32 {
        self.register_b as u32
    }
}

/// `B|A|op`: `op vA, #+B`, a 4-bit register and a signed 4-bit literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction11n {
    opcode: Opcode,
    register_a: u8,
    literal: i8,
}

impl Instruction11n {
    fixed_format!(Format11n, 1);

    pub fn new(opcode: Opcode, register_a: u32, literal: i8) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 4)? as u8,
            literal: check_literal(Self::FORMAT, literal as i64, 4)? as i8,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let packed = buf[offset + 1];
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: packed & 0x0f,
            // arithmetic shift sign-extends the high nibble
            literal: (packed as i8) >> 4,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        let high = (self.literal as u8) << 4;
        out.extend_from_slice(&[self.opcode.value(), high | self.register_a]);
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }

    pub fn literal(&self) -> i64 {
        self.literal as i64
    }
}

/// `AA|op`: `op vAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction11x {
    opcode: Opcode,
    register_a: u8,
}

impl Instruction11x {
    fixed_format!(Format11x, 1);

    pub fn new(opcode: Opcode, register_a: u32) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self {
            opcode,
            register_a: check_register(Self::FORMAT, "A", register_a, 8)? as u8,
        })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            register_a: buf[offset + 1],
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), self.register_a]);
    }

    pub fn register_a(&self) -> u32 {
        self.register_a as u32
    }
}

/// `AA|op`: `op +AA`, a signed 8-bit branch offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction10t {
    opcode: Opcode,
    offset: i8,
}

impl Instruction10t {
    fixed_format!(Format10t, 1);

    pub fn new(opcode: Opcode, offset: i8) -> Result<Self, EncodeError> {
        check_format(opcode, Self::FORMAT)?;
        Ok(Self { opcode, offset })
    }

    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            opcode: read_opcode(buf, offset)?,
            offset: buf[offset + 1] as i8,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.opcode.value(), self.offset as u8]);
    }

    pub fn offset(&self) -> i32 {
        self.offset as i32
    }
}
