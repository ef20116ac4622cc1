use super::{Format, check_format, check_register, read_opcode, read_u64};
use crate::decoder::DecodeError;
use crate::emitter::EncodeError;
use crate::opcode::Opcode;

/// `AA|op BBBBlo BBBB BBBB BBBBhi`: `op vAA, #+BBBBBBBBBBBBBBBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction51l {
    opcode: Opcode,
    register_a: u8,
    literal: i64,
}

impl Instruction51l {
    fixed_format!(Format51l, 5);

    pub fn new(opcode: Opcode, register_a: u32, literal: i64) -> Result<Self, EncodeError> {
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
            literal: read_u64(buf, offset + 2) as i64,
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
        self.literal
    }
}
