//! The closed family of Dalvik instruction formats.
//!
//! Every format is a fixed-width layout (except the three payload
//! pseudo-instructions): byte 0 is the opcode, operands follow in 16-bit
//! little-endian code units. Each format type offers three operations:
//!
//! - `new(..)` builds an instruction from explicit field values and rejects
//!   any value that does not fit its field.
//! - `decode(buf, offset)` reads the layout back. Operand bytes are never
//!   range-checked; the caller guarantees the buffer holds the full width.
//! - `encode(out)` appends the layout's bytes.

/// Accessors shared by every fixed-width format.
macro_rules! fixed_format {
    ($format:ident, $units:literal) => {
        pub const FORMAT: Format = Format::$format;

        #[inline]
        pub fn opcode(&self) -> Opcode {
            self.opcode
        }

        #[inline]
        pub fn format(&self) -> Format {
            Self::FORMAT
        }

        #[inline]
        pub fn size_in_code_units(&self) -> usize {
            $units
        }
    };
}

mod five_unit;
mod one_unit;
mod payload;
mod three_unit;
mod two_unit;

use std::fmt;

pub use five_unit::Instruction51l;
pub use one_unit::{Instruction10t, Instruction10x, Instruction11n, Instruction11x, Instruction12x};
pub use payload::{ArrayPayload, PackedSwitchPayload, SparseSwitchPayload};
pub use three_unit::{
    Instruction30t, Instruction31c, Instruction31i, Instruction31t, Instruction32x,
    Instruction35c, Instruction3rc,
};
pub use two_unit::{
    Instruction20t, Instruction21c, Instruction21h, Instruction21s, Instruction21t,
    Instruction22b, Instruction22c, Instruction22s, Instruction22t, Instruction22x,
    Instruction23x,
};

use crate::decoder::DecodeError;
use crate::emitter::EncodeError;
use crate::opcode::Opcode;

/// Identifier of a binary instruction layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Format10x,
    Format12x,
    Format11n,
    Format11x,
    Format10t,
    Format20t,
    Format22x,
    Format21t,
    Format21s,
    Format21h,
    Format21c,
    Format23x,
    Format22b,
    Format22t,
    Format22s,
    Format22c,
    Format32x,
    Format30t,
    Format31t,
    Format31i,
    Format31c,
    Format35c,
    Format3rc,
    Format51l,
    PackedSwitchPayload,
    SparseSwitchPayload,
    ArrayPayload,
}

impl Format {
    /// Width in 16-bit code units, or `None` for the variable-width payloads.
    pub const fn size_in_code_units(self) -> Option<usize> {
        match self {
            Self::Format10x
            | Self::Format12x
            | Self::Format11n
            | Self::Format11x
            | Self::Format10t => Some(1),
            Self::Format20t
            | Self::Format22x
            | Self::Format21t
            | Self::Format21s
            | Self::Format21h
            | Self::Format21c
            | Self::Format23x
            | Self::Format22b
            | Self::Format22t
            | Self::Format22s
            | Self::Format22c => Some(2),
            Self::Format32x
            | Self::Format30t
            | Self::Format31t
            | Self::Format31i
            | Self::Format31c
            | Self::Format35c
            | Self::Format3rc => Some(3),
            Self::Format51l => Some(5),
            Self::PackedSwitchPayload | Self::SparseSwitchPayload | Self::ArrayPayload => None,
        }
    }

    pub const fn is_payload(self) -> bool {
        self.size_in_code_units().is_none()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Format10x => "10x",
            Self::Format12x => "12x",
            Self::Format11n => "11n",
            Self::Format11x => "11x",
            Self::Format10t => "10t",
            Self::Format20t => "20t",
            Self::Format22x => "22x",
            Self::Format21t => "21t",
            Self::Format21s => "21s",
            Self::Format21h => "21h",
            Self::Format21c => "21c",
            Self::Format23x => "23x",
            Self::Format22b => "22b",
            Self::Format22t => "22t",
            Self::Format22s => "22s",
            Self::Format22c => "22c",
            Self::Format32x => "32x",
            Self::Format30t => "30t",
            Self::Format31t => "31t",
            Self::Format31i => "31i",
            Self::Format31c => "31c",
            Self::Format35c => "35c",
            Self::Format3rc => "3rc",
            Self::Format51l => "51l",
            Self::PackedSwitchPayload => "packed-switch-payload",
            Self::SparseSwitchPayload => "sparse-switch-payload",
            Self::ArrayPayload => "array-payload",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded or constructed instruction: one variant per format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Format10x(Instruction10x),
    Format12x(Instruction12x),
    Format11n(Instruction11n),
    Format11x(Instruction11x),
    Format10t(Instruction10t),
    Format20t(Instruction20t),
    Format22x(Instruction22x),
    Format21t(Instruction21t),
    Format21s(Instruction21s),
    Format21h(Instruction21h),
    Format21c(Instruction21c),
    Format23x(Instruction23x),
    Format22b(Instruction22b),
    Format22t(Instruction22t),
    Format22s(Instruction22s),
    Format22c(Instruction22c),
    Format32x(Instruction32x),
    Format30t(Instruction30t),
    Format31t(Instruction31t),
    Format31i(Instruction31i),
    Format31c(Instruction31c),
    Format35c(Instruction35c),
    Format3rc(Instruction3rc),
    Format51l(Instruction51l),
    PackedSwitchPayload(PackedSwitchPayload),
    SparseSwitchPayload(SparseSwitchPayload),
    ArrayPayload(ArrayPayload),
}

/// Dispatches an expression over every variant, binding the inner value.
macro_rules! each_variant {
    ($self:expr, $insn:ident => $body:expr) => {
        match $self {
            Instruction::Format10x($insn) => $body,
            Instruction::Format12x($insn) => $body,
            Instruction::Format11n($insn) => $body,
            Instruction::Format11x($insn) => $body,
            Instruction::Format10t($insn) => $body,
            Instruction::Format20t($insn) => $body,
            Instruction::Format22x($insn) => $body,
            Instruction::Format21t($insn) => $body,
            Instruction::Format21s($insn) => $body,
            Instruction::Format21h($insn) => $body,
            Instruction::Format21c($insn) => $body,
            Instruction::Format23x($insn) => $body,
            Instruction::Format22b($insn) => $body,
            Instruction::Format22t($insn) => $body,
            Instruction::Format22s($insn) => $body,
            Instruction::Format22c($insn) => $body,
            Instruction::Format32x($insn) => $body,
            Instruction::Format30t($insn) => $body,
            Instruction::Format31t($insn) => $body,
            Instruction::Format31i($insn) => $body,
            Instruction::Format31c($insn) => $body,
            Instruction::Format35c($insn) => $body,
            Instruction::Format3rc($insn) => $body,
            Instruction::Format51l($insn) => $body,
            Instruction::PackedSwitchPayload($insn) => $body,
            Instruction::SparseSwitchPayload($insn) => $body,
            Instruction::ArrayPayload($insn) => $body,
        }
    };
}

macro_rules! impl_from_format {
    ($($variant:ident => $ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Instruction {
                fn from(insn: $ty) -> Self {
                    Instruction::$variant(insn)
                }
            }
        )*
    };
}

impl_from_format! {
    Format10x => Instruction10x,
    Format12x => Instruction12x,
    Format11n => Instruction11n,
    Format11x => Instruction11x,
    Format10t => Instruction10t,
    Format20t => Instruction20t,
    Format22x => Instruction22x,
    Format21t => Instruction21t,
    Format21s => Instruction21s,
    Format21h => Instruction21h,
    Format21c => Instruction21c,
    Format23x => Instruction23x,
    Format22b => Instruction22b,
    Format22t => Instruction22t,
    Format22s => Instruction22s,
    Format22c => Instruction22c,
    Format32x => Instruction32x,
    Format30t => Instruction30t,
    Format31t => Instruction31t,
    Format31i => Instruction31i,
    Format31c => Instruction31c,
    Format35c => Instruction35c,
    Format3rc => Instruction3rc,
    Format51l => Instruction51l,
    PackedSwitchPayload => PackedSwitchPayload,
    SparseSwitchPayload => SparseSwitchPayload,
    ArrayPayload => ArrayPayload,
}

/// Register operands of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registers {
    /// Individually encoded registers, in operand order.
    List(Vec<u32>),
    /// A contiguous `{vSTART .. vSTART+COUNT-1}` range.
    Range { start: u32, count: u32 },
}

impl Instruction {
    /// Decode the instruction starting at `offset`.
    ///
    /// Opcode byte 0x00 followed by ident 0x01/0x02/0x03 selects a payload;
    /// any other defined opcode selects its format.
    pub fn decode(buf: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let Some(&op) = buf.get(offset) else {
            return Err(DecodeError::Truncated(offset));
        };
        if op == 0 {
            match buf.get(offset + 1) {
                Some(&PackedSwitchPayload::IDENT) => {
                    return PackedSwitchPayload::decode(buf, offset).map(Into::into);
                }
                Some(&SparseSwitchPayload::IDENT) => {
                    return SparseSwitchPayload::decode(buf, offset).map(Into::into);
                }
                Some(&ArrayPayload::IDENT) => {
                    return ArrayPayload::decode(buf, offset).map(Into::into);
                }
                _ => {}
            }
        }

        let opcode = Opcode::from_u8(op).ok_or(DecodeError::InvalidOpcode(offset))?;
        let format = opcode.format();
        let width = format.size_in_code_units().unwrap_or(1) * 2;
        if offset + width > buf.len() {
            return Err(DecodeError::Truncated(offset));
        }

        let insn = match format {
            Format::Format10x => Instruction10x::decode(buf, offset)?.into(),
            Format::Format12x => Instruction12x::decode(buf, offset)?.into(),
            Format::Format11n => Instruction11n::decode(buf, offset)?.into(),
            Format::Format11x => Instruction11x::decode(buf, offset)?.into(),
            Format::Format10t => Instruction10t::decode(buf, offset)?.into(),
            Format::Format20t => Instruction20t::decode(buf, offset)?.into(),
            Format::Format22x => Instruction22x::decode(buf, offset)?.into(),
            Format::Format21t => Instruction21t::decode(buf, offset)?.into(),
            Format::Format21s => Instruction21s::decode(buf, offset)?.into(),
            Format::Format21h => Instruction21h::decode(buf, offset)?.into(),
            Format::Format21c => Instruction21c::decode(buf, offset)?.into(),
            Format::Format23x => Instruction23x::decode(buf, offset)?.into(),
            Format::Format22b => Instruction22b::decode(buf, offset)?.into(),
            Format::Format22t => Instruction22t::decode(buf, offset)?.into(),
            Format::Format22s => Instruction22s::decode(buf, offset)?.into(),
            Format::Format22c => Instruction22c::decode(buf, offset)?.into(),
            Format::Format32x => Instruction32x::decode(buf, offset)?.into(),
            Format::Format30t => Instruction30t::decode(buf, offset)?.into(),
            Format::Format31t => Instruction31t::decode(buf, offset)?.into(),
            Format::Format31i => Instruction31i::decode(buf, offset)?.into(),
            Format::Format31c => Instruction31c::decode(buf, offset)?.into(),
            Format::Format35c => Instruction35c::decode(buf, offset)?.into(),
            Format::Format3rc => Instruction3rc::decode(buf, offset)?.into(),
            Format::Format51l => Instruction51l::decode(buf, offset)?.into(),
            // Payloads are selected by ident above, never by an opcode row.
            Format::PackedSwitchPayload | Format::SparseSwitchPayload | Format::ArrayPayload => {
                return Err(DecodeError::InvalidOpcode(offset));
            }
        };
        Ok(insn)
    }

    /// Append this instruction's bytes to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        each_variant!(self, insn => insn.encode(out))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_in_code_units() * 2);
        self.encode(&mut out);
        out
    }

    pub fn format(&self) -> Format {
        each_variant!(self, insn => insn.format())
    }

    /// The opcode. Payload pseudo-instructions report [`Opcode::Nop`], which
    /// is what their first byte holds.
    pub fn opcode(&self) -> Opcode {
        each_variant!(self, insn => insn.opcode())
    }

    pub fn size_in_code_units(&self) -> usize {
        each_variant!(self, insn => insn.size_in_code_units())
    }

    /// Register operands, or `None` when the format has none.
    pub fn registers(&self) -> Option<Registers> {
        let list = |regs: &[u32]| Some(Registers::List(regs.to_vec()));
        match self {
            Self::Format12x(i) => list(&[i.register_a(), i.register_b()]),
            Self::Format11n(i) => list(&[i.register_a()]),
            Self::Format11x(i) => list(&[i.register_a()]),
            Self::Format22x(i) => list(&[i.register_a(), i.register_b()]),
            Self::Format21t(i) => list(&[i.register_a()]),
            Self::Format21s(i) => list(&[i.register_a()]),
            Self::Format21h(i) => list(&[i.register_a()]),
            Self::Format21c(i) => list(&[i.register_a()]),
            Self::Format23x(i) => list(&[i.register_a(), i.register_b(), i.register_c()]),
            Self::Format22b(i) => list(&[i.register_a(), i.register_b()]),
            Self::Format22t(i) => list(&[i.register_a(), i.register_b()]),
            Self::Format22s(i) => list(&[i.register_a(), i.register_b()]),
            Self::Format22c(i) => list(&[i.register_a(), i.register_b()]),
            Self::Format32x(i) => list(&[i.register_a(), i.register_b()]),
            Self::Format31t(i) => list(&[i.register_a()]),
            Self::Format31i(i) => list(&[i.register_a()]),
            Self::Format31c(i) => list(&[i.register_a()]),
            Self::Format35c(i) => Some(Registers::List(i.registers().collect())),
            Self::Format3rc(i) => Some(Registers::Range {
                start: i.start_register(),
                count: i.register_count(),
            }),
            Self::Format51l(i) => list(&[i.register_a()]),
            Self::Format10x(_)
            | Self::Format10t(_)
            | Self::Format20t(_)
            | Self::Format30t(_)
            | Self::PackedSwitchPayload(_)
            | Self::SparseSwitchPayload(_)
            | Self::ArrayPayload(_) => None,
        }
    }

    /// Sign-extended literal operand.
    pub fn literal(&self) -> Option<i64> {
        match self {
            Self::Format11n(i) => Some(i.literal()),
            Self::Format21s(i) => Some(i.literal()),
            Self::Format21h(i) => Some(i.literal()),
            Self::Format22b(i) => Some(i.literal()),
            Self::Format22s(i) => Some(i.literal()),
            Self::Format31i(i) => Some(i.literal()),
            Self::Format51l(i) => Some(i.literal()),
            _ => None,
        }
    }

    /// Constant-pool index operand; its kind is the opcode's
    /// [`ReferenceType`](crate::ReferenceType).
    pub fn reference_index(&self) -> Option<u32> {
        match self {
            Self::Format21c(i) => Some(i.index()),
            Self::Format22c(i) => Some(i.index()),
            Self::Format31c(i) => Some(i.index()),
            Self::Format35c(i) => Some(i.index()),
            Self::Format3rc(i) => Some(i.index()),
            _ => None,
        }
    }

    /// Signed code-unit offset to a branch target or payload, relative to
    /// this instruction's address.
    pub fn code_offset(&self) -> Option<i32> {
        match self {
            Self::Format10t(i) => Some(i.offset()),
            Self::Format20t(i) => Some(i.offset()),
            Self::Format30t(i) => Some(i.offset()),
            Self::Format21t(i) => Some(i.offset()),
            Self::Format22t(i) => Some(i.offset()),
            Self::Format31t(i) => Some(i.offset()),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PackedSwitchPayload(_) | Self::SparseSwitchPayload(_) | Self::ArrayPayload(_) => {
                f.write_str(self.format().name())
            }
            _ => write!(f, "{} ({})", self.opcode(), self.format()),
        }
    }
}

// --- shared field checks ---

pub(crate) fn check_format(opcode: Opcode, format: Format) -> Result<(), EncodeError> {
    if opcode.format() == format {
        Ok(())
    } else {
        Err(EncodeError::FormatMismatch {
            opcode,
            expected: opcode.format(),
            actual: format,
        })
    }
}

pub(crate) fn check_register(
    format: Format,
    field: &'static str,
    value: u32,
    bits: u32,
) -> Result<u32, EncodeError> {
    let max = (1u32 << bits) - 1;
    if value > max {
        return Err(EncodeError::RegisterOutOfRange {
            format,
            field,
            value,
            max,
        });
    }
    Ok(value)
}

pub(crate) fn check_index(format: Format, value: u32, bits: u32) -> Result<u32, EncodeError> {
    let max = if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 };
    if value > max {
        return Err(EncodeError::IndexOutOfRange { format, value, max });
    }
    Ok(value)
}

pub(crate) fn check_literal(format: Format, value: i64, bits: u32) -> Result<i64, EncodeError> {
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    if value < min || value > max {
        return Err(EncodeError::LiteralOutOfRange {
            format,
            value,
            bits,
        });
    }
    Ok(value)
}

// --- little-endian readers; callers guarantee the bytes are present ---

pub(crate) fn read_opcode(buf: &[u8], offset: usize) -> Result<Opcode, DecodeError> {
    Opcode::from_u8(buf[offset]).ok_or(DecodeError::InvalidOpcode(offset))
}

#[inline]
pub(crate) fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

#[inline]
pub(crate) fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

#[inline]
pub(crate) fn read_u64(buf: &[u8], offset: usize) -> u64 {
    let lo = read_u32(buf, offset) as u64;
    let hi = read_u32(buf, offset + 4) as u64;
    lo | (hi << 32)
}
