//! Dalvik bytecode instruction codec.
//!
//! Opcode table, the closed family of instruction formats, and stream
//! decode/encode over little-endian 16-bit code units.
//!
//! ```
//! use dexd_isa::{Instruction, Instruction22b, Opcode};
//!
//! let insn = Instruction22b::new(Opcode::AddIntLit8, 10, 20, -1)?;
//! let bytes = Instruction::from(insn).to_bytes();
//! assert_eq!(bytes, [0xd8, 0x0a, 0x14, 0xff]);
//! # Ok::<(), dexd_isa::EncodeError>(())
//! ```

mod decoder;
mod emitter;
pub mod format;
mod opcode;

pub use decoder::{DecodeError, Decoder, decode};
pub use emitter::{EncodeError, encode};
pub use format::*;
pub use opcode::{Opcode, OpcodeFlags, ReferenceType};
