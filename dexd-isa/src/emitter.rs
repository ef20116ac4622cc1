use crate::format::{Format, Instruction};
use crate::opcode::Opcode;

/// Errors from instruction construction and [`encode`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("register {field}={value} does not fit format {format} (max {max})")]
    RegisterOutOfRange {
        format: Format,
        field: &'static str,
        value: u32,
        max: u32,
    },
    #[error("literal {value} does not fit the {bits}-bit field of format {format}")]
    LiteralOutOfRange { format: Format, value: i64, bits: u32 },
    #[error("index {value} does not fit format {format} (max {max})")]
    IndexOutOfRange { format: Format, value: u32, max: u32 },
    #[error("opcode {opcode} uses format {expected}, not {actual}")]
    FormatMismatch {
        opcode: Opcode,
        expected: Format,
        actual: Format,
    },
    #[error("{count} registers given to format {format} (max {max})")]
    TooManyRegisters {
        format: Format,
        count: usize,
        max: usize,
    },
    #[error("{format} holds {len} entries (max {max})")]
    PayloadTooLarge {
        format: Format,
        len: usize,
        max: usize,
    },
    #[error("sparse-switch has {keys} keys but {targets} targets")]
    SwitchLengthMismatch { keys: usize, targets: usize },
    #[error("invalid array element width {0}")]
    InvalidElementWidth(u16),
    #[error("{len} bytes of array data is not a multiple of element width {element_width}")]
    RaggedArrayData { len: usize, element_width: u16 },
    /// A payload would start on an odd code-unit address.
    #[error("payload instruction {index} at odd address {address}")]
    MisalignedPayload { index: usize, address: u32 },
}

/// Encode an instruction sequence.
///
/// Returns the bytes and the code-unit address of each instruction. Payloads
/// are not padded implicitly; a payload landing on an odd address is an
/// error, so callers insert a `nop` where needed.
pub fn encode(instructions: &[Instruction]) -> Result<(Vec<u8>, Vec<u32>), EncodeError> {
    let total: usize = instructions.iter().map(Instruction::size_in_code_units).sum();
    let mut bytes = Vec::with_capacity(total * 2);
    let mut addresses = Vec::with_capacity(instructions.len());

    for (index, insn) in instructions.iter().enumerate() {
        let address = (bytes.len() / 2) as u32;
        if insn.format().is_payload() && address % 2 != 0 {
            return Err(EncodeError::MisalignedPayload { index, address });
        }
        addresses.push(address);
        insn.encode(&mut bytes);
    }

    Ok((bytes, addresses))
}
