use crate::format::Instruction;

/// Errors from [`decode`] and [`Decoder`]. Offsets are in bytes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Unused opcode byte at the given byte offset.
    #[error("invalid opcode at offset {0}")]
    InvalidOpcode(usize),
    /// The instruction at the given byte offset runs past the end of input.
    #[error("truncated instruction at offset {0}")]
    Truncated(usize),
    /// Input is not a whole number of 16-bit code units.
    #[error("odd-length instruction stream ({0} bytes)")]
    OddLength(usize),
    /// A payload at the given byte offset has a malformed header.
    #[error("malformed payload at offset {0}")]
    InvalidPayload(usize),
}

impl DecodeError {
    /// Byte offset the error refers to.
    pub fn offset(&self) -> usize {
        match *self {
            Self::InvalidOpcode(o)
            | Self::Truncated(o)
            | Self::OddLength(o)
            | Self::InvalidPayload(o) => o,
        }
    }
}

/// Decode a whole instruction stream into `(instruction, address)` pairs.
///
/// Addresses are in 16-bit code units from the start of `bytes`. Decoding
/// stops at the first malformed instruction.
pub fn decode(bytes: &[u8]) -> Result<Vec<(Instruction, u32)>, DecodeError> {
    Decoder::new(bytes)
        .map(|item| item.map(|(address, insn)| (insn, address)))
        .collect()
}

/// Lazy instruction-stream decoder.
///
/// Yields `(address, instruction)` in code units; after the first error the
/// iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            failed: false,
        }
    }

    /// Address of the next instruction, in code units.
    pub fn address(&self) -> u32 {
        (self.offset / 2) as u32
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<(u32, Instruction), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        if self.offset == 0 && self.bytes.len() % 2 != 0 {
            self.failed = true;
            return Some(Err(DecodeError::OddLength(self.bytes.len())));
        }
        match Instruction::decode(self.bytes, self.offset) {
            Ok(insn) => {
                let address = self.address();
                self.offset += insn.size_in_code_units() * 2;
                Some(Ok((address, insn)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Decoder<'_> {}
