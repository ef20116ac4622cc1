//! Method bodies: register frame, instruction stream, try/catch ranges.

use dexd_isa::{Decoder, Instruction};

use crate::error::Result;

/// A typed catch handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatchHandler {
    pub type_idx: u32,
    /// Handler address in code units.
    pub address: u32,
}

/// A protected range `[start_address, start_address + code_units)` with its
/// handlers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TryBlock {
    pub start_address: u32,
    pub code_units: u32,
    pub handlers: Vec<CatchHandler>,
    pub catch_all: Option<u32>,
}

impl TryBlock {
    pub fn new(start_address: u32, code_units: u32) -> Self {
        Self {
            start_address,
            code_units,
            ..Self::default()
        }
    }

    pub fn catch(mut self, type_idx: u32, address: u32) -> Self {
        self.handlers.push(CatchHandler { type_idx, address });
        self
    }

    pub fn catch_all(mut self, address: u32) -> Self {
        self.catch_all = Some(address);
        self
    }

    /// First address past the range, or `None` when the range runs past the
    /// address space.
    pub fn end_address(&self) -> Option<u32> {
        self.start_address.checked_add(self.code_units)
    }
}

/// `code_item` of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeItem {
    pub registers_size: u16,
    /// Incoming-argument words, occupying the last `ins_size` registers.
    pub ins_size: u16,
    pub outs_size: u16,
    /// Little-endian instruction bytes.
    pub insns: Vec<u8>,
    pub tries: Vec<TryBlock>,
}

impl CodeItem {
    pub fn new(registers_size: u16, ins_size: u16, outs_size: u16, insns: Vec<u8>) -> Self {
        Self {
            registers_size,
            ins_size,
            outs_size,
            insns,
            tries: Vec::new(),
        }
    }

    /// Assemble a body from instructions.
    pub fn from_instructions(
        registers_size: u16,
        ins_size: u16,
        instructions: &[Instruction],
    ) -> Result<Self> {
        let (insns, _) = dexd_isa::encode(instructions)?;
        Ok(Self::new(registers_size, ins_size, 0, insns))
    }

    pub fn with_tries(mut self, tries: Vec<TryBlock>) -> Self {
        self.tries = tries;
        self
    }

    /// Length of the instruction stream in code units.
    pub fn insns_size(&self) -> usize {
        self.insns.len() / 2
    }

    /// Lazily decode the instruction stream.
    pub fn instructions(&self) -> Decoder<'_> {
        Decoder::new(&self.insns)
    }
}

#[cfg(test)]
mod tests {
    use dexd_isa::{Instruction10x, Instruction11n, Opcode};

    use super::*;

    #[test]
    fn assembled_body_decodes_back() {
        let program: Vec<Instruction> = vec![
            Instruction11n::new(Opcode::Const4, 0, 3).unwrap().into(),
            Instruction10x::new(Opcode::ReturnVoid).unwrap().into(),
        ];
        let code = CodeItem::from_instructions(1, 0, &program).unwrap();
        assert_eq!(code.insns_size(), 2);
        let decoded: Vec<_> = code
            .instructions()
            .map(|r| r.map(|(_, insn)| insn))
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(decoded, program);
    }

    #[test]
    fn try_block_builder() {
        let block = TryBlock::new(2, 4).catch(7, 10).catch_all(12);
        assert_eq!(block.end_address(), Some(6));
        assert_eq!(block.handlers, [CatchHandler { type_idx: 7, address: 10 }]);
        assert_eq!(block.catch_all, Some(12));
    }

    #[test]
    fn try_block_end_overflow() {
        assert_eq!(TryBlock::new(u32::MAX - 1, 5).end_address(), None);
        assert_eq!(TryBlock::new(u32::MAX - 1, 1).end_address(), Some(u32::MAX));
    }
}
