use dexd_file::pool::PoolKind;
use dexd_isa::DecodeError;

/// Why a method body could not be fully disassembled. Addresses are in
/// code units.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("undecodable instruction at address {address:#x}: {source}")]
    Decode {
        address: u32,
        #[source]
        source: DecodeError,
    },

    #[error("register v{register} at address {address:#x} is outside the {registers_size}-register frame")]
    RegisterOutOfRange {
        address: u32,
        register: u32,
        registers_size: u16,
    },

    #[error("invalid register count {count} at address {address:#x}")]
    InvalidRegisterCount { address: u32, count: u32 },

    #[error("{kind} index {index} at address {address:#x} does not resolve")]
    InvalidReference {
        address: u32,
        kind: PoolKind,
        index: u32,
    },

    #[error("instruction at address {address:#x} targets {target:#x}, which is not an instruction boundary")]
    InvalidBranchTarget { address: u32, target: i64 },

    #[error("instruction at address {address:#x} expects a payload at {target:#x}")]
    InvalidPayload { address: u32, target: i64 },

    #[error("try block at {start:#x} spanning {code_units} code units does not cover whole instructions")]
    InvalidTryBlock { start: u32, code_units: u32 },

    #[error("{ins_size} parameter registers do not fit the method (frame {registers_size}, expected {expected})")]
    InvalidParameterRegisters {
        registers_size: u16,
        ins_size: u16,
        expected: u32,
    },
}
