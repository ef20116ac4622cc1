/// Knobs for method body output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisassemblyOptions {
    /// Name incoming-argument registers `pN` rather than `vN`.
    pub parameter_registers: bool,
    /// Emit `.locals` (registers minus parameters) instead of `.registers`.
    pub locals_directive: bool,
    /// Precede each instruction with a `#@addr` comment.
    pub code_offsets: bool,
}

impl Default for DisassemblyOptions {
    fn default() -> Self {
        Self {
            parameter_registers: true,
            locals_directive: false,
            code_offsets: false,
        }
    }
}
