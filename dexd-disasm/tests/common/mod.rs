#![allow(dead_code)]

use dexd_disasm::{ClassDefinition, Diagnostic};
use dexd_file::DexFile;
use dexd_file::code::CodeItem;
use dexd_isa::{Instruction, Instruction10x, Opcode};

pub const CLASS: &str = "Lcom/example/Sample;";
pub const OBJECT: &str = "Ljava/lang/Object;";

pub fn return_void() -> Instruction {
    Instruction10x::new(Opcode::ReturnVoid).unwrap().into()
}

pub fn code(registers: u16, ins: u16, program: &[Instruction]) -> CodeItem {
    CodeItem::from_instructions(registers, ins, program).unwrap()
}

pub struct Output {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
    pub had_errors: bool,
}

/// Disassemble the class at `position`, collecting diagnostics.
pub fn disassemble(dex: &DexFile, position: usize) -> Output {
    let class = dex.class(position).unwrap();
    let mut definition = ClassDefinition::new(dex, class);
    let mut diagnostics = Vec::new();
    let mut buf = Vec::new();
    definition.write_to_with(&mut buf, &mut diagnostics).unwrap();
    Output {
        text: String::from_utf8(buf).unwrap(),
        diagnostics,
        had_errors: definition.had_validation_errors(),
    }
}
