use dexd_isa::*;

#[test]
fn high16_literals_are_shifted() {
    let narrow: Instruction = Instruction21h::new(Opcode::ConstHigh16, 0, 0x4120).unwrap().into();
    assert_eq!(narrow.literal(), Some(0x4120_0000));
    let wide: Instruction = Instruction21h::new(Opcode::ConstWideHigh16, 0, -0x10).unwrap().into();
    assert_eq!(wide.literal(), Some(-0x10i64 << 48));
}

#[test]
fn register_operands() {
    let insn: Instruction = Instruction23x::new(Opcode::Aget, 1, 2, 3).unwrap().into();
    assert_eq!(insn.registers(), Some(Registers::List(vec![1, 2, 3])));

    let insn: Instruction = Instruction3rc::new(Opcode::FilledNewArrayRange, 10, 3, 0)
        .unwrap()
        .into();
    assert_eq!(insn.registers(), Some(Registers::Range { start: 10, count: 3 }));

    let insn: Instruction = Instruction10t::new(Opcode::Goto, 1).unwrap().into();
    assert_eq!(insn.registers(), None);
}

#[test]
fn reference_and_offset_operands() {
    let insn: Instruction = Instruction21c::new(Opcode::Sget, 0, 42).unwrap().into();
    assert_eq!(insn.reference_index(), Some(42));
    assert_eq!(insn.opcode().reference_type(), ReferenceType::Field);
    assert_eq!(insn.code_offset(), None);

    let insn: Instruction = Instruction31t::new(Opcode::FillArrayData, 0, 8).unwrap().into();
    assert_eq!(insn.code_offset(), Some(8));
    assert!(insn.opcode().flags().contains(OpcodeFlags::ARRAY_DATA));
}

#[test]
fn display_names_opcode_and_format() {
    let insn: Instruction = Instruction22b::new(Opcode::AddIntLit8, 0, 0, 1).unwrap().into();
    assert_eq!(insn.to_string(), "add-int/lit8 (22b)");
}
