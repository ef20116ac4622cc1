//! Register/literal layout of the `22b` format.

use dexd_isa::*;

#[test]
fn decode_22b_layout() {
    let bytes = [0x01, 0x0a, 0x14, 0xff];
    let insn = Instruction22b::decode(&bytes, 0).unwrap();
    assert_eq!(insn.opcode().value(), 1);
    assert_eq!(insn.register_a(), 10);
    assert_eq!(insn.register_b(), 20);
    assert_eq!(insn.literal(), -1);
    assert_eq!(insn.size_in_code_units(), 2);
    assert_eq!(insn.format(), Format::Format22b);

    let mut out = Vec::new();
    insn.encode(&mut out);
    assert_eq!(out, bytes);
}

#[test]
fn decode_22b_at_offset() {
    let bytes = [0x00, 0x00, 0xd8, 0x01, 0x02, 0x80];
    let insn = Instruction22b::decode(&bytes, 2).unwrap();
    assert_eq!(insn.opcode(), Opcode::AddIntLit8);
    assert_eq!(insn.register_a(), 1);
    assert_eq!(insn.register_b(), 2);
    assert_eq!(insn.literal(), -128);
}

#[test]
fn literal_sign_extension_through_the_stream() {
    let (insn, _) = decode(&[0xd8, 0x0a, 0x14, 0x7f]).unwrap().remove(0);
    assert_eq!(insn.literal(), Some(127));
    let (insn, _) = decode(&[0xd8, 0x0a, 0x14, 0x80]).unwrap().remove(0);
    assert_eq!(insn.literal(), Some(-128));
}

#[test]
fn encode_22b_bytes() {
    let insn = Instruction22b::new(Opcode::RsubIntLit8, 255, 0, 127).unwrap();
    let mut out = Vec::new();
    insn.encode(&mut out);
    assert_eq!(out, [0xd9, 0xff, 0x00, 0x7f]);
}

#[test]
fn construct_22b_rejects_wide_registers() {
    let err = Instruction22b::new(Opcode::AddIntLit8, 256, 0, 0).unwrap_err();
    assert!(
        matches!(
            err,
            EncodeError::RegisterOutOfRange { field: "A", value: 256, max: 255, .. }
        ),
        "got {err}"
    );
    let err = Instruction22b::new(Opcode::AddIntLit8, 0, 256, 0).unwrap_err();
    assert!(matches!(err, EncodeError::RegisterOutOfRange { field: "B", .. }));
    assert!(Instruction22b::new(Opcode::AddIntLit8, 255, 255, -128).is_ok());
}

#[test]
fn construct_22b_rejects_foreign_opcode() {
    let err = Instruction22b::new(Opcode::AddIntLit16, 0, 0, 0).unwrap_err();
    assert_eq!(
        err,
        EncodeError::FormatMismatch {
            opcode: Opcode::AddIntLit16,
            expected: Format::Format22s,
            actual: Format::Format22b,
        }
    );
}
