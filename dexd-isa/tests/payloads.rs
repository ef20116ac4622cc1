use dexd_isa::*;

#[test]
fn packed_switch_entries() {
    let payload = PackedSwitchPayload::new(-1, vec![4, 6, 8]).unwrap();
    assert_eq!(payload.size_in_code_units(), 10);
    let entries: Vec<_> = payload.entries().collect();
    assert_eq!(entries, [(-1, 4), (0, 6), (1, 8)]);
}

#[test]
fn sparse_switch_layout() {
    let payload = SparseSwitchPayload::new(vec![5, 500], vec![3, 9]).unwrap();
    let bytes = Instruction::from(payload.clone()).to_bytes();
    assert_eq!(&bytes[..4], &[0x00, 0x02, 0x02, 0x00]);
    assert_eq!(bytes.len(), payload.size_in_code_units() * 2);
    assert_eq!(payload.entries().collect::<Vec<_>>(), [(5, 3), (500, 9)]);
}

#[test]
fn array_payload_pads_odd_data() {
    let payload = ArrayPayload::new(1, vec![0xff, 0x01, 0x7f]).unwrap();
    let bytes = Instruction::from(payload.clone()).to_bytes();
    assert_eq!(bytes.len(), 12);
    assert_eq!(payload.size_in_code_units(), 6);
    assert_eq!(payload.elements().collect::<Vec<_>>(), [-1, 1, 127]);

    let (decoded, _) = decode(&bytes).unwrap().remove(0);
    assert_eq!(decoded, Instruction::ArrayPayload(payload));
}

#[test]
fn array_payload_wide_elements() {
    let mut data = Vec::new();
    data.extend_from_slice(&(-2i64).to_le_bytes());
    data.extend_from_slice(&(1i64 << 40).to_le_bytes());
    let payload = ArrayPayload::new(8, data).unwrap();
    assert_eq!(payload.len(), 2);
    assert_eq!(payload.elements().collect::<Vec<_>>(), [-2, 1 << 40]);
}

#[test]
fn payload_reports_nop_opcode() {
    let insn: Instruction = PackedSwitchPayload::new(0, vec![]).unwrap().into();
    assert_eq!(insn.opcode(), Opcode::Nop);
    assert!(insn.format().is_payload());
    assert_eq!(insn.format().size_in_code_units(), None);
}
