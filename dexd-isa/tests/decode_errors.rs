use dexd_isa::*;

#[test]
fn decode_empty_is_ok() {
    assert!(decode(&[]).unwrap().is_empty());
}

#[test]
fn decode_unused_opcode() {
    let err = decode(&[0x00, 0x00, 0x3e, 0x00]).unwrap_err();
    assert_eq!(err, DecodeError::InvalidOpcode(2));
    assert_eq!(err.offset(), 2);
}

#[test]
fn decode_truncated_mid_stream() {
    // nop, then the first code unit of a const-string
    let err = decode(&[0x00, 0x00, 0x1a, 0x00]).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated(2)), "got {err}");
}

#[test]
fn decode_odd_length() {
    let err = decode(&[0x00, 0x00, 0x00]).unwrap_err();
    assert_eq!(err, DecodeError::OddLength(3));
}

#[test]
fn decode_truncated_payload() {
    // packed-switch header claiming two targets, with none present
    let err = decode(&[0x00, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
    assert_eq!(err, DecodeError::Truncated(0));
}

#[test]
fn decode_array_payload_bad_width() {
    let bytes = [0x00, 0x03, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00];
    let err = decode(&bytes).unwrap_err();
    assert_eq!(err, DecodeError::InvalidPayload(0));
}

#[test]
fn nop_with_unknown_ident_is_a_nop() {
    let decoded = decode(&[0x00, 0x07]).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].0.opcode(), Opcode::Nop);
    assert_eq!(decoded[0].0.format(), Format::Format10x);
}

#[test]
fn lazy_decoder_stops_after_error() {
    let bytes = [0x0e, 0x00, 0xff, 0x00, 0x0e, 0x00];
    let mut decoder = Decoder::new(&bytes);
    assert!(matches!(decoder.next(), Some(Ok((0, _)))));
    assert_eq!(decoder.next(), Some(Err(DecodeError::InvalidOpcode(2))));
    assert_eq!(decoder.next(), None);
}
