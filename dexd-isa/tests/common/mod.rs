use dexd_isa::*;

pub fn assert_roundtrip(program: &[Instruction]) {
    let (bytes, addresses) = encode(program).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.len(), program.len(), "length mismatch");
    for (i, (a, (b, address))) in program.iter().zip(&decoded).enumerate() {
        assert_eq!(a, b, "mismatch at {i}: {a} vs {b}");
        assert_eq!(addresses[i], *address, "address mismatch at {i}");
    }
}
