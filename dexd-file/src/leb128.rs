use crate::error::{Error, Result};

/// Decode an unsigned LEB128 value from `data` starting at `offset`.
/// Returns (value, bytes_consumed).
pub fn decode_uleb128(data: &[u8], offset: usize) -> Result<(u32, usize)> {
    let mut result: u32 = 0;
    let mut shift = 0u32;
    let mut pos = offset;

    loop {
        let Some(&byte) = data.get(pos) else {
            return Err(Error::InvalidLeb128(offset));
        };
        pos += 1;

        // Fifth byte carries only the top four bits of a u32.
        if shift == 28 && (byte & 0x70) != 0 {
            return Err(Error::InvalidLeb128(offset));
        }
        result |= ((byte & 0x7f) as u32) << shift;
        if byte & 0x80 == 0 {
            return Ok((result, pos - offset));
        }
        shift += 7;
        if shift >= 35 {
            return Err(Error::InvalidLeb128(offset));
        }
    }
}

pub fn encode_uleb128(mut value: u32, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uleb128() {
        assert_eq!(decode_uleb128(&[0x00], 0).unwrap(), (0, 1));
        assert_eq!(decode_uleb128(&[0x7f], 0).unwrap(), (127, 1));
        assert_eq!(decode_uleb128(&[0x80, 0x01], 0).unwrap(), (128, 2));
        assert_eq!(decode_uleb128(&[0xe5, 0x8e, 0x26], 0).unwrap(), (624485, 3));
        assert_eq!(
            decode_uleb128(&[0xff, 0xff, 0xff, 0xff, 0x0f], 0).unwrap(),
            (u32::MAX, 5)
        );
    }

    #[test]
    fn test_uleb128_rejects_overflow() {
        assert!(decode_uleb128(&[0xff, 0xff, 0xff, 0xff, 0x1f], 0).is_err());
        assert!(decode_uleb128(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01], 0).is_err());
        assert_eq!(decode_uleb128(&[0x80], 0), Err(Error::InvalidLeb128(0)));
    }

    #[test]
    fn test_encode_matches_decode() {
        for value in [0u32, 1, 127, 128, 624485, u32::MAX] {
            let mut out = Vec::new();
            encode_uleb128(value, &mut out);
            assert_eq!(decode_uleb128(&out, 0).unwrap(), (value, out.len()));
        }
    }
}
