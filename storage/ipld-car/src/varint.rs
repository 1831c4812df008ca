//! Unsigned LEB128 varints, as used by the multiformats family.
//!
//! Encoding is delegated to [`integer_encoding::VarInt`]; decoding adds the
//! bounds checking the CAR framing needs, since `VarInt::decode_var` reports
//! both a truncated buffer and an oversized encoding as `None`.

use integer_encoding::VarInt;

use crate::Error;

/// Most-significant byte, == 0x80
const MSB: u8 = 0b1000_0000;

/// Maximum number of bytes an encoded `u64` can span.
pub(crate) const MAX_VARINT_LEN: usize = 10;

/// Append the minimal encoding of `n` to `out`, returning the number of bytes written.
pub(crate) fn write(n: u64, out: &mut Vec<u8>) -> usize {
    let mut buf = [0_u8; MAX_VARINT_LEN];
    let written = n.encode_var(&mut buf);
    out.extend_from_slice(&buf[..written]);
    written
}

/// Length of the minimal encoding of `n`.
pub(crate) fn encoded_len(n: u64) -> usize {
    n.required_space()
}

/// Decode a varint from the start of `buffer`.
///
/// Returns the value and the number of bytes it occupied. `offset` is the
/// position of `buffer` within the enclosing CAR and is only used for errors.
pub(crate) fn decode(buffer: &[u8], offset: usize) -> Result<(u64, usize), Error> {
    let terminator = buffer
        .iter()
        .take(MAX_VARINT_LEN)
        .position(|byte| byte & MSB == 0);

    let Some(last) = terminator else {
        if buffer.len() < MAX_VARINT_LEN {
            return Err(Error::TruncatedVarintError { offset });
        }
        return Err(Error::VarintOverflowError { offset });
    };

    // The tenth byte may only carry the single remaining bit of a u64
    if last == MAX_VARINT_LEN - 1 && buffer[last] > 1 {
        return Err(Error::VarintOverflowError { offset });
    }

    u64::decode_var(&buffer[..=last]).ok_or(Error::VarintOverflowError { offset })
}

/// Same as [`decode`] but for values used as in-memory lengths.
pub(crate) fn decode_usize(buffer: &[u8], offset: usize) -> Result<(usize, usize), Error> {
    let (value, read) = decode(buffer, offset)?;
    let value = usize::try_from(value).map_err(|_| {
        Error::InvalidArgumentError(format!(
            "length {value} at offset {offset} does not fit in memory"
        ))
    })?;
    Ok((value, read))
}

#[cfg(test)]
mod tests {
    use integer_encoding::VarInt;
    use rstest::rstest;

    use super::{decode, decode_usize, encoded_len, write};
    use crate::Error;

    fn encode(value: u64) -> Vec<u8> {
        let mut out = vec![];
        write(value, &mut out);
        out
    }

    #[rstest]
    #[case(0, &[0x00])]
    #[case(1, &[0x01])]
    #[case(127, &[0x7f])]
    #[case(128, &[0x80, 0x01])]
    #[case(300, &[0xac, 0x02])]
    #[case(16383, &[0xff, 0x7f])]
    #[case(16384, &[0x80, 0x80, 0x01])]
    #[case(u32::MAX as u64, &[0xff, 0xff, 0xff, 0xff, 0x0f])]
    #[case(u64::MAX, &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01])]
    fn minimal_encoding(#[case] value: u64, #[case] expected: &[u8]) {
        let encoded = encode(value);
        assert_eq!(encoded, expected);
        assert_eq!(encoded_len(value), expected.len());
        assert_eq!(decode(&encoded, 0).unwrap(), (value, expected.len()));
        assert_eq!(encoded, value.encode_var_vec());
    }

    #[test]
    fn decode_stops_at_terminator() {
        // Trailing bytes belong to whatever follows the varint
        let buffer = [0x80, 0x01, 0xff, 0xff];
        assert_eq!(decode(&buffer, 0).unwrap(), (128, 2));
    }

    #[test]
    fn write_appends() {
        let mut out = vec![0xaa];
        assert_eq!(write(16384, &mut out), 3);
        assert_eq!(out, [0xaa, 0x80, 0x80, 0x01]);
    }

    #[rstest]
    #[case(&[])]
    #[case(&[0x80])]
    #[case(&[0xff, 0xff, 0x80])]
    fn truncated(#[case] buffer: &[u8]) {
        assert!(matches!(
            decode(buffer, 7),
            Err(Error::TruncatedVarintError { offset: 7 })
        ));
    }

    #[test]
    fn overflow() {
        let too_long = [0xff; 11];
        assert!(matches!(
            decode(&too_long, 0),
            Err(Error::VarintOverflowError { offset: 0 })
        ));

        let tenth_byte_too_big = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
        assert!(matches!(
            decode(&tenth_byte_too_big, 0),
            Err(Error::VarintOverflowError { offset: 0 })
        ));
    }

    #[test]
    fn usize_lengths() {
        assert_eq!(decode_usize(&[0xac, 0x02], 0).unwrap(), (300, 2));
    }
}
