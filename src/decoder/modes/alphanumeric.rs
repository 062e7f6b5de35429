/// Alphanumeric mode decoder (Mode 0010)
/// Pairs = 11 bits, single = 6 bits
use super::{Payload, read_tuple};
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
const ALPHANUMERIC_TABLE: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Alphanumeric segment reader
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Append `count` characters from the 45-symbol set
    pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Payload) -> Result<(), DecodeError> {
        out.ensure(count)?;
        let mut remaining = count;

        while remaining >= 2 {
            let value = read_tuple(reader, 11, 45 * 45)? as usize;
            out.extend(&[ALPHANUMERIC_TABLE[value / 45], ALPHANUMERIC_TABLE[value % 45]]);
            remaining -= 2;
        }
        if remaining == 1 {
            let value = read_tuple(reader, 6, 45)? as usize;
            out.extend(&[ALPHANUMERIC_TABLE[value]]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphanumeric_decode() {
        // "A1" = 10 * 45 + 1 = 451 in 11 bits, then ':' = 44 in 6 bits
        let data = [0b0011_1000, 0b0111_0110, 0b0000_0000];
        let mut reader = BitReader::new(&data);
        let mut out = Payload::new().unwrap();
        AlphanumericDecoder::decode(&mut reader, 3, &mut out).unwrap();
        assert_eq!(out.into_bytes(), b"A1:");
    }

    #[test]
    fn test_alphanumeric_rejects_bad_pair() {
        // 2047 >= 45 * 45
        let data = [0xFF, 0xE0];
        let mut reader = BitReader::new(&data);
        let mut out = Payload::new().unwrap();
        assert_eq!(
            AlphanumericDecoder::decode(&mut reader, 2, &mut out),
            Err(DecodeError::UnknownDataType)
        );
    }
}
