/// Numeric mode decoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
use super::{Payload, read_tuple};
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Decimal digit segment reader
pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `count` digits into `out`
    pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Payload) -> Result<(), DecodeError> {
        out.ensure(count)?;
        let mut remaining = count;

        while remaining > 0 {
            let group = remaining.min(3);
            let (bits, limit) = match group {
                3 => (10, 1000),
                2 => (7, 100),
                _ => (4, 10),
            };
            let mut value = read_tuple(reader, bits, limit)?;

            let mut digits = [0u8; 3];
            for d in digits[..group].iter_mut().rev() {
                *d = b'0' + (value % 10) as u8;
                value /= 10;
            }
            out.extend(&digits[..group]);
            remaining -= group;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_decode() {
        // 017 in 10 bits, then 5 in 4 bits
        let data = [0b0000_0100, 0b0101_0100];
        let mut reader = BitReader::new(&data);
        let mut out = Payload::new().unwrap();
        NumericDecoder::decode(&mut reader, 4, &mut out).unwrap();
        assert_eq!(out.into_bytes(), b"0175");
    }

    #[test]
    fn test_numeric_rejects_out_of_range_group() {
        // 1023 is not a three-digit group
        let data = [0xFF, 0xC0];
        let mut reader = BitReader::new(&data);
        let mut out = Payload::new().unwrap();
        assert_eq!(
            NumericDecoder::decode(&mut reader, 3, &mut out),
            Err(DecodeError::UnknownDataType)
        );
    }

    #[test]
    fn test_numeric_underflow() {
        let data = [0x00];
        let mut reader = BitReader::new(&data);
        let mut out = Payload::new().unwrap();
        assert_eq!(
            NumericDecoder::decode(&mut reader, 3, &mut out),
            Err(DecodeError::DataUnderflow)
        );
    }
}
