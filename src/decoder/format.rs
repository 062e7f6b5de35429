/// Format information: EC level and mask pattern
use log::trace;

use crate::decoder::bch::BchDecoder;
use crate::error::DecodeError;
use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// Positions of bits 0..14 of the copy around the top-left finder
const PRIMARY_XS: [usize; 15] = [8, 8, 8, 8, 8, 8, 8, 8, 7, 5, 4, 3, 2, 1, 0];
const PRIMARY_YS: [usize; 15] = [0, 1, 2, 3, 4, 5, 7, 8, 8, 8, 8, 8, 8, 8, 8];

/// Format info is 15 bits (5 data + 10 ECC), stored twice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Data mask
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// Read and correct the format information, trying the top-left copy
    /// first and the copy split along the other two finders second.
    pub fn read(matrix: &BitMatrix) -> Result<Self, DecodeError> {
        let primary = Self::read_primary(matrix);
        if let Some(data) = BchDecoder::decode_format(primary) {
            return Ok(Self::from_data(data));
        }
        trace!("primary format copy {:#06x} uncorrectable", primary);

        let secondary = Self::read_secondary(matrix);
        match BchDecoder::decode_format(secondary) {
            Some(data) => Ok(Self::from_data(data)),
            None => {
                trace!("secondary format copy {:#06x} uncorrectable", secondary);
                Err(DecodeError::FormatEcc)
            }
        }
    }

    fn from_data(data: u8) -> Self {
        Self {
            ec_level: ECLevel::from_format_bits(data >> 3),
            mask_pattern: MaskPattern::from_bits(data),
        }
    }

    fn read_primary(matrix: &BitMatrix) -> u16 {
        (0..15)
            .rev()
            .fold(0u16, |acc, i| (acc << 1) | matrix.get(PRIMARY_XS[i], PRIMARY_YS[i]) as u16)
    }

    /// Bits 0..7 run leftward along row 8 under the top-right finder, bits
    /// 8..14 run down column 8 beside the bottom-left finder.
    fn read_secondary(matrix: &BitMatrix) -> u16 {
        let size = matrix.width();
        let mut bits = 0u16;
        for i in 0..8 {
            bits |= (matrix.get(size - 1 - i, 8) as u16) << i;
        }
        for i in 8..15 {
            bits |= (matrix.get(8, size - 15 + i) as u16) << i;
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_format(matrix: &mut BitMatrix, word: u16, primary: bool, secondary: bool) {
        let size = matrix.width();
        for i in 0..15 {
            let bit = (word >> i) & 1 != 0;
            if primary {
                matrix.set(PRIMARY_XS[i], PRIMARY_YS[i], bit);
            }
            if secondary {
                if i < 8 {
                    matrix.set(size - 1 - i, 8, bit);
                } else {
                    matrix.set(8, size - 15 + i, bit);
                }
            }
        }
    }

    #[test]
    fn test_read_both_copies() {
        let mut matrix = BitMatrix::new(21, 21);
        let word = BchDecoder::format_codeword((ECLevel::Q.format_bits() << 3) | 5);
        place_format(&mut matrix, word, true, true);
        let info = FormatInfo::read(&matrix).unwrap();
        assert_eq!(info.ec_level, ECLevel::Q);
        assert_eq!(info.mask_pattern, MaskPattern::Pattern5);
    }

    #[test]
    fn test_falls_back_to_secondary_copy() {
        let mut matrix = BitMatrix::new(25, 25);
        let word = BchDecoder::format_codeword((ECLevel::H.format_bits() << 3) | 2);
        place_format(&mut matrix, word, false, true);
        // primary copy smashed beyond repair
        place_format(&mut matrix, word ^ 0x00FF, true, false);
        let info = FormatInfo::read(&matrix).unwrap();
        assert_eq!(info.ec_level, ECLevel::H);
        assert_eq!(info.mask_pattern, MaskPattern::Pattern2);
    }

    #[test]
    fn test_blank_matrix_fails() {
        // all-light reads 0, more than 3 bits from every masked codeword
        let matrix = BitMatrix::new(21, 21);
        assert_eq!(FormatInfo::read(&matrix), Err(DecodeError::FormatEcc));
    }
}
