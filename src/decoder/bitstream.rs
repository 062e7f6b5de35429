/// Codeword extraction from the module matrix and bit-level reading
use crate::decoder::function_mask::FunctionMask;
use crate::error::DecodeError;
use crate::models::BitMatrix;

/// Reads data modules in the standard two-column zigzag
pub struct BitstreamExtractor;

impl BitstreamExtractor {
    /// Pack data modules MSB-first into `out`, stopping after `count` whole
    /// codewords; trailing remainder bits are ignored.
    pub fn extract_codewords(matrix: &BitMatrix, func: &FunctionMask, count: usize, out: &mut Vec<u8>) {
        let dimension = matrix.width();
        let mut byte = 0u8;
        let mut nbits = 0;
        let mut upward = true;
        let mut col = dimension as i32 - 1;

        while col > 0 && out.len() < count {
            // The vertical timing line shifts the pairing by one
            if col == 6 {
                col -= 1;
            }
            for step in 0..dimension {
                let row = if upward { dimension - 1 - step } else { step };
                for c in [col as usize, col as usize - 1] {
                    if func.is_function(c, row) {
                        continue;
                    }
                    byte = (byte << 1) | matrix.get(c, row) as u8;
                    nbits += 1;
                    if nbits == 8 {
                        if out.len() == count {
                            return;
                        }
                        out.push(byte);
                        byte = 0;
                        nbits = 0;
                    }
                }
            }
            upward = !upward;
            col -= 2;
        }
    }
}

/// MSB-first reader over corrected data codewords
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Reader positioned at the first bit of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bits left to read
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Read `n` bits (at most 32) as an unsigned value
    pub fn read(&mut self, n: usize) -> Result<u32, DecodeError> {
        if n > self.remaining() || n > 32 {
            return Err(DecodeError::DataUnderflow);
        }
        let mut value = 0u32;
        for _ in 0..n {
            let bit = (self.data[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.pos += 1;
        }
        Ok(value)
    }
}
