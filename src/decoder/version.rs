/// Version information for QR codes v7+
use log::trace;

use crate::decoder::bch::BchDecoder;
use crate::error::DecodeError;
use crate::models::{BitMatrix, Version};

/// Version info is 18 bits (6 data + 12 ECC), one 6x3 block beside each of
/// the top-right and bottom-left finders
pub struct VersionInfo;

impl VersionInfo {
    /// Version implied by the grid size, checked against the encoded version
    /// information when the symbol carries one.
    pub fn read(matrix: &BitMatrix) -> Result<Version, DecodeError> {
        if matrix.height() != matrix.width() {
            return Err(DecodeError::InvalidGridSize);
        }
        let version = Self::from_size(matrix.width())?;
        if version.number() < 7 {
            return Ok(version);
        }

        let encoded = Self::decode_either(matrix).ok_or(DecodeError::FormatEcc)?;
        if encoded != version.number() {
            trace!("version info says {} but grid is version {}", encoded, version);
            return Err(DecodeError::InvalidVersion);
        }
        Ok(version)
    }

    /// Version of a `size` x `size` grid, without looking at its modules
    pub fn from_size(size: usize) -> Result<Version, DecodeError> {
        if size < 21 || (size - 17) % 4 != 0 {
            return Err(DecodeError::InvalidGridSize);
        }
        Version::from_size(size).ok_or(DecodeError::InvalidVersion)
    }

    fn decode_either(matrix: &BitMatrix) -> Option<u8> {
        BchDecoder::decode_version(Self::read_bits(matrix, false))
            .or_else(|| BchDecoder::decode_version(Self::read_bits(matrix, true)))
    }

    /// Bit i sits at (size - 11 + i % 3, i / 3) above the top-right finder
    /// copy; the bottom-left copy is its transpose.
    fn read_bits(matrix: &BitMatrix, transposed: bool) -> u32 {
        let size = matrix.width();
        let mut bits = 0u32;
        for i in 0..18 {
            let a = size - 11 + i % 3;
            let b = i / 3;
            let dark = if transposed { matrix.get(b, a) } else { matrix.get(a, b) };
            bits |= (dark as u32) << i;
        }
        bits
    }
}
