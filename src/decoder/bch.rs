/// BCH codes protecting the format (15,5) and version (18,6) information.
///
/// Both codes have minimum distance 7, so a read word is corrected to the
/// unique valid codeword within Hamming distance 3, if there is one.

/// Format generator x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const FORMAT_GENERATOR: u32 = 0x537;
/// XOR mask applied to every format codeword
const FORMAT_MASK: u16 = 0x5412;
/// Version generator x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
const VERSION_GENERATOR: u32 = 0x1F25;
/// Largest correctable number of bit errors
const MAX_BIT_ERRORS: u32 = 3;

/// Remainder of `data << degree` divided by `generator`
fn bch_remainder(data: u32, generator: u32, degree: u32) -> u32 {
    let gen_bits = 32 - generator.leading_zeros();
    let mut rem = data << degree;
    while 32 - rem.leading_zeros() >= gen_bits {
        rem ^= generator << (32 - rem.leading_zeros() - gen_bits);
    }
    rem
}

/// BCH encoding and nearest-codeword correction
pub struct BchDecoder;

impl BchDecoder {
    /// Masked 15-bit format codeword for 5 data bits (2 EC level, 3 mask)
    pub fn format_codeword(data: u8) -> u16 {
        let data = (data & 0x1F) as u32;
        let word = (data << 10) | bch_remainder(data, FORMAT_GENERATOR, 10);
        word as u16 ^ FORMAT_MASK
    }

    /// 18-bit version codeword for versions 7..=40
    pub fn version_codeword(version: u8) -> u32 {
        let data = (version & 0x3F) as u32;
        (data << 12) | bch_remainder(data, VERSION_GENERATOR, 12)
    }

    /// Correct a masked format word read from the symbol, returning its 5
    /// data bits
    pub fn decode_format(raw: u16) -> Option<u8> {
        (0u8..32)
            .map(|data| (data, (Self::format_codeword(data) ^ raw).count_ones()))
            .filter(|&(_, dist)| dist <= MAX_BIT_ERRORS)
            .min_by_key(|&(_, dist)| dist)
            .map(|(data, _)| data)
    }

    /// Correct a version word read from the symbol, returning the version
    pub fn decode_version(raw: u32) -> Option<u8> {
        (7u8..=40)
            .map(|v| (v, (Self::version_codeword(v) ^ raw).count_ones()))
            .filter(|&(_, dist)| dist <= MAX_BIT_ERRORS)
            .min_by_key(|&(_, dist)| dist)
            .map(|(v, _)| v)
    }
}
