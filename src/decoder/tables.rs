use crate::models::ECLevel;

/// Block structure of one version and EC level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlockInfo {
    /// RS blocks in the symbol
    pub num_blocks: usize,
    /// ECC codewords in each block
    pub ecc_per_block: usize,
}

// Tables from the QR Code specification (Model 2) via Nayuki QR Code generator.
// Index: [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Block structure for `version` at `ec_level`; `None` outside 1..=40
pub fn ec_block_info(version: u8, ec_level: ECLevel) -> Option<EcBlockInfo> {
    if !(1..=40).contains(&version) {
        return None;
    }
    let idx = ec_level_index(ec_level);
    let ecc = ECC_CODEWORDS_PER_BLOCK[idx][version as usize];
    let blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][version as usize];
    if ecc <= 0 || blocks <= 0 {
        return None;
    }
    Some(EcBlockInfo {
        num_blocks: blocks as usize,
        ecc_per_block: ecc as usize,
    })
}

fn ec_level_index(ec_level: ECLevel) -> usize {
    match ec_level {
        ECLevel::L => 0,
        ECLevel::M => 1,
        ECLevel::Q => 2,
        ECLevel::H => 3,
    }
}

/// Modules available for data and ECC bits, remainder bits included
pub fn raw_data_modules(version: u8) -> usize {
    let v = version as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Total codewords (data plus ECC) of a version
pub fn total_codewords(version: u8) -> usize {
    raw_data_modules(version) / 8
}

/// Alignment pattern center coordinates along one axis, at most seven
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentPositions {
    coords: [usize; 7],
    len: usize,
}

impl AlignmentPositions {
    /// Coordinates in ascending order
    pub fn as_slice(&self) -> &[usize] {
        &self.coords[..self.len]
    }
}

/// Alignment pattern centers for a version; empty for version 1 and for
/// out-of-range versions.
pub fn alignment_pattern_positions(version: u8) -> AlignmentPositions {
    let mut positions = AlignmentPositions::default();
    if !(2..=40).contains(&version) {
        return positions;
    }
    let v = version as usize;
    let num_align = v / 7 + 2;
    let size = 17 + 4 * v;
    let step = if v == 32 {
        26
    } else {
        (v * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };

    positions.len = num_align;
    positions.coords[0] = 6;
    let mut pos = size - 7;
    for i in (1..num_align).rev() {
        positions.coords[i] = pos;
        pos = pos.saturating_sub(step);
    }
    positions
}

/// Segment mode indicators
pub const MODE_NUMERIC: u32 = 1;
/// Alphanumeric mode indicator
pub const MODE_ALPHA: u32 = 2;
/// Byte mode indicator
pub const MODE_BYTE: u32 = 4;
/// ECI designator mode indicator
pub const MODE_ECI: u32 = 7;
/// Kanji mode indicator
pub const MODE_KANJI: u32 = 8;

/// Width of the character count field for `mode` in `version`
pub fn char_count_bits(mode: u32, version: u8) -> usize {
    let column = match version {
        0..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    match mode {
        MODE_NUMERIC => [10, 12, 14][column],
        MODE_ALPHA => [9, 11, 13][column],
        MODE_BYTE => [8, 16, 16][column],
        MODE_KANJI => [8, 10, 12][column],
        _ => 0,
    }
}
