use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use super::Point;

/// Largest payload a decoded symbol can carry, in bytes
pub const MAX_PAYLOAD: usize = 2048;

/// QR code version (1-40, Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest Model 2 version
    pub const MIN: u8 = 1;
    /// Largest Model 2 version
    pub const MAX: u8 = 40;

    /// Version from its number, if in range
    pub fn new(number: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&number).then_some(Self(number))
    }

    /// Version whose symbol is `size` modules wide
    pub fn from_size(size: usize) -> Option<Self> {
        if size < 21 || (size - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((size - 17) / 4).ok().and_then(Self::new)
    }

    /// The version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Size in modules (width = height)
    pub fn size(&self) -> usize {
        4 * self.0 as usize + 17
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L = 0,
    /// Medium (~15% recovery capacity)
    M = 1,
    /// Quartile (~25% recovery capacity)
    Q = 2,
    /// High (~30% recovery capacity)
    H = 3,
}

impl ECLevel {
    /// Level from the two format-information bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// The two bits this level occupies in format information
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }
}

impl fmt::Display for ECLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ECLevel::L => "L",
            ECLevel::M => "M",
            ECLevel::Q => "Q",
            ECLevel::H => "H",
        };
        f.write_str(name)
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// Mask pattern from its three format bits
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => MaskPattern::Pattern0,
            1 => MaskPattern::Pattern1,
            2 => MaskPattern::Pattern2,
            3 => MaskPattern::Pattern3,
            4 => MaskPattern::Pattern4,
            5 => MaskPattern::Pattern5,
            6 => MaskPattern::Pattern6,
            _ => MaskPattern::Pattern7,
        }
    }

    /// Pattern number
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Whether the module at row `i`, column `j` is inverted by this mask
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// Set of segment modes present in a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct DataType(u8);

impl DataType {
    /// Numeric segment
    pub const NUMERIC: DataType = DataType(1);
    /// Alphanumeric segment
    pub const ALPHA: DataType = DataType(2);
    /// Byte segment
    pub const BYTE: DataType = DataType(4);
    /// Kanji segment
    pub const KANJI: DataType = DataType(8);

    /// No segments
    pub const fn empty() -> Self {
        DataType(0)
    }

    /// Raw bitmask
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// True if every mode in `other` is present
    pub fn contains(&self, other: DataType) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if no segment mode was recorded
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for DataType {
    type Output = DataType;

    fn bitor(self, rhs: DataType) -> DataType {
        DataType(self.0 | rhs.0)
    }
}

impl BitOrAssign for DataType {
    fn bitor_assign(&mut self, rhs: DataType) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (DataType::NUMERIC, "NUMERIC"),
            (DataType::ALPHA, "ALPHA"),
            (DataType::BYTE, "BYTE"),
            (DataType::KANJI, "KANJI"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("NONE")?;
        }
        Ok(())
    }
}

/// A decoded QR symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Image-space corners: top-left, top-right, bottom-right, bottom-left
    pub corners: [Point; 4],
    /// Symbol version
    pub version: Version,
    /// Error correction level
    pub ecc_level: ECLevel,
    /// Mask pattern used
    pub mask: MaskPattern,
    /// Modes seen while parsing the payload
    pub data_type: DataType,
    /// Decoded bytes (at most [`MAX_PAYLOAD`])
    pub payload: Vec<u8>,
    /// Last ECI designator seen, 0 if none
    pub eci: u32,
}

impl Symbol {
    /// Length of the payload in bytes
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Payload rendered as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}
