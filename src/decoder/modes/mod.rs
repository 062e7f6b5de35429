//! QR code data mode decoders
//!
//! Each decoder reads one segment body from a [`BitReader`] and appends its
//! bytes to a [`Payload`]:
//! - Numeric: digits in groups of three
//! - Alphanumeric: 45-character set in pairs
//! - Byte: raw 8-bit data
//! - Kanji: 13-bit Shift-JIS code units
//! - ECI: channel designators, no payload bytes

/// Alphanumeric mode (0010)
pub mod alphanumeric;
/// Byte mode (0100)
pub mod byte;
/// ECI designator (0111)
pub mod eci;
/// Kanji mode (1000)
pub mod kanji;
/// Numeric mode (0001)
pub mod numeric;

use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;
use crate::models::{DataType, MAX_PAYLOAD};

/// Bounded payload under construction
#[derive(Debug, Default)]
pub struct Payload {
    bytes: Vec<u8>,
    /// Modes seen so far
    pub data_type: DataType,
    /// Last ECI designator, 0 if none
    pub eci: u32,
}

impl Payload {
    /// Empty payload with its full capacity reserved up front
    pub fn new() -> Result<Self, DecodeError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(MAX_PAYLOAD)?;
        Ok(Self {
            bytes,
            data_type: DataType::empty(),
            eci: 0,
        })
    }

    /// Fail with [`DecodeError::DataOverflow`] unless `n` more bytes fit
    pub fn ensure(&self, n: usize) -> Result<(), DecodeError> {
        if self.bytes.len() + n > MAX_PAYLOAD {
            return Err(DecodeError::DataOverflow);
        }
        Ok(())
    }

    /// Append bytes already accounted for by [`Payload::ensure`]
    pub fn extend(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Bytes decoded so far
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if nothing was decoded
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Read a fixed-width group and reject values at or above `limit`
pub(crate) fn read_tuple(reader: &mut BitReader<'_>, bits: usize, limit: u32) -> Result<u32, DecodeError> {
    let value = reader.read(bits)?;
    if value >= limit {
        return Err(DecodeError::UnknownDataType);
    }
    Ok(value)
}
