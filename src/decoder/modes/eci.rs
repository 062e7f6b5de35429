/// ECI designator (Mode 0111): 1, 2 or 3 bytes chosen by the leading bits
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// ECI designator reader
pub struct EciDecoder;

impl EciDecoder {
    /// `0xxxxxxx`, `10xxxxxx xxxxxxxx` or `110xxxxx xxxxxxxx xxxxxxxx`
    pub fn decode(reader: &mut BitReader<'_>) -> Result<u32, DecodeError> {
        let first = reader.read(8)?;
        if first & 0x80 == 0 {
            Ok(first & 0x7F)
        } else if first & 0xC0 == 0x80 {
            Ok(((first & 0x3F) << 8) | reader.read(8)?)
        } else if first & 0xE0 == 0xC0 {
            Ok(((first & 0x1F) << 16) | reader.read(16)?)
        } else {
            Err(DecodeError::UnknownDataType)
        }
    }
}
