/// Kanji mode decoder (Mode 1000): 13-bit values expanded to Shift-JIS pairs
use super::Payload;
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Kanji segment reader
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Append `count` characters as Shift-JIS byte pairs
    pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Payload) -> Result<(), DecodeError> {
        out.ensure(count * 2)?;
        for _ in 0..count {
            let val = reader.read(13)? as u16;
            let mut intermediate = ((val / 0xC0) << 8) | (val % 0xC0);
            if intermediate < 0x1F00 {
                intermediate += 0x8140;
            } else {
                intermediate += 0xC140;
            }
            out.extend(&intermediate.to_be_bytes());
        }
        Ok(())
    }
}
