/// Byte mode decoder (Mode 0100) for 8-bit data
use super::Payload;
use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Raw 8-bit segment reader
pub struct ByteDecoder;

impl ByteDecoder {
    /// Copy `count` bytes; text interpretation is left to the caller
    pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Payload) -> Result<(), DecodeError> {
        out.ensure(count)?;
        if reader.remaining() < count * 8 {
            return Err(DecodeError::DataUnderflow);
        }
        for _ in 0..count {
            let byte = reader.read(8)? as u8;
            out.extend(&[byte]);
        }
        Ok(())
    }
}
