//! Decoding of a sampled module grid into a [`Symbol`]
use log::debug;

use crate::decoder::bitstream::BitstreamExtractor;
use crate::decoder::format::FormatInfo;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::tables::total_codewords;
use crate::decoder::unmask::unmask;
use crate::decoder::version::VersionInfo;
use crate::error::DecodeError;
use crate::models::{RawCode, Symbol};

mod payload;


/// Main QR decoder - wires everything together
pub struct QrDecoder;

impl QrDecoder {
    /// Decode a sampled grid.
    ///
    /// Checks run in order: grid size, version range, format information,
    /// version information, data ECC, then segment parsing.
    pub fn decode(raw: &RawCode) -> Result<Symbol, DecodeError> {
        let matrix = &raw.cells;
        VersionInfo::from_size(raw.size)?;
        let format = FormatInfo::read(matrix)?;
        let version = VersionInfo::read(matrix)?;

        let func = FunctionMask::new(version.number());
        let mut unmasked = matrix.clone();
        unmask(&mut unmasked, &format.mask_pattern, &func);

        let total = total_codewords(version.number());
        let mut codewords = Vec::new();
        codewords.try_reserve_exact(total)?;
        BitstreamExtractor::extract_codewords(&unmasked, &func, total, &mut codewords);

        let data = payload::deinterleave_and_correct(&codewords, version.number(), format.ec_level)?;
        let parsed = payload::decode_payload(&data, version.number())?;
        debug!(
            "decoded version {} level {} mask {}: {} bytes ({})",
            version,
            format.ec_level,
            format.mask_pattern.number(),
            parsed.len(),
            parsed.data_type
        );

        Ok(Symbol {
            corners: raw.corners,
            version,
            ecc_level: format.ec_level,
            mask: format.mask_pattern,
            data_type: parsed.data_type,
            eci: parsed.eci,
            payload: parsed.into_bytes(),
        })
    }
}
