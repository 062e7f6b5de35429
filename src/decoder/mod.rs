//! QR code decoding modules
//!
//! Everything after a grid has been sampled:
//! - Format and version information (BCH)
//! - Unmasking and codeword extraction
//! - De-interleaving and Reed-Solomon correction
//! - Segment parsing (numeric, alphanumeric, byte, kanji, ECI)

/// BCH error correction for format and version info
pub mod bch;
/// Codeword extraction and bit reading
pub mod bitstream;
/// Format information extraction (mask pattern, EC level)
pub mod format;
/// Function module mask builder (finder/timing/format/alignment/version)
pub mod function_mask;
/// Data mode decoders
pub mod modes;
/// Main QR decoder that orchestrates the decoding pipeline
pub mod qr_decoder;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// Version tables (block structure, alignment positions, capacities)
pub mod tables;
/// QR code unmasking (removes mask patterns)
pub mod unmask;
/// Version information extraction (versions 7-40)
pub mod version;

use crate::error::DecodeError;
use crate::models::{RawCode, Symbol};

/// Decode one sampled grid
pub fn decode(raw: &RawCode) -> Result<Symbol, DecodeError> {
    qr_decoder::QrDecoder::decode(raw)
}
