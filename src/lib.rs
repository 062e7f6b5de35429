//! Fixed-memory QR code recognition and decoding engine
//!
//! Finds QR symbols in 8-bit grayscale frames and decodes them:
//! - Otsu thresholding (global or bilinear), with optional frame-to-frame bias
//! - Span flood fill labeling and 1:1:3:1:1 capstone scanning
//! - Capstone grouping, alignment search and perspective refinement
//! - Format/version BCH correction, Reed-Solomon, and segment parsing
//!
//! Every per-frame table has a fixed capacity allocated by
//! [`Engine::resize`]; identification never allocates.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Engine configuration and environment overrides
pub mod config;
/// QR code decoding modules (format, version, Reed-Solomon, data modes)
pub mod decoder;
/// QR code detection modules (regions, capstones, grids, perspective)
pub mod detector;
/// Frame lifecycle and per-grid decoding
pub mod engine;
/// Decode error codes
pub mod error;
/// Core data structures (Symbol, RawCode, BitMatrix, Point, etc.)
pub mod models;
/// Utility functions (binarization, geometry)
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use config::EngineConfig;
pub use engine::{Engine, EngineState};
pub use error::{DecodeError, status_str};
pub use models::{BitMatrix, DataType, ECLevel, MaskPattern, Point, RawCode, Symbol, Version};
pub use utils::binarization::ThresholdMode;

use log::debug;

/// Find and decode up to `capacity` QR symbols in a grayscale buffer.
///
/// `gray` is row-major, one byte per pixel. A buffer shorter than
/// `width * height` yields no symbols. Grids that fail to decode are
/// skipped; only an allocation failure is reported as an error.
/// Uses [`EngineConfig::global`].
pub fn decode_grayscale(
    gray: &[u8],
    width: usize,
    height: usize,
    capacity: usize,
) -> Result<Vec<Symbol>, DecodeError> {
    let area = width.checked_mul(height).ok_or(DecodeError::AllocFailed)?;
    if area == 0 || gray.len() < area || capacity == 0 {
        return Ok(Vec::new());
    }

    let config = *EngineConfig::global();
    let mut engine = Engine::with_config(config);
    engine.resize(width, height)?;
    engine.begin().copy_from_slice(&gray[..area]);
    engine.end(config.find_inverted);

    let mut symbols = Vec::new();
    for (index, result) in engine.decode_all().into_iter().enumerate() {
        match result {
            Ok(symbol) => {
                if symbols.len() < capacity {
                    symbols.push(symbol);
                }
            }
            Err(DecodeError::AllocFailed) => return Err(DecodeError::AllocFailed),
            Err(err) => debug!("grid {} skipped: {}", index, err),
        }
    }
    Ok(symbols)
}

/// [`decode_grayscale`] on a luma image
pub fn decode_image(image: &image::GrayImage, capacity: usize) -> Result<Vec<Symbol>, DecodeError> {
    let (width, height) = image.dimensions();
    decode_grayscale(image.as_raw(), width as usize, height as usize, capacity)
}
