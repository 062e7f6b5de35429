//! Core data structures

/// Bit grid of sampled modules
pub mod matrix;
/// Image-space points
pub mod point;
/// Symbol metadata and the decoded symbol
pub mod qr_code;
/// Sampled grid handed from detection to decoding
pub mod raw_code;

pub use matrix::BitMatrix;
pub use point::Point;
pub use qr_code::{DataType, ECLevel, MAX_PAYLOAD, MaskPattern, Symbol, Version};
pub use raw_code::RawCode;
