//! Utility functions for image processing
//!
//! - Binarization (Otsu's method, global or bilinear)
//! - Geometry (perspective transforms, line intersection)

/// Otsu thresholding and the adaptive bias
pub mod binarization;
/// Perspective transforms and line intersection
pub mod geometry;
