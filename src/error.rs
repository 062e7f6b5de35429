use thiserror::Error;

/// Per-symbol decode failure.
///
/// Success is represented by `Ok(..)`; every failure a decode or a buffer
/// allocation can produce is one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DecodeError {
    /// Grid index out of range, or a sampled grid whose size is not `4v + 17`
    #[error("Invalid grid size")]
    InvalidGridSize,
    /// Version outside 1..=40, or version info contradicting the grid size
    #[error("Invalid version")]
    InvalidVersion,
    /// Format or version information could not be corrected
    #[error("Format data ECC failure")]
    FormatEcc,
    /// A Reed-Solomon block had more errors than it can correct
    #[error("ECC failure")]
    DataEcc,
    /// Unrecognized segment mode indicator
    #[error("Unknown data type")]
    UnknownDataType,
    /// Decoded payload does not fit in the payload buffer
    #[error("Data overflow")]
    DataOverflow,
    /// Bit stream ended in the middle of a segment
    #[error("Data underflow")]
    DataUnderflow,
    /// Buffer or scratch allocation failed
    #[error("Allocation failed")]
    AllocFailed,
}

impl DecodeError {
    /// Human-readable description of the error.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeError::InvalidGridSize => "Invalid grid size",
            DecodeError::InvalidVersion => "Invalid version",
            DecodeError::FormatEcc => "Format data ECC failure",
            DecodeError::DataEcc => "ECC failure",
            DecodeError::UnknownDataType => "Unknown data type",
            DecodeError::DataOverflow => "Data overflow",
            DecodeError::DataUnderflow => "Data underflow",
            DecodeError::AllocFailed => "Allocation failed",
        }
    }
}

impl From<std::collections::TryReserveError> for DecodeError {
    fn from(_: std::collections::TryReserveError) -> Self {
        DecodeError::AllocFailed
    }
}

/// Maps any decode outcome, success included, to a status string.
pub fn status_str<T>(result: &Result<T, DecodeError>) -> &'static str {
    match result {
        Ok(_) => "Success",
        Err(err) => err.as_str(),
    }
}
