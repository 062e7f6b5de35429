//! Engine configuration, with an environment-driven process default
use std::sync::OnceLock;

use crate::utils::binarization::ThresholdMode;

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

fn parse_env_threshold_mode(name: &str, default: ThresholdMode) -> ThresholdMode {
    match std::env::var(name) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "global" => ThresholdMode::Global,
            "bilinear" => ThresholdMode::Bilinear,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Per-engine recognition settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Global or bilinear Otsu thresholding
    pub threshold_mode: ThresholdMode,
    /// Apply and update the timing-pattern threshold bias across frames
    pub adaptive_threshold: bool,
    /// Used by the one-shot API: retry on the inverted image when a frame
    /// has no grids
    pub find_inverted: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold_mode: ThresholdMode::Global,
            adaptive_threshold: false,
            find_inverted: true,
        }
    }
}

static GLOBAL_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

impl EngineConfig {
    /// Defaults overridden by `QR_THRESHOLD_MODE` (`global`/`bilinear`),
    /// `QR_ADAPTIVE_THRESHOLD` and `QR_FIND_INVERTED` (0/1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            threshold_mode: parse_env_threshold_mode("QR_THRESHOLD_MODE", defaults.threshold_mode),
            adaptive_threshold: parse_env_bool_u8("QR_ADAPTIVE_THRESHOLD", defaults.adaptive_threshold),
            find_inverted: parse_env_bool_u8("QR_FIND_INVERTED", defaults.find_inverted),
        }
    }

    /// Process-wide configuration, read from the environment once
    pub fn global() -> &'static EngineConfig {
        GLOBAL_CONFIG.get_or_init(Self::from_env)
    }
}
