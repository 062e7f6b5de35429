//! Recognition engine: owns one frame's buffers and drives a frame through
//! thresholding, identification and decoding.
use log::debug;
use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::decoder;
use crate::detector::Frame;
use crate::error::DecodeError;
use crate::models::{RawCode, Symbol};
use crate::utils::binarization::{self, ThresholdBias};

/// Where an [`Engine`] is in its frame cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No buffers yet; call [`Engine::resize`]
    Uninitialized,
    /// Buffers allocated, no frame started
    Sized,
    /// Caller is writing grayscale pixels
    Filling,
    /// Grids are available for extraction and decoding
    Identified,
}

/// Reusable QR recognizer.
///
/// ```no_run
/// use rust_qr_engine::Engine;
///
/// let (width, height) = (640, 480);
/// let gray = vec![255u8; width * height];
///
/// let mut engine = Engine::new();
/// engine.resize(width, height)?;
/// engine.begin().copy_from_slice(&gray);
/// engine.end(false);
/// for result in engine.decode_all() {
///     if let Ok(symbol) = result {
///         println!("{}", symbol.text());
///     }
/// }
/// # Ok::<(), rust_qr_engine::DecodeError>(())
/// ```
#[derive(Debug)]
pub struct Engine {
    frame: Frame,
    state: EngineState,
    config: EngineConfig,
    bias: ThresholdBias,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Engine with an explicit configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            frame: Frame::default(),
            state: EngineState::Uninitialized,
            config,
            bias: ThresholdBias::default(),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// (Re)allocate buffers for `width` x `height` frames.
    ///
    /// On failure the previous buffers are kept.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), DecodeError> {
        self.frame = Frame::new(width, height)?;
        self.state = EngineState::Sized;
        Ok(())
    }

    /// Start a frame: clear the per-frame tables and hand out the grayscale
    /// buffer (`width * height` bytes, row-major). Empty before
    /// [`Engine::resize`].
    pub fn begin(&mut self) -> &mut [u8] {
        if self.state == EngineState::Uninitialized {
            return &mut [];
        }
        self.frame.reset_tables();
        self.state = EngineState::Filling;
        self.frame.pixels_mut()
    }

    /// Finish a frame: threshold it and identify grids.
    ///
    /// With `find_inverted`, a frame with no grids is inverted and searched
    /// once more. Does nothing unless a frame was started with
    /// [`Engine::begin`].
    pub fn end(&mut self, find_inverted: bool) {
        if self.state != EngineState::Filling {
            debug!("end() called in state {:?}; ignored", self.state);
            return;
        }

        let offset = if self.config.adaptive_threshold {
            self.bias.offset()
        } else {
            0
        };
        let (width, height) = (self.frame.width(), self.frame.height());
        binarization::threshold(
            self.frame.pixels_mut(),
            width,
            height,
            self.config.threshold_mode,
            offset,
            false,
        );
        self.frame.identify();

        if self.frame.grids().is_empty() && find_inverted {
            debug!("no grids; retrying on the inverted frame");
            self.frame.invert();
            self.frame.identify();
        }

        if self.config.adaptive_threshold {
            let timing_bias: i32 = self.frame.grids().iter().map(|g| g.timing_bias).sum();
            self.bias.nudge(timing_bias);
            debug!("timing bias {} -> threshold offset {}", timing_bias, self.bias.offset());
        }
        self.state = EngineState::Identified;
    }

    /// Grids found by the last [`Engine::end`]
    pub fn count(&self) -> usize {
        match self.state {
            EngineState::Identified => self.frame.grids().len(),
            _ => 0,
        }
    }

    /// Sample the modules of grid `index`
    pub fn extract(&self, index: usize) -> Result<RawCode, DecodeError> {
        if self.state != EngineState::Identified {
            return Err(DecodeError::InvalidGridSize);
        }
        self.frame.extract(index)
    }

    /// Extract and decode grid `index`
    pub fn decode(&self, index: usize) -> Result<Symbol, DecodeError> {
        let raw = self.extract(index)?;
        decoder::decode(&raw)
    }

    /// Decode every grid of the frame in parallel, in grid order
    pub fn decode_all(&self) -> Vec<Result<Symbol, DecodeError>> {
        (0..self.count()).into_par_iter().map(|i| self.decode(i)).collect()
    }

    /// Adaptive threshold offset carried between frames
    pub fn threshold_bias(&self) -> i32 {
        self.bias.offset()
    }

    /// Seed the adaptive threshold offset (clamped)
    pub fn set_threshold_bias(&mut self, offset: i32) {
        self.bias = ThresholdBias::new(offset);
    }

    /// Read-only view of the identified frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}
