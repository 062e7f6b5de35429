//! QR symbol detection
//!
//! Works on one labeled frame at a time:
//! - Span flood fill labels dark regions lazily
//! - Row scanning finds 1:1:3:1:1 capstones (finder patterns)
//! - Capstone triples are grouped into grids
//! - Each grid gets a projective transform refined against its function patterns

/// Alignment pattern search and grid size estimation
pub mod alignment;
/// Span flood fill and region labeling
pub mod connected_components;
/// Capstone (finder pattern) scanning
pub mod finder;
/// Grouping capstones into grids
pub mod grouping;
/// Timing pattern scoring and threshold feedback
pub mod timing;
/// Perspective setup and refinement
pub mod transform;

use log::debug;

use crate::error::DecodeError;
use crate::models::{BitMatrix, Point, RawCode};
use crate::utils::binarization::{self, PIXEL_WHITE};
use crate::utils::geometry::PerspectiveTransform;
use connected_components::FillFrame;

/// Regions per frame; codes 2..=255 fit in a pixel byte
pub const MAX_REGIONS: usize = 254;
/// Capstones per frame
pub const MAX_CAPSTONES: usize = 32;
/// Grids per frame
pub const MAX_GRIDS: usize = 8;
/// Upper bound on flood fill stack frames
pub const MAX_FILL_STACK: usize = 32768;
/// First pixel code used for a region id
pub const PIXEL_REGION: u8 = 2;

/// Index into [`Frame::regions`] plus [`PIXEL_REGION`]; also the pixel code
pub type RegionId = u8;
/// Index into [`Frame::capstones`]
pub type CapstoneId = usize;
/// Index into [`Frame::grids`]
pub type GridId = usize;

/// A connected dark blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First pixel found in the region
    pub seed: Point,
    /// Pixel area
    pub count: i32,
    /// Capstone that claimed this region
    pub capstone: Option<CapstoneId>,
}

/// A finder pattern: a ring region around a stone region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capstone {
    /// Outer ring region
    pub ring: RegionId,
    /// Inner stone region
    pub stone: RegionId,
    /// Outer corners, clockwise
    pub corners: [Point; 4],
    /// Image position of the pattern center
    pub center: Point,
    /// 7x7 module frame of the pattern
    pub transform: PerspectiveTransform,
    /// Grid this capstone belongs to
    pub grid: Option<GridId>,
}

/// A detected symbol: three capstones with a module-to-image transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Bottom-left, top-left and top-right capstones
    pub capstones: [CapstoneId; 3],
    /// Image point corresponding to module `(size - 7, size - 7)`
    pub align: Point,
    /// Region of the alignment pattern stone, when one was found
    pub align_region: Option<RegionId>,
    /// Modules per side
    pub grid_size: usize,
    /// Module-to-image transform
    pub transform: PerspectiveTransform,
    /// Timing cells read dark where light was expected, minus the reverse
    pub timing_bias: i32,
}

/// Per-frame labeling state: pixel codes plus the fixed-capacity tables.
#[derive(Debug, Default)]
pub struct Frame {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) pixels: Vec<u8>,
    pub(crate) fill_stack: Vec<FillFrame>,
    pub(crate) regions: Vec<Region>,
    pub(crate) capstones: Vec<Capstone>,
    pub(crate) grids: Vec<Grid>,
}

impl Frame {
    /// Allocate buffers for a `width` x `height` frame.
    ///
    /// All storage is reserved here; identification never grows it.
    pub fn new(width: usize, height: usize) -> Result<Self, DecodeError> {
        let area = width.checked_mul(height).ok_or(DecodeError::AllocFailed)?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(area)?;
        pixels.resize(area, 0);

        // Fill depth is bounded by the span count, hence by the area
        let stack_len = area.clamp(1, MAX_FILL_STACK);
        let mut fill_stack = Vec::new();
        fill_stack.try_reserve_exact(stack_len)?;
        fill_stack.resize(stack_len, FillFrame::default());

        let mut regions = Vec::new();
        regions.try_reserve_exact(MAX_REGIONS)?;
        let mut capstones = Vec::new();
        capstones.try_reserve_exact(MAX_CAPSTONES)?;
        let mut grids = Vec::new();
        grids.try_reserve_exact(MAX_GRIDS)?;

        Ok(Self {
            width,
            height,
            pixels,
            fill_stack,
            regions,
            capstones,
            grids,
        })
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel buffer (grayscale before thresholding, codes after)
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable pixel buffer
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Regions labeled so far
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Capstones found in the last identify pass
    pub fn capstones(&self) -> &[Capstone] {
        &self.capstones
    }

    /// Grids found in the last identify pass
    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    /// Drop all regions, capstones and grids
    pub fn reset_tables(&mut self) {
        self.regions.clear();
        self.capstones.clear();
        self.grids.clear();
    }

    /// Swap black and white in the thresholded buffer and reset the tables
    pub fn invert(&mut self) {
        binarization::invert(&mut self.pixels);
        self.reset_tables();
    }

    /// Scan every row for capstones, then group them into grids.
    ///
    /// Expects a thresholded buffer.
    pub fn identify(&mut self) {
        self.reset_tables();
        for y in 0..self.height {
            self.scan_row(y as i32);
        }
        for i in 0..self.capstones.len() {
            self.group(i);
        }
        debug!(
            "identify: {} regions, {} capstones, {} grids",
            self.regions.len(),
            self.capstones.len(),
            self.grids.len()
        );
    }

    /// Region record for a region pixel code
    pub(crate) fn region(&self, code: RegionId) -> &Region {
        &self.regions[(code - PIXEL_REGION) as usize]
    }

    pub(crate) fn region_mut(&mut self, code: RegionId) -> &mut Region {
        &mut self.regions[(code - PIXEL_REGION) as usize]
    }

    /// Whether the pixel at (x, y) is dark; out of bounds is `None`
    pub(crate) fn is_dark(&self, x: i32, y: i32) -> Option<bool> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize] != PIXEL_WHITE)
    }

    /// Sample the module grid of grid `index`
    pub fn extract(&self, index: GridId) -> Result<RawCode, DecodeError> {
        let grid = self.grids.get(index).ok_or(DecodeError::InvalidGridSize)?;
        let size = grid.grid_size;
        let t = &grid.transform;
        let s = size as f64;
        let corners = [t.map(0.0, 0.0), t.map(s, 0.0), t.map(s, s), t.map(0.0, s)];

        let cells = BitMatrix::from_fn(size, size, |x, y| {
            let p = t.map(x as f64 + 0.5, y as f64 + 0.5);
            self.is_dark(p.x, p.y).unwrap_or(false)
        });

        Ok(RawCode::from_cells(cells, corners))
    }
}
