/// Histogram thresholding of a grayscale frame into black/white pixel codes
use log::trace;

/// Pixel code for a light pixel after thresholding
pub const PIXEL_WHITE: u8 = 0;
/// Pixel code for a dark pixel after thresholding
pub const PIXEL_BLACK: u8 = 1;

/// Largest magnitude of the persistent threshold correction
pub const BIAS_LIMIT: i32 = 20;

/// How the threshold level is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    /// One Otsu threshold for the whole frame
    #[default]
    Global,
    /// Otsu per quadrant, interpolated bilinearly between quadrant centers
    Bilinear,
}

/// Signed threshold correction carried from frame to frame.
///
/// Nudged one step at a time by timing-pattern polarity disagreement and
/// clamped to `±BIAS_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThresholdBias {
    offset: i32,
}

impl ThresholdBias {
    /// Bias with a starting offset (clamped)
    pub fn new(offset: i32) -> Self {
        Self {
            offset: offset.clamp(-BIAS_LIMIT, BIAS_LIMIT),
        }
    }

    /// Current offset added to the computed threshold
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Feed back the summed timing bias of a frame.
    ///
    /// Positive means light timing cells read dark, so the threshold is lowered.
    pub fn nudge(&mut self, timing_bias: i32) {
        let step = -timing_bias.signum();
        self.offset = (self.offset + step).clamp(-BIAS_LIMIT, BIAS_LIMIT);
    }

    /// Forget accumulated correction
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

/// 256-bin intensity histogram
pub fn histogram<'a>(pixels: impl IntoIterator<Item = &'a u8>) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &p in pixels {
        hist[p as usize] += 1;
    }
    hist
}

/// Otsu's threshold: the level maximizing between-class variance.
///
/// Levels `<= threshold` form the dark class. Ties keep the lowest level.
/// Returns `None` when the histogram cannot be split into two classes.
pub fn otsu_threshold(hist: &[u32; 256]) -> Option<u8> {
    let total: u64 = hist.iter().map(|&c| c as u64).sum();
    let sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut sum_b = 0.0f64;
    let mut q1 = 0u64;
    let mut max = 0.0f64;
    let mut best = None;

    for (level, &count) in hist.iter().enumerate() {
        q1 += count as u64;
        if q1 == 0 {
            continue;
        }
        let q2 = total - q1;
        if q2 == 0 {
            break;
        }
        sum_b += level as f64 * count as f64;
        let m1 = sum_b / q1 as f64;
        let m2 = (sum - sum_b) / q2 as f64;
        let diff = m1 - m2;
        let variance = diff * diff * q1 as f64 * q2 as f64;
        if best.is_none() || variance > max {
            max = variance;
            best = Some(level as u8);
        }
    }

    best
}

/// Threshold `pixels` in place into [`PIXEL_BLACK`] / [`PIXEL_WHITE`].
///
/// A pixel is dark when its value is `<= threshold + offset`; `inverted`
/// swaps the polarity so light pixels become foreground.
pub fn threshold(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    mode: ThresholdMode,
    offset: i32,
    inverted: bool,
) {
    let n = (width * height).min(pixels.len());
    let pixels = &mut pixels[..n];
    let global = otsu_threshold(&histogram(pixels.iter())).unwrap_or(0);

    let classify = |value: u8, level: f64| {
        let dark = (value as f64) <= level + offset as f64;
        if dark != inverted {
            PIXEL_BLACK
        } else {
            PIXEL_WHITE
        }
    };

    if mode == ThresholdMode::Global || width < 2 || height < 2 {
        trace!("otsu threshold {} offset {}", global, offset);
        for p in pixels.iter_mut() {
            *p = classify(*p, global as f64);
        }
        return;
    }

    let levels = quadrant_thresholds(pixels, width, height, global);
    trace!("quadrant thresholds {:?} offset {}", levels, offset);

    let cx0 = width as f64 / 4.0;
    let cx1 = width as f64 * 3.0 / 4.0;
    let cy0 = height as f64 / 4.0;
    let cy1 = height as f64 * 3.0 / 4.0;

    for y in 0..height {
        let fy = ((y as f64 - cy0) / (cy1 - cy0)).clamp(0.0, 1.0);
        let row = &mut pixels[y * width..(y + 1) * width];
        for (x, p) in row.iter_mut().enumerate() {
            let fx = ((x as f64 - cx0) / (cx1 - cx0)).clamp(0.0, 1.0);
            let top = levels[0] + (levels[1] - levels[0]) * fx;
            let bottom = levels[2] + (levels[3] - levels[2]) * fx;
            *p = classify(*p, top + (bottom - top) * fy);
        }
    }
}

/// Otsu thresholds of the four quadrants: top-left, top-right, bottom-left,
/// bottom-right. A quadrant that cannot be split uses `fallback`.
fn quadrant_thresholds(pixels: &[u8], width: usize, height: usize, fallback: u8) -> [f64; 4] {
    let half_w = width / 2;
    let half_h = height / 2;
    let mut hists = [[0u32; 256]; 4];

    for (y, row) in pixels.chunks_exact(width).enumerate() {
        let qy = if y < half_h { 0 } else { 2 };
        for (x, &p) in row.iter().enumerate() {
            let q = qy + usize::from(x >= half_w);
            hists[q][p as usize] += 1;
        }
    }

    let mut levels = [0.0f64; 4];
    for (level, hist) in levels.iter_mut().zip(hists.iter()) {
        *level = otsu_threshold(hist).unwrap_or(fallback) as f64;
    }
    levels
}

/// Swap black and white in an already thresholded or labeled buffer.
///
/// Every non-white code (black or a region id) becomes white.
pub fn invert(pixels: &mut [u8]) {
    for p in pixels.iter_mut() {
        *p = if *p == PIXEL_WHITE {
            PIXEL_BLACK
        } else {
            PIXEL_WHITE
        };
    }
}
