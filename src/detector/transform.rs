/// Perspective setup and refinement of a grid's module-to-image transform.
///
/// The transform is scored by sampling the function patterns a symbol of the
/// grid's size must contain, then nudged coefficient by coefficient.
use super::{Frame, Grid};
use crate::decoder::tables::alignment_pattern_positions;
use crate::utils::geometry::PerspectiveTransform;

/// Sample offsets within a module
const CELL_OFFSETS: [f64; 3] = [0.3, 0.5, 0.7];
/// Refinement passes; the step halves after each
const JIGGLE_PASSES: usize = 2;
/// Initial step per coefficient, relative to the coefficient over grid size
const JIGGLE_STEP: f64 = 0.42;

impl Frame {
    /// Fit the grid transform to its capstones and alignment point, refine
    /// it, then record the timing bias under the refined transform.
    pub fn setup_perspective(&self, grid: &mut Grid) {
        let [a, b, c] = grid.capstones.map(|i| &self.capstones[i]);
        let rect = [b.corners[0], c.corners[0], grid.align, a.corners[0]];
        let extent = (grid.grid_size - 7) as f64;

        grid.transform = PerspectiveTransform::from_rect(&rect, extent, extent);
        self.jiggle(&mut grid.transform, grid.grid_size);
        grid.timing_bias = self.timing_bias(&grid.transform, grid.grid_size);
    }

    /// Nine-point vote over module (x, y): +1 per dark sample, -1 per light.
    /// Samples outside the frame do not vote.
    pub(crate) fn fitness_cell(&self, t: &PerspectiveTransform, x: i32, y: i32) -> i32 {
        let mut score = 0;
        for dv in CELL_OFFSETS {
            for du in CELL_OFFSETS {
                let p = t.map(x as f64 + du, y as f64 + dv);
                match self.is_dark(p.x, p.y) {
                    Some(true) => score += 1,
                    Some(false) => score -= 1,
                    None => {}
                }
            }
        }
        score
    }

    /// Sum of cell votes around the square ring of `radius` centered on (cx, cy)
    fn fitness_ring(&self, t: &PerspectiveTransform, cx: i32, cy: i32, radius: i32) -> i32 {
        let mut score = 0;
        for i in 0..radius * 2 {
            score += self.fitness_cell(t, cx - radius + i, cy - radius);
            score += self.fitness_cell(t, cx - radius, cy + radius - i);
            score += self.fitness_cell(t, cx + radius, cy - radius + i);
            score += self.fitness_cell(t, cx + radius - i, cy + radius);
        }
        score
    }

    /// Alignment pattern centered on (cx, cy): dark, light ring, dark ring
    fn fitness_apat(&self, t: &PerspectiveTransform, cx: i32, cy: i32) -> i32 {
        self.fitness_cell(t, cx, cy) - self.fitness_ring(t, cx, cy, 1) + self.fitness_ring(t, cx, cy, 2)
    }

    /// Finder pattern whose top-left module is (x, y)
    fn fitness_capstone(&self, t: &PerspectiveTransform, x: i32, y: i32) -> i32 {
        let (x, y) = (x + 3, y + 3);
        self.fitness_cell(t, x, y) + self.fitness_ring(t, x, y, 1) - self.fitness_ring(t, x, y, 2)
            + self.fitness_ring(t, x, y, 3)
    }

    /// Agreement of `t` with every fixed pattern of a `grid_size` symbol
    pub(crate) fn fitness_all(&self, t: &PerspectiveTransform, grid_size: usize) -> i32 {
        let size = grid_size as i32;
        let mut score = self.fitness_timing(t, grid_size);
        score += self.fitness_capstone(t, 0, 0);
        score += self.fitness_capstone(t, size - 7, 0);
        score += self.fitness_capstone(t, 0, size - 7);

        let version = (grid_size.saturating_sub(17) / 4) as u8;
        let positions = alignment_pattern_positions(version);
        let ap = positions.as_slice();
        if ap.len() < 2 {
            return score;
        }

        // Alignment patterns on the timing lines skip the finder corners
        for &p in &ap[1..ap.len() - 1] {
            score += self.fitness_apat(t, 6, p as i32);
            score += self.fitness_apat(t, p as i32, 6);
        }
        for &px in &ap[1..] {
            for &py in &ap[1..] {
                score += self.fitness_apat(t, px as i32, py as i32);
            }
        }
        score
    }

    /// Coordinate search over the eight coefficients, keeping only changes
    /// that strictly raise [`Frame::fitness_all`].
    pub(crate) fn jiggle(&self, t: &mut PerspectiveTransform, grid_size: usize) {
        let mut best = self.fitness_all(t, grid_size);
        let mut adjustments = t.c.map(|c| c * JIGGLE_STEP / grid_size as f64);

        for _ in 0..JIGGLE_PASSES {
            for i in 0..16 {
                let j = i >> 1;
                let old = t.c[j];
                let step = adjustments[j];
                t.c[j] = if i & 1 == 1 { old + step } else { old - step };

                let test = self.fitness_all(t, grid_size);
                if test > best {
                    best = test;
                } else {
                    t.c[j] = old;
                }
            }
            for adj in adjustments.iter_mut() {
                *adj *= 0.5;
            }
        }
    }
}
