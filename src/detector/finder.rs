/// Capstone detection by 1:1:3:1:1 run-length scanning of thresholded rows
use log::trace;

use super::{Capstone, Frame, MAX_CAPSTONES, RegionId};
use crate::utils::geometry::PerspectiveTransform;

/// Expected run proportions across a finder pattern
const FINDER_RATIO: [i32; 5] = [1, 1, 3, 1, 1];

impl Frame {
    /// Scan row `y` for finder-pattern run signatures and record any
    /// capstones they lead to.
    pub fn scan_row(&mut self, y: i32) {
        let w = self.width;
        let start = y as usize * w;
        let mut last_dark = false;
        let mut run_length = 0i32;
        let mut run_count = 0u32;
        let mut pb = [0i32; 5];

        for x in 0..w {
            let dark = self.pixels[start + x] != 0;

            if x > 0 && dark != last_dark {
                pb.rotate_left(1);
                pb[4] = run_length;
                run_length = 0;
                run_count += 1;

                if !dark && run_count >= 5 && Self::matches_finder_ratio(&pb) {
                    self.test_capstone(x as i32, y, &pb);
                }
            }

            run_length += 1;
            last_dark = dark;
        }
    }

    /// Check five runs against 1:1:3:1:1 with a tolerance of 3/4 of a unit.
    ///
    /// Compared in sixteenths of the four-run sum so small modules keep
    /// their tolerance: `16 * run` within `4 * ratio * sum ± 3 * sum`.
    fn matches_finder_ratio(pb: &[i32; 5]) -> bool {
        let sum = pb[0] + pb[1] + pb[3] + pb[4];
        let err = 3 * sum;
        pb.iter().zip(FINDER_RATIO.iter()).all(|(&run, &ratio)| {
            let scaled = run * 16;
            let expected = ratio * sum * 4;
            scaled >= expected - err && scaled <= expected + err
        })
    }

    /// Check the ring and stone regions behind a candidate run ending at `x`
    fn test_capstone(&mut self, x: i32, y: i32, pb: &[i32; 5]) {
        let ring_right = self.region_code(x - pb[4], y);
        let stone = self.region_code(x - pb[4] - pb[3] - pb[2], y);
        let ring_left = self.region_code(x - pb[4] - pb[3] - pb[2] - pb[1] - pb[0], y);

        let (Some(ring_left), Some(ring_right), Some(stone)) = (ring_left, ring_right, stone)
        else {
            return;
        };
        if ring_left != ring_right || ring_right == stone {
            return;
        }

        let stone_reg = *self.region(stone);
        let ring_reg = *self.region(ring_right);
        if stone_reg.capstone.is_some() || ring_reg.capstone.is_some() {
            return;
        }

        let ratio = stone_reg.count * 100 / ring_reg.count.max(1);
        if !(10..=70).contains(&ratio) {
            trace!("capstone at ({}, {}) rejected: area ratio {}", x, y, ratio);
            return;
        }

        self.record_capstone(ring_right, stone);
    }

    fn record_capstone(&mut self, ring: RegionId, stone: RegionId) {
        if self.capstones.len() >= MAX_CAPSTONES {
            return;
        }
        let index = self.capstones.len();
        self.region_mut(stone).capstone = Some(index);
        self.region_mut(ring).capstone = Some(index);

        let stone_seed = self.region(stone).seed;
        let corners = self.find_region_corners(ring, stone_seed);
        let transform = PerspectiveTransform::from_rect(&corners, 7.0, 7.0);
        let center = transform.map(3.5, 3.5);

        trace!("capstone {} at {:?}", index, center);
        self.capstones.push(Capstone {
            ring,
            stone,
            corners,
            center,
            transform,
            grid: None,
        });
    }
}
