/// Grid size estimation and alignment pattern search
use log::trace;

use super::{CapstoneId, Frame, RegionId};
use crate::models::Point;

/// Spiral step directions: right, up, left, down
const SPIRAL_DX: [i32; 4] = [1, 0, -1, 0];
const SPIRAL_DY: [i32; 4] = [0, -1, 0, 1];

/// Length between two corner pixels, counting the pixels at both ends
fn pixel_extent(a: &Point, b: &Point) -> f64 {
    a.distance(b) + 1.0
}

impl Frame {
    /// Modules per side estimated from the capstones `[A, B, C]` (bottom-left,
    /// top-left, top-right), rounded to the nearest `4v + 17`.
    ///
    /// `None` when the estimate is not a valid version 1-40 size.
    pub fn estimate_grid_size(&self, caps: &[CapstoneId; 3]) -> Option<usize> {
        let a = &self.capstones[caps[0]];
        let b = &self.capstones[caps[1]];
        let c = &self.capstones[caps[2]];

        let ab = pixel_extent(&b.corners[0], &a.corners[3]);
        let cap_ab = (pixel_extent(&b.corners[0], &b.corners[3])
            + pixel_extent(&a.corners[0], &a.corners[3]))
            / 2.0;
        let ver_grid = 7.0 * ab / cap_ab;

        let bc = pixel_extent(&b.corners[0], &c.corners[1]);
        let cap_bc = (pixel_extent(&b.corners[0], &b.corners[1])
            + pixel_extent(&c.corners[0], &c.corners[1]))
            / 2.0;
        let hor_grid = 7.0 * bc / cap_bc;

        let estimate = (ver_grid + hor_grid) / 2.0;
        let version = ((estimate - 17.0) / 4.0).round();
        if !(1.0..=40.0).contains(&version) {
            trace!("grid size estimate {:.1} out of range", estimate);
            return None;
        }
        Some(version as usize * 4 + 17)
    }

    /// Spiral outward from `start` looking for a region about one module in
    /// area; the first one found is taken as the alignment pattern stone.
    pub fn find_alignment_pattern(&mut self, caps: &[CapstoneId; 3], start: Point) -> Option<RegionId> {
        let c0 = self.capstones[caps[0]].transform;
        let c2 = self.capstones[caps[2]].transform;

        // One module along each axis near the estimate
        let (u, v) = c0.unmap(&start);
        let a = c0.map(u, v + 1.0);
        let (u, v) = c2.unmap(&start);
        let c = c2.map(u + 1.0, v);
        let size_estimate = ((a.x - start.x) as i64 * -((c.y - start.y) as i64)
            + (a.y - start.y) as i64 * (c.x - start.x) as i64)
            .abs();

        let mut b = start;
        let mut step_size = 1i64;
        let mut dir = 0usize;
        while step_size * step_size < size_estimate * 100 {
            for _ in 0..step_size {
                if let Some(code) = self.region_code(b.x, b.y) {
                    let count = self.region(code).count as i64;
                    if count >= size_estimate / 2 && count <= size_estimate * 2 {
                        return Some(code);
                    }
                }
                b = b.translate(SPIRAL_DX[dir], SPIRAL_DY[dir]);
            }
            dir = (dir + 1) % 4;
            if dir & 1 == 0 {
                step_size += 1;
            }
        }

        trace!("no alignment pattern near {:?}", start);
        None
    }
}
