/// Grouping capstones into grids by their positions in each other's frames
use log::{debug, trace};

use super::{CapstoneId, Frame, Grid, MAX_CAPSTONES, MAX_GRIDS};
use crate::models::Point;
use crate::utils::geometry::{PerspectiveTransform, line_intersect};

/// Largest tolerated `|1 - h/v|` between the two neighbor distances
const SQUARENESS_LIMIT: f64 = 0.2;

/// A capstone lying along one axis of another, with its distance in modules
#[derive(Debug, Clone, Copy, Default)]
struct Neighbour {
    index: CapstoneId,
    distance: f64,
}

/// Neighbours of one capstone along one axis, in a fixed-size table
#[derive(Debug, Clone, Copy)]
struct NeighbourList {
    items: [Neighbour; MAX_CAPSTONES],
    len: usize,
}

impl NeighbourList {
    fn new() -> Self {
        Self {
            items: [Neighbour::default(); MAX_CAPSTONES],
            len: 0,
        }
    }

    fn push(&mut self, n: Neighbour) {
        if self.len < MAX_CAPSTONES {
            self.items[self.len] = n;
            self.len += 1;
        }
    }

    fn as_slice(&self) -> &[Neighbour] {
        &self.items[..self.len]
    }
}

/// A (horizontal, vertical) neighbour pair and its squareness
#[derive(Debug, Clone, Copy, Default)]
struct Candidate {
    score: f64,
    h: CapstoneId,
    v: CapstoneId,
}

impl Frame {
    /// Try to form a grid with capstone `i` as the corner capstone.
    ///
    /// Passing pairs are tried best squareness first; the first that forms
    /// a grid claims its capstones, so at most one grid has `i` as corner.
    pub fn group(&mut self, i: CapstoneId) {
        let c1 = self.capstones[i];
        if c1.grid.is_some() {
            return;
        }

        let mut hlist = NeighbourList::new();
        let mut vlist = NeighbourList::new();

        for (j, c2) in self.capstones.iter().enumerate() {
            if i == j || c2.grid.is_some() {
                continue;
            }
            let (u, v) = c1.transform.unmap(&c2.center);
            let u = (u - 3.5).abs();
            let v = (v - 3.5).abs();

            if u < 0.2 * v {
                hlist.push(Neighbour { index: j, distance: v });
            }
            if v < 0.2 * u {
                vlist.push(Neighbour { index: j, distance: u });
            }
        }

        let mut pairs = [Candidate::default(); MAX_CAPSTONES * MAX_CAPSTONES];
        let mut count = 0;
        for hn in hlist.as_slice() {
            for vn in vlist.as_slice() {
                let score = (1.0 - hn.distance / vn.distance).abs();
                if score < SQUARENESS_LIMIT {
                    pairs[count] = Candidate {
                        score,
                        h: hn.index,
                        v: vn.index,
                    };
                    count += 1;
                }
            }
        }
        let pairs = &mut pairs[..count];
        pairs.sort_unstable_by(|a, b| a.score.total_cmp(&b.score));

        for pair in pairs.iter() {
            if self.record_grid(pair.h, i, pair.v) {
                trace!(
                    "grid from capstones ({}, {}, {}) squareness {:.3}",
                    pair.h, i, pair.v, pair.score
                );
                return;
            }
        }
    }

    /// Build a grid from corner capstone `b` and its neighbours `a` and `c`.
    ///
    /// Returns false, leaving all capstones unclaimed, when the grid table is
    /// full or the geometry does not describe a valid symbol.
    fn record_grid(&mut self, a: CapstoneId, b: CapstoneId, c: CapstoneId) -> bool {
        if self.grids.len() >= MAX_GRIDS {
            return false;
        }

        let (mut a, mut c) = (a, c);
        // Hypotenuse from A to C; B must lie on its left for A-B-C clockwise
        let h0 = self.capstones[a].center;
        let mut hd = (
            self.capstones[c].center.x - h0.x,
            self.capstones[c].center.y - h0.y,
        );
        let bc = self.capstones[b].center;
        if (bc.x - h0.x) as i64 * -(hd.1 as i64) + (bc.y - h0.y) as i64 * hd.0 as i64 > 0 {
            std::mem::swap(&mut a, &mut c);
            hd = (-hd.0, -hd.1);
        }

        let caps = [a, b, c];
        for &cap in &caps {
            self.rotate_capstone(cap, h0, hd);
        }

        let Some(grid_size) = self.estimate_grid_size(&caps) else {
            return false;
        };

        let ca = self.capstones[a];
        let cc = self.capstones[c];
        let Some(mut align) = line_intersect(&ca.corners[0], &ca.corners[1], &cc.corners[0], &cc.corners[3])
        else {
            return false;
        };

        let mut align_region = None;
        if grid_size > 21 {
            align_region = self.find_alignment_pattern(&caps, align);
            if let Some(code) = align_region {
                align = self.find_leftmost_to_line(code, hd);
            }
        }

        let index = self.grids.len();
        let mut grid = Grid {
            capstones: caps,
            align,
            align_region,
            grid_size,
            transform: PerspectiveTransform::ZERO,
            timing_bias: 0,
        };
        self.setup_perspective(&mut grid);

        for &cap in &caps {
            self.capstones[cap].grid = Some(index);
        }
        debug!(
            "grid {}: size {} align {:?} timing bias {}",
            index, grid_size, grid.align, grid.timing_bias
        );
        self.grids.push(grid);
        true
    }

    /// Reorder a capstone's corners so corner 0 is the one farthest to the
    /// left of the hypotenuse, then rebuild its 7x7 frame.
    fn rotate_capstone(&mut self, cap: CapstoneId, h0: Point, hd: (i32, i32)) {
        let capstone = &mut self.capstones[cap];
        let mut best = 0usize;
        let mut best_score = i64::MAX;
        for (j, p) in capstone.corners.iter().enumerate() {
            let score = Point::new(p.x - h0.x, p.y - h0.y).dot(-hd.1, hd.0);
            if score < best_score {
                best = j;
                best_score = score;
            }
        }
        capstone.corners.rotate_left(best);
        capstone.transform = PerspectiveTransform::from_rect(&capstone.corners, 7.0, 7.0);
    }
}
