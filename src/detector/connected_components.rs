/// Span flood fill over the frame's pixel codes.
///
/// The fill keeps its own bounded stack of resume frames instead of
/// recursing; when the stack is full the fill stops and leaves a partial
/// region behind.
use super::{Frame, MAX_REGIONS, PIXEL_REGION, Region, RegionId};
use crate::models::Point;
use crate::utils::binarization::{PIXEL_BLACK, PIXEL_WHITE};

/// Resume context of one filled span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillFrame {
    y: i32,
    right: i32,
    left_up: i32,
    left_down: i32,
}

impl Frame {
    /// Fill the span through (x, y) and return its extent
    fn fill_line<F: FnMut(i32, i32, i32)>(
        &mut self,
        x: i32,
        y: i32,
        from: u8,
        to: u8,
        on_span: &mut F,
    ) -> (i32, i32) {
        let w = self.width;
        let row = &mut self.pixels[y as usize * w..(y as usize + 1) * w];
        let mut left = x as usize;
        let mut right = x as usize;

        while left > 0 && row[left - 1] == from {
            left -= 1;
        }
        while right + 1 < w && row[right + 1] == from {
            right += 1;
        }
        row[left..=right].fill(to);

        on_span(y, left as i32, right as i32);
        (left as i32, right as i32)
    }

    /// Look for the next unfilled span above (`dir = -1`) or below
    /// (`dir = 1`) the span on top of the stack and fill it.
    fn fill_next<F: FnMut(i32, i32, i32)>(
        &mut self,
        depth: usize,
        dir: i32,
        from: u8,
        to: u8,
        on_span: &mut F,
    ) -> bool {
        let w = self.width;
        let frame = self.fill_stack[depth];
        let y = frame.y + dir;
        let mut left = if dir < 0 { frame.left_up } else { frame.left_down };

        while left <= frame.right {
            if self.pixels[y as usize * w + left as usize] == from {
                let (next_left, next_right) = self.fill_line(left, y, from, to, on_span);
                let cur = &mut self.fill_stack[depth];
                if dir < 0 {
                    cur.left_up = left + 1;
                } else {
                    cur.left_down = left + 1;
                }
                self.fill_stack[depth + 1] = FillFrame {
                    y,
                    right: next_right,
                    left_up: next_left,
                    left_down: next_left,
                };
                return true;
            }
            left += 1;
        }

        let cur = &mut self.fill_stack[depth];
        if dir < 0 {
            cur.left_up = left;
        } else {
            cur.left_down = left;
        }
        false
    }

    /// Relabel the 4-connected `from` region containing (x, y) to `to`,
    /// calling `on_span(y, left, right)` once per filled span.
    pub fn flood_fill<F: FnMut(i32, i32, i32)>(
        &mut self,
        x: i32,
        y: i32,
        from: u8,
        to: u8,
        mut on_span: F,
    ) {
        if from == to || self.is_dark(x, y).is_none() {
            return;
        }
        if self.pixels[y as usize * self.width + x as usize] != from {
            return;
        }

        let last = self.fill_stack.len() - 1;
        let (left, right) = self.fill_line(x, y, from, to, &mut on_span);
        self.fill_stack[0] = FillFrame {
            y,
            right,
            left_up: left,
            left_down: left,
        };

        let mut depth = 0usize;
        loop {
            if depth == last {
                break;
            }
            let y = self.fill_stack[depth].y;

            if y > 0 && self.fill_next(depth, -1, from, to, &mut on_span) {
                depth += 1;
                continue;
            }
            if y + 1 < self.height as i32 && self.fill_next(depth, 1, from, to, &mut on_span) {
                depth += 1;
                continue;
            }
            if depth > 0 {
                depth -= 1;
                continue;
            }
            break;
        }
    }

    /// Region code of the pixel at (x, y), labeling its region on first
    /// touch. `None` for white or out-of-bounds pixels, or when the region
    /// table is full.
    pub fn region_code(&mut self, x: i32, y: i32) -> Option<RegionId> {
        let pixel = match self.is_dark(x, y) {
            Some(true) => self.pixels[y as usize * self.width + x as usize],
            _ => return None,
        };
        if pixel >= PIXEL_REGION {
            return Some(pixel);
        }
        if self.regions.len() >= MAX_REGIONS {
            return None;
        }

        let code = PIXEL_REGION + self.regions.len() as u8;
        let mut count = 0i32;
        self.flood_fill(x, y, pixel, code, |_, left, right| {
            count += right - left + 1;
        });
        self.regions.push(Region {
            seed: Point::new(x, y),
            count,
            capstone: None,
        });
        Some(code)
    }

    /// Four outer corners of region `code`, clockwise.
    ///
    /// The first pass finds the point farthest from `reference`; the second
    /// takes the extremes along that axis and its perpendicular.
    pub fn find_region_corners(&mut self, code: RegionId, reference: Point) -> [Point; 4] {
        let seed = self.region(code).seed;

        let mut far = reference;
        let mut best = -1i64;
        self.flood_fill(seed.x, seed.y, code, PIXEL_BLACK, |y, left, right| {
            let dy = (y - reference.y) as i64;
            for x in [left, right] {
                let dx = (x - reference.x) as i64;
                let d = dx * dx + dy * dy;
                if d > best {
                    best = d;
                    far = Point::new(x, y);
                }
            }
        });

        let rx = far.x - reference.x;
        let ry = far.y - reference.y;
        let mut corners = [seed; 4];
        let up = seed.dot(rx, ry);
        let side = seed.dot(-ry, rx);
        let mut scores = [up, side, -up, -side];

        self.flood_fill(seed.x, seed.y, PIXEL_BLACK, code, |y, left, right| {
            for x in [left, right] {
                let p = Point::new(x, y);
                let up = p.dot(rx, ry);
                let side = p.dot(-ry, rx);
                for (j, score) in [up, side, -up, -side].into_iter().enumerate() {
                    if score > scores[j] {
                        scores[j] = score;
                        corners[j] = p;
                    }
                }
            }
        });

        corners
    }

    /// Point of region `code` minimizing `-dir.y * x + dir.x * y`, i.e. the
    /// extreme point on the left of direction `dir`.
    pub fn find_leftmost_to_line(&mut self, code: RegionId, dir: (i32, i32)) -> Point {
        let seed = self.region(code).seed;
        let score = |p: &Point| p.dot(-dir.1, dir.0);

        let mut best = seed;
        let mut best_score = score(&seed);
        self.flood_fill(seed.x, seed.y, code, PIXEL_BLACK, |_, _, _| {});
        self.flood_fill(seed.x, seed.y, PIXEL_BLACK, code, |y, left, right| {
            for x in [left, right] {
                let p = Point::new(x, y);
                let d = score(&p);
                if d < best_score {
                    best_score = d;
                    best = p;
                }
            }
        });
        best
    }

    /// Number of pixels currently holding `code`
    #[cfg(test)]
    pub(crate) fn count_code(&self, code: u8) -> usize {
        self.pixels.iter().filter(|&&p| p == code).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frame holding `rows` on top of `pad` blank rows
    fn frame_from_rows(rows: &[&str], pad: usize) -> Frame {
        let h = rows.len();
        let w = rows[0].len();
        let mut frame = Frame::new(w, h + pad).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.bytes().enumerate() {
                frame.pixels[y * w + x] = if c == b'#' { PIXEL_BLACK } else { PIXEL_WHITE };
            }
        }
        frame
    }

    #[test]
    fn test_fill_rectangle_exact() {
        let (w, h) = (30usize, 20usize);
        let mut frame = Frame::new(w, h).unwrap();
        for y in 5..12 {
            for x in 8..21 {
                frame.pixels[y * w + x] = PIXEL_BLACK;
            }
        }
        // a separate blob that must stay untouched
        frame.pixels[w + 1] = PIXEL_BLACK;
        let before = frame.pixels.clone();

        let code = frame.region_code(10, 7).unwrap();
        assert_eq!(code, PIXEL_REGION);
        assert_eq!(frame.region(code).count, 13 * 7);

        for (i, (&after, &orig)) in frame.pixels.iter().zip(before.iter()).enumerate() {
            let (x, y) = (i % w, i / w);
            if (8..21).contains(&x) && (5..12).contains(&y) {
                assert_eq!(after, code);
            } else {
                assert_eq!(after, orig);
            }
        }
    }

    #[test]
    fn test_fill_concave_shape() {
        let mut frame = frame_from_rows(
            &[
                "#.....#",
                "#.###.#",
                "#.#.#.#",
                "#.....#",
                "#######",
            ],
            16,
        );
        let code = frame.region_code(0, 0).unwrap();
        assert_eq!(frame.region(code).count, 15);
        assert_eq!(frame.count_code(code), 15);
        // the inner arch is not connected
        assert_eq!(frame.pixels[7 + 2], PIXEL_BLACK);
        let inner = frame.region_code(2, 1).unwrap();
        assert_eq!(frame.region(inner).count, 5);
    }

    #[test]
    fn test_fill_rectangle_spanning_frame_height() {
        let (w, h) = (20usize, 30usize);
        let mut frame = Frame::new(w, h).unwrap();
        for y in 2..28 {
            for x in 5..15 {
                frame.pixels[y * w + x] = PIXEL_BLACK;
            }
        }
        let code = frame.region_code(7, 2).unwrap();
        assert_eq!(frame.region(code).count, 10 * 26);
        assert_eq!(frame.count_code(code), 10 * 26);
        assert_eq!(frame.count_code(PIXEL_BLACK), 0);
    }

    #[test]
    fn test_single_pixel_region() {
        let mut frame = frame_from_rows(&["...", ".#.", "..."], 4);
        let code = frame.region_code(1, 1).unwrap();
        assert_eq!(frame.region(code).count, 1);
        assert_eq!(frame.region_code(0, 0), None);
        assert_eq!(frame.region_code(-1, 0), None);
        assert_eq!(frame.region_code(1, 1), Some(code));
    }

    #[test]
    fn test_region_table_caps_silently() {
        let w = 2 * (MAX_REGIONS + 10);
        let mut frame = Frame::new(w, 1).unwrap();
        for x in (0..w).step_by(2) {
            frame.pixels[x] = PIXEL_BLACK;
        }
        let found = (0..w as i32)
            .step_by(2)
            .filter_map(|x| frame.region_code(x, 0))
            .count();
        assert_eq!(found, MAX_REGIONS);
        assert_eq!(frame.regions().len(), MAX_REGIONS);
    }

    #[test]
    fn test_stack_exhaustion_stops_fill() {
        // Serpentine corridor needing more stack frames than a 3-row frame
        // provides; the fill must end without touching the far end.
        let mut frame = frame_from_rows(&["#.#.#", "#.#.#", "#####"], 0);
        frame.fill_stack.truncate(2);
        let code = frame.region_code(0, 0).unwrap();
        let filled = frame.count_code(code);
        assert!(filled < 11);
        assert_eq!(frame.region(code).count as usize, filled);
    }

    #[test]
    fn test_region_corners_of_square() {
        let (w, h) = (20usize, 20usize);
        let mut frame = Frame::new(w, h).unwrap();
        for y in 4..12 {
            for x in 6..14 {
                frame.pixels[y * w + x] = PIXEL_BLACK;
            }
        }
        let code = frame.region_code(6, 4).unwrap();
        let corners = frame.find_region_corners(code, Point::new(7, 9));
        let mut sorted = corners.to_vec();
        sorted.sort_by_key(|p| (p.y, p.x));
        assert_eq!(
            sorted,
            vec![
                Point::new(6, 4),
                Point::new(13, 4),
                Point::new(6, 11),
                Point::new(13, 11)
            ]
        );
        assert_eq!(frame.count_code(code), 64);
    }

    #[test]
    fn test_leftmost_to_line() {
        let (w, h) = (10usize, 10usize);
        let mut frame = Frame::new(w, h).unwrap();
        for y in 3..6 {
            for x in 3..6 {
                frame.pixels[y * w + x] = PIXEL_BLACK;
            }
        }
        let code = frame.region_code(4, 4).unwrap();
        // direction pointing up-right: left of it is the top-left corner
        assert_eq!(frame.find_leftmost_to_line(code, (1, -1)), Point::new(3, 3));
        assert_eq!(frame.count_code(code), 9);
    }
}
