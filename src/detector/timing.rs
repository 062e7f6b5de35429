/// Timing pattern scoring and the dark/light imbalance fed back to thresholding
use super::Frame;
use crate::utils::geometry::PerspectiveTransform;

impl Frame {
    /// Timing cells along row 6 and column 6, for `i` in `0..size - 14`:
    /// module `i + 7` should be dark when `i` is odd.
    fn timing_cells(grid_size: usize) -> impl Iterator<Item = (i32, i32, bool)> {
        (0..grid_size.saturating_sub(14) as i32).flat_map(|i| {
            let dark = i & 1 == 1;
            [(i + 7, 6, dark), (6, i + 7, dark)]
        })
    }

    /// Signed agreement of both timing lines with `t`
    pub(crate) fn fitness_timing(&self, t: &PerspectiveTransform, grid_size: usize) -> i32 {
        Self::timing_cells(grid_size)
            .map(|(x, y, dark)| {
                let vote = self.fitness_cell(t, x, y);
                if dark { vote } else { -vote }
            })
            .sum()
    }

    /// Timing cells read dark where light was expected, minus cells read
    /// light where dark was expected.
    ///
    /// Positive means the threshold is too generous to dark pixels.
    pub(crate) fn timing_bias(&self, t: &PerspectiveTransform, grid_size: usize) -> i32 {
        let mut bias = 0;
        for (x, y, dark) in Self::timing_cells(grid_size) {
            let vote = self.fitness_cell(t, x, y);
            if !dark && vote > 0 {
                bias += 1;
            } else if dark && vote < 0 {
                bias -= 1;
            }
        }
        bias
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{render_skeleton, thresholded_frame};
    use crate::utils::binarization::{PIXEL_BLACK, PIXEL_WHITE};

    #[test]
    fn test_clean_timing_has_no_bias() {
        let (gray, w, h) = render_skeleton(1, 4, 4);
        let mut frame = thresholded_frame(&gray, w, h);
        frame.identify();
        let grid = frame.grids()[0];
        assert_eq!(grid.timing_bias, 0);
        // 7 cells per line, each voting 9
        assert_eq!(frame.fitness_timing(&grid.transform, 21), 2 * 7 * 9);
    }

    #[test]
    fn test_bias_sign_follows_timing_damage() {
        let (gray, w, h) = render_skeleton(1, 4, 4);
        let mut frame = thresholded_frame(&gray, w, h);
        frame.identify();
        let t = frame.grids()[0].transform;
        let w = frame.width();

        // paint the light cells of row 6 dark: modules 7, 9, 11, 13
        let mut dark = frame.pixels().to_vec();
        for module in [7, 9, 11, 13] {
            for y in 16 + 6 * 4..16 + 7 * 4 {
                for x in 16 + module * 4..16 + (module + 1) * 4 {
                    dark[y * w + x] = PIXEL_BLACK;
                }
            }
        }
        let saved = frame.pixels().to_vec();
        frame.pixels_mut().copy_from_slice(&dark);
        assert_eq!(frame.timing_bias(&t, 21), 4);

        // and the dark cells of column 6 light: modules 8, 10, 12
        let mut light = saved;
        for module in [8, 10, 12] {
            for y in 16 + module * 4..16 + (module + 1) * 4 {
                for x in 16 + 6 * 4..16 + 7 * 4 {
                    light[y * w + x] = PIXEL_WHITE;
                }
            }
        }
        frame.pixels_mut().copy_from_slice(&light);
        assert_eq!(frame.timing_bias(&t, 21), -3);
    }
}
