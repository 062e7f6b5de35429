//! Synthetic images for detector tests

use crate::decoder::tables::alignment_pattern_positions;
use crate::detector::Frame;
use crate::utils::binarization::{ThresholdMode, threshold};

/// Paint a 7x7 finder pattern with `module` px modules, top-left at (x0, y0)
pub fn draw_finder(gray: &mut [u8], width: usize, x0: usize, y0: usize, module: usize) {
    for my in 0..7 {
        for mx in 0..7 {
            let ring = my.min(mx).min(6 - my).min(6 - mx);
            let dark = ring != 1;
            fill_module(gray, width, x0 + mx * module, y0 + my * module, module, dark);
        }
    }
}

fn fill_module(gray: &mut [u8], width: usize, x0: usize, y0: usize, module: usize, dark: bool) {
    let value = if dark { 0 } else { 255 };
    for y in y0..y0 + module {
        gray[y * width + x0..y * width + x0 + module].fill(value);
    }
}

/// Function patterns only (finders, timing lines, alignment patterns) of a
/// `version` symbol, `scale` px per module with a `quiet` module border.
pub fn render_skeleton(version: usize, scale: usize, quiet: usize) -> (Vec<u8>, usize, usize) {
    let size = version * 4 + 17;
    let side = (size + quiet * 2) * scale;
    let mut gray = vec![255u8; side * side];
    let origin = quiet * scale;
    let at = |m: usize| origin + m * scale;

    for (fx, fy) in [(0, 0), (size - 7, 0), (0, size - 7)] {
        draw_finder(&mut gray, side, at(fx), at(fy), scale);
    }
    for i in 8..size - 8 {
        let dark = i % 2 == 0;
        fill_module(&mut gray, side, at(i), at(6), scale, dark);
        fill_module(&mut gray, side, at(6), at(i), scale, dark);
    }

    let positions = alignment_pattern_positions(version as u8);
    let ap = positions.as_slice();
    for &cx in ap {
        for &cy in ap {
            let in_finder = (cx < 9 && cy < 9) || (cx > size - 10 && cy < 9) || (cx < 9 && cy > size - 10);
            if in_finder {
                continue;
            }
            for dy in 0..5 {
                for dx in 0..5 {
                    let ring = dx.min(dy).min(4 - dx).min(4 - dy);
                    fill_module(&mut gray, side, at(cx + dx - 2), at(cy + dy - 2), scale, ring != 1);
                }
            }
        }
    }
    fill_module(&mut gray, side, at(8), at(size - 8), scale, true);

    (gray, side, side)
}

/// Rotate a grayscale image 90 degrees clockwise
pub fn rotate_gray(gray: &[u8], width: usize, height: usize) -> (Vec<u8>, usize, usize) {
    let mut out = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            out[x * height + (height - 1 - y)] = gray[y * width + x];
        }
    }
    (out, height, width)
}

/// Frame holding `gray` after a global threshold
pub fn thresholded_frame(gray: &[u8], width: usize, height: usize) -> Frame {
    let mut frame = Frame::new(width, height).unwrap();
    frame.pixels_mut().copy_from_slice(gray);
    threshold(frame.pixels_mut(), width, height, ThresholdMode::Global, 0, false);
    frame
}
