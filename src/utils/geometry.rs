/// Projective geometry between module space (u, v) and image space (x, y)
use crate::models::Point;

/// 8-parameter projective mapping from module coordinates to pixels.
///
/// `x = (c0*u + c1*v + c2) / (c6*u + c7*v + 1)`
/// `y = (c3*u + c4*v + c5) / (c6*u + c7*v + 1)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerspectiveTransform {
    /// Coefficients c0..c7
    pub c: [f64; 8],
}

impl PerspectiveTransform {
    /// The all-zero transform, used when a setup is degenerate
    pub const ZERO: PerspectiveTransform = PerspectiveTransform { c: [0.0; 8] };

    /// Transform taking the rectangle `(0,0) (w,0) (w,h) (0,h)` onto `rect`.
    ///
    /// A singular system yields [`PerspectiveTransform::ZERO`].
    pub fn from_rect(rect: &[Point; 4], w: f64, h: f64) -> Self {
        let src = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (u, v) = src[i];
            let (x, y) = (rect[i].x as f64, rect[i].y as f64);

            let row = i * 2;
            a[row] = [u, v, 1.0, 0.0, 0.0, 0.0, -u * x, -v * x];
            b[row] = x;
            a[row + 1] = [0.0, 0.0, 0.0, u, v, 1.0, -u * y, -v * y];
            b[row + 1] = y;
        }

        match solve_linear_system(&a, &b) {
            Some(c) => Self { c },
            None => Self::ZERO,
        }
    }

    /// True if this is the degenerate zero transform
    pub fn is_zero(&self) -> bool {
        self.c.iter().all(|&c| c == 0.0)
    }

    /// Map module coordinates to the nearest image pixel
    pub fn map(&self, u: f64, v: f64) -> Point {
        let c = &self.c;
        let den = c[6] * u + c[7] * v + 1.0;
        if den.abs() < 1e-12 {
            return Point::default();
        }
        let x = (c[0] * u + c[1] * v + c[2]) / den;
        let y = (c[3] * u + c[4] * v + c[5]) / den;
        Point::new(x.round() as i32, y.round() as i32)
    }

    /// Map an image pixel back to module coordinates.
    ///
    /// Returns NaN coordinates when the transform is not invertible there.
    pub fn unmap(&self, p: &Point) -> (f64, f64) {
        let c = &self.c;
        let (x, y) = (p.x as f64, p.y as f64);
        let det = (c[0] - c[6] * x) * (c[4] - c[7] * y) - (c[1] - c[7] * x) * (c[3] - c[6] * y);
        if det == 0.0 {
            return (f64::NAN, f64::NAN);
        }
        let u = ((x - c[2]) * (c[4] - c[7] * y) - (c[1] - c[7] * x) * (y - c[5])) / det;
        let v = ((c[0] - c[6] * x) * (y - c[5]) - (x - c[2]) * (c[3] - c[6] * y)) / det;
        (u, v)
    }
}

/// Intersection of line p0-p1 with line q0-q1, if they are not parallel
pub fn line_intersect(p0: &Point, p1: &Point, q0: &Point, q1: &Point) -> Option<Point> {
    // (a, b) and (c, d) are normals of the two lines
    let a = -((p1.y - p0.y) as i64);
    let b = (p1.x - p0.x) as i64;
    let c = -((q1.y - q0.y) as i64);
    let d = (q1.x - q0.x) as i64;

    let e = a * p1.x as i64 + b * p1.y as i64;
    let f = c * q1.x as i64 + d * q1.y as i64;

    let det = a * d - b * c;
    if det == 0 {
        return None;
    }
    let x = (d * e - b * f) / det;
    let y = (-c * e + a * f) / det;
    Some(Point::new(x as i32, y as i32))
}

/// Solve 8x8 linear system using Gaussian elimination with partial pivoting
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(a: &[[f64; 8]; 8], b: &[f64; 8]) -> Option<[f64; 8]> {
    let mut a = *a;
    let mut b = *b;
    let n = 8;

    for i in 0..n {
        let mut max_val = a[i][i].abs();
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }

        if max_val < 1e-10 {
            return None;
        }

        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}
