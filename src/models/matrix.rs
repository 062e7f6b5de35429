/// Square or rectangular bit grid, one row packed per byte run.
///
/// `true` is a dark module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    row_bytes: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a cleared matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let row_bytes = width.div_ceil(8);
        Self {
            width,
            height,
            row_bytes,
            data: vec![0; row_bytes * height],
        }
    }

    /// Build a matrix by evaluating `f(x, y)` for every cell
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut matrix = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    matrix.set(x, y, true);
                }
            }
        }
        matrix
    }

    /// Matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn locate(&self, x: usize, y: usize) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.row_bytes + x / 8, 0x80 >> (x % 8)))
    }

    /// Bit at (x, y); out-of-bounds reads are light
    pub fn get(&self, x: usize, y: usize) -> bool {
        match self.locate(x, y) {
            Some((byte, bit)) => self.data[byte] & bit != 0,
            None => false,
        }
    }

    /// Set bit at (x, y); out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if let Some((byte, bit)) = self.locate(x, y) {
            if value {
                self.data[byte] |= bit;
            } else {
                self.data[byte] &= !bit;
            }
        }
    }

    /// Flip bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if let Some((byte, bit)) = self.locate(x, y) {
            self.data[byte] ^= bit;
        }
    }

    /// Number of dark cells
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Clear all bits
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_matrix() {
        let mut matrix = BitMatrix::new(21, 21);
        assert_eq!(matrix.width(), 21);
        assert_eq!(matrix.height(), 21);

        matrix.set(20, 4, true);
        assert!(matrix.get(20, 4));
        assert!(!matrix.get(19, 4));
        assert_eq!(matrix.count_ones(), 1);

        matrix.toggle(20, 4);
        assert!(!matrix.get(20, 4));

        matrix.set(3, 3, true);
        matrix.clear();
        assert_eq!(matrix.count_ones(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut matrix = BitMatrix::new(8, 8);
        matrix.set(10, 10, true);
        matrix.toggle(8, 0);
        assert!(!matrix.get(10, 10));
        assert_eq!(matrix.count_ones(), 0);
    }

    #[test]
    fn test_from_fn() {
        let matrix = BitMatrix::from_fn(9, 3, |x, y| (x + y) % 2 == 0);
        assert!(matrix.get(0, 0));
        assert!(!matrix.get(8, 1));
        assert!(matrix.get(8, 2));
    }
}
