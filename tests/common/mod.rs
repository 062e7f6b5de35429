//! Reference QR encoder and renderer for end-to-end tests
#![allow(dead_code)]

use rust_qr_engine::ECLevel;
use rust_qr_engine::decoder::bch::BchDecoder;
use rust_qr_engine::decoder::tables::{
    MODE_ALPHA, MODE_BYTE, MODE_NUMERIC, alignment_pattern_positions, char_count_bits,
    ec_block_info, total_codewords,
};

const ALPHANUMERIC: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// One encoded segment
#[derive(Debug, Clone)]
pub enum Segment {
    Numeric(&'static str),
    Alphanumeric(&'static str),
    Bytes(Vec<u8>),
}

/// Square module grid, `true` is dark; indexed `[y][x]`
pub type Modules = Vec<Vec<bool>>;

struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    fn push(&mut self, value: u32, n: usize) {
        for i in (0..n).rev() {
            self.bits.push((value >> i) & 1 != 0);
        }
    }
}

fn gf_mul(a: u8, b: u8) -> u8 {
    let mut result = 0u16;
    let (mut a, mut b) = (a as u16, b);
    while b != 0 {
        if b & 1 != 0 {
            result ^= a;
        }
        a <<= 1;
        if a & 0x100 != 0 {
            a ^= 0x11d;
        }
        b >>= 1;
    }
    result as u8
}

/// Remainder of data * x^n over the generator with roots alpha^0..alpha^(n-1)
fn rs_remainder(data: &[u8], n: usize) -> Vec<u8> {
    let mut generator = vec![1u8];
    let mut root = 1u8;
    for _ in 0..n {
        let mut next = vec![0u8; generator.len() + 1];
        for (i, &g) in generator.iter().enumerate() {
            next[i] ^= g;
            next[i + 1] ^= gf_mul(g, root);
        }
        generator = next;
        root = gf_mul(root, 2);
    }

    let mut rem = vec![0u8; n];
    for &d in data {
        let factor = d ^ rem[0];
        rem.remove(0);
        rem.push(0);
        for i in 0..n {
            rem[i] ^= gf_mul(generator[i + 1], factor);
        }
    }
    rem
}

fn data_codewords(segments: &[Segment], version: u8, ec: ECLevel) -> Vec<u8> {
    let info = ec_block_info(version, ec).unwrap();
    let total = total_codewords(version);
    let capacity = total - info.num_blocks * info.ecc_per_block;

    let mut buf = BitBuffer { bits: Vec::new() };
    for segment in segments {
        match segment {
            Segment::Numeric(text) => {
                let digits = text.as_bytes();
                buf.push(MODE_NUMERIC, 4);
                buf.push(digits.len() as u32, char_count_bits(MODE_NUMERIC, version));
                for chunk in digits.chunks(3) {
                    let value = chunk.iter().fold(0u32, |acc, &d| acc * 10 + (d - b'0') as u32);
                    buf.push(value, chunk.len() * 3 + 1);
                }
            }
            Segment::Alphanumeric(text) => {
                let chars = text.as_bytes();
                buf.push(MODE_ALPHA, 4);
                buf.push(chars.len() as u32, char_count_bits(MODE_ALPHA, version));
                let index = |c: u8| ALPHANUMERIC.iter().position(|&a| a == c).unwrap() as u32;
                for chunk in chars.chunks(2) {
                    if chunk.len() == 2 {
                        buf.push(index(chunk[0]) * 45 + index(chunk[1]), 11);
                    } else {
                        buf.push(index(chunk[0]), 6);
                    }
                }
            }
            Segment::Bytes(bytes) => {
                buf.push(MODE_BYTE, 4);
                buf.push(bytes.len() as u32, char_count_bits(MODE_BYTE, version));
                for &b in bytes {
                    buf.push(b as u32, 8);
                }
            }
        }
    }

    let capacity_bits = capacity * 8;
    assert!(buf.bits.len() <= capacity_bits, "segments do not fit");
    let terminator = (capacity_bits - buf.bits.len()).min(4);
    buf.push(0, terminator);
    while buf.bits.len() % 8 != 0 {
        buf.bits.push(false);
    }

    let mut bytes: Vec<u8> = buf
        .bits
        .chunks(8)
        .map(|c| c.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8))
        .collect();
    for pad in [0xEC, 0x11].iter().cycle() {
        if bytes.len() >= capacity {
            break;
        }
        bytes.push(*pad);
    }
    bytes
}

/// Split into blocks, append ECC, and interleave
fn final_codewords(data: &[u8], version: u8, ec: ECLevel) -> Vec<u8> {
    let info = ec_block_info(version, ec).unwrap();
    let total = total_codewords(version);
    let num_blocks = info.num_blocks;
    let num_long = total % num_blocks;
    let short_len = total / num_blocks - info.ecc_per_block;

    let mut blocks: Vec<Vec<u8>> = Vec::new();
    let mut eccs: Vec<Vec<u8>> = Vec::new();
    let mut pos = 0;
    for i in 0..num_blocks {
        let len = short_len + usize::from(i >= num_blocks - num_long);
        let block = data[pos..pos + len].to_vec();
        pos += len;
        eccs.push(rs_remainder(&block, info.ecc_per_block));
        blocks.push(block);
    }

    let mut out = Vec::with_capacity(total);
    for i in 0..=short_len {
        for block in &blocks {
            if i < block.len() {
                out.push(block[i]);
            }
        }
    }
    for i in 0..info.ecc_per_block {
        for ecc in &eccs {
            out.push(ecc[i]);
        }
    }
    out
}

fn mask_bit(mask: u8, x: usize, y: usize) -> bool {
    let (i, j) = (y, x);
    match mask {
        0 => (i + j) % 2 == 0,
        1 => i % 2 == 0,
        2 => j % 3 == 0,
        3 => (i + j) % 3 == 0,
        4 => (i / 2 + j / 3) % 2 == 0,
        5 => (i * j) % 2 + (i * j) % 3 == 0,
        6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
        _ => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
    }
}

struct Canvas {
    size: usize,
    modules: Modules,
    reserved: Vec<Vec<bool>>,
}

impl Canvas {
    fn set(&mut self, x: usize, y: usize, dark: bool) {
        self.modules[y][x] = dark;
        self.reserved[y][x] = true;
    }

    fn finder(&mut self, cx: i32, cy: i32) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= self.size as i32 || y >= self.size as i32 {
                    continue;
                }
                let ring = dx.abs().max(dy.abs());
                self.set(x as usize, y as usize, ring != 2 && ring != 4);
            }
        }
    }

    fn function_patterns(&mut self, version: u8) {
        let size = self.size;
        for i in 0..size {
            self.set(6, i, i % 2 == 0);
            self.set(i, 6, i % 2 == 0);
        }
        self.finder(3, 3);
        self.finder(size as i32 - 4, 3);
        self.finder(3, size as i32 - 4);

        let positions = alignment_pattern_positions(version);
        let ap = positions.as_slice();
        let last = ap.len().saturating_sub(1);
        for (a, &cx) in ap.iter().enumerate() {
            for (b, &cy) in ap.iter().enumerate() {
                if (a == 0 && b == 0) || (a == 0 && b == last) || (a == last && b == 0) {
                    continue;
                }
                for dy in -2i32..=2 {
                    for dx in -2i32..=2 {
                        let ring = dx.abs().max(dy.abs());
                        self.set((cx as i32 + dx) as usize, (cy as i32 + dy) as usize, ring != 1);
                    }
                }
            }
        }

        // Reserve format areas; real bits go in after masking
        self.format_bits(0);
        self.set(8, size - 8, true);

        if version >= 7 {
            let word = BchDecoder::version_codeword(version);
            for i in 0..18 {
                let bit = (word >> i) & 1 != 0;
                let (a, b) = (size - 11 + i % 3, i / 3);
                self.set(a, b, bit);
                self.set(b, a, bit);
            }
        }
    }

    fn format_bits(&mut self, word: u16) {
        const XS: [usize; 15] = [8, 8, 8, 8, 8, 8, 8, 8, 7, 5, 4, 3, 2, 1, 0];
        const YS: [usize; 15] = [0, 1, 2, 3, 4, 5, 7, 8, 8, 8, 8, 8, 8, 8, 8];
        let size = self.size;
        for i in 0..15 {
            let bit = (word >> i) & 1 != 0;
            self.set(XS[i], YS[i], bit);
            if i < 8 {
                self.set(size - 1 - i, 8, bit);
            } else {
                self.set(8, size - 15 + i, bit);
            }
        }
    }

    fn place_data(&mut self, codewords: &[u8]) {
        let size = self.size;
        let mut bit_index = 0;
        let total_bits = codewords.len() * 8;
        let mut upward = true;
        let mut col = size as i32 - 1;
        while col > 0 {
            if col == 6 {
                col -= 1;
            }
            for step in 0..size {
                let y = if upward { size - 1 - step } else { step };
                for x in [col as usize, col as usize - 1] {
                    if self.reserved[y][x] {
                        continue;
                    }
                    let dark = bit_index < total_bits
                        && (codewords[bit_index / 8] >> (7 - bit_index % 8)) & 1 != 0;
                    self.modules[y][x] = dark;
                    bit_index += 1;
                }
            }
            upward = !upward;
            col -= 2;
        }
    }

    fn apply_mask(&mut self, mask: u8) {
        for y in 0..self.size {
            for x in 0..self.size {
                if !self.reserved[y][x] && mask_bit(mask, x, y) {
                    self.modules[y][x] = !self.modules[y][x];
                }
            }
        }
    }
}

/// Encode `segments` as a `version` symbol with the given EC level and mask
pub fn encode(segments: &[Segment], version: u8, ec: ECLevel, mask: u8) -> Modules {
    let size = version as usize * 4 + 17;
    let mut canvas = Canvas {
        size,
        modules: vec![vec![false; size]; size],
        reserved: vec![vec![false; size]; size],
    };
    canvas.function_patterns(version);

    let data = data_codewords(segments, version, ec);
    canvas.place_data(&final_codewords(&data, version, ec));
    canvas.apply_mask(mask);
    canvas.format_bits(BchDecoder::format_codeword((ec.format_bits() << 3) | mask));
    canvas.modules
}

/// Render modules as a grayscale image, 0 dark and 255 light, with a
/// `quiet` module border
pub fn render(modules: &Modules, scale: usize, quiet: usize) -> (Vec<u8>, usize, usize) {
    let size = modules.len();
    let side = (size + 2 * quiet) * scale;
    let mut gray = vec![255u8; side * side];
    for (my, row) in modules.iter().enumerate() {
        for (mx, &dark) in row.iter().enumerate() {
            if !dark {
                continue;
            }
            for y in 0..scale {
                let start = ((quiet + my) * scale + y) * side + (quiet + mx) * scale;
                gray[start..start + scale].fill(0);
            }
        }
    }
    (gray, side, side)
}

/// Paste `src` into `dst` with its top-left corner at (x0, y0)
pub fn paste(dst: &mut [u8], dst_width: usize, src: &[u8], src_width: usize, x0: usize, y0: usize) {
    for (y, row) in src.chunks_exact(src_width).enumerate() {
        let start = (y0 + y) * dst_width + x0;
        dst[start..start + src_width].copy_from_slice(row);
    }
}

/// Rotate a grayscale image 90 degrees clockwise
pub fn rotate(gray: &[u8], width: usize, height: usize) -> (Vec<u8>, usize, usize) {
    let mut out = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            out[x * height + (height - 1 - y)] = gray[y * width + x];
        }
    }
    (out, height, width)
}

/// Swap dark and light
pub fn invert(gray: &mut [u8]) {
    for p in gray.iter_mut() {
        *p = 255 - *p;
    }
}
