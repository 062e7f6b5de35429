/// Reed-Solomon error correction over GF(256) with primitive polynomial
/// x^8 + x^4 + x^3 + x^2 + 1 (0x11d)
use crate::error::DecodeError;

/// Most ECC codewords in any block of any version and level
pub const MAX_ECC: usize = 30;
/// Longest block, data plus ECC
const MAX_BLOCK: usize = 255;
/// Polynomial scratch length; locator degree never exceeds the syndrome count
const MAX_POLY: usize = MAX_ECC + 2;

/// GF(256) field operations using log/exp tables
pub struct Gf256;

static LOG_TABLE: [u8; 256] = [
    0, 0, 1, 25, 2, 50, 26, 198, 3, 223, 51, 238, 27, 104, 199, 75, 4, 100, 224, 14, 52, 141, 239,
    129, 28, 193, 105, 248, 200, 8, 76, 113, 5, 138, 101, 47, 225, 36, 15, 33, 53, 147, 142, 218,
    240, 18, 130, 69, 29, 181, 194, 125, 106, 39, 249, 185, 201, 154, 9, 120, 77, 228, 114, 166, 6,
    191, 139, 98, 102, 221, 48, 253, 226, 152, 37, 179, 16, 145, 34, 136, 54, 208, 148, 206, 143,
    150, 219, 189, 241, 210, 19, 92, 131, 56, 70, 64, 30, 66, 182, 163, 195, 72, 126, 110, 107, 58,
    40, 84, 250, 133, 186, 61, 202, 94, 155, 159, 10, 21, 121, 43, 78, 212, 229, 172, 115, 243,
    167, 87, 7, 112, 192, 247, 140, 128, 99, 13, 103, 74, 222, 237, 49, 197, 254, 24, 227, 165,
    153, 119, 38, 184, 180, 124, 17, 68, 146, 217, 35, 32, 137, 46, 55, 63, 209, 91, 149, 188, 207,
    205, 144, 135, 151, 178, 220, 252, 190, 97, 242, 86, 211, 171, 20, 42, 93, 158, 132, 60, 57,
    83, 71, 109, 65, 162, 31, 45, 67, 216, 183, 123, 164, 118, 196, 23, 73, 236, 127, 12, 111, 246,
    108, 161, 59, 82, 41, 157, 85, 170, 251, 96, 134, 177, 187, 204, 62, 90, 203, 89, 95, 176, 156,
    169, 160, 81, 11, 245, 22, 235, 122, 117, 44, 215, 79, 174, 213, 233, 230, 231, 173, 232, 116,
    214, 244, 234, 168, 80, 88, 175,
];

static EXP_TABLE: [u8; 256] = [
    1, 2, 4, 8, 16, 32, 64, 128, 29, 58, 116, 232, 205, 135, 19, 38, 76, 152, 45, 90, 180, 117,
    234, 201, 143, 3, 6, 12, 24, 48, 96, 192, 157, 39, 78, 156, 37, 74, 148, 53, 106, 212, 181,
    119, 238, 193, 159, 35, 70, 140, 5, 10, 20, 40, 80, 160, 93, 186, 105, 210, 185, 111, 222, 161,
    95, 190, 97, 194, 153, 47, 94, 188, 101, 202, 137, 15, 30, 60, 120, 240, 253, 231, 211, 187,
    107, 214, 177, 127, 254, 225, 223, 163, 91, 182, 113, 226, 217, 175, 67, 134, 17, 34, 68, 136,
    13, 26, 52, 104, 208, 189, 103, 206, 129, 31, 62, 124, 248, 237, 199, 147, 59, 118, 236, 197,
    151, 51, 102, 204, 133, 23, 46, 92, 184, 109, 218, 169, 79, 158, 33, 66, 132, 21, 42, 84, 168,
    77, 154, 41, 82, 164, 85, 170, 73, 146, 57, 114, 228, 213, 183, 115, 230, 209, 191, 99, 198,
    145, 63, 126, 252, 229, 215, 179, 123, 246, 241, 255, 227, 219, 171, 75, 150, 49, 98, 196, 149,
    55, 110, 220, 165, 87, 174, 65, 130, 25, 50, 100, 200, 141, 7, 14, 28, 56, 112, 224, 221, 167,
    83, 166, 81, 162, 89, 178, 121, 242, 249, 239, 195, 155, 43, 86, 172, 69, 138, 9, 18, 36, 72,
    144, 61, 122, 244, 245, 247, 243, 251, 235, 203, 139, 11, 22, 44, 88, 176, 125, 250, 233, 207,
    131, 27, 54, 108, 216, 173, 71, 142, 1,
];

impl Gf256 {
    /// Product in GF(256)
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + log_b) % 255]
    }

    /// `a / b`; dividing by zero yields zero
    pub fn div(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + 255 - log_b) % 255]
    }

    /// `a` raised to `n`
    pub fn pow_usize(a: u8, n: usize) -> u8 {
        if a == 0 {
            return if n == 0 { 1 } else { 0 };
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        EXP_TABLE[(log_a * (n % 255)) % 255]
    }

    /// alpha^(-e)
    fn inv_alpha_pow(e: usize) -> u8 {
        EXP_TABLE[(255 - e % 255) % 255]
    }
}

/// Evaluate `poly` (ascending coefficients) at `x`
fn poly_eval(poly: &[u8], x: u8) -> u8 {
    poly.iter().rev().fold(0u8, |acc, &c| Gf256::mul(acc, x) ^ c)
}

/// Reed-Solomon block decoder for a fixed number of ECC codewords.
///
/// Blocks are in descending convention: `block[0]` is the coefficient of
/// x^(n-1). The generator has roots alpha^0 .. alpha^(ecc-1).
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    /// Decoder for blocks carrying `num_ecc_codewords` ECC bytes
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Correct `received` in place.
    ///
    /// Fails with [`DecodeError::DataEcc`] when the block has more errors
    /// than its ECC codewords can fix.
    pub fn decode(&self, received: &mut [u8]) -> Result<(), DecodeError> {
        let n = received.len();
        let k = self.num_ecc_codewords;
        if k == 0 || k > MAX_ECC || n > MAX_BLOCK || n <= k {
            return Err(DecodeError::DataEcc);
        }

        let syndrome = self.calculate_syndrome(received);
        if syndrome[..k].iter().all(|&s| s == 0) {
            return Ok(());
        }

        let (sigma, degree) = self.find_error_locator(&syndrome);
        if degree == 0 || degree * 2 > k {
            return Err(DecodeError::DataEcc);
        }
        let sigma = &sigma[..=degree];

        let mut positions = [0usize; MAX_ECC];
        let found = self.find_error_positions(sigma, n, &mut positions);
        if found != degree {
            return Err(DecodeError::DataEcc);
        }

        let omega = self.error_evaluator(sigma, &syndrome);
        for &pos in &positions[..found] {
            let value = self.error_value(sigma, &omega[..k], pos, n)?;
            received[pos] ^= value;
        }

        let check = self.calculate_syndrome(received);
        if check[..k].iter().any(|&s| s != 0) {
            return Err(DecodeError::DataEcc);
        }
        Ok(())
    }

    /// S_i = r(alpha^i) for i in 0..k
    fn calculate_syndrome(&self, received: &[u8]) -> [u8; MAX_ECC] {
        let mut syndrome = [0u8; MAX_ECC];
        for (i, s) in syndrome.iter_mut().enumerate().take(self.num_ecc_codewords) {
            let x = Gf256::pow_usize(2, i);
            *s = received.iter().fold(0u8, |acc, &r| Gf256::mul(acc, x) ^ r);
        }
        syndrome
    }

    /// Berlekamp-Massey; returns the locator and its degree
    fn find_error_locator(&self, syndrome: &[u8; MAX_ECC]) -> ([u8; MAX_POLY], usize) {
        let mut sigma = [0u8; MAX_POLY];
        let mut b = [0u8; MAX_POLY];
        sigma[0] = 1;
        b[0] = 1;
        let mut delta_b: u8 = 1;
        let mut l = 0usize;
        let mut m = 1usize;

        for i in 0..self.num_ecc_codewords {
            let mut delta = syndrome[i];
            for j in 1..=l.min(i) {
                delta ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let previous = sigma;
            let d = Gf256::div(delta, delta_b);
            // sigma -= d * x^m * b
            for j in 0..MAX_POLY - m {
                sigma[j + m] ^= Gf256::mul(d, b[j]);
            }

            if 2 * l <= i {
                b = previous;
                delta_b = delta;
                l = i + 1 - l;
                m = 1;
            } else {
                m += 1;
            }
        }

        let degree = sigma.iter().rposition(|&c| c != 0).unwrap_or(0);
        (sigma, degree)
    }

    /// Chien search; the root for position `pos` is alpha^-(n-1-pos)
    fn find_error_positions(&self, sigma: &[u8], n: usize, positions: &mut [usize; MAX_ECC]) -> usize {
        let mut found = 0;
        for pos in 0..n {
            if poly_eval(sigma, Gf256::inv_alpha_pow(n - 1 - pos)) == 0 {
                if found == MAX_ECC {
                    return MAX_ECC + 1;
                }
                positions[found] = pos;
                found += 1;
            }
        }
        found
    }

    /// omega = S(x) * sigma(x) mod x^k
    fn error_evaluator(&self, sigma: &[u8], syndrome: &[u8; MAX_ECC]) -> [u8; MAX_ECC] {
        let k = self.num_ecc_codewords;
        let mut omega = [0u8; MAX_ECC];
        for i in 0..k {
            for j in 0..=i.min(sigma.len() - 1) {
                omega[i] ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }
        }
        omega
    }

    /// Forney: e = X * omega(X^-1) / sigma'(X^-1)
    fn error_value(&self, sigma: &[u8], omega: &[u8], pos: usize, n: usize) -> Result<u8, DecodeError> {
        let exp = n - 1 - pos;
        let x_inv = Gf256::inv_alpha_pow(exp);

        let omega_val = poly_eval(omega, x_inv);
        let mut sigma_prime_val = 0u8;
        for (i, &coeff) in sigma.iter().enumerate().skip(1).step_by(2) {
            sigma_prime_val ^= Gf256::mul(coeff, Gf256::pow_usize(x_inv, i - 1));
        }
        if sigma_prime_val == 0 {
            return Err(DecodeError::DataEcc);
        }

        let x_k = Gf256::pow_usize(2, exp);
        Ok(Gf256::mul(x_k, Gf256::div(omega_val, sigma_prime_val)))
    }
}
