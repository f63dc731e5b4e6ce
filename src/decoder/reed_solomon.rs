/// Reed-Solomon coding over GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
/// and generator roots alpha^0 .. alpha^(n-1).
///
/// Codewords use the descending convention: `c[0]` is the coefficient of x^(n-1).
pub struct Gf256;

const PRIMITIVE: u16 = 0x11D;

const fn build_exp() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        table[i + 255] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    table
}

const fn build_log(exp: &[u8; 512]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const EXP: [u8; 512] = build_exp();
static EXP_TABLE: [u8; 512] = EXP;
static LOG_TABLE: [u8; 256] = build_log(&EXP);

impl Gf256 {
    #[inline]
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize]
    }

    /// `a / b`; callers guarantee `b != 0`
    #[inline]
    pub fn div(a: u8, b: u8) -> u8 {
        debug_assert!(b != 0, "division by zero in GF(256)");
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + 255 - LOG_TABLE[b as usize] as usize]
    }

    /// alpha^n
    #[inline]
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    /// Multiplicative inverse of alpha^n
    #[inline]
    pub fn exp_inv(n: usize) -> u8 {
        EXP_TABLE[(255 - n % 255) % 255]
    }

    /// Evaluate a polynomial given in ascending coefficient order
    pub fn eval_ascending(poly: &[u8], x: u8) -> u8 {
        poly.iter()
            .rev()
            .fold(0u8, |acc, &coeff| Self::mul(acc, x) ^ coeff)
    }
}

/// Reed-Solomon decoder for one block
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Codeword errors this decoder can repair
    pub fn capacity(&self) -> usize {
        self.num_ecc_codewords / 2
    }

    /// Correct `received` in place and return the number of repaired codewords
    pub fn decode(&self, received: &mut [u8]) -> Result<usize, &'static str> {
        if received.len() <= self.num_ecc_codewords || received.len() > 255 {
            return Err("block length out of range");
        }

        let syndrome = self.calculate_syndrome(received);
        if syndrome.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        let sigma = self.find_error_locator(&syndrome)?;
        let error_positions = self.find_error_positions(&sigma, received.len())?;
        let error_values =
            self.find_error_values(&sigma, &syndrome, &error_positions, received.len())?;

        for (&pos, &value) in error_positions.iter().zip(&error_values) {
            received[pos] ^= value;
        }

        if self.calculate_syndrome(received).iter().any(|&s| s != 0) {
            return Err("uncorrectable block");
        }

        Ok(error_positions.len())
    }

    fn calculate_syndrome(&self, received: &[u8]) -> Vec<u8> {
        // S_i = r(alpha^i), Horner over the descending coefficients
        (0..self.num_ecc_codewords)
            .map(|i| {
                let x = Gf256::exp(i);
                received
                    .iter()
                    .fold(0u8, |acc, &c| Gf256::mul(acc, x) ^ c)
            })
            .collect()
    }

    /// Berlekamp-Massey; returns sigma in ascending order with degree equal to L
    fn find_error_locator(&self, syndrome: &[u8]) -> Result<Vec<u8>, &'static str> {
        let n = syndrome.len();
        let mut sigma = vec![1u8];
        let mut b = vec![1u8];
        let mut delta_b: u8 = 1;
        let mut l = 0usize;
        let mut m = 1usize;

        for i in 0..n {
            let mut delta = syndrome[i];
            for j in 1..=l.min(sigma.len() - 1) {
                delta ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let previous = sigma.clone();
            let d = Gf256::div(delta, delta_b);
            if sigma.len() < b.len() + m {
                sigma.resize(b.len() + m, 0);
            }
            for (j, &coeff) in b.iter().enumerate() {
                sigma[j + m] ^= Gf256::mul(d, coeff);
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

        while sigma.len() > 1 && sigma.last() == Some(&0) {
            sigma.pop();
        }
        if sigma.len() - 1 != l || l > self.capacity() {
            return Err("too many errors");
        }
        Ok(sigma)
    }

    fn find_error_positions(&self, sigma: &[u8], n: usize) -> Result<Vec<usize>, &'static str> {
        // Chien search: position i has locator X = alpha^(n-1-i), root at X^-1
        let positions: Vec<usize> = (0..n)
            .filter(|&i| Gf256::eval_ascending(sigma, Gf256::exp_inv(n - 1 - i)) == 0)
            .collect();

        if positions.len() != sigma.len() - 1 {
            return Err("wrong number of error positions");
        }
        Ok(positions)
    }

    fn find_error_values(
        &self,
        sigma: &[u8],
        syndrome: &[u8],
        error_positions: &[usize],
        n: usize,
    ) -> Result<Vec<u8>, &'static str> {
        // omega = syndrome * sigma mod x^(2t)
        let mut omega = vec![0u8; syndrome.len()];
        for (i, slot) in omega.iter_mut().enumerate() {
            for j in 0..=i.min(sigma.len() - 1) {
                *slot ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }
        }

        // sigma'(x) keeps only the odd terms in characteristic 2
        let sigma_prime: Vec<u8> = sigma
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
            .collect();

        error_positions
            .iter()
            .map(|&pos| {
                let power = n - 1 - pos;
                let x_inv = Gf256::exp_inv(power);
                let omega_val = Gf256::eval_ascending(&omega, x_inv);
                let sigma_prime_val = Gf256::eval_ascending(&sigma_prime, x_inv);
                if sigma_prime_val == 0 {
                    return Err("sigma derivative is zero");
                }
                // Forney: e_k = X_k * omega(X_k^-1) / sigma'(X_k^-1)
                Ok(Gf256::mul(Gf256::exp(power), Gf256::div(omega_val, sigma_prime_val)))
            })
            .collect()
    }
}

/// Systematic Reed-Solomon encoder computing the ECC tail of a block
pub struct ReedSolomonEncoder {
    /// Generator coefficients in descending order without the leading 1
    divisor: Vec<u8>,
}

impl ReedSolomonEncoder {
    pub fn new(num_ecc_codewords: usize) -> Self {
        let mut divisor = vec![0u8; num_ecc_codewords];
        if let Some(last) = divisor.last_mut() {
            *last = 1;
        }
        let mut root = 1u8;
        for _ in 0..num_ecc_codewords {
            for j in 0..num_ecc_codewords {
                divisor[j] = Gf256::mul(divisor[j], root);
                if j + 1 < num_ecc_codewords {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Gf256::mul(root, 0x02);
        }
        Self { divisor }
    }

    /// Remainder of `data * x^n` divided by the generator
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut remainder = vec![0u8; self.divisor.len()];
        for &byte in data {
            let factor = byte ^ remainder.first().copied().unwrap_or(0);
            remainder.rotate_left(1);
            if let Some(last) = remainder.last_mut() {
                *last = 0;
            }
            for (r, &coeff) in remainder.iter_mut().zip(&self.divisor) {
                *r ^= Gf256::mul(coeff, factor);
            }
        }
        remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rs_encode(data: &[u8], num_ecc: usize) -> Vec<u8> {
        let mut codeword = data.to_vec();
        codeword.extend(ReedSolomonEncoder::new(num_ecc).encode(data));
        codeword
    }

    #[test]
    fn test_gf256_tables() {
        assert_eq!(Gf256::exp(0), 1);
        assert_eq!(Gf256::exp(8), 29);
        assert_eq!(Gf256::exp(255), 1);
        assert_eq!(Gf256::mul(0, 5), 0);
        assert_eq!(Gf256::div(0, 5), 0);
        assert_eq!(Gf256::div(123, 123), 1);
        for a in 1..=255u8 {
            assert_eq!(Gf256::div(Gf256::mul(a, 0x53), 0x53), a);
        }
    }

    #[test]
    fn test_known_codeword() {
        // "01234567" numeric at 1-M: 16 data codewords, 10 ECC
        let data = [
            0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11,
        ];
        let ecc = ReedSolomonEncoder::new(10).encode(&data);
        assert_eq!(ecc, vec![0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55]);
    }

    #[test]
    fn test_rs_no_errors() {
        let data = vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60];
        let mut codeword = rs_encode(&data, 10);
        let decoder = ReedSolomonDecoder::new(10);
        assert_eq!(decoder.decode(&mut codeword), Ok(0));
        assert_eq!(&codeword[..data.len()], &data);
    }

    #[test]
    fn test_rs_correct_multiple_errors() {
        let data = vec![0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
        let mut codeword = rs_encode(&data, 10);
        codeword[0] ^= 0xFF;
        codeword[4] ^= 0x42;
        codeword[7] ^= 0x13;

        let decoder = ReedSolomonDecoder::new(10);
        assert_eq!(decoder.decode(&mut codeword), Ok(3));
        assert_eq!(&codeword[..data.len()], &data);
    }

    #[test]
    fn test_rs_full_capacity_and_ecc_tail() {
        let data: Vec<u8> = "HELLO WORLD".bytes().collect();
        let mut codeword = rs_encode(&data, 8);
        let total = codeword.len();
        codeword[1] ^= 0x55;
        codeword[5] ^= 0x01;
        codeword[total - 1] ^= 0xFF;
        codeword[total - 2] ^= 0x33;

        let decoder = ReedSolomonDecoder::new(8);
        assert_eq!(decoder.capacity(), 4);
        assert_eq!(decoder.decode(&mut codeword), Ok(4));
        assert_eq!(&codeword[..data.len()], &data);
    }

    #[test]
    fn test_rs_beyond_capacity_fails() {
        let data = vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut codeword = rs_encode(&data, 6);
        for i in 0..5 {
            codeword[i] ^= 0x5A;
        }
        let decoder = ReedSolomonDecoder::new(6);
        let result = decoder.decode(&mut codeword);
        // Either detected as uncorrectable or miscorrected to some other codeword
        if let Ok(n) = result {
            assert!(n <= 3);
            assert_ne!(&codeword[..data.len()], &data[..]);
        }
    }
}
