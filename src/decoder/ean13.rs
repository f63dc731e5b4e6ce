//! EAN-13 decoding from bar/space widths.
//!
//! The strip holds 59 runs starting with a bar: start guard (3), six left digits
//! (4 runs each, starting with a space, L or G parity), centre guard (5), six right
//! digits (4 runs each, starting with a bar), end guard (3). The parity sequence of
//! the left half encodes the leading digit.

use crate::error::{Result, ScanError};

/// Number of runs in a complete symbol
pub const RUN_COUNT: usize = 59;
/// Number of modules in a complete symbol
pub const MODULE_COUNT: usize = 95;

/// L-code widths (space, bar, space, bar); R-code uses the same widths starting
/// with a bar, G-code is the reverse
pub(crate) const L_PATTERNS: [[u8; 4]; 10] = [
    [3, 2, 1, 1],
    [2, 2, 2, 1],
    [2, 1, 2, 2],
    [1, 4, 1, 1],
    [1, 1, 3, 2],
    [1, 2, 3, 1],
    [1, 1, 1, 4],
    [1, 3, 1, 2],
    [1, 2, 1, 3],
    [3, 1, 1, 2],
];

/// Parity of the six left digits for each leading digit; `true` = G
pub(crate) const FIRST_DIGIT_PARITY: [[bool; 6]; 10] = [
    [false, false, false, false, false, false],
    [false, false, true, false, true, true],
    [false, false, true, true, false, true],
    [false, false, true, true, true, false],
    [false, true, false, false, true, true],
    [false, true, true, false, false, true],
    [false, true, true, true, false, false],
    [false, true, false, true, false, true],
    [false, true, false, true, true, false],
    [false, true, true, false, true, false],
];

/// Summed normalized width error above which a digit is rejected
const MAX_DIGIT_DISTANCE: f32 = 2.0;

pub(crate) fn g_pattern(digit: usize) -> [u8; 4] {
    let mut p = L_PATTERNS[digit];
    p.reverse();
    p
}

/// Mod-10 check with weights 1, 3 alternating from the left
pub fn checksum_valid(digits: &[u8; 13]) -> bool {
    weighted_sum(&digits[..]) % 10 == 0
}

/// Check digit completing twelve payload digits
pub fn check_digit(digits: &[u8]) -> u8 {
    ((10 - weighted_sum(digits) % 10) % 10) as u8
}

fn weighted_sum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .enumerate()
        .map(|(i, &d)| d as u32 * if i % 2 == 0 { 1 } else { 3 })
        .sum()
}

/// Closest pattern for four widths as `(digit, is_g, distance)`
fn match_digit(widths: &[u32], allow_g: bool) -> Option<(u8, bool)> {
    let sum: u32 = widths.iter().sum();
    if sum == 0 {
        return None;
    }
    let scale = 7.0 / sum as f32;
    let distance = |pattern: [u8; 4]| -> f32 {
        widths
            .iter()
            .zip(pattern)
            .map(|(&w, p)| (w as f32 * scale - p as f32).abs())
            .sum()
    };

    let mut best: Option<(u8, bool, f32)> = None;
    for digit in 0..10 {
        let mut options = vec![(false, L_PATTERNS[digit])];
        if allow_g {
            options.push((true, g_pattern(digit)));
        }
        for (is_g, pattern) in options {
            let d = distance(pattern);
            if best.is_none_or(|(_, _, bd)| d < bd) {
                best = Some((digit as u8, is_g, d));
            }
        }
    }
    best.filter(|&(_, _, d)| d <= MAX_DIGIT_DISTANCE)
        .map(|(digit, is_g, _)| (digit, is_g))
}

fn guard_ok(widths: &[u32], module: f32) -> bool {
    widths
        .iter()
        .all(|&w| (w as f32 / module - 1.0).abs() <= 0.5)
}

/// Decode a bar/space width sequence into 13 digits.
///
/// A symbol upside down in the frame is scanned right to left, so a failed
/// read is retried once on the reversed sequence.
pub fn decode_widths(widths: &[u32]) -> Result<String> {
    decode_forward(widths).or_else(|err| {
        log::trace!("forward read failed ({err}), trying reversed widths");
        let reversed: Vec<u32> = widths.iter().rev().copied().collect();
        decode_forward(&reversed).map_err(|_| err)
    })
}

fn decode_forward(widths: &[u32]) -> Result<String> {
    if widths.len() != RUN_COUNT {
        return Err(ScanError::structure(format!(
            "{} runs, expected {RUN_COUNT}",
            widths.len()
        )));
    }
    let module = widths.iter().sum::<u32>() as f32 / MODULE_COUNT as f32;
    if !(guard_ok(&widths[0..3], module)
        && guard_ok(&widths[27..32], module)
        && guard_ok(&widths[56..59], module))
    {
        return Err(ScanError::structure("guard widths do not match"));
    }

    let mut digits = [0u8; 13];
    let mut parity = [false; 6];
    for i in 0..6 {
        let start = 3 + i * 4;
        let (digit, is_g) = match_digit(&widths[start..start + 4], true)
            .ok_or_else(|| ScanError::structure(format!("left digit {i} unreadable")))?;
        digits[1 + i] = digit;
        parity[i] = is_g;
    }
    for i in 0..6 {
        let start = 32 + i * 4;
        let (digit, _) = match_digit(&widths[start..start + 4], false)
            .ok_or_else(|| ScanError::structure(format!("right digit {i} unreadable")))?;
        digits[7 + i] = digit;
    }

    digits[0] = FIRST_DIGIT_PARITY
        .iter()
        .position(|p| *p == parity)
        .ok_or_else(|| ScanError::structure("left parity pattern matches no leading digit"))?
        as u8;

    if !checksum_valid(&digits) {
        return Err(ScanError::ErrorCorrectionExceeded {
            block: 0,
            capacity: 0,
        });
    }

    Ok(digits.iter().map(|d| (b'0' + d) as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Widths for 4006381333931 at one pixel per module
    fn sample_widths() -> Vec<u32> {
        let digits = [4u8, 0, 0, 6, 3, 8, 1, 3, 3, 3, 9, 3, 1];
        let parity = FIRST_DIGIT_PARITY[digits[0] as usize];
        let mut widths = vec![1, 1, 1];
        for i in 0..6 {
            let d = digits[1 + i] as usize;
            let p = if parity[i] { g_pattern(d) } else { L_PATTERNS[d] };
            widths.extend(p.iter().map(|&w| w as u32));
        }
        widths.extend([1, 1, 1, 1, 1]);
        for i in 0..6 {
            widths.extend(L_PATTERNS[digits[7 + i] as usize].iter().map(|&w| w as u32));
        }
        widths.extend([1, 1, 1]);
        widths
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(check_digit(&[4, 0, 0, 6, 3, 8, 1, 3, 3, 3, 9, 3]), 1);
        assert_eq!(check_digit(&[5, 9, 0, 1, 2, 3, 4, 1, 2, 3, 4, 5]), 7);
        assert!(checksum_valid(&[4, 0, 0, 6, 3, 8, 1, 3, 3, 3, 9, 3, 1]));
    }

    #[test]
    fn test_decode_clean_and_scaled() {
        let widths = sample_widths();
        assert_eq!(widths.len(), RUN_COUNT);
        assert_eq!(widths.iter().sum::<u32>(), 95);
        assert_eq!(decode_widths(&widths).unwrap(), "4006381333931");

        let scaled: Vec<u32> = widths.iter().map(|w| w * 3).collect();
        assert_eq!(decode_widths(&scaled).unwrap(), "4006381333931");
    }

    #[test]
    fn test_decode_upside_down() {
        let reversed: Vec<u32> = sample_widths().iter().rev().map(|w| w * 2).collect();
        assert_eq!(decode_widths(&reversed).unwrap(), "4006381333931");
    }

    #[test]
    fn test_bad_check_digit() {
        let mut widths = sample_widths();
        // Swap the last digit 1 (2,2,2,1) for 2 (2,1,2,2)
        let last = 32 + 5 * 4;
        widths[last..last + 4].copy_from_slice(&[2, 1, 2, 2]);
        assert!(matches!(
            decode_widths(&widths),
            Err(ScanError::ErrorCorrectionExceeded { .. })
        ));
    }

    #[test]
    fn test_wrong_run_count() {
        assert!(matches!(
            decode_widths(&[1, 1, 1]),
            Err(ScanError::StructuralMismatch(_))
        ));
    }
}
