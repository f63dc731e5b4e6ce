use crate::decoder::ean13::{
    FIRST_DIGIT_PARITY, L_PATTERNS, MODULE_COUNT, check_digit, checksum_valid, g_pattern,
};
use crate::error::{Result, ScanError};

/// Encode 12 digits (check digit appended) or 13 digits (check digit verified)
/// as 95 modules, `true` = bar.
pub fn encode_ean13(digits: &str) -> Result<Vec<bool>> {
    let mut values: Vec<u8> = digits
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect::<Option<_>>()
        .ok_or_else(|| ScanError::Encoding(format!("'{digits}' is not all digits")))?;

    match values.len() {
        12 => values.push(check_digit(&values)),
        13 => {}
        n => {
            return Err(ScanError::Encoding(format!(
                "EAN-13 takes 12 or 13 digits, got {n}"
            )));
        }
    }
    let mut full = [0u8; 13];
    full.copy_from_slice(&values);
    if !checksum_valid(&full) {
        return Err(ScanError::Encoding(format!("'{digits}' has a wrong check digit")));
    }

    let mut modules = Vec::with_capacity(MODULE_COUNT);
    let push_runs = |widths: [u8; 4], first_dark: bool, out: &mut Vec<bool>| {
        let mut dark = first_dark;
        for w in widths {
            out.extend(std::iter::repeat_n(dark, w as usize));
            dark = !dark;
        }
    };

    modules.extend([true, false, true]);
    let parity = FIRST_DIGIT_PARITY[full[0] as usize];
    for (i, &d) in full[1..7].iter().enumerate() {
        let pattern = if parity[i] {
            g_pattern(d as usize)
        } else {
            L_PATTERNS[d as usize]
        };
        push_runs(pattern, false, &mut modules);
    }
    modules.extend([false, true, false, true, false]);
    for &d in &full[7..] {
        push_runs(L_PATTERNS[d as usize], true, &mut modules);
    }
    modules.extend([true, false, true]);

    debug_assert_eq!(modules.len(), MODULE_COUNT);
    Ok(modules)
}
