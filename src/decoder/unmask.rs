/// Data mask application (XOR, so the same call masks and unmasks)
use crate::decoder::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

/// Toggle every data module selected by the mask pattern
pub fn unmask(matrix: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    let size = func.size();
    for y in 0..size {
        for x in 0..size {
            if !func.is_function(x, y) && mask_pattern.is_masked(x, y) {
                matrix.toggle(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Version;

    #[test]
    fn test_unmask_skips_function_modules() {
        let mut matrix = BitMatrix::new(21, 21);
        matrix.set(10, 10, true);
        let func = FunctionMask::new(Version::new(1).unwrap());
        unmask(&mut matrix, MaskPattern::from_bits(0), &func);

        // (10,10) is data and selected by pattern 0
        assert!(!matrix.get(10, 10));
        // (11,10) is data but not selected
        assert!(!matrix.get(11, 10));
        // Timing row is untouched
        assert!(!matrix.get(8, 6));
    }

    #[test]
    fn test_unmask_is_involution() {
        let func = FunctionMask::new(Version::new(2).unwrap());
        let original = BitMatrix::from_fn(25, |x, y| (x * 7 + y * 3) % 5 == 0);
        let mut matrix = original.clone();
        unmask(&mut matrix, MaskPattern::from_bits(4), &func);
        assert_ne!(matrix, original);
        unmask(&mut matrix, MaskPattern::from_bits(4), &func);
        assert_eq!(matrix, original);
    }
}
