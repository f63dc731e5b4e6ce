//! Matrix-code (QR Model 2) metadata types: version, EC level and data mask.

/// Matrix-code version (1-40)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest supported version
    pub const MIN: Version = Version(1);
    /// Largest supported version
    pub const MAX: Version = Version(40);

    /// Build a version, `None` outside 1..=40
    pub fn new(number: u8) -> Option<Self> {
        (1..=40).contains(&number).then_some(Version(number))
    }

    /// Infer the version from a module dimension (`17 + 4v`)
    pub fn from_dimension(dimension: usize) -> Option<Self> {
        if dimension < 21 || (dimension - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((dimension - 17) / 4).ok().and_then(Self::new)
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn size(&self) -> usize {
        4 * self.0 as usize + 17
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl ECLevel {
    /// All levels in table order
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    /// Decode the two format-information bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// Two-bit value written into format information
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Row index into the EC tables
    pub(crate) fn table_index(&self) -> usize {
        match self {
            ECLevel::L => 0,
            ECLevel::M => 1,
            ECLevel::Q => 2,
            ECLevel::H => 3,
        }
    }
}

impl std::str::FromStr for ECLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ECLevel::L),
            "M" => Ok(ECLevel::M),
            "Q" => Ok(ECLevel::Q),
            "H" => Ok(ECLevel::H),
            other => Err(format!("unknown EC level '{other}'")),
        }
    }
}

/// Data mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    /// Get mask pattern from its three-bit reference
    pub fn from_bits(bits: u8) -> Self {
        MaskPattern(bits & 0x07)
    }

    /// Three-bit mask reference
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Iterate all eight masks
    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }

    /// Check if the module in column `x`, row `y` is inverted by this mask
    pub fn is_masked(&self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => (x * y) % 2 + (x * y) % 3 == 0,
            6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            _ => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_size() {
        assert_eq!(Version::new(1).unwrap().size(), 21);
        assert_eq!(Version::new(2).unwrap().size(), 25);
        assert_eq!(Version::MAX.size(), 177);
        assert!(Version::new(0).is_none());
        assert!(Version::new(41).is_none());
    }

    #[test]
    fn test_version_from_dimension() {
        assert_eq!(Version::from_dimension(21), Version::new(1));
        assert_eq!(Version::from_dimension(45), Version::new(7));
        assert_eq!(Version::from_dimension(22), None);
        assert_eq!(Version::from_dimension(181), None);
    }

    #[test]
    fn test_ec_level_bits() {
        for level in ECLevel::ALL {
            assert_eq!(ECLevel::from_format_bits(level.format_bits()), level);
        }
        assert_eq!(ECLevel::from_format_bits(0b01), ECLevel::L);
        assert_eq!("q".parse::<ECLevel>(), Ok(ECLevel::Q));
    }

    #[test]
    fn test_mask_pattern() {
        let mask = MaskPattern::from_bits(0);
        assert!(mask.is_masked(0, 0));
        assert!(!mask.is_masked(0, 1));
        assert!(mask.is_masked(1, 1));
        // Pattern 1 depends on the row only
        assert!(MaskPattern::from_bits(1).is_masked(5, 2));
        assert!(!MaskPattern::from_bits(1).is_masked(5, 3));
    }
}
