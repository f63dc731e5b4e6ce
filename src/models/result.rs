use std::fmt;

/// Supported symbology families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbology {
    /// 2D matrix family (QR Model 2)
    MatrixCode,
    /// 1D linear family (EAN-13 / UPC-A)
    LinearCode,
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbology::MatrixCode => f.write_str("matrix"),
            Symbology::LinearCode => f.write_str("linear"),
        }
    }
}

impl std::str::FromStr for Symbology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "matrix" | "qr" => Ok(Symbology::MatrixCode),
            "linear" | "ean13" | "ean" => Ok(Symbology::LinearCode),
            other => Err(format!("unknown symbology '{other}'")),
        }
    }
}

/// Set of enabled symbologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbologySet {
    matrix: bool,
    linear: bool,
}

impl SymbologySet {
    /// Both families
    pub fn all() -> Self {
        Self {
            matrix: true,
            linear: true,
        }
    }

    /// No family
    pub fn empty() -> Self {
        Self {
            matrix: false,
            linear: false,
        }
    }

    /// Only the given family
    pub fn only(symbology: Symbology) -> Self {
        Self::empty().with(symbology)
    }

    /// Add a family
    pub fn with(mut self, symbology: Symbology) -> Self {
        match symbology {
            Symbology::MatrixCode => self.matrix = true,
            Symbology::LinearCode => self.linear = true,
        }
        self
    }

    /// Whether a family is enabled
    pub fn contains(&self, symbology: Symbology) -> bool {
        match symbology {
            Symbology::MatrixCode => self.matrix,
            Symbology::LinearCode => self.linear,
        }
    }

    /// True when no family is enabled
    pub fn is_empty(&self) -> bool {
        !self.matrix && !self.linear
    }
}

impl Default for SymbologySet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Symbology> for SymbologySet {
    fn from_iter<I: IntoIterator<Item = Symbology>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), SymbologySet::with)
    }
}

/// A successful read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded payload text
    pub text: String,
    /// Family the payload was read from
    pub symbology: Symbology,
    /// Codewords repaired by error correction
    pub errors_corrected: usize,
}

/// Outcome of decoding one grid or one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    /// A payload was read
    Decoded(Decoded),
    /// Nothing readable
    NotFound,
}

impl DecodeResult {
    /// True for `Decoded`
    pub fn is_decoded(&self) -> bool {
        matches!(self, DecodeResult::Decoded(_))
    }

    /// Borrow the read, if any
    pub fn decoded(&self) -> Option<&Decoded> {
        match self {
            DecodeResult::Decoded(d) => Some(d),
            DecodeResult::NotFound => None,
        }
    }

    /// Decoded text, if any
    pub fn text(&self) -> Option<&str> {
        self.decoded().map(|d| d.text.as_str())
    }
}
