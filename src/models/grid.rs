use super::BitMatrix;

/// Rectified symbol data handed from the sampler to the decoder
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleGrid {
    /// Square grid of module values (`true` = dark), one cell per module
    Matrix(BitMatrix),
    /// Alternating bar/space widths in pixels, starting with a bar
    Linear(Vec<u32>),
}

impl ModuleGrid {
    /// Modules per side for matrix grids, run count for linear ones
    pub fn dimension(&self) -> usize {
        match self {
            ModuleGrid::Matrix(m) => m.width(),
            ModuleGrid::Linear(widths) => widths.len(),
        }
    }
}
