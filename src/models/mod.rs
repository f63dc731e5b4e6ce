pub mod frame;
pub mod grid;
pub mod matrix;
pub mod matrix_code;
pub mod point;
pub mod region;
pub mod result;

pub use frame::FrameBuffer;
pub use grid::ModuleGrid;
pub use matrix::BitMatrix;
pub use matrix_code::{ECLevel, MaskPattern, Version};
pub use point::Point;
pub use region::{BoundingBox, CandidateRegion, LinearRegion, MatrixRegion, RegionShape};
pub use result::{DecodeResult, Decoded, Symbology, SymbologySet};
