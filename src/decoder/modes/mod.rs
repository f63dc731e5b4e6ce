//! Segment mode decoders
//!
//! - Numeric: digits in groups of three
//! - Alphanumeric: upper-case letters, digits and nine symbols
//! - Byte: 8-bit data (UTF-8 or ISO-8859-1)

pub mod alphanumeric;
pub mod byte;
pub mod numeric;
