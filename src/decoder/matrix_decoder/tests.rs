use super::*;
use crate::decoder::version::version_positions;
use crate::encoder::MatrixEncoder;
use crate::encoder::segment::BitBuffer;

/// Known-good 21x21 symbol for "4376471154038" (version 1-M, mask 7)
const GOLDEN: [&str; 21] = [
    "#######.....#.#######",
    "#.....#..#....#.....#",
    "#.###.#...##..#.###.#",
    "#.###.#...#...#.###.#",
    "#.###.#..####.#.###.#",
    "#.....#.#.#...#.....#",
    "#######.#.#.#.#######",
    ".........#...........",
    "#..#.##.######.#.....",
    "###.#..##..#.#.#.##..",
    "#..#.####.##..###...#",
    "..#.#..#....#####....",
    "..#...##.#.#.###.##..",
    "........#.#..####.##.",
    "#######...###.#.####.",
    "#.....#.#.....##....#",
    "#.###.#..##.###..#.##",
    "#.###.#.#.#..####..##",
    "#.###.#..###.###.#..#",
    "#.....#..####..##..#.",
    "#######.###..#.###...",
];

fn golden_matrix() -> BitMatrix {
    BitMatrix::from_fn(21, |x, y| GOLDEN[y].as_bytes()[x] == b'#')
}

/// Toggle every module of the first `count` codewords
fn corrupt_codewords(grid: &mut BitMatrix, version: Version, count: usize) {
    let func = FunctionMask::new(version);
    for &(x, y) in func.placement_order().iter().take(count * 8) {
        grid.toggle(x, y);
    }
}

fn segments(build: impl FnOnce(&mut BitBuffer)) -> Vec<u8> {
    let mut bits = BitBuffer::new();
    build(&mut bits);
    bits.push(mode::TERMINATOR, 4);
    bits.to_bytes()
}

#[test]
fn test_golden_matrix_decode() {
    let payload = MatrixDecoder::decode(&golden_matrix()).unwrap();
    assert_eq!(payload.text, "4376471154038");
    assert_eq!(payload.version.number(), 1);
    assert_eq!(payload.ec_level, ECLevel::M);
    assert_eq!(payload.mask_pattern, MaskPattern::from_bits(7));
    assert_eq!(payload.errors_corrected, 0);
    assert!(!payload.mirrored);
}

#[test]
fn test_golden_matrix_structure() {
    let grid = golden_matrix();
    assert!(structure::check_structure(&grid).is_ok());
    assert!(structure::check_structure(&BitMatrix::new(21, 21)).is_err());
}

#[test]
fn test_mirrored_symbol() {
    let payload = MatrixDecoder::decode(&golden_matrix().transposed()).unwrap();
    assert_eq!(payload.text, "4376471154038");
    assert!(payload.mirrored);
}

#[test]
fn test_rejects_bad_dimension() {
    let err = MatrixDecoder::decode(&BitMatrix::new(23, 23)).unwrap_err();
    assert!(matches!(err, ScanError::Geometry(_)));
    let err = MatrixDecoder::decode(&BitMatrix::new(21, 25)).unwrap_err();
    assert!(matches!(err, ScanError::Geometry(_)));
}

#[test]
fn test_noise_within_capacity() {
    // Version 1-H: 26 codewords, 17 of them ECC, so 8 correctable
    let symbol = MatrixEncoder::new().ec_level(ECLevel::H).encode("HELLO").unwrap();
    assert_eq!(symbol.version.number(), 1);
    let mut grid = symbol.grid.clone();
    corrupt_codewords(&mut grid, symbol.version, 8);

    let flipped = (0..21)
        .flat_map(|y| (0..21).map(move |x| (x, y)))
        .filter(|&(x, y)| grid.get(x, y) != symbol.grid.get(x, y))
        .count();
    assert!(flipped * 100 / (21 * 21) >= 14);

    let payload = MatrixDecoder::decode(&grid).unwrap();
    assert_eq!(payload.text, "HELLO");
    assert_eq!(payload.errors_corrected, 8);
}

#[test]
fn test_noise_beyond_capacity() {
    let symbol = MatrixEncoder::new().ec_level(ECLevel::H).encode("HELLO").unwrap();
    let mut grid = symbol.grid;
    corrupt_codewords(&mut grid, symbol.version, 9);
    assert!(matches!(
        MatrixDecoder::decode(&grid),
        Err(ScanError::ErrorCorrectionExceeded { .. })
    ));
}

#[test]
fn test_multi_block_versions() {
    let text = "Multi-block symbols interleave their Reed-Solomon blocks; 0123456789";
    for (min_version, ec_level) in [(7, ECLevel::Q), (15, ECLevel::H), (27, ECLevel::L)] {
        let symbol = MatrixEncoder::new()
            .ec_level(ec_level)
            .min_version(Version::new(min_version).unwrap())
            .encode(text)
            .unwrap();
        assert_eq!(symbol.version.number(), min_version);
        let payload = MatrixDecoder::decode(&symbol.grid).unwrap();
        assert_eq!(payload.text, text);
        assert_eq!(payload.ec_level, ec_level);
    }
}

#[test]
fn test_version_information_mismatch() {
    let symbol = MatrixEncoder::new()
        .min_version(Version::new(7).unwrap())
        .encode("VERSION")
        .unwrap();
    let mut grid = symbol.grid;
    let word = VersionInfo::encode(Version::new(8).unwrap());
    for (i, (a, b)) in version_positions(grid.width()).enumerate() {
        let bit = (word >> i) & 1 == 1;
        grid.set(a, b, bit);
        grid.set(b, a, bit);
    }
    assert!(matches!(
        MatrixDecoder::decode(&grid),
        Err(ScanError::StructuralMismatch(_))
    ));
}

#[test]
fn test_segments_byte_mode() {
    let data = segments(|bits| {
        bits.push(mode::BYTE, 4);
        bits.push(2, 8);
        bits.push(b'H' as u32, 8);
        bits.push(b'I' as u32, 8);
    });
    assert_eq!(payload::decode_segments(&data, Version::MIN).unwrap(), "HI");
}

#[test]
fn test_segments_mixed_modes() {
    let data = segments(|bits| {
        bits.push(mode::NUMERIC, 4);
        bits.push(3, 10);
        bits.push(123, 10);
        bits.push(mode::ALPHANUMERIC, 4);
        bits.push(2, 9);
        bits.push(10 * 45 + 11, 11);
    });
    assert_eq!(payload::decode_segments(&data, Version::MIN).unwrap(), "123AB");
}

#[test]
fn test_segments_headers_skipped() {
    let data = segments(|bits| {
        bits.push(mode::STRUCTURED_APPEND, 4);
        bits.push(0x12, 8);
        bits.push(0x34, 8);
        bits.push(mode::ECI, 4);
        bits.push(26, 8);
        bits.push(mode::FNC1_FIRST, 4);
        bits.push(mode::BYTE, 4);
        bits.push(1, 8);
        bits.push(b'z' as u32, 8);
    });
    assert_eq!(payload::decode_segments(&data, Version::MIN).unwrap(), "z");
}

#[test]
fn test_segments_long_count_field() {
    // Byte count is 16 bits from version 10
    let data = segments(|bits| {
        bits.push(mode::BYTE, 4);
        bits.push(1, 16);
        bits.push(b'Q' as u32, 8);
    });
    assert_eq!(payload::decode_segments(&data, Version::new(10).unwrap()).unwrap(), "Q");
}

#[test]
fn test_segments_rejected() {
    let kanji = segments(|bits| {
        bits.push(mode::KANJI, 4);
        bits.push(1, 8);
        bits.push(0x1AAA, 13);
    });
    assert!(payload::decode_segments(&kanji, Version::MIN).is_err());

    let empty = segments(|_| {});
    assert!(payload::decode_segments(&empty, Version::MIN).is_err());

    let truncated = segments(|bits| {
        bits.push(mode::BYTE, 4);
        bits.push(9, 8);
        bits.push(b'A' as u32, 8);
    });
    assert!(payload::decode_segments(&truncated, Version::MIN).is_err());
}
