/// Colour-to-luminance conversion for frames delivered by the acquisition layer.
///
/// Y = 0.299*R + 0.587*G + 0.114*B with integer weights: Y = (76*R + 150*G + 29*B) >> 8.
/// Frames with at least `PARALLEL_MIN_PIXELS` pixels are converted row-parallel.
use rayon::prelude::*;

const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Frames below this pixel count are converted on the calling thread
const PARALLEL_MIN_PIXELS: usize = 640 * 480;

/// Byte offsets of R, G and B inside one pixel
#[derive(Clone, Copy)]
struct Layout {
    channels: usize,
    r: usize,
    g: usize,
    b: usize,
}

const RGB: Layout = Layout {
    channels: 3,
    r: 0,
    g: 1,
    b: 2,
};
const RGBA: Layout = Layout {
    channels: 4,
    r: 0,
    g: 1,
    b: 2,
};
const BGRA: Layout = Layout {
    channels: 4,
    r: 2,
    g: 1,
    b: 0,
};

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8).min(255) as u8
}

fn convert_row(src: &[u8], dst: &mut [u8], layout: Layout) {
    for (x, out) in dst.iter_mut().enumerate() {
        let px = &src[x * layout.channels..(x + 1) * layout.channels];
        *out = luma(px[layout.r], px[layout.g], px[layout.b]);
    }
}

fn convert(pixels: &[u8], width: usize, height: usize, layout: Layout) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    let src_row = width * layout.channels;
    if width * height >= PARALLEL_MIN_PIXELS {
        gray.par_chunks_mut(width)
            .zip(pixels.par_chunks(src_row))
            .for_each(|(dst, src)| convert_row(src, dst, layout));
    } else {
        for (dst, src) in gray.chunks_mut(width).zip(pixels.chunks(src_row)) {
            convert_row(src, dst, layout);
        }
    }
    gray
}

/// Convert packed RGB to luminance
pub fn rgb_to_luma(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgb, width, height, RGB)
}

/// Convert packed RGBA to luminance (alpha ignored)
pub fn rgba_to_luma(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgba, width, height, RGBA)
}

/// Convert packed BGRA to luminance (alpha ignored)
pub fn bgra_to_luma(bgra: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(bgra, width, height, BGRA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_luma() {
        let rgb = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 128, 128, 128];
        let gray = rgb_to_luma(&rgb, 4, 1);
        assert_eq!(gray, vec![75, 149, 28, 127]);
    }

    #[test]
    fn test_bgra_matches_rgba() {
        let rgba = vec![10, 200, 30, 255, 90, 60, 250, 0];
        let bgra = vec![30, 200, 10, 255, 250, 60, 90, 0];
        assert_eq!(rgba_to_luma(&rgba, 2, 1), bgra_to_luma(&bgra, 2, 1));
    }

    #[test]
    fn test_parallel_path_matches_serial_row() {
        let width = 800;
        let height = 600;
        let rgb: Vec<u8> = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        let gray = rgb_to_luma(&rgb, width, height);
        let mut row = vec![0u8; width];
        convert_row(&rgb[width * 3 * 599..], &mut row, RGB);
        assert_eq!(&gray[width * 599..], &row[..]);
    }
}
