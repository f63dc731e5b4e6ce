use criterion::{Criterion, black_box, criterion_group, criterion_main};
use framescan::FrameBuffer;
use framescan::utils::binarization::{Binarizer, adaptive_binarize};
use framescan::utils::grayscale::rgb_to_luma;

fn gradient(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .map(|i| ((i % width) * 255 / width) as u8 ^ ((i / width) as u8 & 0x1F))
        .collect()
}

fn bench_adaptive_binarize_small(c: &mut Criterion) {
    let luma = gradient(100, 100);
    let frame = FrameBuffer::from_slice(&luma, 100, 100).unwrap();
    c.bench_function("adaptive_binarize_100x100", |b| {
        b.iter(|| adaptive_binarize(black_box(&frame)))
    });
}

fn bench_adaptive_binarize_medium(c: &mut Criterion) {
    let luma = gradient(640, 480);
    let frame = FrameBuffer::from_slice(&luma, 640, 480).unwrap();
    c.bench_function("adaptive_binarize_640x480", |b| {
        b.iter(|| adaptive_binarize(black_box(&frame)))
    });
}

fn bench_reused_binarizer_large(c: &mut Criterion) {
    let luma = gradient(1920, 1080);
    let frame = FrameBuffer::from_slice(&luma, 1920, 1080).unwrap();
    let mut binarizer = Binarizer::default();
    c.bench_function("reused_binarizer_1920x1080", |b| {
        b.iter(|| binarizer.binarize(black_box(&frame)))
    });
}

fn bench_rgb_to_luma(c: &mut Criterion) {
    let rgb = vec![128u8; 1280 * 720 * 3];
    c.bench_function("rgb_to_luma_1280x720", |b| {
        b.iter(|| rgb_to_luma(black_box(&rgb), black_box(1280), black_box(720)))
    });
}

criterion_group!(
    benches,
    bench_adaptive_binarize_small,
    bench_adaptive_binarize_medium,
    bench_reused_binarizer_large,
    bench_rgb_to_luma
);
criterion_main!(benches);
