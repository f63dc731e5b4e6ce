use criterion::{Criterion, black_box, criterion_group, criterion_main};
use framescan::encoder::{Canvas, MatrixEncoder, encode_ean13};
use framescan::{DecodePipeline, FrameBuffer, ScanConfig};

fn matrix_frame() -> FrameBuffer<'static> {
    let symbol = MatrixEncoder::new().encode("https://example.com/bench").unwrap();
    let mut canvas = Canvas::new(640, 480);
    canvas.draw_matrix(&symbol.grid, 200, 120, 5);
    canvas.into_frame().unwrap()
}

fn linear_frame() -> FrameBuffer<'static> {
    let modules = encode_ean13("590123412345").unwrap();
    let mut canvas = Canvas::new(640, 480);
    canvas.draw_linear(&modules, 80, 160, 3, 120);
    canvas.into_frame().unwrap()
}

fn bench_matrix_frame(c: &mut Criterion) {
    let frame = matrix_frame();
    let mut pipeline = DecodePipeline::new(ScanConfig::default()).unwrap();
    c.bench_function("process_frame_matrix_640x480", |b| {
        b.iter(|| pipeline.process_frame(black_box(&frame)))
    });
}

fn bench_linear_frame(c: &mut Criterion) {
    let frame = linear_frame();
    let mut pipeline = DecodePipeline::new(ScanConfig::default()).unwrap();
    c.bench_function("process_frame_linear_640x480", |b| {
        b.iter(|| pipeline.process_frame(black_box(&frame)))
    });
}

fn bench_blank_frame(c: &mut Criterion) {
    let frame = FrameBuffer::from_vec(vec![128; 640 * 480], 640, 480).unwrap();
    let mut pipeline = DecodePipeline::new(ScanConfig::default()).unwrap();
    c.bench_function("process_frame_blank_640x480", |b| {
        b.iter(|| pipeline.process_frame(black_box(&frame)))
    });
}

criterion_group!(benches, bench_matrix_frame, bench_linear_frame, bench_blank_frame);
criterion_main!(benches);
