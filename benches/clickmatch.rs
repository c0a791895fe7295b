use clickmatch::{EngineSelector, MatchEngine, MatchOptions, RawImage};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> RawImage {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.extend_from_slice(&[value as u8, (x * 3) as u8, (y * 5) as u8, 255]);
        }
    }
    RawImage::from_rgba(data, width, height).unwrap()
}

fn bench_engines(c: &mut Criterion) {
    let screen = make_image(320, 240);
    let reference = screen.crop(120, 100, 48, 32).unwrap();
    let engine = MatchEngine::probe();

    let base = MatchOptions::default().with_scales([1.0, 0.8]);

    if cfg!(feature = "correlation") {
        let options = base.clone().with_engine(EngineSelector::Primary);
        c.bench_function("correlation_two_scales", |b| {
            b.iter(|| black_box(engine.match_image(&screen, &reference, &options).unwrap()));
        });
    }

    let options = base.clone().with_engine(EngineSelector::Fallback);
    c.bench_function("diff_two_scales", |b| {
        b.iter(|| black_box(engine.match_image(&screen, &reference, &options).unwrap()));
    });

    if cfg!(feature = "rayon") {
        let options = base.clone().with_parallel(true);
        c.bench_function("auto_two_scales_parallel", |b| {
            b.iter(|| black_box(engine.match_image(&screen, &reference, &options).unwrap()));
        });
    }

    let flat_screen = RawImage::filled(800, 600, &[0, 0, 0, 255]).unwrap();
    let square = RawImage::filled(40, 40, &[255, 255, 255, 255]).unwrap();
    let options = MatchOptions::default();
    c.bench_function("auto_flat_square_800x600", |b| {
        b.iter(|| black_box(engine.match_image(&flat_screen, &square, &options).unwrap()));
    });
}

criterion_group!(benches, bench_engines);
criterion_main!(benches);
