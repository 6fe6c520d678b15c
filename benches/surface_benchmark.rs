//! Surface engine benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sutu_canvas::brush::{BrushSettings, SoftRoundBrush, StrokeEngine};
use sutu_canvas::input::StrokeSample;
use sutu_canvas::surface::{Image, Point, Rect, Surface};

fn generate_stroke(count: usize) -> Vec<StrokeSample> {
    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            StrokeSample::with_tilt(
                t * 1000.0,
                (t * std::f32::consts::PI * 4.0).sin() * 100.0 + 500.0,
                0.3 + t * 0.4,
                0.0,
                0.0,
                0.004,
            )
        })
        .collect()
}

fn run_stroke(brush: &mut SoftRoundBrush, surface: &mut Surface, samples: &[StrokeSample]) {
    brush.begin_stroke();
    for sample in samples {
        brush.stroke_to(surface, sample);
    }
    black_box(brush.end_stroke(surface));
}

fn benchmark_stroke(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stroke");

    for count in [10, 100, 1000].iter() {
        let samples = generate_stroke(*count);
        group.bench_with_input(BenchmarkId::new("soft_round", count), &samples, |b, samples| {
            let mut surface = Surface::new(1920, 1080).unwrap_or_else(|e| panic!("{}", e));
            let mut brush = SoftRoundBrush::new();
            b.iter(|| run_stroke(&mut brush, &mut surface, samples))
        });
    }

    // Hard brush skips most of the falloff band
    let samples = generate_stroke(100);
    group.bench_function("hard_round_100", |b| {
        let mut surface = Surface::new(1920, 1080).unwrap_or_else(|e| panic!("{}", e));
        let mut brush = SoftRoundBrush::with_settings(BrushSettings {
            hardness: 1.0,
            ..Default::default()
        });
        b.iter(|| run_stroke(&mut brush, &mut surface, &samples))
    });

    group.finish();
}

fn benchmark_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("Overlapping Tiles");
    let surface = Surface::new(4096, 4096).unwrap_or_else(|e| panic!("{}", e));

    for size in [16, 256, 4096].iter() {
        let rect = Rect::new(-7, 13, *size, *size);
        group.bench_with_input(BenchmarkId::new("find", size), &rect, |b, rect| {
            b.iter(|| surface.find_overlapping_tiles(black_box(rect)))
        });
    }

    group.finish();
}

fn benchmark_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("Composite");

    for size in [64u32, 512, 1920].iter() {
        let image = Image::filled(*size, *size, 0x8040_2010);
        group.bench_with_input(BenchmarkId::new("image", size), &image, |b, image| {
            let mut surface = Surface::new(1920, 1920).unwrap_or_else(|e| panic!("{}", e));
            b.iter(|| {
                surface.clear();
                surface.composite_image_at(image, Point::new(3, 5));
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_stroke, benchmark_overlap, benchmark_composite);
criterion_main!(benches);
