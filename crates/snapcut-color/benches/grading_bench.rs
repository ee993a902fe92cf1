//! Benchmarks for snapcut-color grading.
//!
//! Run with: cargo bench -p snapcut-color

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use snapcut_color::{
    ColorGradingAdjustments, ColorWheel, ColorWheels, FilmPreset, GradingPipeline, HslAdjustment,
    Lut3D,
};
use snapcut_core::Frame;

fn full_grade() -> ColorGradingAdjustments {
    ColorGradingAdjustments {
        wheels: ColorWheels {
            shadows: ColorWheel {
                lift: 0.05,
                ..ColorWheel::NEUTRAL
            },
            highlights: ColorWheel {
                gain: 0.9,
                hue: 10.0,
                ..ColorWheel::NEUTRAL
            },
            ..Default::default()
        },
        hsl: HslAdjustment {
            saturation: 1.2,
            ..Default::default()
        },
        film: Some(FilmPreset::Kodak2383),
        ..Default::default()
    }
}

fn bench_pipeline_build(c: &mut Criterion) {
    let adj = full_grade();
    c.bench_function("grading_pipeline_build_with_film", |bencher| {
        bencher.iter(|| GradingPipeline::new(black_box(&adj)));
    });
}

fn bench_grade_frame(c: &mut Criterion) {
    let frame = Frame::test_pattern(1920, 1080);
    let Ok(pipe) = GradingPipeline::new(&full_grade()) else {
        return;
    };
    c.bench_function("grade_1080p_full", |bencher| {
        bencher.iter(|| pipe.apply(black_box(&frame)));
    });
}

fn bench_lut_apply(c: &mut Criterion) {
    let Ok(lut) = Lut3D::identity(33) else {
        return;
    };
    c.bench_function("lut3d_33_apply", |bencher| {
        bencher.iter(|| lut.apply(black_box([0.3, 0.6, 0.9])));
    });
}

criterion_group!(benches, bench_pipeline_build, bench_grade_frame, bench_lut_apply);
criterion_main!(benches);
