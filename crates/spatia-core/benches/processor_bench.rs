//! Criterion benchmarks for the spatial processor
//!
//! Run with: cargo bench -p spatia-core
#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use spatia_core::{
    AudioProfile, ListenerPose, Motion, Orientation, ProcessOptions, SpatialProcessor,
    SpatialRequest, Vec3, azimuth_elevation,
};

const SOURCE_COUNTS: &[usize] = &[1, 16, 128];

fn sources(count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let t = i as f32 * 0.37;
            Vec3::new(t.cos() * 20.0, (i % 5) as f32, t.sin() * 20.0)
        })
        .collect()
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("SpatialProcessor");
    let processor = SpatialProcessor::default();
    let profile = AudioProfile::new("bench");
    let listener = ListenerPose::new(Vec3::new(0.0, 2.0, 0.0), Orientation::new(45.0, 5.0, 0.0));

    for &count in SOURCE_COUNTS {
        let points = sources(count);
        group.bench_with_input(BenchmarkId::new("static", count), &count, |b, _| {
            b.iter(|| {
                for &source in &points {
                    let request = SpatialRequest::new(&profile, source, listener);
                    black_box(processor.process(black_box(&request), ProcessOptions::default()))
                        .ok();
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("doppler", count), &count, |b, _| {
            b.iter(|| {
                for &source in &points {
                    let motion = Motion::new(source + Vec3::X, listener.position, 0.016);
                    let request = SpatialRequest::new(&profile, source, listener)
                        .with_occlusion(0.3)
                        .with_motion(motion);
                    black_box(processor.process(black_box(&request), ProcessOptions::with_doppler()))
                        .ok();
                }
            });
        });
    }

    group.finish();
}

fn bench_basis(c: &mut Criterion) {
    let orientation = Orientation::new(123.0, -20.0, 8.0);
    c.bench_function("Orientation/basis", |b| {
        b.iter(|| black_box(black_box(orientation).basis()));
    });

    let basis = orientation.basis();
    let dir = Vec3::new(0.3, 0.4, 0.866);
    c.bench_function("azimuth_elevation", |b| {
        b.iter(|| black_box(azimuth_elevation(&basis, black_box(dir))));
    });
}

criterion_group!(benches, bench_process, bench_basis);
criterion_main!(benches);
