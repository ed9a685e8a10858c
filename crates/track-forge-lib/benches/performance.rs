//! Performance benchmarks for track-forge-lib
//!
//! Run with: cargo bench --package track-forge-lib

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use time::Duration;
use time::macros::datetime;
use track_forge_lib::elevation::cleanse;
use track_forge_lib::merge::merge;
use track_forge_lib::thinning::thin;
use track_forge_lib::{ELE_SENTINEL, MergePolicy, Point, Track, TrackFile, TrackNode};

/// Generate a wiggly, timestamped track with the specified number of points.
///
/// Every `void_every`-th point has no elevation (0 disables voids).
fn generate_track_file(num_points: usize, base_lat: f64, base_lon: f64, void_every: usize) -> TrackFile {
    let start = datetime!(2024-07-01 06:00:00 UTC);
    let mut file = TrackFile::named("bench");
    let mut track = Track::new();
    let segment = track.add_segment();

    for i in 0..num_points {
        let t = i as f64 / num_points as f64;
        let lat = base_lat + t * 0.1 + (t * 50.0).sin() * 0.001;
        let lon = base_lon + t * 0.1 + (t * 30.0).cos() * 0.001;
        let mut point = Point::new(lat, lon)
            .expect("generated coordinate in range")
            .with_time(start + Duration::seconds(i as i64));
        point.ele = if void_every > 0 && i % void_every == 0 {
            ELE_SENTINEL
        } else {
            500.0 + (t * 20.0).sin() * 100.0
        };
        segment.push(point);
    }

    file.tracks_mut().push(track);
    file
}

/// Generate multiple files spread across an area
fn generate_multiple_files(num_files: usize, points_per_file: usize) -> Vec<TrackFile> {
    (0..num_files)
        .map(|i| {
            let lat_offset = (i % 10) as f64 * 0.1;
            let lon_offset = (i / 10) as f64 * 0.1;
            generate_track_file(points_per_file, 46.0 + lat_offset, 8.0 + lon_offset, 0)
        })
        .collect()
}

// ============================================================================
// Core Benchmarks
// ============================================================================

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");

    let mut file = generate_track_file(50_000, 46.0, 8.0, 0);
    group.throughput(Throughput::Elements(50_000));
    group.bench_function("file_50k", |b| {
        b.iter(|| file.recompute());
    });

    group.finish();
}

fn bench_thinning(c: &mut Criterion) {
    let mut group = c.benchmark_group("thinning");
    group.sample_size(20);

    let file = generate_track_file(50_000, 46.0, 8.0, 0);
    let segment = file.tracks()[0].segments()[0].clone();
    group.throughput(Throughput::Elements(50_000));
    group.bench_function("segment_50k_5m", |b| {
        b.iter_batched(
            || segment.clone(),
            |mut segment| thin(&mut segment, 5.0),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    group.sample_size(20);

    let files = generate_multiple_files(50, 1_000);
    group.throughput(Throughput::Elements(50 * 1_000));
    for policy in [MergePolicy::IntoTracks, MergePolicy::IntoMulti, MergePolicy::IntoSingle] {
        group.bench_function(format!("{:?}_50x1k", policy), |b| {
            b.iter(|| merge(&files, policy));
        });
    }

    group.finish();
}

fn bench_cleanse(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleanse");

    let file = generate_track_file(50_000, 46.0, 8.0, 7);
    let segment = file.tracks()[0].segments()[0].clone();
    group.throughput(Throughput::Elements(50_000));
    group.bench_function("segment_50k_sparse_voids", |b| {
        b.iter_batched(
            || segment.clone(),
            |mut segment| cleanse(&mut segment),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_recompute,
    bench_thinning,
    bench_merge,
    bench_cleanse,
);

criterion_main!(benches);
