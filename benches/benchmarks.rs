//! Performance Benchmarks for the UPC and V0 analyses
//!
//! Run with: cargo bench
//!
//! Benchmarks cover:
//! - Track selection (general, UPC)
//! - System reconstruction and decay azimuth
//! - Full task passes over synthetic events
//! - Config serialization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use upc_v0_analysis::{
    phi_charge,
    selection::track::{track_passes_cuts, upc_track_first_failure},
    synthetic::{synthetic_strangeness_events, synthetic_upc_events},
    upc::{phi_random_with, pion_four_momenta},
    AnalysisConfig, AnalysisTask, LambdaTask, LambdaTaskConfig, RhoTask, Track, TrackCuts,
    UpcConfig, reconstruct_system,
};

fn sample_tracks() -> Vec<Track> {
    synthetic_upc_events(500, 3)
        .into_iter()
        .flat_map(|e| e.tracks)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// SELECTION BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════

fn bench_track_cuts(c: &mut Criterion) {
    let tracks = sample_tracks();
    let cuts = TrackCuts::default();

    let mut group = c.benchmark_group("track_selection");
    group.throughput(Throughput::Elements(tracks.len() as u64));
    group.bench_function("track_passes_cuts", |b| {
        b.iter(|| {
            tracks
                .iter()
                .filter(|t| track_passes_cuts(black_box(t), &cuts))
                .count()
        })
    });
    group.finish();
}

fn bench_upc_track_cuts(c: &mut Criterion) {
    let tracks = sample_tracks();
    let cfg = UpcConfig::default();

    let mut group = c.benchmark_group("upc_track_selection");
    group.throughput(Throughput::Elements(tracks.len() as u64));
    group.bench_function("upc_track_first_failure", |b| {
        b.iter(|| {
            tracks
                .iter()
                .filter(|t| upc_track_first_failure(black_box(t), &cfg).is_none())
                .count()
        })
    });
    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// RECONSTRUCTION BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════

fn bench_system_reconstruction(c: &mut Criterion) {
    let tracks = sample_tracks();

    let mut group = c.benchmark_group("system_reconstruction");
    for n in [2usize, 4, 6].iter() {
        let selected: Vec<&Track> = tracks.iter().take(*n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &selected, |b, selected| {
            b.iter(|| {
                let vecs = pion_four_momenta(black_box(selected));
                reconstruct_system(&vecs).mass()
            })
        });
    }
    group.finish();
}

fn bench_decay_azimuth(c: &mut Criterion) {
    let tracks = sample_tracks();
    let pair: Vec<&Track> = tracks.iter().take(2).collect();
    let vecs = pion_four_momenta(&pair);
    let mut rng = StdRng::seed_from_u64(5);

    c.bench_function("phi_random", |b| {
        b.iter(|| phi_random_with(black_box(&vecs), &mut rng))
    });
    c.bench_function("phi_charge", |b| {
        b.iter(|| phi_charge(black_box(&pair), black_box(&vecs)))
    });
}

// ═══════════════════════════════════════════════════════════════════════════
// TASK BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════

fn bench_rho_task(c: &mut Criterion) {
    let events = synthetic_upc_events(1000, 7);
    let mut task = RhoTask::new(UpcConfig::default()).expect("default config is valid");

    let mut group = c.benchmark_group("rho_task");
    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("process_1000", |b| {
        b.iter(|| {
            for event in &events {
                task.process(black_box(event)).expect("registered histograms");
            }
        })
    });
    group.finish();
}

fn bench_lambda_task(c: &mut Criterion) {
    let events = synthetic_strangeness_events(1000, 7);
    let mut task = LambdaTask::new(LambdaTaskConfig::default()).expect("default config is valid");

    let mut group = c.benchmark_group("lambda_task");
    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("process_1000", |b| {
        b.iter(|| {
            for event in &events {
                task.process(black_box(event)).expect("registered histograms");
            }
        })
    });
    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIG BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════

fn bench_config_roundtrip(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let json = config.to_json().expect("serializable");

    c.bench_function("config_serialization", |b| b.iter(|| black_box(&config).to_json()));
    c.bench_function("config_deserialization", |b| {
        b.iter(|| AnalysisConfig::from_json_str(black_box(&json)))
    });
}

criterion_group!(selection_benches, bench_track_cuts, bench_upc_track_cuts);

criterion_group!(
    reconstruction_benches,
    bench_system_reconstruction,
    bench_decay_azimuth,
);

criterion_group!(task_benches, bench_rho_task, bench_lambda_task);

criterion_group!(config_benches, bench_config_roundtrip);

criterion_main!(
    selection_benches,
    reconstruction_benches,
    task_benches,
    config_benches,
);
