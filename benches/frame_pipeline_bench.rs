// ABOUTME: Criterion benchmarks for per-frame orchestrator throughput
// ABOUTME: Measures sit-up and sit-and-reach push latency and JSON-lines replay parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the frame pipeline.
//!
//! Frames must be processed well inside the 33 ms budget of a 30 fps camera.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

mod common;

use common::fixtures::{reach_sequence, situp_sequence, SequenceLength, FRAME_MS};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pierre_measure::algorithms::geometry::estimate_yaw_deg;
use pierre_measure::algorithms::QualityGate;
use pierre_measure::orchestrator::{
    SitAndReachOrchestrator, SitAndReachSessionConfig, SitupOrchestrator, SitupSessionConfig,
};
use pierre_measure::replay::{self, FrameRecord};

const LENGTHS: [SequenceLength; 2] = [SequenceLength::Short, SequenceLength::Long];

fn bench_situp_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("situp_push");

    for length in LENGTHS {
        let frames = situp_sequence(length);
        group.throughput(Throughput::Elements(frames.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(length.name()),
            &frames,
            |b, frames| {
                b.iter(|| {
                    let mut run = SitupOrchestrator::new(SitupSessionConfig::default()).unwrap();
                    for (frame, now_ms) in frames {
                        black_box(run.push(frame, *now_ms));
                    }
                    run.reps()
                });
            },
        );
    }

    group.finish();
}

fn bench_reach_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("sit_and_reach_push");

    for length in LENGTHS {
        let frames = reach_sequence(length);
        group.throughput(Throughput::Elements(frames.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(length.name()),
            &frames,
            |b, frames| {
                b.iter(|| {
                    let config = SitAndReachSessionConfig::with_height(100.0);
                    let mut run = SitAndReachOrchestrator::new(config).unwrap();
                    for (frame, now_ms) in frames {
                        black_box(run.push(frame, *now_ms));
                    }
                    run.best_cm()
                });
            },
        );
    }

    group.finish();
}

fn bench_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("framing");
    let frames = situp_sequence(SequenceLength::Short);
    let gate = QualityGate::situp();

    group.bench_function("estimate_yaw", |b| {
        b.iter(|| {
            for (frame, _) in &frames {
                black_box(estimate_yaw_deg(frame));
            }
        });
    });

    group.bench_function("choose_side", |b| {
        b.iter(|| {
            for (frame, _) in &frames {
                black_box(gate.choose_side(frame));
            }
        });
    });

    group.finish();
}

fn bench_replay_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay_parse");

    let text = reach_sequence(SequenceLength::Long)
        .into_iter()
        .map(|(landmarks, timestamp_ms)| {
            serde_json::to_string(&FrameRecord {
                timestamp_ms,
                landmarks,
            })
            .unwrap()
        })
        .collect::<Vec<_>>()
        .join("\n");

    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function(format!("jsonl_{}_frames_{FRAME_MS}ms", SequenceLength::Long.frames()), |b| {
        b.iter(|| replay::parse_jsonl(black_box(&text)).unwrap().len());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_situp_push,
    bench_reach_push,
    bench_framing,
    bench_replay_parse
);
criterion_main!(benches);
