// ABOUTME: Integration tests for JSON-lines frame replay through the orchestrators
// ABOUTME: Writes recordings to temp files and checks the summary of each replayed test
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{init_test_logging, reach_frame, situp_frame, to_jsonl, REACH_FRAME_MS, SITUP_FRAME_MS};
use pierre_measure::config::MeasureConfig;
use pierre_measure::errors::ErrorCode;
use pierre_measure::models::{FitnessTest, Frame, Landmark, PoseLandmark};
use pierre_measure::orchestrator::RunPhase;
use pierre_measure::replay::{self, FrameRecord};
use pierre_measure::session::MeasurementOutcome;
use std::fs;
use tempfile::TempDir;

fn situp_recording() -> Vec<Frame> {
    let mut frames: Vec<Frame> = (0..145).map(|_| situp_frame(170.0)).collect();
    for _ in 0..2 {
        frames.extend((0..12).map(|_| situp_frame(80.0)));
        frames.extend((0..12).map(|_| situp_frame(170.0)));
    }
    frames
}

fn reach_recording() -> Vec<Frame> {
    let mut frames: Vec<Frame> = (0..40).map(|_| reach_frame(-40.0)).collect();
    frames.extend((-39..=5).map(|cm| reach_frame(f64::from(cm))));
    frames.extend((0..120).map(|_| reach_frame(6.0)));
    frames
}

#[tokio::test]
async fn test_situp_recording_counts_reps() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("situp.jsonl");
    fs::write(&path, to_jsonl(&situp_recording(), SITUP_FRAME_MS)).unwrap();

    let records = replay::load_jsonl(&path).await.unwrap();
    assert_eq!(records.len(), 193);

    let summary = replay::replay(FitnessTest::Situp, &records, &MeasureConfig::default()).unwrap();
    assert_eq!(summary.frames, 193);
    assert_eq!(summary.final_phase, RunPhase::Running);
    let result = summary.result.unwrap();
    assert_eq!(result.outcome, MeasurementOutcome::Situp { reps: 2 });
}

#[tokio::test]
async fn test_reach_recording_stops_at_finish() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reach.jsonl");
    fs::write(&path, to_jsonl(&reach_recording(), REACH_FRAME_MS)).unwrap();

    let mut config = MeasureConfig::default();
    config.user.height_cm = common::REACH_HEIGHT_CM;
    config.sync_user_height();

    let records = replay::load_jsonl(&path).await.unwrap();
    let summary = replay::replay(FitnessTest::SitAndReach, &records, &config).unwrap();
    assert_eq!(summary.final_phase, RunPhase::Finished);

    let result = summary.result.unwrap();
    assert!(result.is_complete());
    match result.outcome {
        MeasurementOutcome::SitAndReach { best_cm, .. } => assert!((best_cm - 6.0).abs() < 1e-6),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_recording_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let error = replay::load_jsonl(dir.path().join("absent.jsonl"))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StorageError);
}

#[test]
fn test_bad_line_is_named() {
    let text = "{\"timestamp_ms\": 0, \"landmarks\": []}\nnot json\n";
    let error = replay::parse_jsonl(text).unwrap_err();
    assert_eq!(error.code, ErrorCode::SerializationError);
    assert!(error.message.contains("line 2"));
}

#[test]
fn test_record_keeps_missing_landmarks() {
    let record = FrameRecord {
        timestamp_ms: 66,
        landmarks: Frame::empty()
            .with(PoseLandmark::LeftHip, Landmark::new(0.5, 0.7, 0.0, 0.95))
            .with(PoseLandmark::LeftKnee, Landmark::new(0.7, 0.7, -0.05, 0.9)),
    };
    let line = serde_json::to_string(&record).unwrap();
    assert!(line.contains("null"));
    let parsed = replay::parse_jsonl(&line).unwrap();
    assert_eq!(parsed, vec![record]);
}

#[test]
fn test_too_short_recording_has_no_result() {
    let records: Vec<FrameRecord> = (0..10)
        .map(|i| FrameRecord {
            timestamp_ms: i * SITUP_FRAME_MS,
            landmarks: situp_frame(170.0),
        })
        .collect();
    let summary = replay::replay(FitnessTest::Situp, &records, &MeasureConfig::default()).unwrap();
    assert_eq!(summary.final_phase, RunPhase::Ready);
    assert!(summary.result.is_none());
}
