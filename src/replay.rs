// ABOUTME: Recorded pose frame replay from JSON-lines files through a test orchestrator
// ABOUTME: Used by the CLI and integration tests to run camera-based tests offline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Frame replay
//!
//! Each line holds one frame:
//!
//! ```json
//! {"timestamp_ms": 1033, "landmarks": [{"x": 0.5, "y": 0.4, "z": 0.0, "visibility": 0.9}, null]}
//! ```
//!
//! Landmarks are indexed by the 33-point pose layout; `null` marks a missing
//! joint. Blank lines are skipped. Timestamps must not go backwards.

use crate::config::MeasureConfig;
use crate::errors::{AppError, AppResult};
use crate::orchestrator::{RunPhase, SitAndReachOrchestrator, SitupOrchestrator};
use crate::session::SessionResult;
use pierre_measure_core::models::{FitnessTest, Frame};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Capture time in milliseconds
    pub timestamp_ms: u64,
    /// Pose landmarks
    pub landmarks: Frame,
}

/// Outcome of replaying a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Frames fed to the orchestrator
    pub frames: usize,
    /// Phase after the last frame
    pub final_phase: RunPhase,
    /// Result, if the run got far enough to produce one
    pub result: Option<SessionResult>,
}

/// Parse JSON-lines frame records
///
/// # Errors
///
/// Returns a serialization error naming the first bad line, or an
/// invalid-input error for a timestamp that goes backwards.
pub fn parse_jsonl(text: &str) -> AppResult<Vec<FrameRecord>> {
    let mut records: Vec<FrameRecord> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: FrameRecord = serde_json::from_str(line).map_err(|e| {
            AppError::serialization(format!("frame line {}: {e}", index + 1)).with_source(e)
        })?;
        if let Some(previous) = records.last() {
            if record.timestamp_ms < previous.timestamp_ms {
                return Err(AppError::invalid_input(format!(
                    "frame line {}: timestamp {} precedes {}",
                    index + 1,
                    record.timestamp_ms,
                    previous.timestamp_ms
                )));
            }
        }
        records.push(record);
    }
    Ok(records)
}

/// Read and parse a JSON-lines recording
///
/// # Errors
///
/// Returns a storage error if the file cannot be read, otherwise as
/// [`parse_jsonl`].
pub async fn load_jsonl(path: impl AsRef<Path>) -> AppResult<Vec<FrameRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).await.map_err(|e| {
        AppError::storage(format!("cannot read recording {}: {e}", path.display()))
            .with_source(e)
    })?;
    let records = parse_jsonl(&text)?;
    debug!(path = %path.display(), frames = records.len(), "recording loaded");
    Ok(records)
}

/// Feed `records` through a fresh orchestrator for `test`
///
/// # Errors
///
/// Returns a config error if the orchestrator config is invalid, or an
/// invalid-input error for the step test, which is not frame driven.
pub fn replay(
    test: FitnessTest,
    records: &[FrameRecord],
    config: &MeasureConfig,
) -> AppResult<ReplaySummary> {
    let summary = match test {
        FitnessTest::Situp => {
            let mut run = SitupOrchestrator::new(config.situp.clone())?;
            for record in records {
                run.push(&record.landmarks, record.timestamp_ms);
            }
            ReplaySummary {
                frames: records.len(),
                final_phase: run.phase(),
                result: run.result(),
            }
        }
        FitnessTest::SitAndReach => {
            let mut run = SitAndReachOrchestrator::new(config.sit_and_reach.clone())?;
            for record in records {
                if run.push(&record.landmarks, record.timestamp_ms).phase == RunPhase::Finished {
                    break;
                }
            }
            ReplaySummary {
                frames: records.len(),
                final_phase: run.phase(),
                result: run.result(),
            }
        }
        FitnessTest::StepTest => {
            return Err(AppError::invalid_input(
                "the step test is timer driven and has no frames to replay",
            ))
        }
    };
    info!(
        test = %test,
        frames = summary.frames,
        phase = %summary.final_phase,
        "replay finished"
    );
    Ok(summary)
}
