// ABOUTME: Measurement session results handed to the external session-storage collaborator
// ABOUTME: Carries run id, test kind, completion phase, timestamp and the per-test outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppResult;
use crate::orchestrator::RunPhase;
use chrono::{DateTime, Utc};
use pierre_measure_algorithms::FitnessScore;
use pierre_measure_core::models::FitnessTest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Numeric outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeasurementOutcome {
    /// Sit-up repetitions
    Situp {
        /// Credited repetitions
        reps: u32,
    },
    /// Sit-and-reach distance
    SitAndReach {
        /// Best held reach, one decimal
        best_cm: f64,
        /// Best stable-window average, one decimal
        avg_cm: Option<f64>,
    },
    /// Step test recovery scoring
    StepTest {
        /// Resting heart rate accepted at start
        resting_bpm: Option<f64>,
        /// Recovery heart rate that was scored
        recovery_bpm: Option<f64>,
        /// Aerobic capacity estimate
        vo2max: Option<f64>,
        /// Grade ordinal 1 to 6
        grade: Option<u8>,
        /// Grade label
        grade_label: Option<String>,
    },
}

impl MeasurementOutcome {
    /// Step test outcome from an optional score
    #[must_use]
    pub fn step_test(
        resting_bpm: Option<f64>,
        recovery_bpm: Option<f64>,
        score: Option<&FitnessScore>,
    ) -> Self {
        Self::StepTest {
            resting_bpm,
            recovery_bpm,
            vo2max: score.map(|s| s.vo2max),
            grade: score.map(|s| s.grade.ordinal()),
            grade_label: score.map(|s| s.label.clone()),
        }
    }
}

/// Final result of one measurement run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Run identifier
    pub id: Uuid,
    /// Test that produced the result
    pub test: FitnessTest,
    /// Phase the run was in when the result was taken
    pub phase: RunPhase,
    /// When the result was taken
    pub measured_at: DateTime<Utc>,
    /// Numeric outcome
    pub outcome: MeasurementOutcome,
}

impl SessionResult {
    /// Result stamped with the current time
    #[must_use]
    pub fn new(id: Uuid, test: FitnessTest, phase: RunPhase, outcome: MeasurementOutcome) -> Self {
        Self {
            id,
            test,
            phase,
            measured_at: Utc::now(),
            outcome,
        }
    }

    /// Whether the run reached its completion condition
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == RunPhase::Finished
    }

    /// Pretty JSON for hand-off or printing
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the result cannot be encoded.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
