// ABOUTME: Step test recovery heart-rate scoring into a six-band fitness grade
// ABOUTME: Also derives a clamped linear VO2max estimate and converts manual pulse counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_measure_core::constants::step_test::{
    GRADE_UPPER_BOUNDS_BPM, MANUAL_COUNT_MULTIPLIER, VO2MAX_INTERCEPT, VO2MAX_MAX, VO2MAX_MIN,
    VO2MAX_SLOPE,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fitness grade, best (1) to worst (6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryGrade {
    /// Below 90 bpm
    Excellent,
    /// 90 to below 100 bpm
    Good,
    /// 100 to below 110 bpm
    Average,
    /// 110 to below 120 bpm
    BelowAverage,
    /// 120 to below 130 bpm
    Poor,
    /// 130 bpm and above
    VeryPoor,
}

impl RecoveryGrade {
    const ORDERED: [Self; 6] = [
        Self::Excellent,
        Self::Good,
        Self::Average,
        Self::BelowAverage,
        Self::Poor,
        Self::VeryPoor,
    ];

    /// Grade for a recovery heart rate
    #[must_use]
    pub fn from_bpm(bpm: f64) -> Self {
        GRADE_UPPER_BOUNDS_BPM
            .iter()
            .position(|upper| bpm < *upper)
            .map_or(Self::VeryPoor, |band| Self::ORDERED[band])
    }

    /// Ordinal 1..=6
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Excellent => 1,
            Self::Good => 2,
            Self::Average => 3,
            Self::BelowAverage => 4,
            Self::Poor => 5,
            Self::VeryPoor => 6,
        }
    }

    /// Label shown to Korean-speaking users
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "매우 우수",
            Self::Good => "우수",
            Self::Average => "보통",
            Self::BelowAverage => "보통 이하",
            Self::Poor => "부족",
            Self::VeryPoor => "매우 부족",
        }
    }
}

impl fmt::Display for RecoveryGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ordinal(), self.label())
    }
}

/// Scored recovery heart rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessScore {
    /// Recovery heart rate that was scored
    pub recovery_bpm: f64,
    /// Band
    pub grade: RecoveryGrade,
    /// Human-readable band label
    pub label: String,
    /// Estimated aerobic capacity, ml/kg/min, one decimal
    pub vo2max: f64,
}

/// Clamped linear aerobic capacity estimate, rounded to one decimal
#[must_use]
pub fn estimate_vo2max(recovery_bpm: f64) -> f64 {
    let raw = VO2MAX_SLOPE.mul_add(-recovery_bpm, VO2MAX_INTERCEPT);
    (raw.clamp(VO2MAX_MIN, VO2MAX_MAX) * 10.0).round() / 10.0
}

/// Beats per minute from a manual pulse count over the count window
#[must_use]
pub fn bpm_from_manual_count(beats: u32) -> f64 {
    f64::from(beats.saturating_mul(MANUAL_COUNT_MULTIPLIER))
}

/// Score a recovery heart rate
///
/// Returns `None` for a missing, non-finite or non-positive reading.
#[must_use]
pub fn calc_fitness_score(recovery_bpm: Option<f64>) -> Option<FitnessScore> {
    let bpm = recovery_bpm.filter(|b| b.is_finite() && *b > 0.0)?;
    let grade = RecoveryGrade::from_bpm(bpm);
    Some(FitnessScore {
        recovery_bpm: bpm,
        grade,
        label: grade.label().to_owned(),
        vo2max: estimate_vo2max(bpm),
    })
}
