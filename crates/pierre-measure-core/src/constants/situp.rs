// ABOUTME: Sit-up repetition counter constants for smoothing, calibration, and debounce
// ABOUTME: Angle thresholds in degrees and timings in milliseconds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Minimum dwell after a phase change before the next change is accepted
pub const HOLD_MS: u64 = 150;
/// Dead time after a credited rep
pub const REFRACTORY_MS: u64 = 250;
/// Initial window collecting angle extremes before counting starts
pub const AUTO_CALIBRATE_MS: u64 = 1_000;
/// Rolling history window used for percentile thresholds
pub const ROLL_WINDOW_MS: u64 = 4_000;
/// Samples in the median smoothing window
pub const SMOOTHING_WINDOW: usize = 5;
/// History samples required before percentile thresholds apply
pub const MIN_HISTORY_SAMPLES: usize = 8;

/// Percentile of the rolling history treated as the lying-down angle
pub const P_HIGH: f64 = 0.8;
/// Percentile of the rolling history treated as the curled-up angle
pub const P_LOW: f64 = 0.2;
/// Down threshold before calibration
pub const DEFAULT_DOWN_DEG: f64 = 110.0;
/// Up threshold before calibration
pub const DEFAULT_UP_DEG: f64 = 70.0;
/// Minimum separation between down and up thresholds
pub const MIN_GAP_DEG: f64 = 20.0;
/// Margin pulled inward from calibrated extremes and percentiles
pub const MARGIN_DEG: f64 = 5.0;
/// Yaw shift that triggers re-calibration
pub const RECALIBRATE_YAW_DEG: f64 = 15.0;

/// Lowest allowed down threshold
pub const DOWN_MIN_DEG: f64 = 80.0;
/// Highest allowed down threshold
pub const DOWN_MAX_DEG: f64 = 160.0;
/// Lowest allowed up threshold
pub const UP_MIN_DEG: f64 = 30.0;
/// Highest allowed up threshold
pub const UP_MAX_DEG: f64 = 110.0;
