// ABOUTME: Step test protocol constants and recovery heart-rate grade bands
// ABOUTME: Phase durations in seconds, bpm band edges, and the VO2max estimate coefficients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Guided introduction before stepping
pub const PRESTEP_SEC: u64 = 28;
/// Stepping duration
pub const STEPPING_SEC: u64 = 180;
/// Seated recovery duration
pub const RECOVERY_SEC: u64 = 60;
/// Manual pulse count window
pub const MANUAL_COUNT_SEC: u64 = 10;
/// Multiplier from a manual count window to beats per minute
pub const MANUAL_COUNT_MULTIPLIER: u32 = 6;
/// Highest resting heart rate accepted at start
pub const MAX_RESTING_BPM: f64 = 100.0;

/// Upper (exclusive) bpm bound of grades 1 through 5; anything above is grade 6
pub const GRADE_UPPER_BOUNDS_BPM: [f64; 5] = [90.0, 100.0, 110.0, 120.0, 130.0];

/// Intercept of the recovery-bpm aerobic capacity estimate
pub const VO2MAX_INTERCEPT: f64 = 80.0;
/// Slope of the recovery-bpm aerobic capacity estimate
pub const VO2MAX_SLOPE: f64 = 0.4;
/// Lowest plausible estimate, ml/kg/min
pub const VO2MAX_MIN: f64 = 20.0;
/// Highest plausible estimate, ml/kg/min
pub const VO2MAX_MAX: f64 = 70.0;
