// ABOUTME: Frame-to-measurement algorithms for camera and heart-rate based fitness tests
// ABOUTME: Geometry, landmark gating, framing, foot anchoring, reach, peak hold, and rep counting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Measure Algorithms
//!
//! Every stateful algorithm here is an explicit instance owned by one
//! measurement run. Updates are pure functions of the current state and the
//! current frame; nothing performs I/O or blocks, and nothing is shared
//! between runs.
//!
//! Timestamps are milliseconds from an arbitrary monotonic origin supplied
//! by the caller with each frame.

/// Joint angle, camera yaw, and clamping
pub mod geometry;

/// Per-side landmark visibility scoring and side selection
pub mod quality;

/// Per-test yaw acceptance windows and the ready-hold accumulator
pub mod framing;

/// Foot-anchor hysteresis tracker for sit-and-reach
pub mod foot_anchor;

/// Signed fingertip-to-foot distance estimation
pub mod reach;

/// Peak-hold-with-tolerance controller
pub mod peak_hold;

/// Averager over windows whose values stay within a narrow band
pub mod stable_window;

/// Sit-up repetition counter with calibration and debounce
pub mod rep_counter;

/// Recovery heart-rate grading and aerobic capacity estimate
pub mod recovery_hr;

pub use foot_anchor::{AnchorTransition, FootAnchorConfig, FootAnchorTracker};
pub use framing::{FramingWindow, ReadyHold};
pub use peak_hold::{PeakHoldConfig, PeakHoldController, PeakHoldStatus};
pub use quality::{QualityGate, ScoreMode, SideChoice, SideLock, TieBreak};
pub use reach::{ReachConfig, ReachEstimate, ReachEstimator};
pub use recovery_hr::{
    bpm_from_manual_count, calc_fitness_score, estimate_vo2max, FitnessScore, RecoveryGrade,
};
pub use rep_counter::{RepCounter, RepCounterConfig, RepPhase, RepThresholds, RepUpdate};
pub use stable_window::{StableWindow, StableWindowConfig};
