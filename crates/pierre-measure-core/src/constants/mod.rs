// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Default thresholds, windows, and timings for the pose measurement algorithms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Default tuning values grouped by the algorithm that consumes them. Every
//! value here is a default only: the algorithm config structs expose each of
//! them so callers can override per session.

/// Repetition counter timings and angle bounds
pub mod situp;
/// Step test protocol timings and recovery grade bands
pub mod step_test;

/// Geometry guards
pub mod geometry {
    /// Smallest vector magnitude or axis delta treated as non-zero
    pub const EPSILON: f64 = 1e-6;
    /// Combined shoulder visibility required to estimate yaw from the shoulders
    pub const YAW_SHOULDER_VISIBILITY_SUM: f64 = 0.8;
}

/// Landmark visibility thresholds
pub mod visibility {
    /// Threshold used by the sit-up side gate
    pub const SITUP_THRESHOLD: f64 = 0.6;
    /// Threshold used by the sit-and-reach framing gate
    pub const REACH_THRESHOLD: f64 = 0.45;
    /// Fingertip and foot-tip visibility required by the reach estimator
    pub const REACH_POINT_THRESHOLD: f64 = 0.45;
    /// Minimum visible joints on the chosen side for sit-up framing
    pub const SITUP_MIN_VISIBLE_JOINTS: usize = 4;
    /// Minimum visible joints on the chosen side for sit-and-reach framing
    pub const REACH_MIN_VISIBLE_JOINTS: usize = 6;
    /// Score margin the other side must exceed before a committed side flips
    pub const SIDE_SWITCH_MARGIN: f64 = 1.0;
}

/// Camera yaw acceptance windows in degrees, inclusive
pub mod framing {
    /// Sit-up: side-on but not fully profiled
    pub const SITUP_YAW_MIN_DEG: f64 = 55.0;
    /// Sit-up upper bound
    pub const SITUP_YAW_MAX_DEG: f64 = 85.0;
    /// Sit-and-reach: full profile
    pub const REACH_YAW_MIN_DEG: f64 = 85.0;
    /// Sit-and-reach upper bound
    pub const REACH_YAW_MAX_DEG: f64 = 95.0;
    /// Step test: near-frontal
    pub const STEP_YAW_MIN_DEG: f64 = 0.0;
    /// Step test upper bound
    pub const STEP_YAW_MAX_DEG: f64 = 20.0;
}

/// Sit-and-reach distance estimation and foot anchoring
pub mod reach {
    /// Candidate reach at or above which the foot anchor locks
    pub const LOCK_IN_NEAR_CM: f64 = -20.0;
    /// Candidate reach at or below which the foot anchor releases
    pub const RELEASE_FAR_CM: f64 = -30.0;
    /// Age after which a locked anchor is refreshed from a visible foot
    pub const ANCHOR_MAX_AGE_MS: u64 = 5_000;
    /// Foot visibility required to lock or refresh the anchor
    pub const FOOT_VISIBILITY_THRESHOLD: f64 = 0.45;
    /// Intermediate clamp applied to the anchor candidate
    pub const CANDIDATE_LIMIT_CM: f64 = 120.0;
    /// Final clamp applied to the reported reach
    pub const FINAL_LIMIT_CM: f64 = 80.0;
    /// Default user height when no profile is supplied
    pub const DEFAULT_USER_HEIGHT_CM: f64 = 170.0;
}

/// Peak-hold controller defaults
pub mod peak_hold {
    /// Seconds the peak must be held
    pub const NEED_SEC: f64 = 3.0;
    /// Assumed frame rate used to convert seconds into frames
    pub const FPS: f64 = 30.0;
    /// Tolerance band below the best value that still counts as holding
    pub const TOLERANCE_CM: f64 = 1.0;
    /// Improvement over the best value required to arm the hold
    pub const MIN_INCREMENT_TO_ARM_CM: f64 = 0.5;
}

/// Stable-window averager defaults
pub mod stable_window {
    /// Maximum spread of values inside a stable window
    pub const RANGE_CM: f64 = 2.0;
    /// Duration a window must stay within range
    pub const DURATION_MS: u64 = 1_000;
}

/// Orchestrator lifecycle timings
pub mod lifecycle {
    /// Consecutive valid framing required before a sit-up countdown starts
    pub const SITUP_READY_HOLD_MS: u64 = 600;
    /// Sit-up countdown duration
    pub const SITUP_COUNTDOWN_MS: u64 = 5_000;
    /// Sit-up run finishes after this long without a new rep
    pub const SITUP_INACTIVITY_MS: u64 = 4_000;
    /// Consecutive valid framing required before sit-and-reach starts
    pub const REACH_READY_HOLD_MS: u64 = 1_000;
    /// Sit-and-reach has no countdown by default
    pub const REACH_COUNTDOWN_MS: u64 = 0;
}

/// Heart-rate feed polling
pub mod heart_rate {
    /// Interval between feed polls
    pub const POLL_INTERVAL_MS: u64 = 1_000;
    /// Per-request timeout
    pub const REQUEST_TIMEOUT_MS: u64 = 3_000;
    /// Consecutive failures before a connectivity warning is raised
    pub const FAILURE_WARNING_THRESHOLD: u32 = 3;
    /// Default relay endpoint
    pub const DEFAULT_FEED_URL: &str = "http://127.0.0.1:3001/api/heart-rate";
}

/// Service identifiers used in logs and error details
pub mod service_names {
    /// Service name for structured logging
    pub const PIERRE_MEASURE: &str = "pierre-measure";
    /// External heart-rate relay
    pub const HEART_RATE_FEED: &str = "heart-rate feed";
}
