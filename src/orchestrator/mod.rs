// ABOUTME: Per-test frame orchestrators driving the measurement algorithms one frame at a time
// ABOUTME: Shared framing assessment combining camera yaw with the landmark quality gate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Frame Orchestrators
//!
//! Each fitness test owns one orchestrator instance per run. Frames are
//! pushed in arrival order with a caller-supplied millisecond timestamp; the
//! orchestrator returns the derived per-frame state for display and, once
//! finished, a [`SessionResult`](crate::session::SessionResult).
//!
//! Framing failures never reset a running measurement. They cancel a
//! countdown, pause rep counting, and break the sit-and-reach hold streak.

/// Ready, countdown, running and finished phases
pub mod lifecycle;
/// Sit-and-reach peak-hold orchestration
pub mod sit_and_reach;
/// Sit-up repetition orchestration
pub mod situp;
/// Step test protocol timers and recovery scoring
pub mod step_test;

pub use lifecycle::{Lifecycle, LifecycleEvent, RunPhase};
pub use sit_and_reach::{SitAndReachFrame, SitAndReachOrchestrator, SitAndReachSessionConfig};
pub use situp::{SitupFrame, SitupOrchestrator, SitupSessionConfig};
pub use step_test::{HeartRateMode, StepPhase, StepTestConfig, StepTestSession};

use pierre_measure_algorithms::geometry::estimate_yaw_deg;
use pierre_measure_algorithms::{FramingWindow, QualityGate, SideChoice};
use pierre_measure_core::models::{Frame, FrameIssue};
use serde::{Deserialize, Serialize};

/// Framing verdict for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramingStatus {
    /// Estimated camera yaw, `None` when indeterminate
    pub yaw_deg: Option<f64>,
    /// Side scores from the quality gate
    pub choice: SideChoice,
    /// Yaw accepted and enough joints visible
    pub ok: bool,
    /// First reason the frame failed
    pub issue: Option<FrameIssue>,
}

impl FramingStatus {
    /// Check yaw against `window` and visibility against `gate`
    #[must_use]
    pub fn assess(frame: &Frame, window: &FramingWindow, gate: &QualityGate) -> Self {
        let yaw = estimate_yaw_deg(frame);
        let choice = gate.choose_side(frame);

        let issue = window.issue(yaw).or_else(|| match choice.side {
            None => Some(FrameIssue::NoSideDeterminable),
            Some(side) if !gate.is_satisfied(&choice) => Some(
                gate.first_missing(frame, side)
                    .map_or(FrameIssue::NoSideDeterminable, |landmark| {
                        FrameIssue::MissingLandmark { landmark }
                    }),
            ),
            Some(_) => None,
        });

        Self {
            yaw_deg: yaw.is_finite().then_some(yaw),
            choice,
            ok: issue.is_none(),
            issue,
        }
    }
}

/// Round to one decimal place for reporting
pub(crate) fn round_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
