// ABOUTME: Signed fingertip-to-foot reach estimation in centimeters scaled by user height
// ABOUTME: Feeds a provisional distance to the foot anchor, then measures against its reference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Reach-distance estimator
//!
//! Sign convention: positive means the fingertip has passed the foot in the
//! hip-to-foot direction, zero is exactly at the foot, negative is short of
//! it. The provisional candidate is clamped to ±120 cm before it reaches the
//! anchor; the reported value is clamped to ±80 cm.

use crate::foot_anchor::{FootAnchorConfig, FootAnchorTracker};
use crate::geometry::clamp;
use crate::quality::{QualityGate, SideLock};
use pierre_measure_core::constants::{geometry::EPSILON, reach, visibility};
use pierre_measure_core::errors::{AppError, AppResult};
use pierre_measure_core::models::{BodyPart, Frame, FrameIssue, Landmark, Side};
use serde::{Deserialize, Serialize};

/// Reach estimator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachConfig {
    /// User height used to scale normalized coordinates
    #[serde(default = "default_user_height_cm")]
    pub user_height_cm: f64,
    /// Fingertip and foot visibility threshold
    #[serde(default = "default_point_visibility")]
    pub point_visibility_threshold: f64,
    /// Side selection gate
    #[serde(default = "QualityGate::reach_side")]
    pub side_gate: QualityGate,
    /// Score lead needed to switch the committed side
    #[serde(default = "default_side_switch_margin")]
    pub side_switch_margin: f64,
    /// Foot anchor thresholds
    #[serde(default)]
    pub anchor: FootAnchorConfig,
}

const fn default_user_height_cm() -> f64 {
    reach::DEFAULT_USER_HEIGHT_CM
}

const fn default_point_visibility() -> f64 {
    visibility::REACH_POINT_THRESHOLD
}

const fn default_side_switch_margin() -> f64 {
    visibility::SIDE_SWITCH_MARGIN
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            user_height_cm: default_user_height_cm(),
            point_visibility_threshold: default_point_visibility(),
            side_gate: QualityGate::reach_side(),
            side_switch_margin: default_side_switch_margin(),
            anchor: FootAnchorConfig::default(),
        }
    }
}

impl ReachConfig {
    /// Config for a user of the given height
    #[must_use]
    pub fn with_height(user_height_cm: f64) -> Self {
        Self {
            user_height_cm,
            ..Self::default()
        }
    }

    /// Validate settings
    ///
    /// # Errors
    ///
    /// Returns a config error for a non-positive or non-finite height, a
    /// visibility threshold outside `[0, 1]`, or an invalid gate or anchor.
    pub fn validate(&self) -> AppResult<()> {
        if !self.user_height_cm.is_finite() || self.user_height_cm <= 0.0 {
            return Err(AppError::config(format!(
                "user height {} cm must be positive",
                self.user_height_cm
            )));
        }
        if !(0.0..=1.0).contains(&self.point_visibility_threshold) {
            return Err(AppError::config(format!(
                "point visibility threshold {} is outside [0, 1]",
                self.point_visibility_threshold
            )));
        }
        self.side_gate.validate()?;
        self.anchor.validate()
    }
}

/// Per-frame reach measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachEstimate {
    /// Signed reach; 0 when `ok` is false
    pub cm: f64,
    /// Side measured
    pub side: Option<Side>,
    /// A valid foot reference existed this frame
    pub ok: bool,
    /// The foot anchor was locked after this frame
    pub anchored: bool,
    /// Foot x used for the final distance
    pub foot_x: Option<f64>,
    /// Why the frame failed
    pub issue: Option<FrameIssue>,
}

impl ReachEstimate {
    const fn failed(side: Option<Side>, issue: FrameIssue) -> Self {
        Self {
            cm: 0.0,
            side,
            ok: false,
            anchored: false,
            foot_x: None,
            issue: Some(issue),
        }
    }
}

/// Reach estimator owning the foot anchor and side commitment of one run
#[derive(Debug, Clone)]
pub struct ReachEstimator {
    config: ReachConfig,
    anchors: FootAnchorTracker,
    side_lock: SideLock,
}

impl ReachEstimator {
    /// Build an estimator
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` fails validation.
    pub fn new(config: ReachConfig) -> AppResult<Self> {
        config.validate()?;
        let anchors = FootAnchorTracker::new(config.anchor)?;
        let side_lock = SideLock::new(config.side_switch_margin);
        Ok(Self {
            config,
            anchors,
            side_lock,
        })
    }

    /// Active settings
    #[must_use]
    pub const fn config(&self) -> &ReachConfig {
        &self.config
    }

    /// Foot anchor state
    #[must_use]
    pub const fn anchors(&self) -> &FootAnchorTracker {
        &self.anchors
    }

    fn point<'a>(&self, frame: &'a Frame, part: BodyPart, side: Side) -> Option<&'a Landmark> {
        frame
            .visible(part.landmark(side), self.config.point_visibility_threshold)
            .filter(|lm| lm.x.is_finite())
    }

    fn signed_cm(&self, hand_x: f64, foot_x: f64, hip_x: f64) -> f64 {
        direction_sign(foot_x - hip_x) * (hand_x - foot_x) * self.config.user_height_cm
    }

    /// Measure one frame
    pub fn estimate(&mut self, frame: &Frame, now_ms: u64) -> ReachEstimate {
        let choice = self.config.side_gate.choose_side(frame);
        let Some(side) = self.side_lock.update(&choice) else {
            return ReachEstimate::failed(None, FrameIssue::NoSideDeterminable);
        };

        let Some(hand) = self.point(frame, BodyPart::Index, side) else {
            return ReachEstimate::failed(
                Some(side),
                FrameIssue::MissingLandmark {
                    landmark: BodyPart::Index.landmark(side),
                },
            );
        };
        let Some(hip) = frame.get(BodyPart::Hip.landmark(side)) else {
            return ReachEstimate::failed(
                Some(side),
                FrameIssue::MissingLandmark {
                    landmark: BodyPart::Hip.landmark(side),
                },
            );
        };

        let foot = self
            .point(frame, BodyPart::FootIndex, side)
            .or_else(|| self.point(frame, BodyPart::Ankle, side));
        let missing_foot = FrameIssue::MissingLandmark {
            landmark: BodyPart::FootIndex.landmark(side),
        };

        let Some(provisional_x) = self.anchors.value_for(side, foot) else {
            return ReachEstimate::failed(Some(side), missing_foot);
        };
        let candidate = clamp(
            self.signed_cm(hand.x, provisional_x, hip.x),
            -reach::CANDIDATE_LIMIT_CM,
            reach::CANDIDATE_LIMIT_CM,
        );
        self.anchors.update(side, candidate, foot, now_ms);

        let anchored = self.anchors.is_locked(side);
        let Some(foot_x) = self.anchors.value_for(side, foot) else {
            return ReachEstimate::failed(Some(side), missing_foot);
        };
        let cm = clamp(
            self.signed_cm(hand.x, foot_x, hip.x),
            -reach::FINAL_LIMIT_CM,
            reach::FINAL_LIMIT_CM,
        );

        ReachEstimate {
            cm,
            side: Some(side),
            ok: foot.is_some() || anchored,
            anchored,
            foot_x: Some(foot_x),
            issue: None,
        }
    }

    /// Clear the anchors and side commitment
    pub fn reset(&mut self) {
        self.anchors.reset();
        self.side_lock.reset();
    }
}

fn direction_sign(delta: f64) -> f64 {
    if delta.abs() < EPSILON {
        1.0
    } else {
        delta.signum()
    }
}
