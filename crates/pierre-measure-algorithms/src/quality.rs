// ABOUTME: Landmark quality gate scoring each body side and choosing the better observed one
// ABOUTME: One configurable gate per test plus a side lock that resists frame-to-frame flips
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Landmark quality gate
//!
//! A single gate parameterised by joint set, visibility threshold and scoring
//! mode serves every test:
//!
//! - sit-up: shoulder, elbow, hip, knee and ankle at 0.6, counted pass/fail
//! - sit-and-reach framing: the six limb joints at 0.45, counted pass/fail
//! - sit-and-reach side: raw visibility summed over fingertip, wrist, foot
//!   tip, ankle and hip; both sides empty means no side

use pierre_measure_core::constants::visibility;
use pierre_measure_core::errors::{AppError, AppResult};
use pierre_measure_core::models::{BodyPart, Frame, PoseLandmark, Side};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a side's score is aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// One point per joint that is visible and inside the image
    PassCount,
    /// Sum of raw visibility over the joint set
    VisibilitySum,
}

/// How equal scores resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Ties, including both-zero, pick the left side
    AlwaysLeft,
    /// Ties pick the left side unless both scores are zero
    LeftUnlessEmpty,
}

/// Result of scoring both sides of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideChoice {
    /// Chosen side, `None` when nothing is observed
    pub side: Option<Side>,
    /// Left score
    pub left: f64,
    /// Right score
    pub right: f64,
    /// Joints passing the threshold on the better-counted side
    pub visible_joints: usize,
}

impl SideChoice {
    /// Score for one side
    #[must_use]
    pub const fn score(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Per-test landmark visibility gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityGate {
    /// Joints examined on each side
    pub joints: Vec<BodyPart>,
    /// Visibility a joint needs to pass
    pub visibility_threshold: f64,
    /// Passing joints required for the frame to be usable
    pub min_visible: usize,
    /// Score aggregation
    pub score_mode: ScoreMode,
    /// Tie resolution
    pub tie_break: TieBreak,
}

impl QualityGate {
    /// Build a validated gate
    ///
    /// # Errors
    ///
    /// Returns a config error when the joint set is empty, the threshold lies
    /// outside `[0, 1]`, or more joints are required than examined.
    pub fn new(
        joints: Vec<BodyPart>,
        visibility_threshold: f64,
        min_visible: usize,
        score_mode: ScoreMode,
        tie_break: TieBreak,
    ) -> AppResult<Self> {
        let gate = Self {
            joints,
            visibility_threshold,
            min_visible,
            score_mode,
            tie_break,
        };
        gate.validate()?;
        Ok(gate)
    }

    /// Check a deserialized gate
    ///
    /// # Errors
    ///
    /// Same conditions as [`QualityGate::new`].
    pub fn validate(&self) -> AppResult<()> {
        if self.joints.is_empty() {
            return Err(AppError::config("quality gate needs at least one joint"));
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(AppError::config(format!(
                "visibility threshold {} is outside [0, 1]",
                self.visibility_threshold
            )));
        }
        if self.min_visible > self.joints.len() {
            return Err(AppError::config(format!(
                "min_visible {} exceeds the {} joints examined",
                self.min_visible,
                self.joints.len()
            )));
        }
        Ok(())
    }

    /// Sit-up gate, wrists excluded
    #[must_use]
    pub fn situp() -> Self {
        Self {
            joints: vec![
                BodyPart::Shoulder,
                BodyPart::Elbow,
                BodyPart::Hip,
                BodyPart::Knee,
                BodyPart::Ankle,
            ],
            visibility_threshold: visibility::SITUP_THRESHOLD,
            min_visible: visibility::SITUP_MIN_VISIBLE_JOINTS,
            score_mode: ScoreMode::PassCount,
            tie_break: TieBreak::AlwaysLeft,
        }
    }

    /// Sit-and-reach framing gate over all six limb joints
    #[must_use]
    pub fn reach_framing() -> Self {
        Self {
            joints: vec![
                BodyPart::Shoulder,
                BodyPart::Elbow,
                BodyPart::Wrist,
                BodyPart::Hip,
                BodyPart::Knee,
                BodyPart::Ankle,
            ],
            visibility_threshold: visibility::REACH_THRESHOLD,
            min_visible: visibility::REACH_MIN_VISIBLE_JOINTS,
            score_mode: ScoreMode::PassCount,
            tie_break: TieBreak::AlwaysLeft,
        }
    }

    /// Sit-and-reach measurement side from hand, foot and hip visibility
    #[must_use]
    pub fn reach_side() -> Self {
        Self {
            joints: vec![
                BodyPart::Index,
                BodyPart::Wrist,
                BodyPart::FootIndex,
                BodyPart::Ankle,
                BodyPart::Hip,
            ],
            visibility_threshold: visibility::REACH_THRESHOLD,
            min_visible: 0,
            score_mode: ScoreMode::VisibilitySum,
            tie_break: TieBreak::LeftUnlessEmpty,
        }
    }

    /// Joints on `side` that are visible and inside the image
    #[must_use]
    pub fn visible_count(&self, frame: &Frame, side: Side) -> usize {
        self.joints
            .iter()
            .filter_map(|part| frame.get(part.landmark(side)))
            .filter(|lm| lm.passes(self.visibility_threshold))
            .count()
    }

    /// Aggregate score for `side`
    #[must_use]
    pub fn side_score(&self, frame: &Frame, side: Side) -> f64 {
        match self.score_mode {
            ScoreMode::PassCount => self.visible_count(frame, side) as f64,
            ScoreMode::VisibilitySum => self
                .joints
                .iter()
                .map(|part| frame.visibility(part.landmark(side)))
                .sum(),
        }
    }

    /// Score both sides and pick one
    ///
    /// Deterministic for identical input: equal scores always resolve left.
    #[must_use]
    pub fn choose_side(&self, frame: &Frame) -> SideChoice {
        let left = self.side_score(frame, Side::Left);
        let right = self.side_score(frame, Side::Right);
        let visible_joints = self
            .visible_count(frame, Side::Left)
            .max(self.visible_count(frame, Side::Right));

        let empty = left <= 0.0 && right <= 0.0;
        let side = if empty && self.tie_break == TieBreak::LeftUnlessEmpty {
            None
        } else if left >= right {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        };

        SideChoice {
            side,
            left,
            right,
            visible_joints,
        }
    }

    /// Enough joints pass on the better side
    #[must_use]
    pub const fn is_satisfied(&self, choice: &SideChoice) -> bool {
        choice.visible_joints >= self.min_visible
    }

    /// First gated joint on `side` that fails the threshold
    #[must_use]
    pub fn first_missing(&self, frame: &Frame, side: Side) -> Option<PoseLandmark> {
        self.joints
            .iter()
            .map(|part| part.landmark(side))
            .find(|lm| {
                !frame
                    .get(*lm)
                    .is_some_and(|l| l.passes(self.visibility_threshold))
            })
    }
}

/// Keeps a committed side until the other side outscores it by a margin
#[derive(Debug, Clone, PartialEq)]
pub struct SideLock {
    switch_margin: f64,
    committed: Option<Side>,
}

impl SideLock {
    /// New unlocked side lock
    #[must_use]
    pub const fn new(switch_margin: f64) -> Self {
        Self {
            switch_margin,
            committed: None,
        }
    }

    /// Feed one frame's choice and return the side to measure with
    ///
    /// A frame with no determinable side yields `None` without dropping the
    /// commitment.
    pub fn update(&mut self, choice: &SideChoice) -> Option<Side> {
        let proposed = choice.side?;
        match self.committed {
            None => {
                debug!(side = %proposed, "side committed");
                self.committed = Some(proposed);
            }
            Some(current) if current != proposed => {
                let lead = choice.score(proposed) - choice.score(current);
                if lead > self.switch_margin {
                    debug!(from = %current, to = %proposed, lead, "side switched");
                    self.committed = Some(proposed);
                }
            }
            Some(_) => {}
        }
        self.committed
    }

    /// Currently committed side
    #[must_use]
    pub const fn committed(&self) -> Option<Side> {
        self.committed
    }

    /// Forget the commitment
    pub fn reset(&mut self) {
        self.committed = None;
    }
}

impl Default for SideLock {
    fn default() -> Self {
        Self::new(visibility::SIDE_SWITCH_MARGIN)
    }
}
