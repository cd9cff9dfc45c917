// ABOUTME: Per-side foot anchor with lock/release hysteresis and max-age refresh
// ABOUTME: Keeps the reach reference stable when the foot drops out of view mid-lean
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Foot-anchor hysteresis tracker
//!
//! Each side is either unlocked (the raw foot position is used) or locked to
//! an x position captured while the foot was visible. The lock engages at or
//! above `lock_in_near_cm` and releases at or below `release_far_cm`; the gap
//! between the two is a dead zone with no transitions. A lock older than
//! `max_age_ms` is refreshed from the foot whenever the foot is visible.

use pierre_measure_core::constants::reach;
use pierre_measure_core::errors::{AppError, AppResult};
use pierre_measure_core::models::{Landmark, Side};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Foot anchor thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootAnchorConfig {
    /// Candidate reach at or above which the anchor locks
    #[serde(default = "default_lock_in_near_cm")]
    pub lock_in_near_cm: f64,
    /// Candidate reach at or below which the anchor releases
    #[serde(default = "default_release_far_cm")]
    pub release_far_cm: f64,
    /// Lock age after which a visible foot refreshes the anchor
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,
    /// Foot visibility needed to lock or refresh
    #[serde(default = "default_foot_visibility_threshold")]
    pub foot_visibility_threshold: f64,
}

const fn default_lock_in_near_cm() -> f64 {
    reach::LOCK_IN_NEAR_CM
}

const fn default_release_far_cm() -> f64 {
    reach::RELEASE_FAR_CM
}

const fn default_max_age_ms() -> u64 {
    reach::ANCHOR_MAX_AGE_MS
}

const fn default_foot_visibility_threshold() -> f64 {
    reach::FOOT_VISIBILITY_THRESHOLD
}

impl Default for FootAnchorConfig {
    fn default() -> Self {
        Self {
            lock_in_near_cm: default_lock_in_near_cm(),
            release_far_cm: default_release_far_cm(),
            max_age_ms: default_max_age_ms(),
            foot_visibility_threshold: default_foot_visibility_threshold(),
        }
    }
}

impl FootAnchorConfig {
    /// Validate thresholds
    ///
    /// # Errors
    ///
    /// Returns a config error when the release threshold is not strictly
    /// below the lock threshold, the visibility threshold is outside `[0, 1]`,
    /// or the max age is zero.
    pub fn validate(&self) -> AppResult<()> {
        let finite = self.release_far_cm.is_finite() && self.lock_in_near_cm.is_finite();
        if !finite || self.release_far_cm >= self.lock_in_near_cm {
            return Err(AppError::config(format!(
                "anchor release threshold {} must be below lock threshold {}",
                self.release_far_cm, self.lock_in_near_cm
            )));
        }
        if !(0.0..=1.0).contains(&self.foot_visibility_threshold) {
            return Err(AppError::config(format!(
                "foot visibility threshold {} is outside [0, 1]",
                self.foot_visibility_threshold
            )));
        }
        if self.max_age_ms == 0 {
            return Err(AppError::config("anchor max age must be positive"));
        }
        Ok(())
    }
}

/// What one update did to a side's anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorTransition {
    /// No change
    None,
    /// Unlocked to locked
    Locked,
    /// Locked to unlocked
    Released,
    /// Stale lock replaced with the current foot position
    Refreshed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AnchorState {
    locked: bool,
    x: Option<f64>,
    locked_at_ms: u64,
}

impl AnchorState {
    fn lock(&mut self, x: f64, now_ms: u64) {
        self.locked = true;
        self.x = Some(x);
        self.locked_at_ms = now_ms;
    }
}

/// Foot anchors for both sides of one reach run
#[derive(Debug, Clone, PartialEq)]
pub struct FootAnchorTracker {
    config: FootAnchorConfig,
    left: AnchorState,
    right: AnchorState,
}

impl FootAnchorTracker {
    /// Build a tracker with both sides unlocked
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` fails validation.
    pub fn new(config: FootAnchorConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            left: AnchorState::default(),
            right: AnchorState::default(),
        })
    }

    /// Active thresholds
    #[must_use]
    pub const fn config(&self) -> &FootAnchorConfig {
        &self.config
    }

    const fn state(&self, side: Side) -> &AnchorState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn state_mut(&mut self, side: Side) -> &mut AnchorState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    fn visible_x(&self, foot: Option<&Landmark>) -> Option<f64> {
        foot.filter(|lm| lm.is_visible(self.config.foot_visibility_threshold) && lm.x.is_finite())
            .map(|lm| lm.x)
    }

    /// Evaluate one frame for `side`
    ///
    /// `candidate_cm` is the provisional signed reach computed with the
    /// current raw-or-anchored foot position. A NaN candidate changes nothing.
    pub fn update(
        &mut self,
        side: Side,
        candidate_cm: f64,
        foot: Option<&Landmark>,
        now_ms: u64,
    ) -> AnchorTransition {
        if candidate_cm.is_nan() {
            return AnchorTransition::None;
        }
        let config = self.config;
        let foot_x = self.visible_x(foot);
        let state = self.state_mut(side);

        let transition = if state.locked {
            let stale = now_ms.saturating_sub(state.locked_at_ms) > config.max_age_ms;
            if candidate_cm <= config.release_far_cm {
                *state = AnchorState::default();
                AnchorTransition::Released
            } else if let Some(x) = foot_x.filter(|_| stale) {
                state.lock(x, now_ms);
                AnchorTransition::Refreshed
            } else {
                AnchorTransition::None
            }
        } else if let Some(x) = foot_x.filter(|_| candidate_cm >= config.lock_in_near_cm) {
            state.lock(x, now_ms);
            AnchorTransition::Locked
        } else {
            AnchorTransition::None
        };

        if transition != AnchorTransition::None {
            debug!(side = %side, ?transition, candidate_cm, anchor_x = ?self.state(side).x, "foot anchor");
        }
        transition
    }

    /// Foot x to measure against: the anchor when locked, else the visible raw foot
    #[must_use]
    pub fn value_for(&self, side: Side, foot: Option<&Landmark>) -> Option<f64> {
        let state = self.state(side);
        if state.locked {
            state.x
        } else {
            self.visible_x(foot)
        }
    }

    /// Whether `side` is currently locked
    #[must_use]
    pub const fn is_locked(&self, side: Side) -> bool {
        self.state(side).locked
    }

    /// Unlock both sides
    pub fn reset(&mut self) {
        self.left = AnchorState::default();
        self.right = AnchorState::default();
    }
}
