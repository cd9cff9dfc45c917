// ABOUTME: Camera framing validation against per-test yaw windows and ready-hold accumulation
// ABOUTME: NaN yaw always fails; any failing frame resets the consecutive-valid timer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_measure_core::constants::framing;
use pierre_measure_core::errors::{AppError, AppResult};
use pierre_measure_core::models::{FitnessTest, FrameIssue};
use serde::{Deserialize, Serialize};

/// Inclusive yaw acceptance window in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramingWindow {
    /// Lowest accepted yaw
    pub min_deg: f64,
    /// Highest accepted yaw
    pub max_deg: f64,
}

impl FramingWindow {
    /// Build a validated window
    ///
    /// # Errors
    ///
    /// Returns a config error when a bound is not finite or `min_deg > max_deg`.
    pub fn new(min_deg: f64, max_deg: f64) -> AppResult<Self> {
        let window = Self { min_deg, max_deg };
        window.validate()?;
        Ok(window)
    }

    /// Check a deserialized window
    ///
    /// # Errors
    ///
    /// Same conditions as [`FramingWindow::new`].
    pub fn validate(&self) -> AppResult<()> {
        if !self.min_deg.is_finite() || !self.max_deg.is_finite() || self.min_deg > self.max_deg {
            return Err(AppError::config(format!(
                "invalid yaw window [{}, {}]",
                self.min_deg, self.max_deg
            )));
        }
        Ok(())
    }

    /// Default window for a test
    #[must_use]
    pub const fn for_test(test: FitnessTest) -> Self {
        match test {
            FitnessTest::Situp => Self {
                min_deg: framing::SITUP_YAW_MIN_DEG,
                max_deg: framing::SITUP_YAW_MAX_DEG,
            },
            FitnessTest::SitAndReach => Self {
                min_deg: framing::REACH_YAW_MIN_DEG,
                max_deg: framing::REACH_YAW_MAX_DEG,
            },
            FitnessTest::StepTest => Self {
                min_deg: framing::STEP_YAW_MIN_DEG,
                max_deg: framing::STEP_YAW_MAX_DEG,
            },
        }
    }

    /// Yaw lies inside the window; NaN never does
    #[must_use]
    pub fn accepts(&self, yaw_deg: f64) -> bool {
        yaw_deg >= self.min_deg && yaw_deg <= self.max_deg
    }

    /// Why a yaw fails the window, if it does
    #[must_use]
    pub fn issue(&self, yaw_deg: f64) -> Option<FrameIssue> {
        if yaw_deg.is_nan() {
            Some(FrameIssue::IndeterminateYaw)
        } else if self.accepts(yaw_deg) {
            None
        } else {
            Some(FrameIssue::FramingInvalid { yaw_deg })
        }
    }
}

/// Accumulates consecutive valid-framing time before auto-advancing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyHold {
    required_ms: u64,
    valid_since_ms: Option<u64>,
}

impl ReadyHold {
    /// Hold requiring `required_ms` of uninterrupted valid frames
    #[must_use]
    pub const fn new(required_ms: u64) -> Self {
        Self {
            required_ms,
            valid_since_ms: None,
        }
    }

    /// Feed one frame; returns true once the hold is satisfied
    pub fn update(&mut self, valid: bool, now_ms: u64) -> bool {
        if !valid {
            self.valid_since_ms = None;
            return false;
        }
        let since = *self.valid_since_ms.get_or_insert(now_ms);
        now_ms.saturating_sub(since) >= self.required_ms
    }

    /// Consecutive valid time so far
    #[must_use]
    pub fn held_ms(&self, now_ms: u64) -> u64 {
        self.valid_since_ms
            .map_or(0, |since| now_ms.saturating_sub(since))
    }

    /// Fraction of the hold completed, in `[0, 1]`
    #[must_use]
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.required_ms == 0 {
            return if self.valid_since_ms.is_some() { 1.0 } else { 0.0 };
        }
        (self.held_ms(now_ms) as f64 / self.required_ms as f64).min(1.0)
    }

    /// Drop any accumulated time
    pub fn reset(&mut self) {
        self.valid_since_ms = None;
    }
}
