// ABOUTME: Sit-up repetition counter turning a torso angle signal into down/up phases and reps
// ABOUTME: Median smoothing, calibration window, rolling percentile thresholds, dwell and refractory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Repetition counter / phase machine
//!
//! The input is the shoulder-hip-knee angle: large when lying down, small
//! when curled up. One repetition is `down -> up -> down`, credited on the
//! return to `down`.
//!
//! ## Thresholds
//!
//! 1. Raw angles are smoothed with a median over the last 5 samples.
//! 2. For the first `calibrate_ms` after the first sample (and after any
//!    re-calibration) the counter only collects the largest and smallest
//!    smoothed angle; no transition fires.
//! 3. Once the rolling `roll_window_ms` history holds at least 8 samples,
//!    `down = p80 - margin` and `up = p20 + margin`, each tightened towards
//!    the calibrated extremes (`max_down - margin`, `min_up + margin`)
//!    whichever is stricter. A gap below `min_gap_deg` is re-centred on the
//!    midpoint, then down is clamped to `[80, 160]` and up to `[30, 110]`.
//! 4. With fewer samples the calibrated extremes alone give the thresholds.
//!
//! ## Debounce
//!
//! A phase change needs `hold_ms` of dwell since the previous change; after a
//! credited rep the counter ignores input for `refractory_ms`.

use pierre_measure_core::constants::situp;
use pierre_measure_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Rep counter tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepCounterConfig {
    /// Minimum dwell after a phase change
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
    /// Dead time after a credited rep
    #[serde(default = "default_refractory_ms")]
    pub refractory_ms: u64,
    /// Calibration window length
    #[serde(default = "default_calibrate_ms")]
    pub calibrate_ms: u64,
    /// Rolling history length
    #[serde(default = "default_roll_window_ms")]
    pub roll_window_ms: u64,
    /// Median smoothing window in samples
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
    /// History samples needed for percentile thresholds
    #[serde(default = "default_min_history")]
    pub min_history_samples: usize,
    /// Upper percentile for the down threshold
    #[serde(default = "default_p_high")]
    pub p_high: f64,
    /// Lower percentile for the up threshold
    #[serde(default = "default_p_low")]
    pub p_low: f64,
    /// Down threshold before any sample arrives
    #[serde(default = "default_down_deg")]
    pub default_down_deg: f64,
    /// Up threshold before any sample arrives
    #[serde(default = "default_up_deg")]
    pub default_up_deg: f64,
    /// Minimum down/up separation
    #[serde(default = "default_min_gap_deg")]
    pub min_gap_deg: f64,
    /// Margin pulled in from extremes and percentiles
    #[serde(default = "default_margin_deg")]
    pub margin_deg: f64,
    /// Yaw shift that restarts calibration; `None` disables yaw tracking
    #[serde(default)]
    pub recalibrate_yaw_deg: Option<f64>,
}

const fn default_hold_ms() -> u64 {
    situp::HOLD_MS
}

const fn default_refractory_ms() -> u64 {
    situp::REFRACTORY_MS
}

const fn default_calibrate_ms() -> u64 {
    situp::AUTO_CALIBRATE_MS
}

const fn default_roll_window_ms() -> u64 {
    situp::ROLL_WINDOW_MS
}

const fn default_smoothing_window() -> usize {
    situp::SMOOTHING_WINDOW
}

const fn default_min_history() -> usize {
    situp::MIN_HISTORY_SAMPLES
}

const fn default_p_high() -> f64 {
    situp::P_HIGH
}

const fn default_p_low() -> f64 {
    situp::P_LOW
}

const fn default_down_deg() -> f64 {
    situp::DEFAULT_DOWN_DEG
}

const fn default_up_deg() -> f64 {
    situp::DEFAULT_UP_DEG
}

const fn default_min_gap_deg() -> f64 {
    situp::MIN_GAP_DEG
}

const fn default_margin_deg() -> f64 {
    situp::MARGIN_DEG
}

impl Default for RepCounterConfig {
    fn default() -> Self {
        Self {
            hold_ms: default_hold_ms(),
            refractory_ms: default_refractory_ms(),
            calibrate_ms: default_calibrate_ms(),
            roll_window_ms: default_roll_window_ms(),
            smoothing_window: default_smoothing_window(),
            min_history_samples: default_min_history(),
            p_high: default_p_high(),
            p_low: default_p_low(),
            default_down_deg: default_down_deg(),
            default_up_deg: default_up_deg(),
            min_gap_deg: default_min_gap_deg(),
            margin_deg: default_margin_deg(),
            recalibrate_yaw_deg: None,
        }
    }
}

impl RepCounterConfig {
    /// Validate tuning
    ///
    /// # Errors
    ///
    /// Returns a config error for an empty smoothing window, percentiles
    /// outside `[0, 1]` or not ordered low-to-high, defaults with up above
    /// down, or a zero rolling window.
    pub fn validate(&self) -> AppResult<()> {
        if self.smoothing_window == 0 {
            return Err(AppError::config("smoothing window must hold at least one sample"));
        }
        if self.roll_window_ms == 0 {
            return Err(AppError::config("rolling window must be positive"));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.p_low) || !unit.contains(&self.p_high) || self.p_low >= self.p_high {
            return Err(AppError::config(format!(
                "percentiles must satisfy 0 <= p_low < p_high <= 1, got {} and {}",
                self.p_low, self.p_high
            )));
        }
        if self.default_up_deg.is_nan() || self.default_up_deg >= self.default_down_deg {
            return Err(AppError::config(format!(
                "default up threshold {} must be below down threshold {}",
                self.default_up_deg, self.default_down_deg
            )));
        }
        Ok(())
    }
}

/// Counter phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    /// Lying back, large angle
    #[default]
    Down,
    /// Curled up, small angle
    Up,
}

/// Active angle thresholds in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepThresholds {
    /// Angle at or above which `up -> down` fires
    pub down: f64,
    /// Angle at or below which `down -> up` fires
    pub up: f64,
}

/// Counter output after one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepUpdate {
    /// Phase after this sample
    pub phase: RepPhase,
    /// Total reps
    pub reps: u32,
    /// Smoothed angle, `None` for a skipped sample
    pub smoothed_angle: Option<f64>,
    /// Thresholds used, `None` for a skipped sample
    pub thresholds: Option<RepThresholds>,
    /// Calibration window has finished
    pub calibrated: bool,
    /// This sample credited a rep
    pub counted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Calibration {
    collecting: bool,
    started_at_ms: Option<u64>,
    max_down: Option<f64>,
    min_up: Option<f64>,
}

impl Calibration {
    const fn new() -> Self {
        Self {
            collecting: true,
            started_at_ms: None,
            max_down: None,
            min_up: None,
        }
    }

    fn restart(&mut self, angle: f64, now_ms: u64) {
        self.collecting = true;
        self.started_at_ms = Some(now_ms);
        self.max_down = Some(angle);
        self.min_up = Some(angle);
    }
}

/// Sit-up repetition counter for one run
#[derive(Debug, Clone)]
pub struct RepCounter {
    config: RepCounterConfig,
    phase: RepPhase,
    reps: u32,
    last_change_ms: Option<u64>,
    refractory_until_ms: Option<u64>,
    calibration: Calibration,
    yaw_deg: Option<f64>,
    smoothing: VecDeque<f64>,
    history: VecDeque<(u64, f64)>,
}

impl RepCounter {
    /// Build a counter in `down` with zero reps
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` fails validation.
    pub fn new(config: RepCounterConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            smoothing: VecDeque::with_capacity(config.smoothing_window),
            config,
            phase: RepPhase::Down,
            reps: 0,
            last_change_ms: None,
            refractory_until_ms: None,
            calibration: Calibration::new(),
            yaw_deg: None,
            history: VecDeque::new(),
        })
    }

    /// Total reps
    #[must_use]
    pub const fn reps(&self) -> u32 {
        self.reps
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> RepPhase {
        self.phase
    }

    /// Calibration window has finished
    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        !self.calibration.collecting
    }

    fn smooth(&mut self, angle: f64) -> f64 {
        self.smoothing.push_back(angle);
        while self.smoothing.len() > self.config.smoothing_window {
            self.smoothing.pop_front();
        }
        let mut sorted: Vec<f64> = self.smoothing.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);
        sorted[sorted.len() / 2]
    }

    fn record_history(&mut self, now_ms: u64, angle: f64) {
        self.history.push_back((now_ms, angle));
        let cutoff = now_ms.saturating_sub(self.config.roll_window_ms);
        while self.history.front().is_some_and(|(t, _)| *t < cutoff) {
            self.history.pop_front();
        }
    }

    fn track_yaw(&mut self, yaw_deg: Option<f64>, angle: f64, now_ms: u64) {
        let (Some(limit), Some(yaw)) = (self.config.recalibrate_yaw_deg, yaw_deg) else {
            return;
        };
        if !yaw.is_finite() {
            return;
        }
        let reference = *self.yaw_deg.get_or_insert(yaw);
        if (yaw - reference).abs() >= limit {
            debug!(from = reference, to = yaw, "yaw shift, recalibrating rep counter");
            self.calibration.restart(angle, now_ms);
        }
        self.yaw_deg = Some(yaw);
    }

    fn calibrate(&mut self, angle: f64, now_ms: u64) {
        let calibration = &mut self.calibration;
        if !calibration.collecting {
            return;
        }
        let started = *calibration.started_at_ms.get_or_insert(now_ms);
        calibration.max_down = Some(calibration.max_down.map_or(angle, |m| m.max(angle)));
        calibration.min_up = Some(calibration.min_up.map_or(angle, |m| m.min(angle)));
        if now_ms.saturating_sub(started) >= self.config.calibrate_ms {
            calibration.collecting = false;
            debug!(
                max_down = ?calibration.max_down,
                min_up = ?calibration.min_up,
                "rep counter calibrated"
            );
        }
    }

    fn percentile(sorted: &[f64], p: f64) -> f64 {
        let last = sorted.len().saturating_sub(1);
        let index = ((p * last as f64).floor() as usize).min(last);
        sorted[index]
    }

    fn recentre(&self, down: f64, up: f64) -> (f64, f64) {
        if down - up < self.config.min_gap_deg {
            let mid = (down + up) / 2.0;
            let half = self.config.min_gap_deg / 2.0;
            (mid + half, mid - half)
        } else {
            (down, up)
        }
    }

    /// Thresholds implied by the current history and calibration
    #[must_use]
    pub fn thresholds(&self) -> RepThresholds {
        let margin = self.config.margin_deg;
        let extremes = self.calibration.max_down.zip(self.calibration.min_up);

        if self.history.len() >= self.config.min_history_samples {
            let mut recent: Vec<f64> = self.history.iter().map(|(_, a)| *a).collect();
            recent.sort_by(f64::total_cmp);
            let mut down = Self::percentile(&recent, self.config.p_high) - margin;
            let mut up = Self::percentile(&recent, self.config.p_low) + margin;
            if let Some((max_down, min_up)) = extremes {
                down = down.max(max_down - margin);
                up = up.min(min_up + margin);
            }
            let (down, up) = self.recentre(down, up);
            RepThresholds {
                down: down.clamp(situp::DOWN_MIN_DEG, situp::DOWN_MAX_DEG),
                up: up.clamp(situp::UP_MIN_DEG, situp::UP_MAX_DEG),
            }
        } else if let Some((max_down, min_up)) = extremes {
            let (down, up) = self.recentre(max_down - margin, min_up + margin);
            RepThresholds { down, up }
        } else {
            RepThresholds {
                down: self.config.default_down_deg,
                up: self.config.default_up_deg,
            }
        }
    }

    /// Feed one angle sample
    ///
    /// A non-finite angle is skipped without touching any state. `yaw_deg`
    /// only matters when yaw re-calibration is configured.
    pub fn update(&mut self, angle_deg: f64, now_ms: u64, yaw_deg: Option<f64>) -> RepUpdate {
        if !angle_deg.is_finite() {
            return RepUpdate {
                phase: self.phase,
                reps: self.reps,
                smoothed_angle: None,
                thresholds: None,
                calibrated: self.is_calibrated(),
                counted: false,
            };
        }

        let angle = self.smooth(angle_deg);
        self.record_history(now_ms, angle);
        self.track_yaw(yaw_deg, angle, now_ms);
        self.calibrate(angle, now_ms);

        let thresholds = self.thresholds();
        let counted = self.transition(angle, now_ms, thresholds);

        RepUpdate {
            phase: self.phase,
            reps: self.reps,
            smoothed_angle: Some(angle),
            thresholds: Some(thresholds),
            calibrated: self.is_calibrated(),
            counted,
        }
    }

    /// Counting is held off until calibration has finished
    fn transition(&mut self, angle: f64, now_ms: u64, thresholds: RepThresholds) -> bool {
        if self.calibration.collecting {
            return false;
        }
        if self.refractory_until_ms.is_some_and(|until| now_ms < until) {
            return false;
        }
        let hold_ms = self.config.hold_ms;
        if self
            .last_change_ms
            .is_some_and(|last| now_ms.saturating_sub(last) <= hold_ms)
        {
            return false;
        }

        match self.phase {
            RepPhase::Down if angle <= thresholds.up => {
                self.phase = RepPhase::Up;
                self.last_change_ms = Some(now_ms);
                debug!(angle, up = thresholds.up, "rep phase up");
                false
            }
            RepPhase::Up if angle >= thresholds.down => {
                self.phase = RepPhase::Down;
                self.last_change_ms = Some(now_ms);
                self.reps += 1;
                self.refractory_until_ms = Some(now_ms + self.config.refractory_ms);
                debug!(angle, down = thresholds.down, reps = self.reps, "rep counted");
                true
            }
            _ => false,
        }
    }

    /// Clear phase, calibration, buffers and reps
    pub fn reset(&mut self) {
        self.phase = RepPhase::Down;
        self.reps = 0;
        self.last_change_ms = None;
        self.refractory_until_ms = None;
        self.calibration = Calibration::new();
        self.yaw_deg = None;
        self.smoothing.clear();
        self.history.clear();
    }
}
