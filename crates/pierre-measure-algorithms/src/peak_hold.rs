// ABOUTME: Peak-hold controller requiring the best reach to be sustained within tolerance
// ABOUTME: Best only rises; a held run of round(need_sec * fps) armed frames completes the hold
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_measure_core::constants::peak_hold;
use pierre_measure_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Peak-hold parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakHoldConfig {
    /// Seconds the peak must be held
    #[serde(default = "default_need_sec")]
    pub need_sec: f64,
    /// Sampling rate used to convert seconds to frames
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Band below best that still counts as holding
    #[serde(default = "default_tol_cm")]
    pub tol_cm: f64,
    /// Jump over best needed to (re-)arm
    #[serde(default = "default_min_increment")]
    pub min_increment_to_arm: f64,
}

const fn default_need_sec() -> f64 {
    peak_hold::NEED_SEC
}

const fn default_fps() -> f64 {
    peak_hold::FPS
}

const fn default_tol_cm() -> f64 {
    peak_hold::TOLERANCE_CM
}

const fn default_min_increment() -> f64 {
    peak_hold::MIN_INCREMENT_TO_ARM_CM
}

impl Default for PeakHoldConfig {
    fn default() -> Self {
        Self {
            need_sec: default_need_sec(),
            fps: default_fps(),
            tol_cm: default_tol_cm(),
            min_increment_to_arm: default_min_increment(),
        }
    }
}

impl PeakHoldConfig {
    /// Validate parameters
    ///
    /// # Errors
    ///
    /// Returns a config error for non-positive `fps` or `need_sec`, or a
    /// negative tolerance or arming increment.
    pub fn validate(&self) -> AppResult<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(AppError::config(format!("fps {} must be positive", self.fps)));
        }
        if !self.need_sec.is_finite() || self.need_sec <= 0.0 {
            return Err(AppError::config(format!(
                "hold duration {} s must be positive",
                self.need_sec
            )));
        }
        let negative = |v: f64| v.is_nan() || v < 0.0;
        if negative(self.tol_cm) || negative(self.min_increment_to_arm) {
            return Err(AppError::config(
                "peak-hold tolerance and arming increment must be non-negative",
            ));
        }
        Ok(())
    }

    /// Held frames required for completion
    #[must_use]
    pub fn required_frames(&self) -> u32 {
        (self.need_sec * self.fps).round().max(1.0) as u32
    }
}

/// Controller output after one push
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakHoldStatus {
    /// Best value so far
    pub best_cm: f64,
    /// A qualifying jump has armed the hold
    pub armed: bool,
    /// Consecutive held frames
    pub hold_frames: u32,
    /// Held frames expressed in seconds at the configured rate
    pub hold_sec: f64,
    /// Fraction of the required hold completed
    pub progress: f64,
    /// Hold requirement met
    pub done: bool,
}

/// Peak-hold-with-tolerance controller
#[derive(Debug, Clone, PartialEq)]
pub struct PeakHoldController {
    config: PeakHoldConfig,
    required_frames: u32,
    best: Option<f64>,
    armed: bool,
    hold_frames: u32,
    hold_sum: f64,
}

impl PeakHoldController {
    /// Build a controller
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` fails validation.
    pub fn new(config: PeakHoldConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            required_frames: config.required_frames(),
            config,
            best: None,
            armed: false,
            hold_frames: 0,
            hold_sum: 0.0,
        })
    }

    /// Active parameters
    #[must_use]
    pub const fn config(&self) -> &PeakHoldConfig {
        &self.config
    }

    /// Best value so far, `None` before the first push
    #[must_use]
    pub const fn best(&self) -> Option<f64> {
        self.best
    }

    /// Push one value; non-finite input counts as 0
    pub fn push(&mut self, value: f64) -> PeakHoldStatus {
        let v = if value.is_finite() { value } else { 0.0 };

        let Some(mut best) = self.best else {
            self.best = Some(v);
            self.armed = false;
            self.clear_hold();
            return self.status();
        };

        if v > best + self.config.min_increment_to_arm {
            best = v;
            if !self.armed {
                debug!(best_cm = best, "peak hold armed");
            }
            self.armed = true;
            self.clear_hold();
        } else if v > best {
            best = v;
        }

        if self.armed && v >= best - self.config.tol_cm {
            self.hold_frames += 1;
            self.hold_sum += v;
            let avg = self.hold_sum / f64::from(self.hold_frames);
            if avg > best {
                best = avg;
            }
        } else {
            self.clear_hold();
        }

        self.best = Some(best);
        let status = self.status();
        if status.done && self.hold_frames == self.required_frames {
            debug!(best_cm = best, hold_frames = self.hold_frames, "peak hold complete");
        }
        status
    }

    /// Current status without pushing
    #[must_use]
    pub fn status(&self) -> PeakHoldStatus {
        let done = self.armed && self.hold_frames >= self.required_frames;
        PeakHoldStatus {
            best_cm: self.best.unwrap_or(0.0),
            armed: self.armed,
            hold_frames: self.hold_frames,
            hold_sec: f64::from(self.hold_frames) / self.config.fps,
            progress: (f64::from(self.hold_frames) / f64::from(self.required_frames)).min(1.0),
            done,
        }
    }

    fn clear_hold(&mut self) {
        self.hold_frames = 0;
        self.hold_sum = 0.0;
    }

    /// Zero the hold streak, keeping best and armed
    pub fn break_hold(&mut self) {
        self.clear_hold();
    }

    /// Return to the initial state
    pub fn reset(&mut self) {
        self.best = None;
        self.armed = false;
        self.clear_hold();
    }
}
