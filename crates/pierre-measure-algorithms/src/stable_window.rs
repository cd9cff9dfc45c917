// ABOUTME: Averages runs of values whose spread stays within a narrow band for a set duration
// ABOUTME: Tracks the best completed window average of a sit-and-reach run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_measure_core::constants::stable_window;
use pierre_measure_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Stable window parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StableWindowConfig {
    /// Maximum max-minus-min spread inside a window
    #[serde(default = "default_range_cm")]
    pub range_cm: f64,
    /// Time a window must span to complete
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

const fn default_range_cm() -> f64 {
    stable_window::RANGE_CM
}

const fn default_duration_ms() -> u64 {
    stable_window::DURATION_MS
}

impl Default for StableWindowConfig {
    fn default() -> Self {
        Self {
            range_cm: default_range_cm(),
            duration_ms: default_duration_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    start_ms: u64,
    min: f64,
    max: f64,
    sum: f64,
    count: u32,
}

impl Window {
    const fn start(value: f64, now_ms: u64) -> Self {
        Self {
            start_ms: now_ms,
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }
}

/// Stable-window averager
#[derive(Debug, Clone, PartialEq)]
pub struct StableWindow {
    config: StableWindowConfig,
    window: Option<Window>,
    best_average: Option<f64>,
}

impl StableWindow {
    /// Build an averager
    ///
    /// # Errors
    ///
    /// Returns a config error for a negative or non-finite range or a zero duration.
    pub fn new(config: StableWindowConfig) -> AppResult<Self> {
        if !config.range_cm.is_finite() || config.range_cm < 0.0 {
            return Err(AppError::config(format!(
                "stable window range {} must be non-negative",
                config.range_cm
            )));
        }
        if config.duration_ms == 0 {
            return Err(AppError::config("stable window duration must be positive"));
        }
        Ok(Self {
            config,
            window: None,
            best_average: None,
        })
    }

    /// Push one value; returns the window average when a window completes
    ///
    /// A value that would widen the spread past the range starts a new
    /// window at that value. A completed window is closed and the next value
    /// opens a fresh one.
    pub fn push(&mut self, value: f64, now_ms: u64) -> Option<f64> {
        let v = if value.is_finite() { value } else { 0.0 };
        let window = match self.window {
            Some(mut w) if w.max.max(v) - w.min.min(v) <= self.config.range_cm => {
                w.min = w.min.min(v);
                w.max = w.max.max(v);
                w.sum += v;
                w.count += 1;
                w
            }
            _ => Window::start(v, now_ms),
        };

        if now_ms.saturating_sub(window.start_ms) >= self.config.duration_ms {
            let avg = window.sum / f64::from(window.count);
            if !self.best_average.is_some_and(|best| best >= avg) {
                self.best_average = Some(avg);
            }
            self.window = None;
            Some(avg)
        } else {
            self.window = Some(window);
            None
        }
    }

    /// Time the open window has spanned
    #[must_use]
    pub fn stable_ms(&self, now_ms: u64) -> u64 {
        self.window
            .map_or(0, |w| now_ms.saturating_sub(w.start_ms))
    }

    /// Highest completed window average
    #[must_use]
    pub const fn best_average(&self) -> Option<f64> {
        self.best_average
    }

    /// Drop the open window, keeping the best average
    pub fn break_window(&mut self) {
        self.window = None;
    }

    /// Clear everything
    pub fn reset(&mut self) {
        self.window = None;
        self.best_average = None;
    }
}
