// ABOUTME: Last-valid-value heart-rate tracker with consecutive failure counting
// ABOUTME: Fetch failures and empty readings never clear the last valid value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::reading::HeartRateReading;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use pierre_measure_core::constants::service_names;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Snapshot published after every poll
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeartRateSnapshot {
    /// Last valid reading
    pub bpm: Option<f64>,
    /// When the last valid reading arrived
    pub updated_at: Option<DateTime<Utc>>,
    /// Failed fetches since the last success
    pub consecutive_failures: u32,
    /// Failures reached the warning threshold
    pub connectivity_warning: bool,
}

/// Keeps the last valid heart rate across noisy polls
#[derive(Debug, Clone)]
pub struct LastValidHeartRate {
    warning_threshold: u32,
    snapshot: HeartRateSnapshot,
}

impl LastValidHeartRate {
    /// Tracker warning after `warning_threshold` consecutive failures
    #[must_use]
    pub fn new(warning_threshold: u32) -> Self {
        Self {
            warning_threshold: warning_threshold.max(1),
            snapshot: HeartRateSnapshot::default(),
        }
    }

    /// Last valid value
    #[must_use]
    pub const fn latest(&self) -> Option<f64> {
        self.snapshot.bpm
    }

    /// Failures since the last successful fetch
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.snapshot.consecutive_failures
    }

    /// Whether the feed should be reported as disconnected
    #[must_use]
    pub const fn connectivity_warning(&self) -> bool {
        self.snapshot.connectivity_warning
    }

    /// Current state
    #[must_use]
    pub const fn snapshot(&self) -> HeartRateSnapshot {
        self.snapshot
    }

    /// Record a successful fetch; readings without a valid value keep the last one
    pub fn observe(&mut self, reading: &HeartRateReading) -> HeartRateSnapshot {
        self.snapshot.consecutive_failures = 0;
        self.snapshot.connectivity_warning = false;
        if let Some(bpm) = reading.valid_bpm() {
            self.snapshot.bpm = Some(bpm);
            self.snapshot.updated_at = Some(reading.measured_at.unwrap_or_else(Utc::now));
        }
        self.snapshot
    }

    /// Record a failed fetch
    pub fn fail(&mut self, error: &AppError) -> HeartRateSnapshot {
        self.snapshot.consecutive_failures = self.snapshot.consecutive_failures.saturating_add(1);
        let failures = self.snapshot.consecutive_failures;
        if failures == self.warning_threshold {
            warn!(
                service = service_names::HEART_RATE_FEED,
                failures,
                last_bpm = ?self.snapshot.bpm,
                error = %error,
                "heart-rate feed unreachable"
            );
        }
        self.snapshot.connectivity_warning = failures >= self.warning_threshold;
        self.snapshot
    }

    /// Record the outcome of one fetch
    pub fn apply(&mut self, result: &AppResult<HeartRateReading>) -> HeartRateSnapshot {
        match result {
            Ok(reading) => self.observe(reading),
            Err(error) => self.fail(error),
        }
    }

    /// Forget everything
    pub fn reset(&mut self) {
        self.snapshot = HeartRateSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_reading_keeps_last_value() {
        let mut tracker = LastValidHeartRate::new(3);
        tracker.observe(&HeartRateReading::from_bpm(130.0));
        tracker.observe(&HeartRateReading::default());
        tracker.observe(&HeartRateReading::from_bpm(-5.0));
        tracker.observe(&HeartRateReading::from_bpm(f64::INFINITY));
        assert_eq!(tracker.latest(), Some(130.0));
    }

    #[test]
    fn test_warning_after_threshold_and_cleared_on_success() {
        let mut tracker = LastValidHeartRate::new(3);
        let error = AppError::unavailable(service_names::HEART_RATE_FEED, "refused");
        tracker.fail(&error);
        tracker.fail(&error);
        assert!(!tracker.connectivity_warning());
        tracker.fail(&error);
        assert!(tracker.connectivity_warning());
        assert_eq!(tracker.consecutive_failures(), 3);

        tracker.observe(&HeartRateReading::default());
        assert!(!tracker.connectivity_warning());
        assert_eq!(tracker.consecutive_failures(), 0);
        assert_eq!(tracker.latest(), None);
    }
}
