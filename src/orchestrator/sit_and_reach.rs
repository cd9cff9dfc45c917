// ABOUTME: Sit-and-reach orchestrator: framing hold, reach estimation, peak hold and stable average
// ABOUTME: Finishes when the best reach has been held within tolerance for the required frames
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::lifecycle::{Lifecycle, LifecycleEvent, RunPhase};
use super::{round_1dp, FramingStatus};
use crate::errors::AppResult;
use crate::session::{MeasurementOutcome, SessionResult};
use pierre_measure_algorithms::{
    FramingWindow, PeakHoldConfig, PeakHoldController, PeakHoldStatus, QualityGate, ReachConfig,
    ReachEstimate, ReachEstimator, StableWindow, StableWindowConfig,
};
use pierre_measure_core::constants::lifecycle;
use pierre_measure_core::models::{FitnessTest, Frame};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Sit-and-reach run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitAndReachSessionConfig {
    /// Framing visibility gate
    #[serde(default = "QualityGate::reach_framing")]
    pub framing_gate: QualityGate,
    /// Accepted yaw window
    #[serde(default = "default_framing")]
    pub framing: FramingWindow,
    /// Reach estimator settings, including user height
    #[serde(default)]
    pub reach: ReachConfig,
    /// Peak-hold settings
    #[serde(default)]
    pub peak_hold: PeakHoldConfig,
    /// Stable-window settings
    #[serde(default)]
    pub stable_window: StableWindowConfig,
    /// Valid framing required before measuring
    #[serde(default = "default_ready_hold_ms")]
    pub ready_hold_ms: u64,
    /// Countdown length, zero for none
    #[serde(default = "default_countdown_ms")]
    pub countdown_ms: u64,
}

const fn default_framing() -> FramingWindow {
    FramingWindow::for_test(FitnessTest::SitAndReach)
}

const fn default_ready_hold_ms() -> u64 {
    lifecycle::REACH_READY_HOLD_MS
}

const fn default_countdown_ms() -> u64 {
    lifecycle::REACH_COUNTDOWN_MS
}

impl Default for SitAndReachSessionConfig {
    fn default() -> Self {
        Self {
            framing_gate: QualityGate::reach_framing(),
            framing: default_framing(),
            reach: ReachConfig::default(),
            peak_hold: PeakHoldConfig::default(),
            stable_window: StableWindowConfig::default(),
            ready_hold_ms: default_ready_hold_ms(),
            countdown_ms: default_countdown_ms(),
        }
    }
}

impl SitAndReachSessionConfig {
    /// Settings for a user of the given height
    #[must_use]
    pub fn with_height(user_height_cm: f64) -> Self {
        Self {
            reach: ReachConfig::with_height(user_height_cm),
            ..Self::default()
        }
    }

    /// Validate every component
    ///
    /// # Errors
    ///
    /// Returns the first component config error.
    pub fn validate(&self) -> AppResult<()> {
        self.framing_gate.validate()?;
        self.framing.validate()?;
        self.reach.validate()?;
        self.peak_hold.validate()
    }
}

/// Derived sit-and-reach state after one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitAndReachFrame {
    /// Phase after this frame
    pub phase: RunPhase,
    /// Framing verdict
    pub framing: FramingStatus,
    /// Ready-hold progress
    pub ready_progress: f64,
    /// Countdown left
    pub countdown_remaining_ms: Option<u64>,
    /// Reach estimate, when measured
    pub reach: Option<ReachEstimate>,
    /// Peak-hold status, when running
    pub hold: Option<PeakHoldStatus>,
    /// Best held reach so far
    pub best_cm: Option<f64>,
    /// Best stable-window average so far
    pub avg_cm: Option<f64>,
}

/// Sit-and-reach measurement run
#[derive(Debug, Clone)]
pub struct SitAndReachOrchestrator {
    config: SitAndReachSessionConfig,
    run_id: Uuid,
    lifecycle: Lifecycle,
    estimator: ReachEstimator,
    peak: PeakHoldController,
    stable: StableWindow,
}

impl SitAndReachOrchestrator {
    /// Build a run in the ready phase
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` fails validation.
    pub fn new(config: SitAndReachSessionConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            run_id: Uuid::new_v4(),
            lifecycle: Lifecycle::new(
                FitnessTest::SitAndReach.as_str(),
                config.ready_hold_ms,
                config.countdown_ms,
            ),
            estimator: ReachEstimator::new(config.reach.clone())?,
            peak: PeakHoldController::new(config.peak_hold)?,
            stable: StableWindow::new(config.stable_window)?,
            config,
        })
    }

    /// Active settings
    #[must_use]
    pub const fn config(&self) -> &SitAndReachSessionConfig {
        &self.config
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.lifecycle.phase()
    }

    /// Best held reach, one decimal
    #[must_use]
    pub fn best_cm(&self) -> Option<f64> {
        self.peak.best().map(round_1dp)
    }

    /// Best stable-window average, one decimal
    #[must_use]
    pub fn avg_cm(&self) -> Option<f64> {
        self.stable.best_average().map(round_1dp)
    }

    /// Process one frame
    pub fn push(&mut self, frame: &Frame, now_ms: u64) -> SitAndReachFrame {
        let framing =
            FramingStatus::assess(frame, &self.config.framing, &self.config.framing_gate);

        if self.lifecycle.advance(framing.ok, now_ms) == LifecycleEvent::Started {
            self.estimator.reset();
            self.peak.reset();
            self.stable.reset();
        }

        let (reach, hold) = if self.lifecycle.phase() == RunPhase::Running {
            self.measure(frame, &framing, now_ms)
        } else {
            (None, None)
        };

        SitAndReachFrame {
            phase: self.lifecycle.phase(),
            framing,
            ready_progress: self.lifecycle.ready_progress(now_ms),
            countdown_remaining_ms: self.lifecycle.countdown_remaining_ms(now_ms),
            reach,
            hold,
            best_cm: self.best_cm(),
            avg_cm: self.avg_cm(),
        }
    }

    fn measure(
        &mut self,
        frame: &Frame,
        framing: &FramingStatus,
        now_ms: u64,
    ) -> (Option<ReachEstimate>, Option<PeakHoldStatus>) {
        if !framing.ok {
            self.peak.break_hold();
            self.stable.break_window();
            return (None, Some(self.peak.status()));
        }

        let estimate = self.estimator.estimate(frame, now_ms);
        if !estimate.ok {
            debug!(issue = ?estimate.issue, "reach frame skipped");
            return (Some(estimate), Some(self.peak.status()));
        }

        let status = self.peak.push(estimate.cm);
        self.stable.push(estimate.cm, now_ms);
        if status.done {
            info!(
                best_cm = status.best_cm,
                avg_cm = ?self.stable.best_average(),
                "sit-and-reach hold complete"
            );
            self.lifecycle.finish(now_ms);
        }
        (Some(estimate), Some(status))
    }

    /// Result once the run has started
    #[must_use]
    pub fn result(&self) -> Option<SessionResult> {
        if !matches!(self.phase(), RunPhase::Running | RunPhase::Finished) {
            return None;
        }
        let best_cm = self.best_cm()?;
        Some(SessionResult::new(
            self.run_id,
            FitnessTest::SitAndReach,
            self.phase(),
            MeasurementOutcome::SitAndReach {
                best_cm,
                avg_cm: self.avg_cm(),
            },
        ))
    }

    /// Clear all state and return to ready with a new run id
    pub fn reset(&mut self) {
        info!(best_cm = ?self.peak.best(), "sit-and-reach run reset");
        self.run_id = Uuid::new_v4();
        self.lifecycle.reset();
        self.estimator.reset();
        self.peak.reset();
        self.stable.reset();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SitAndReachOrchestrator::new(SitAndReachSessionConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_height() {
        let config = SitAndReachSessionConfig::with_height(-1.0);
        assert!(SitAndReachOrchestrator::new(config).is_err());
    }

    #[test]
    fn test_no_result_before_running() {
        let mut run = SitAndReachOrchestrator::new(SitAndReachSessionConfig::default()).unwrap();
        let out = run.push(&Frame::empty(), 0);
        assert_eq!(out.phase, RunPhase::Ready);
        assert!(out.reach.is_none());
        assert!(run.result().is_none());
    }
}
