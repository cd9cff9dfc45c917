// ABOUTME: Sit-up orchestrator: framing gate, countdown, torso-angle rep counting and inactivity finish
// ABOUTME: Invalid framing while running pauses angle sampling without touching the rep total
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::lifecycle::{Lifecycle, LifecycleEvent, RunPhase};
use super::FramingStatus;
use crate::errors::{AppError, AppResult};
use crate::session::{MeasurementOutcome, SessionResult};
use pierre_measure_algorithms::geometry::angle_deg;
use pierre_measure_algorithms::{
    FramingWindow, QualityGate, RepCounter, RepCounterConfig, RepUpdate, SideLock,
};
use pierre_measure_core::constants::{lifecycle, visibility};
use pierre_measure_core::models::{BodyPart, FitnessTest, Frame, Side};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Sit-up run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitupSessionConfig {
    /// Side visibility gate
    #[serde(default = "QualityGate::situp")]
    pub gate: QualityGate,
    /// Accepted yaw window
    #[serde(default = "default_framing")]
    pub framing: FramingWindow,
    /// Rep counter tuning
    #[serde(default)]
    pub rep_counter: RepCounterConfig,
    /// Score lead needed to switch the measured side
    #[serde(default = "default_side_switch_margin")]
    pub side_switch_margin: f64,
    /// Valid framing required before the countdown
    #[serde(default = "default_ready_hold_ms")]
    pub ready_hold_ms: u64,
    /// Countdown length
    #[serde(default = "default_countdown_ms")]
    pub countdown_ms: u64,
    /// Time without a new rep that ends the run
    #[serde(default = "default_inactivity_ms")]
    pub inactivity_ms: u64,
}

const fn default_framing() -> FramingWindow {
    FramingWindow::for_test(FitnessTest::Situp)
}

const fn default_side_switch_margin() -> f64 {
    visibility::SIDE_SWITCH_MARGIN
}

const fn default_ready_hold_ms() -> u64 {
    lifecycle::SITUP_READY_HOLD_MS
}

const fn default_countdown_ms() -> u64 {
    lifecycle::SITUP_COUNTDOWN_MS
}

const fn default_inactivity_ms() -> u64 {
    lifecycle::SITUP_INACTIVITY_MS
}

impl Default for SitupSessionConfig {
    fn default() -> Self {
        Self {
            gate: QualityGate::situp(),
            framing: default_framing(),
            rep_counter: RepCounterConfig::default(),
            side_switch_margin: default_side_switch_margin(),
            ready_hold_ms: default_ready_hold_ms(),
            countdown_ms: default_countdown_ms(),
            inactivity_ms: default_inactivity_ms(),
        }
    }
}

impl SitupSessionConfig {
    /// Validate every component
    ///
    /// # Errors
    ///
    /// Returns the first component config error, or a config error for a
    /// negative switch margin or a zero inactivity timeout.
    pub fn validate(&self) -> AppResult<()> {
        self.gate.validate()?;
        self.framing.validate()?;
        self.rep_counter.validate()?;
        if !self.side_switch_margin.is_finite() || self.side_switch_margin < 0.0 {
            return Err(AppError::config(format!(
                "side switch margin {} must be non-negative",
                self.side_switch_margin
            )));
        }
        if self.inactivity_ms == 0 {
            return Err(AppError::config("sit-up inactivity timeout must be positive"));
        }
        Ok(())
    }
}

/// Derived sit-up state after one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitupFrame {
    /// Phase after this frame
    pub phase: RunPhase,
    /// Framing verdict
    pub framing: FramingStatus,
    /// Side measured
    pub side: Option<Side>,
    /// Ready-hold progress
    pub ready_progress: f64,
    /// Countdown left
    pub countdown_remaining_ms: Option<u64>,
    /// Raw torso angle
    pub angle_deg: Option<f64>,
    /// Rep counter output, when the counter was fed
    pub rep: Option<RepUpdate>,
    /// Total reps
    pub reps: u32,
}

/// Sit-up measurement run
#[derive(Debug, Clone)]
pub struct SitupOrchestrator {
    config: SitupSessionConfig,
    run_id: Uuid,
    lifecycle: Lifecycle,
    side_lock: SideLock,
    counter: RepCounter,
    last_rep_ms: Option<u64>,
}

impl SitupOrchestrator {
    /// Build a run in the ready phase
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` fails validation.
    pub fn new(config: SitupSessionConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            run_id: Uuid::new_v4(),
            lifecycle: Lifecycle::new(
                FitnessTest::Situp.as_str(),
                config.ready_hold_ms,
                config.countdown_ms,
            ),
            side_lock: SideLock::new(config.side_switch_margin),
            counter: RepCounter::new(config.rep_counter)?,
            last_rep_ms: None,
            config,
        })
    }

    /// Active settings
    #[must_use]
    pub const fn config(&self) -> &SitupSessionConfig {
        &self.config
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.lifecycle.phase()
    }

    /// Reps so far
    #[must_use]
    pub const fn reps(&self) -> u32 {
        self.counter.reps()
    }

    /// Process one frame
    pub fn push(&mut self, frame: &Frame, now_ms: u64) -> SitupFrame {
        let framing = FramingStatus::assess(frame, &self.config.framing, &self.config.gate);
        let side = if framing.ok {
            self.side_lock.update(&framing.choice)
        } else {
            self.side_lock.committed()
        };

        if self.lifecycle.advance(framing.ok, now_ms) == LifecycleEvent::Started {
            self.counter.reset();
            self.last_rep_ms = None;
        }

        let mut angle = None;
        let mut rep = None;
        if self.lifecycle.phase() == RunPhase::Running {
            if let (true, Some(side)) = (framing.ok, side) {
                angle = torso_angle(frame, side);
                let update =
                    self.counter
                        .update(angle.unwrap_or(f64::NAN), now_ms, framing.yaw_deg);
                if update.counted {
                    self.last_rep_ms = Some(now_ms);
                }
                rep = Some(update);
            }
            self.poll(now_ms);
        }

        SitupFrame {
            phase: self.lifecycle.phase(),
            framing,
            side,
            ready_progress: self.lifecycle.ready_progress(now_ms),
            countdown_remaining_ms: self.lifecycle.countdown_remaining_ms(now_ms),
            angle_deg: angle,
            rep,
            reps: self.counter.reps(),
        }
    }

    /// Check the inactivity timeout without a frame
    ///
    /// Finishes a running measurement once at least one rep was counted and
    /// none followed for the configured timeout.
    pub fn poll(&mut self, now_ms: u64) -> RunPhase {
        if self.lifecycle.phase() == RunPhase::Running {
            let idle = self
                .last_rep_ms
                .is_some_and(|last| now_ms.saturating_sub(last) >= self.config.inactivity_ms);
            if idle {
                info!(reps = self.counter.reps(), "sit-up run finished on inactivity");
                self.lifecycle.finish(now_ms);
            }
        }
        self.lifecycle.phase()
    }

    /// Result once the run has started
    #[must_use]
    pub fn result(&self) -> Option<SessionResult> {
        matches!(self.phase(), RunPhase::Running | RunPhase::Finished).then(|| {
            SessionResult::new(
                self.run_id,
                FitnessTest::Situp,
                self.phase(),
                MeasurementOutcome::Situp {
                    reps: self.counter.reps(),
                },
            )
        })
    }

    /// Clear all state and return to ready with a new run id
    pub fn reset(&mut self) {
        info!(reps = self.counter.reps(), "sit-up run reset");
        self.run_id = Uuid::new_v4();
        self.lifecycle.reset();
        self.side_lock.reset();
        self.counter.reset();
        self.last_rep_ms = None;
    }
}

/// Shoulder-hip-knee angle on `side`
fn torso_angle(frame: &Frame, side: Side) -> Option<f64> {
    let shoulder = frame.get(BodyPart::Shoulder.landmark(side))?;
    let hip = frame.get(BodyPart::Hip.landmark(side))?;
    let knee = frame.get(BodyPart::Knee.landmark(side))?;
    Some(angle_deg(shoulder, hip, knee))
}
