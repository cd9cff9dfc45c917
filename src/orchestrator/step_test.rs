// ABOUTME: Step test protocol session: guided intro, stepping, recovery and optional manual pulse count
// ABOUTME: Scores the last valid recovery heart rate or a submitted ten-second beat count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Step test session
//!
//! `idle -> prestep -> stepping -> recovery -> done` in automatic mode; in
//! manual mode recovery is followed by a timed pulse count and a wait for the
//! submitted beat count. Phase changes are driven by [`StepTestSession::tick`]
//! with caller-supplied millisecond timestamps, so a late tick catches up
//! through every elapsed phase.

use super::lifecycle::RunPhase;
use crate::errors::{AppError, AppResult};
use crate::session::{MeasurementOutcome, SessionResult};
use pierre_measure_algorithms::{bpm_from_manual_count, calc_fitness_score, FitnessScore};
use pierre_measure_core::constants::step_test;
use pierre_measure_core::models::FitnessTest;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Where the recovery heart rate comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartRateMode {
    /// Last valid reading from the heart-rate feed
    #[default]
    Automatic,
    /// Beat count entered by the user after a timed count
    Manual,
}

/// Step test protocol phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPhase {
    /// Waiting for a resting heart rate and start
    Idle,
    /// Guided introduction
    Prestep,
    /// Stepping to the metronome
    Stepping,
    /// Seated recovery
    Recovery,
    /// Timed manual pulse count
    ManualCount,
    /// Waiting for the counted beats
    AwaitingCount,
    /// Scored
    Done,
}

impl StepPhase {
    /// Generic lifecycle phase this step phase maps onto
    #[must_use]
    pub const fn run_phase(self) -> RunPhase {
        match self {
            Self::Idle => RunPhase::Ready,
            Self::Prestep => RunPhase::Countdown,
            Self::Stepping | Self::Recovery | Self::ManualCount | Self::AwaitingCount => {
                RunPhase::Running
            }
            Self::Done => RunPhase::Finished,
        }
    }
}

/// Step test protocol settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepTestConfig {
    /// Recovery heart-rate source
    #[serde(default)]
    pub mode: HeartRateMode,
    /// Guided introduction length
    #[serde(default = "default_prestep_sec")]
    pub prestep_sec: u64,
    /// Stepping length
    #[serde(default = "default_stepping_sec")]
    pub stepping_sec: u64,
    /// Recovery length
    #[serde(default = "default_recovery_sec")]
    pub recovery_sec: u64,
    /// Manual count window
    #[serde(default = "default_manual_count_sec")]
    pub manual_count_sec: u64,
    /// Highest resting heart rate allowed to start
    #[serde(default = "default_max_resting_bpm")]
    pub max_resting_bpm: f64,
}

const fn default_prestep_sec() -> u64 {
    step_test::PRESTEP_SEC
}

const fn default_stepping_sec() -> u64 {
    step_test::STEPPING_SEC
}

const fn default_recovery_sec() -> u64 {
    step_test::RECOVERY_SEC
}

const fn default_manual_count_sec() -> u64 {
    step_test::MANUAL_COUNT_SEC
}

const fn default_max_resting_bpm() -> f64 {
    step_test::MAX_RESTING_BPM
}

impl Default for StepTestConfig {
    fn default() -> Self {
        Self {
            mode: HeartRateMode::default(),
            prestep_sec: default_prestep_sec(),
            stepping_sec: default_stepping_sec(),
            recovery_sec: default_recovery_sec(),
            manual_count_sec: default_manual_count_sec(),
            max_resting_bpm: default_max_resting_bpm(),
        }
    }
}

impl StepTestConfig {
    /// Validate settings
    ///
    /// # Errors
    ///
    /// Returns a config error for a zero stepping, recovery or count window,
    /// or a non-positive resting limit.
    pub fn validate(&self) -> AppResult<()> {
        if self.stepping_sec == 0 || self.recovery_sec == 0 || self.manual_count_sec == 0 {
            return Err(AppError::config(
                "step test stepping, recovery and count windows must be positive",
            ));
        }
        if !self.max_resting_bpm.is_finite() || self.max_resting_bpm <= 0.0 {
            return Err(AppError::config(format!(
                "max resting heart rate {} must be positive",
                self.max_resting_bpm
            )));
        }
        Ok(())
    }

    const fn duration_ms(&self, phase: StepPhase) -> Option<u64> {
        let sec = match phase {
            StepPhase::Prestep => self.prestep_sec,
            StepPhase::Stepping => self.stepping_sec,
            StepPhase::Recovery => self.recovery_sec,
            StepPhase::ManualCount => self.manual_count_sec,
            StepPhase::Idle | StepPhase::AwaitingCount | StepPhase::Done => return None,
        };
        Some(sec * 1_000)
    }
}

/// One step test run
#[derive(Debug, Clone)]
pub struct StepTestSession {
    config: StepTestConfig,
    run_id: Uuid,
    phase: StepPhase,
    phase_started_ms: u64,
    resting_bpm: Option<f64>,
    last_valid_bpm: Option<f64>,
    recovery_bpm: Option<f64>,
    score: Option<FitnessScore>,
}

impl StepTestSession {
    /// Build an idle session
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` fails validation.
    pub fn new(config: StepTestConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            run_id: Uuid::new_v4(),
            phase: StepPhase::Idle,
            phase_started_ms: 0,
            resting_bpm: None,
            last_valid_bpm: None,
            recovery_bpm: None,
            score: None,
        })
    }

    /// Active settings
    #[must_use]
    pub const fn config(&self) -> &StepTestConfig {
        &self.config
    }

    /// Protocol phase
    #[must_use]
    pub const fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Generic lifecycle phase
    #[must_use]
    pub const fn run_phase(&self) -> RunPhase {
        self.phase.run_phase()
    }

    /// Last valid heart-rate reading seen
    #[must_use]
    pub const fn last_valid_bpm(&self) -> Option<f64> {
        self.last_valid_bpm
    }

    /// Heart rate that was scored
    #[must_use]
    pub const fn recovery_bpm(&self) -> Option<f64> {
        self.recovery_bpm
    }

    /// Score, once done with a usable heart rate
    #[must_use]
    pub const fn score(&self) -> Option<&FitnessScore> {
        self.score.as_ref()
    }

    /// Start stepping with a resting heart rate in `(0, max_resting_bpm]`
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error when the session is not idle or the
    /// resting heart rate is missing, and an out-of-range error when it
    /// exceeds the configured maximum.
    pub fn start(&mut self, resting_bpm: Option<f64>, now_ms: u64) -> AppResult<()> {
        if self.phase != StepPhase::Idle {
            return Err(AppError::invalid_input(format!(
                "step test already in phase {:?}",
                self.phase
            )));
        }
        let bpm = resting_bpm
            .filter(|b| b.is_finite() && *b > 0.0)
            .ok_or_else(|| AppError::invalid_input("resting heart rate is required to start"))?;
        if bpm > self.config.max_resting_bpm {
            return Err(AppError::out_of_range(format!(
                "resting heart rate {bpm} exceeds {}",
                self.config.max_resting_bpm
            )));
        }

        self.resting_bpm = Some(bpm);
        self.enter(StepPhase::Prestep, now_ms);
        info!(resting_bpm = bpm, mode = ?self.config.mode, "step test started");
        self.tick(now_ms);
        Ok(())
    }

    /// Remember a heart-rate reading; invalid readings are ignored
    pub fn record_heart_rate(&mut self, bpm: Option<f64>) {
        if let Some(valid) = bpm.filter(|b| b.is_finite() && *b > 0.0) {
            self.last_valid_bpm = Some(valid);
        }
    }

    fn enter(&mut self, phase: StepPhase, started_ms: u64) {
        debug!(from = ?self.phase, to = ?phase, "step test phase");
        self.phase = phase;
        self.phase_started_ms = started_ms;
    }

    /// Advance timed phases up to `now_ms`
    pub fn tick(&mut self, now_ms: u64) -> StepPhase {
        while let Some(duration) = self.config.duration_ms(self.phase) {
            let ends_at = self.phase_started_ms + duration;
            if now_ms < ends_at {
                break;
            }
            match self.phase {
                StepPhase::Prestep => self.enter(StepPhase::Stepping, ends_at),
                StepPhase::Stepping => self.enter(StepPhase::Recovery, ends_at),
                StepPhase::Recovery => match self.config.mode {
                    HeartRateMode::Automatic => self.finish_with(self.last_valid_bpm),
                    HeartRateMode::Manual => self.enter(StepPhase::ManualCount, ends_at),
                },
                StepPhase::ManualCount => self.enter(StepPhase::AwaitingCount, ends_at),
                StepPhase::Idle | StepPhase::AwaitingCount | StepPhase::Done => break,
            }
        }
        self.phase
    }

    /// Time left in the current timed phase
    #[must_use]
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.config
            .duration_ms(self.phase)
            .map(|duration| (self.phase_started_ms + duration).saturating_sub(now_ms))
    }

    /// Score a manual ten-second pulse count
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error outside the manual count phases or for
    /// a zero count.
    pub fn submit_manual_count(&mut self, beats: u32) -> AppResult<()> {
        let counting = matches!(self.phase, StepPhase::ManualCount | StepPhase::AwaitingCount);
        if self.config.mode != HeartRateMode::Manual || !counting {
            return Err(AppError::invalid_input(format!(
                "manual count not accepted in phase {:?}",
                self.phase
            )));
        }
        if beats == 0 {
            return Err(AppError::invalid_input("beat count must be positive"));
        }
        self.finish_with(Some(bpm_from_manual_count(beats)));
        Ok(())
    }

    fn finish_with(&mut self, recovery_bpm: Option<f64>) {
        self.recovery_bpm = recovery_bpm;
        self.score = calc_fitness_score(recovery_bpm);
        self.phase = StepPhase::Done;
        info!(
            recovery_bpm = ?recovery_bpm,
            grade = ?self.score.as_ref().map(|s| s.grade.ordinal()),
            "step test finished"
        );
    }

    /// Result once done
    #[must_use]
    pub fn result(&self) -> Option<SessionResult> {
        (self.phase == StepPhase::Done).then(|| {
            SessionResult::new(
                self.run_id,
                FitnessTest::StepTest,
                self.run_phase(),
                MeasurementOutcome::step_test(
                    self.resting_bpm,
                    self.recovery_bpm,
                    self.score.as_ref(),
                ),
            )
        })
    }

    /// Return to idle with a new run id, keeping nothing
    pub fn reset(&mut self) {
        info!(phase = ?self.phase, "step test reset");
        self.run_id = Uuid::new_v4();
        self.phase = StepPhase::Idle;
        self.phase_started_ms = 0;
        self.resting_bpm = None;
        self.last_valid_bpm = None;
        self.recovery_bpm = None;
        self.score = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const SEC: u64 = 1_000;

    fn session(mode: HeartRateMode) -> StepTestSession {
        StepTestSession::new(StepTestConfig {
            mode,
            ..StepTestConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_start_requires_valid_resting_rate() {
        let mut step = session(HeartRateMode::Automatic);
        assert!(step.start(None, 0).is_err());
        assert!(step.start(Some(0.0), 0).is_err());
        assert!(step.start(Some(101.0), 0).is_err());
        assert_eq!(step.phase(), StepPhase::Idle);
        step.start(Some(100.0), 0).unwrap();
        assert_eq!(step.phase(), StepPhase::Prestep);
        assert!(step.start(Some(70.0), 10).is_err());
    }

    #[test]
    fn test_automatic_protocol_scores_last_valid_reading() {
        let mut step = session(HeartRateMode::Automatic);
        step.start(Some(72.0), 0).unwrap();
        assert_eq!(step.tick(27 * SEC), StepPhase::Prestep);
        assert_eq!(step.tick(28 * SEC), StepPhase::Stepping);
        assert_eq!(step.remaining_ms(28 * SEC + 500), Some(179_500));
        assert_eq!(step.tick(208 * SEC), StepPhase::Recovery);

        step.record_heart_rate(Some(112.0));
        step.record_heart_rate(None);
        step.record_heart_rate(Some(f64::NAN));
        assert_eq!(step.tick(268 * SEC), StepPhase::Done);

        let score = step.score().unwrap();
        assert_eq!(score.grade.ordinal(), 4);
        assert_eq!(step.recovery_bpm(), Some(112.0));
        assert_eq!(step.result().unwrap().phase, RunPhase::Finished);
    }

    #[test]
    fn test_late_tick_catches_up() {
        let mut step = session(HeartRateMode::Automatic);
        step.start(Some(72.0), 0).unwrap();
        assert_eq!(step.tick(10_000 * SEC), StepPhase::Done);
        assert!(step.score().is_none());
        assert!(step.result().is_some());
    }

    #[test]
    fn test_manual_count_flow() {
        let mut step = session(HeartRateMode::Manual);
        step.start(Some(80.0), 0).unwrap();
        assert!(step.submit_manual_count(15).is_err());
        assert_eq!(step.tick(268 * SEC), StepPhase::ManualCount);
        assert_eq!(step.tick(278 * SEC), StepPhase::AwaitingCount);
        assert!(step.submit_manual_count(0).is_err());
        step.submit_manual_count(16).unwrap();
        assert_eq!(step.phase(), StepPhase::Done);
        assert_eq!(step.recovery_bpm(), Some(96.0));
        assert_eq!(step.score().unwrap().grade.ordinal(), 2);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut step = session(HeartRateMode::Automatic);
        step.start(Some(72.0), 0).unwrap();
        step.record_heart_rate(Some(120.0));
        step.reset();
        assert_eq!(step.phase(), StepPhase::Idle);
        assert!(step.last_valid_bpm().is_none());
        assert_eq!(step.run_phase(), RunPhase::Ready);
    }
}
