// ABOUTME: Shared ready, countdown, running and finished lifecycle for frame orchestrators
// ABOUTME: Valid-framing hold starts the countdown; invalid framing during countdown cancels it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_measure_algorithms::ReadyHold;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Phase of one measurement run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Waiting for sustained valid framing
    #[default]
    Ready,
    /// Fixed-length countdown before measuring
    Countdown,
    /// Measuring
    Running,
    /// Terminal until reset
    Finished,
}

impl RunPhase {
    /// Stable string identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Countdown => "countdown",
            Self::Running => "running",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a lifecycle step changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Nothing changed
    None,
    /// Ready hold satisfied, countdown begun
    CountdownStarted,
    /// Framing lost during countdown, back to ready
    CountdownCancelled,
    /// Measurement began
    Started,
}

/// Ready/countdown driver for one run
#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: RunPhase,
    ready: ReadyHold,
    countdown_ms: u64,
    countdown_started_ms: Option<u64>,
    test: &'static str,
}

impl Lifecycle {
    /// Lifecycle requiring `ready_hold_ms` of valid framing and a `countdown_ms` countdown
    ///
    /// A zero countdown starts measuring as soon as the ready hold completes.
    #[must_use]
    pub const fn new(test: &'static str, ready_hold_ms: u64, countdown_ms: u64) -> Self {
        Self {
            phase: RunPhase::Ready,
            ready: ReadyHold::new(ready_hold_ms),
            countdown_ms,
            countdown_started_ms: None,
            test,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Ready-hold progress in `[0, 1]`
    #[must_use]
    pub fn ready_progress(&self, now_ms: u64) -> f64 {
        self.ready.progress(now_ms)
    }

    /// Countdown time left, `None` outside the countdown
    #[must_use]
    pub fn countdown_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        match (self.phase, self.countdown_started_ms) {
            (RunPhase::Countdown, Some(start)) => {
                Some(self.countdown_ms.saturating_sub(now_ms.saturating_sub(start)))
            }
            _ => None,
        }
    }

    /// Advance ready and countdown phases with this frame's framing verdict
    ///
    /// Running and finished phases are left alone.
    pub fn advance(&mut self, framing_ok: bool, now_ms: u64) -> LifecycleEvent {
        match self.phase {
            RunPhase::Ready => {
                if !self.ready.update(framing_ok, now_ms) {
                    return LifecycleEvent::None;
                }
                if self.countdown_ms == 0 {
                    return self.start(now_ms);
                }
                self.phase = RunPhase::Countdown;
                self.countdown_started_ms = Some(now_ms);
                debug!(test = self.test, now_ms, "countdown started");
                LifecycleEvent::CountdownStarted
            }
            RunPhase::Countdown => {
                if !framing_ok {
                    self.back_to_ready();
                    debug!(test = self.test, now_ms, "countdown cancelled");
                    return LifecycleEvent::CountdownCancelled;
                }
                let elapsed = self
                    .countdown_started_ms
                    .map_or(0, |start| now_ms.saturating_sub(start));
                if elapsed >= self.countdown_ms {
                    self.start(now_ms)
                } else {
                    LifecycleEvent::None
                }
            }
            RunPhase::Running | RunPhase::Finished => LifecycleEvent::None,
        }
    }

    fn start(&mut self, now_ms: u64) -> LifecycleEvent {
        self.phase = RunPhase::Running;
        self.countdown_started_ms = None;
        info!(test = self.test, now_ms, "measurement started");
        LifecycleEvent::Started
    }

    fn back_to_ready(&mut self) {
        self.phase = RunPhase::Ready;
        self.countdown_started_ms = None;
        self.ready.reset();
    }

    /// Move a running measurement to finished
    pub fn finish(&mut self, now_ms: u64) {
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Finished;
            info!(test = self.test, now_ms, "measurement finished");
        }
    }

    /// Return to ready from any phase
    pub fn reset(&mut self) {
        self.back_to_ready();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_then_countdown_then_running() {
        let mut lifecycle = Lifecycle::new("situp", 600, 5_000);
        assert_eq!(lifecycle.advance(true, 0), LifecycleEvent::None);
        assert_eq!(lifecycle.advance(true, 599), LifecycleEvent::None);
        assert_eq!(lifecycle.advance(true, 600), LifecycleEvent::CountdownStarted);
        assert_eq!(lifecycle.countdown_remaining_ms(2_600), Some(3_000));
        assert_eq!(lifecycle.advance(true, 5_599), LifecycleEvent::None);
        assert_eq!(lifecycle.advance(true, 5_600), LifecycleEvent::Started);
        assert_eq!(lifecycle.phase(), RunPhase::Running);
    }

    #[test]
    fn test_invalid_frame_cancels_countdown() {
        let mut lifecycle = Lifecycle::new("situp", 0, 5_000);
        assert_eq!(lifecycle.advance(true, 0), LifecycleEvent::CountdownStarted);
        assert_eq!(lifecycle.advance(false, 100), LifecycleEvent::CountdownCancelled);
        assert_eq!(lifecycle.phase(), RunPhase::Ready);
    }

    #[test]
    fn test_interrupted_hold_restarts() {
        let mut lifecycle = Lifecycle::new("sit_and_reach", 1_000, 0);
        lifecycle.advance(true, 0);
        lifecycle.advance(false, 500);
        assert_eq!(lifecycle.advance(true, 1_000), LifecycleEvent::None);
        assert_eq!(lifecycle.advance(true, 2_000), LifecycleEvent::Started);
    }

    #[test]
    fn test_finish_only_from_running() {
        let mut lifecycle = Lifecycle::new("situp", 0, 0);
        lifecycle.finish(0);
        assert_eq!(lifecycle.phase(), RunPhase::Ready);
        lifecycle.advance(true, 0);
        lifecycle.finish(10);
        assert_eq!(lifecycle.phase(), RunPhase::Finished);
        lifecycle.reset();
        assert_eq!(lifecycle.phase(), RunPhase::Ready);
    }
}
