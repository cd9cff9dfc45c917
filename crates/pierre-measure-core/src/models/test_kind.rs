// ABOUTME: Fitness test identifiers for the three camera and heart-rate based measurements
// ABOUTME: Parsed from CLI and config strings and serialized into session results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which measurement a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessTest {
    /// Timed sit-up repetitions counted from the torso angle
    Situp,
    /// Seated forward reach measured in centimeters
    SitAndReach,
    /// Three-minute step test scored from recovery heart rate
    StepTest,
}

impl FitnessTest {
    /// Stable string identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Situp => "situp",
            Self::SitAndReach => "sit_and_reach",
            Self::StepTest => "step_test",
        }
    }
}

impl fmt::Display for FitnessTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessTest {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "situp" | "sit_up" => Ok(Self::Situp),
            "sit_and_reach" | "reach" => Ok(Self::SitAndReach),
            "step_test" | "step" => Ok(Self::StepTest),
            other => Err(AppError::invalid_input(format!(
                "Unknown fitness test: {other}"
            ))),
        }
    }
}
