// ABOUTME: Recoverable per-frame input problems reported alongside derived frame state
// ABOUTME: Noisy input is never an error; these values explain why a frame was skipped or paused
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::body::PoseLandmark;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a frame did not advance a measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameIssue {
    /// A required joint is absent or below its visibility threshold
    MissingLandmark {
        /// First missing joint
        landmark: PoseLandmark,
    },
    /// Neither the shoulder nor the hip pair is available
    IndeterminateYaw,
    /// Yaw is outside the test's acceptance window
    FramingInvalid {
        /// Measured yaw
        yaw_deg: f64,
    },
    /// Both side visibility scores are zero
    NoSideDeterminable,
}

impl FrameIssue {
    /// Short hint for the user-facing layer
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::MissingLandmark { .. } | Self::NoSideDeterminable => {
                "Move so your whole side is visible"
            }
            Self::IndeterminateYaw | Self::FramingInvalid { .. } => {
                "Adjust your position relative to the camera"
            }
        }
    }
}

impl fmt::Display for FrameIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLandmark { landmark } => write!(f, "missing landmark {landmark}"),
            Self::IndeterminateYaw => f.write_str("yaw indeterminate"),
            Self::FramingInvalid { yaw_deg } => write!(f, "framing invalid (yaw {yaw_deg:.1})"),
            Self::NoSideDeterminable => f.write_str("no side determinable"),
        }
    }
}
