// ABOUTME: Landmark and Frame types produced by the external pose estimation model
// ABOUTME: Missing and low-visibility landmarks are represented uniformly as absent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::body::PoseLandmark;
use serde::{Deserialize, Serialize};

/// One observed body keypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized horizontal image coordinate (0.0 to 1.0)
    pub x: f64,
    /// Normalized vertical image coordinate (0.0 to 1.0)
    pub y: f64,
    /// Relative depth, sign and scale defined by the pose model
    #[serde(default)]
    pub z: f64,
    /// Confidence (0.0 to 1.0)
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    /// Create a landmark
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }

    /// Visibility at or above `threshold`
    #[must_use]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility >= threshold
    }

    /// Both image coordinates inside the unit square
    #[must_use]
    pub fn is_in_frame(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Visible at `threshold` and inside the image
    #[must_use]
    pub fn passes(&self, threshold: f64) -> bool {
        self.is_visible(threshold) && self.is_in_frame()
    }

    fn is_observed(&self) -> bool {
        self.visibility > 0.0 && self.x.is_finite() && self.y.is_finite()
    }
}

/// One frame of pose output indexed by [`PoseLandmark`]
///
/// Shorter frames are allowed; indices past the end read as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    landmarks: Vec<Option<Landmark>>,
}

impl Frame {
    /// Wrap raw pose output, truncating anything past the 33-point layout
    #[must_use]
    pub fn new(mut landmarks: Vec<Option<Landmark>>) -> Self {
        landmarks.truncate(PoseLandmark::COUNT);
        Self { landmarks }
    }

    /// Frame with every landmark missing
    #[must_use]
    pub fn empty() -> Self {
        Self {
            landmarks: vec![None; PoseLandmark::COUNT],
        }
    }

    /// Set or replace one landmark
    pub fn set(&mut self, landmark: PoseLandmark, value: Landmark) {
        let index = landmark.index();
        if self.landmarks.len() <= index {
            self.landmarks.resize(index + 1, None);
        }
        self.landmarks[index] = Some(value);
    }

    /// Builder form of [`Frame::set`]
    #[must_use]
    pub fn with(mut self, landmark: PoseLandmark, value: Landmark) -> Self {
        self.set(landmark, value);
        self
    }

    /// Raw slot, including zero-visibility entries
    #[must_use]
    pub fn raw(&self, landmark: PoseLandmark) -> Option<&Landmark> {
        self.landmarks.get(landmark.index()).and_then(Option::as_ref)
    }

    /// Observed landmark: absent, zero-visibility, or non-finite slots read as `None`
    #[must_use]
    pub fn get(&self, landmark: PoseLandmark) -> Option<&Landmark> {
        self.raw(landmark).filter(|lm| lm.is_observed())
    }

    /// Observed landmark at or above a visibility threshold
    #[must_use]
    pub fn visible(&self, landmark: PoseLandmark, threshold: f64) -> Option<&Landmark> {
        self.get(landmark).filter(|lm| lm.is_visible(threshold))
    }

    /// Raw visibility, zero when missing
    #[must_use]
    pub fn visibility(&self, landmark: PoseLandmark) -> f64 {
        self.get(landmark).map_or(0.0, |lm| lm.visibility)
    }

    /// Number of slots present in the frame
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Frame carries no slots at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

impl From<Vec<Option<Landmark>>> for Frame {
    fn from(landmarks: Vec<Option<Landmark>>) -> Self {
        Self::new(landmarks)
    }
}
