// ABOUTME: 33-point body landmark enumeration, side-independent body parts, and body sides
// ABOUTME: Maps (BodyPart, Side) pairs to fixed landmark indices of the pose model output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed landmark order of the 33-point pose model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum PoseLandmark {
    /// Nose
    Nose = 0,
    /// Left eye inner corner
    LeftEyeInner = 1,
    /// Left eye
    LeftEye = 2,
    /// Left eye outer corner
    LeftEyeOuter = 3,
    /// Right eye inner corner
    RightEyeInner = 4,
    /// Right eye
    RightEye = 5,
    /// Right eye outer corner
    RightEyeOuter = 6,
    /// Left ear
    LeftEar = 7,
    /// Right ear
    RightEar = 8,
    /// Mouth left corner
    MouthLeft = 9,
    /// Mouth right corner
    MouthRight = 10,
    /// Left shoulder
    LeftShoulder = 11,
    /// Right shoulder
    RightShoulder = 12,
    /// Left elbow
    LeftElbow = 13,
    /// Right elbow
    RightElbow = 14,
    /// Left wrist
    LeftWrist = 15,
    /// Right wrist
    RightWrist = 16,
    /// Left pinky knuckle
    LeftPinky = 17,
    /// Right pinky knuckle
    RightPinky = 18,
    /// Left index fingertip
    LeftIndex = 19,
    /// Right index fingertip
    RightIndex = 20,
    /// Left thumb
    LeftThumb = 21,
    /// Right thumb
    RightThumb = 22,
    /// Left hip
    LeftHip = 23,
    /// Right hip
    RightHip = 24,
    /// Left knee
    LeftKnee = 25,
    /// Right knee
    RightKnee = 26,
    /// Left ankle
    LeftAnkle = 27,
    /// Right ankle
    RightAnkle = 28,
    /// Left heel
    LeftHeel = 29,
    /// Right heel
    RightHeel = 30,
    /// Left foot tip
    LeftFootIndex = 31,
    /// Right foot tip
    RightFootIndex = 32,
}

impl PoseLandmark {
    /// Number of landmarks in a full frame
    pub const COUNT: usize = 33;

    const ALL: [Self; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    /// Position in the frame array
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Landmark at a frame array position
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for PoseLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Body side as seen by the pose model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Subject's left
    #[serde(rename = "L")]
    Left,
    /// Subject's right
    #[serde(rename = "R")]
    Right,
}

impl Side {
    /// Single-letter code
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }

    /// The other side
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Side-independent body part used to build per-test joint sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    /// Shoulder
    Shoulder,
    /// Elbow
    Elbow,
    /// Wrist
    Wrist,
    /// Index fingertip
    Index,
    /// Hip
    Hip,
    /// Knee
    Knee,
    /// Ankle
    Ankle,
    /// Heel
    Heel,
    /// Foot tip
    FootIndex,
}

impl BodyPart {
    /// Landmark for this part on `side`
    #[must_use]
    pub const fn landmark(self, side: Side) -> PoseLandmark {
        match (self, side) {
            (Self::Shoulder, Side::Left) => PoseLandmark::LeftShoulder,
            (Self::Shoulder, Side::Right) => PoseLandmark::RightShoulder,
            (Self::Elbow, Side::Left) => PoseLandmark::LeftElbow,
            (Self::Elbow, Side::Right) => PoseLandmark::RightElbow,
            (Self::Wrist, Side::Left) => PoseLandmark::LeftWrist,
            (Self::Wrist, Side::Right) => PoseLandmark::RightWrist,
            (Self::Index, Side::Left) => PoseLandmark::LeftIndex,
            (Self::Index, Side::Right) => PoseLandmark::RightIndex,
            (Self::Hip, Side::Left) => PoseLandmark::LeftHip,
            (Self::Hip, Side::Right) => PoseLandmark::RightHip,
            (Self::Knee, Side::Left) => PoseLandmark::LeftKnee,
            (Self::Knee, Side::Right) => PoseLandmark::RightKnee,
            (Self::Ankle, Side::Left) => PoseLandmark::LeftAnkle,
            (Self::Ankle, Side::Right) => PoseLandmark::RightAnkle,
            (Self::Heel, Side::Left) => PoseLandmark::LeftHeel,
            (Self::Heel, Side::Right) => PoseLandmark::RightHeel,
            (Self::FootIndex, Side::Left) => PoseLandmark::LeftFootIndex,
            (Self::FootIndex, Side::Right) => PoseLandmark::RightFootIndex,
        }
    }
}
