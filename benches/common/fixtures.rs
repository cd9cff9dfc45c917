// ABOUTME: Benchmark fixtures generating deterministic synthetic pose frame sequences
// ABOUTME: Side-on sit-up cycles and seated sit-and-reach leans with timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark frame fixtures.
//!
//! Every sequence is deterministic so runs are comparable.

use pierre_measure::models::{Frame, Landmark, PoseLandmark};

/// Sequence lengths used across benchmarks
#[derive(Debug, Clone, Copy)]
pub enum SequenceLength {
    /// About ten seconds of camera input
    Short,
    /// About one minute of camera input
    Long,
}

impl SequenceLength {
    #[must_use]
    pub const fn frames(self) -> usize {
        match self {
            Self::Short => 300,
            Self::Long => 1_800,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Short => "10s",
            Self::Long => "60s",
        }
    }
}

/// Frame interval at 30 fps
pub const FRAME_MS: u64 = 33;

fn joint(x: f64, y: f64) -> Landmark {
    Landmark::new(x, y, 0.0, 0.95)
}

/// Side-on sit-up pose at the given shoulder-hip-knee angle
#[must_use]
pub fn situp_frame(hip_angle_deg: f64) -> Frame {
    let theta = hip_angle_deg.to_radians();
    let shoulder_x = 0.2_f64.mul_add(theta.cos(), 0.5);
    let shoulder_y = 0.2_f64.mul_add(-theta.sin(), 0.7);
    Frame::empty()
        .with(
            PoseLandmark::LeftShoulder,
            Landmark::new(shoulder_x, shoulder_y, -0.1, 0.95),
        )
        .with(
            PoseLandmark::RightShoulder,
            Landmark::new(shoulder_x + 0.073, shoulder_y, 0.1, 0.9),
        )
        .with(PoseLandmark::LeftElbow, joint(shoulder_x + 0.05, shoulder_y + 0.05))
        .with(PoseLandmark::LeftHip, joint(0.5, 0.7))
        .with(PoseLandmark::LeftKnee, joint(0.7, 0.7))
        .with(PoseLandmark::LeftAnkle, joint(0.85, 0.8))
}

/// Seated profile pose with the fingertip `reach_cm` past the foot for a 100 cm user
#[must_use]
pub fn reach_frame(reach_cm: f64) -> Frame {
    let hand_x = 0.7 + reach_cm / 100.0;
    Frame::empty()
        .with(PoseLandmark::LeftShoulder, Landmark::new(0.4, 0.4, -0.2, 0.95))
        .with(PoseLandmark::RightShoulder, Landmark::new(0.4, 0.4, 0.2, 0.9))
        .with(PoseLandmark::LeftElbow, joint(0.45, 0.5))
        .with(PoseLandmark::LeftWrist, joint(hand_x - 0.02, 0.6))
        .with(PoseLandmark::LeftIndex, joint(hand_x, 0.6))
        .with(PoseLandmark::LeftHip, joint(0.3, 0.7))
        .with(PoseLandmark::LeftKnee, joint(0.5, 0.68))
        .with(PoseLandmark::LeftAnkle, joint(0.68, 0.7))
        .with(PoseLandmark::LeftFootIndex, joint(0.7, 0.66))
}

/// Sit-up sequence: lying still, then curl cycles of 24 frames
#[must_use]
pub fn situp_sequence(length: SequenceLength) -> Vec<(Frame, u64)> {
    (0..length.frames())
        .map(|i| {
            let angle = if i < 200 || (i / 12) % 2 == 0 { 170.0 } else { 80.0 };
            (situp_frame(angle), i as u64 * FRAME_MS)
        })
        .collect()
}

/// Sit-and-reach sequence: a slow lean that never settles long enough to finish
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn reach_sequence(length: SequenceLength) -> Vec<(Frame, u64)> {
    (0..length.frames())
        .map(|i| {
            let cm = (i % 60) as f64 - 30.0;
            (reach_frame(cm), i as u64 * FRAME_MS)
        })
        .collect()
}
