// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Synthetic pose frame builders for sit-up and sit-and-reach scenarios plus test logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::similar_names
)]
//! Shared test utilities for `pierre_measure`
//!
//! Frames are built in normalized image coordinates with the left side of
//! the body facing the camera.

use pierre_measure::models::{Frame, Landmark, PoseLandmark};
use std::env;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Milliseconds between synthetic frames for sit-ups
pub const SITUP_FRAME_MS: u64 = 50;

/// Milliseconds between synthetic frames for sit-and-reach, about 30 fps
pub const REACH_FRAME_MS: u64 = 33;

/// User height that makes one normalized unit equal 100 cm
pub const REACH_HEIGHT_CM: f64 = 100.0;

const HIP: (f64, f64) = (0.5, 0.7);
const TORSO_LEN: f64 = 0.2;

fn visible(x: f64, y: f64) -> Landmark {
    Landmark::new(x, y, 0.0, 0.95)
}

/// Side-on sit-up frame with the shoulder-hip-knee angle at `hip_angle_deg`
///
/// The shoulder pair is offset in depth so the estimated yaw is about 70°.
pub fn situp_frame(hip_angle_deg: f64) -> Frame {
    let theta = hip_angle_deg.to_radians();
    let shoulder = (
        TORSO_LEN.mul_add(theta.cos(), HIP.0),
        TORSO_LEN.mul_add(-theta.sin(), HIP.1),
    );
    // tan(70°) ≈ 2.747, so dx = dz / 2.747 for dz = 0.2
    let shoulder_dx = 0.2 / 70_f64.to_radians().tan();

    Frame::empty()
        .with(
            PoseLandmark::LeftShoulder,
            Landmark::new(shoulder.0, shoulder.1, -0.1, 0.95),
        )
        .with(
            PoseLandmark::RightShoulder,
            Landmark::new(shoulder.0 + shoulder_dx, shoulder.1, 0.1, 0.9),
        )
        .with(
            PoseLandmark::LeftElbow,
            visible(shoulder.0 + 0.05, shoulder.1 + 0.05),
        )
        .with(PoseLandmark::LeftHip, visible(HIP.0, HIP.1))
        .with(PoseLandmark::LeftKnee, visible(HIP.0 + 0.2, HIP.1))
        .with(PoseLandmark::LeftAnkle, visible(HIP.0 + 0.35, HIP.1 + 0.1))
}

/// Side-on sit-up frame seen from the front, yaw about 0°
pub fn situp_frame_facing_camera(hip_angle_deg: f64) -> Frame {
    let mut frame = situp_frame(hip_angle_deg);
    frame.set(
        PoseLandmark::LeftShoulder,
        Landmark::new(0.4, 0.4, 0.0, 0.95),
    );
    frame.set(
        PoseLandmark::RightShoulder,
        Landmark::new(0.6, 0.4, 0.0, 0.95),
    );
    frame
}

/// Seated profile frame with the fingertip `reach_cm` past the foot
///
/// Hip at x=0.3 and foot tip at x=0.7 with the user height of
/// [`REACH_HEIGHT_CM`], so the fingertip sits at `0.7 + reach_cm / 100`.
pub fn reach_frame(reach_cm: f64) -> Frame {
    let hand_x = 0.7 + reach_cm / REACH_HEIGHT_CM;
    Frame::empty()
        .with(
            PoseLandmark::LeftShoulder,
            Landmark::new(0.4, 0.4, -0.2, 0.95),
        )
        .with(
            PoseLandmark::RightShoulder,
            Landmark::new(0.4, 0.4, 0.2, 0.9),
        )
        .with(PoseLandmark::LeftElbow, visible(0.45, 0.5))
        .with(PoseLandmark::LeftWrist, visible(hand_x - 0.02, 0.6))
        .with(PoseLandmark::LeftIndex, visible(hand_x, 0.6))
        .with(PoseLandmark::LeftHip, visible(0.3, 0.7))
        .with(PoseLandmark::LeftKnee, visible(0.5, 0.68))
        .with(PoseLandmark::LeftAnkle, visible(0.68, 0.7))
        .with(PoseLandmark::LeftFootIndex, visible(0.7, 0.66))
}

/// Reach frame with the body turned towards the camera
pub fn reach_frame_turned(reach_cm: f64) -> Frame {
    let mut frame = reach_frame(reach_cm);
    frame.set(
        PoseLandmark::LeftShoulder,
        Landmark::new(0.35, 0.4, 0.0, 0.95),
    );
    frame.set(
        PoseLandmark::RightShoulder,
        Landmark::new(0.55, 0.4, 0.0, 0.9),
    );
    frame
}

/// Serialize frames as JSON lines with timestamps `step_ms` apart
pub fn to_jsonl(frames: &[Frame], step_ms: u64) -> String {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            serde_json::json!({ "timestamp_ms": i as u64 * step_ms, "landmarks": frame })
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
