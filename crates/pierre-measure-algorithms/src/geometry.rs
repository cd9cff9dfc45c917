// ABOUTME: Geometry helpers for pose landmarks: 3-point joint angle, camera yaw, clamping
// ABOUTME: Degenerate or missing input yields NaN or a guarded value, never a panic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_measure_core::constants::geometry::{EPSILON, YAW_SHOULDER_VISIBILITY_SUM};
use pierre_measure_core::models::{Frame, Landmark, PoseLandmark};

/// Bound `value` to `[lo, hi]`; NaN passes through unchanged
#[must_use]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Angle at vertex `b` between rays to `a` and `c`, in degrees within `[0, 180]`
///
/// Uses the (x, y) projection only. Zero-length rays are treated as length
/// `EPSILON` so coincident points return a finite angle.
#[must_use]
pub fn angle_deg(a: &Landmark, b: &Landmark, c: &Landmark) -> f64 {
    let (abx, aby) = (a.x - b.x, a.y - b.y);
    let (cbx, cby) = (c.x - b.x, c.y - b.y);
    let dot = abx.mul_add(cbx, aby * cby);
    let mag_ab = nonzero(abx.hypot(aby));
    let mag_cb = nonzero(cbx.hypot(cby));
    let cos = clamp(dot / (mag_ab * mag_cb), -1.0, 1.0);
    cos.acos().to_degrees()
}

fn nonzero(magnitude: f64) -> f64 {
    if magnitude > 0.0 {
        magnitude
    } else {
        EPSILON
    }
}

/// Camera-relative body rotation in degrees, NaN when indeterminate
///
/// Prefers the shoulder pair when both shoulders are present with combined
/// visibility of at least 0.8; otherwise falls back to the hips. 0° is facing
/// the camera and 90° is full profile.
#[must_use]
pub fn estimate_yaw_deg(frame: &Frame) -> f64 {
    let shoulders = pair(frame, PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder);
    let chosen = match shoulders {
        Some((l, r)) if l.visibility + r.visibility >= YAW_SHOULDER_VISIBILITY_SUM => Some((l, r)),
        _ => pair(frame, PoseLandmark::LeftHip, PoseLandmark::RightHip),
    };

    chosen.map_or(f64::NAN, |(l, r)| {
        let dx = (l.x - r.x).abs().max(EPSILON);
        let dz = (l.z - r.z).abs();
        dz.atan2(dx).to_degrees()
    })
}

fn pair(frame: &Frame, left: PoseLandmark, right: PoseLandmark) -> Option<(&Landmark, &Landmark)> {
    Some((frame.get(left)?, frame.get(right)?))
}
