// ABOUTME: Core data models for pose landmarks, body parts, tests, and per-frame issues
// ABOUTME: Re-exports the landmark, body, test, and issue types used across the workspace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Data models
//!
//! The pose model delivers one [`Frame`] per tick: up to
//! [`PoseLandmark::COUNT`] optional [`Landmark`]s in the fixed 33-point body
//! order. Consumers never mutate a frame, they only read it.

mod body;
mod issue;
mod landmark;
mod test_kind;

pub use body::{BodyPart, PoseLandmark, Side};
pub use issue::FrameIssue;
pub use landmark::{Frame, Landmark};
pub use test_kind::FitnessTest;
