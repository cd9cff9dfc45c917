// ABOUTME: Core types and constants for the Pierre pose measurement engine
// ABOUTME: Foundation crate with error handling, landmark models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Measure Core
//!
//! Foundation crate providing the shared types used by the measurement
//! algorithms and the per-test orchestrators. It is designed to change
//! infrequently so the algorithm and orchestration crates compile
//! incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Tunable defaults organized by measurement domain
//! - **models**: Landmarks, frames, body sides, test kinds and frame issues

/// Unified error handling system with standard error codes
pub mod errors;

/// Measurement constants organized by domain
pub mod constants;

/// Pose landmark and frame models
pub mod models;
