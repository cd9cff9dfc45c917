// ABOUTME: Main library entry point for the Pierre pose-based fitness measurement engine
// ABOUTME: Frame orchestrators, session results, heart-rate feed, configuration and replay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Measure
//!
//! Turns a stream of pose landmarks into fitness test results: sit-up
//! repetitions, sit-and-reach distance, and a step-test recovery score from
//! a heart-rate relay.
//!
//! ## Architecture
//!
//! - **`pierre-measure-core`**: errors, constants and landmark models
//! - **`pierre-measure-algorithms`**: pure per-frame state machines
//! - **Orchestrator**: one run per test, framing gate, countdown and completion
//! - **Heart rate**: relay client, last-valid tracker and poller
//! - **Replay**: recorded frame files fed through an orchestrator
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_measure::config::MeasureConfig;
//! use pierre_measure::errors::AppResult;
//! use pierre_measure::orchestrator::SitupOrchestrator;
//! use pierre_measure::models::Frame;
//!
//! fn main() -> AppResult<()> {
//!     let config = MeasureConfig::from_env()?;
//!     let mut run = SitupOrchestrator::new(config.situp)?;
//!     let out = run.push(&Frame::empty(), 0);
//!     println!("phase={} reps={}", out.phase, out.reps);
//!     Ok(())
//! }
//! ```

/// Configuration loading and validation
pub mod config;

/// Error types and HTTP error mapping
pub mod errors;

/// Heart-rate relay adapter
pub mod heart_rate;

/// Structured logging setup
pub mod logging;

/// Per-test frame orchestrators
pub mod orchestrator;

/// Recorded frame replay
pub mod replay;

/// Measurement results
pub mod session;

pub use pierre_measure_algorithms as algorithms;
pub use pierre_measure_core::{constants, models};
