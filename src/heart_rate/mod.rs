// ABOUTME: Heart-rate feed adapter for the step test
// ABOUTME: Relay payload parsing, source trait with HTTP client, last-valid tracker and poller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Heart-Rate Feed
//!
//! The step test reads heart rate opportunistically from a local relay. The
//! feed is polled on its own timer; a missing, null or non-positive value
//! is "no reading this tick", and a fetch failure only increments a failure
//! counter. The last valid value is kept in both cases so scoring keeps
//! working on stale data.

/// Relay payload parsing
pub mod reading;
/// Source trait and HTTP client
pub mod source;
/// Last-valid-value tracker
pub mod tracker;
/// Background polling task
pub mod poller;

pub use poller::HeartRatePoller;
pub use reading::HeartRateReading;
pub use source::{HeartRateSource, HttpHeartRateSource};
pub use tracker::{HeartRateSnapshot, LastValidHeartRate};
