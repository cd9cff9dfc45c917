// ABOUTME: Error types for the measurement application layer
// ABOUTME: Re-exports the unified AppError and adds conversions for the HTTP client stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Errors
//!
//! The unified error type lives in `pierre-measure-core` so the algorithm
//! crate can share it. This module re-exports it and maps failures of the
//! heart-rate HTTP client onto error codes.

pub use pierre_measure_core::errors::{AppError, AppResult, ErrorCode};

use pierre_measure_core::constants::service_names;

/// Map a `reqwest` failure onto an `AppError` for the named service
///
/// Timeouts and connection failures mean the service could not be reached.
/// Undecodable bodies are serialization errors; anything else is a service error.
#[must_use]
pub fn from_http_error(service: &str, error: reqwest::Error) -> AppError {
    let message = error.to_string();
    if error.is_timeout() || error.is_connect() || error.is_request() {
        AppError::unavailable(service, message).with_source(error)
    } else if error.is_decode() {
        AppError::serialization(format!("{service}: {message}")).with_source(error)
    } else {
        AppError::external_service(service, message).with_source(error)
    }
}

/// Map a heart-rate feed HTTP failure
#[must_use]
pub fn heart_rate_feed_error(error: reqwest::Error) -> AppError {
    from_http_error(service_names::HEART_RATE_FEED, error)
}
