// ABOUTME: Configuration aggregate for the measurement application and the heart-rate feed
// ABOUTME: Loads from a JSON file or environment variables over defaults and validates once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for Pierre Measure
//!
//! - **User profile**: body height used to scale reach distances
//! - **Sessions**: one config per fitness test orchestrator
//! - **Heart-rate feed**: endpoint, polling cadence and failure policy
//!
//! Every value has a default. [`MeasureConfig::load`] layers an optional
//! JSON file named by `PIERRE_MEASURE_CONFIG_FILE` under environment
//! overrides, then validates the result.

/// Environment variable overrides
pub mod environment;

use crate::errors::{AppError, AppResult};
use crate::orchestrator::{SitAndReachSessionConfig, SitupSessionConfig, StepTestConfig};
use pierre_measure_core::constants::{heart_rate, reach};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};
use std::time::Duration;
use tracing::info;

/// Measured user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Body height in centimeters
    #[serde(default = "default_height_cm")]
    pub height_cm: f64,
}

const fn default_height_cm() -> f64 {
    reach::DEFAULT_USER_HEIGHT_CM
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            height_cm: default_height_cm(),
        }
    }
}

/// Heart-rate relay endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateFeedConfig {
    /// Endpoint returning the latest reading as JSON
    #[serde(default = "default_feed_url")]
    pub url: String,
    /// Time between polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Per-request timeout
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Consecutive failures before a connectivity warning
    #[serde(default = "default_failure_warning_threshold")]
    pub failure_warning_threshold: u32,
}

fn default_feed_url() -> String {
    heart_rate::DEFAULT_FEED_URL.to_owned()
}

const fn default_poll_interval_ms() -> u64 {
    heart_rate::POLL_INTERVAL_MS
}

const fn default_request_timeout_ms() -> u64 {
    heart_rate::REQUEST_TIMEOUT_MS
}

const fn default_failure_warning_threshold() -> u32 {
    heart_rate::FAILURE_WARNING_THRESHOLD
}

impl Default for HeartRateFeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            failure_warning_threshold: default_failure_warning_threshold(),
        }
    }
}

impl HeartRateFeedConfig {
    /// Feed at `url` with default timing
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Poll interval as a duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as a duration
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate feed settings
    ///
    /// # Errors
    ///
    /// Returns a config error for a non-http URL or zero timing values.
    pub fn validate(&self) -> AppResult<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(AppError::config(format!(
                "heart-rate feed url must be http(s): {}",
                self.url
            )));
        }
        if self.poll_interval_ms == 0 || self.request_timeout_ms == 0 {
            return Err(AppError::config(
                "heart-rate poll interval and timeout must be positive",
            ));
        }
        if self.failure_warning_threshold == 0 {
            return Err(AppError::config(
                "heart-rate failure warning threshold must be positive",
            ));
        }
        Ok(())
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasureConfig {
    /// Measured user
    #[serde(default)]
    pub user: UserProfile,
    /// Sit-up run settings
    #[serde(default)]
    pub situp: SitupSessionConfig,
    /// Sit-and-reach run settings; reach height follows `user`
    #[serde(default)]
    pub sit_and_reach: SitAndReachSessionConfig,
    /// Step test protocol
    #[serde(default)]
    pub step_test: StepTestConfig,
    /// Heart-rate relay
    #[serde(default)]
    pub heart_rate: HeartRateFeedConfig,
}

impl MeasureConfig {
    /// Parse a JSON document; missing fields take defaults
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON, or the first
    /// validation error.
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.sync_user_height();
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON file
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::storage(format!("cannot read config {}: {e}", path.display()))
                .with_source(e)
        })?;
        let config = Self::from_json_str(&json)?;
        info!(path = %path.display(), "Loaded measurement config file");
        Ok(config)
    }

    /// Optional config file, then environment overrides
    ///
    /// # Errors
    ///
    /// Returns any file, parse, override or validation error.
    pub fn load() -> AppResult<Self> {
        let base = match env::var(environment::CONFIG_FILE_VAR) {
            Ok(path) => Self::from_json_file(path)?,
            Err(_) => Self::default(),
        };
        Self::from_env_over(base)
    }

    /// Copy the profile height into the reach estimator
    pub fn sync_user_height(&mut self) {
        self.sit_and_reach.reach.user_height_cm = self.user.height_cm;
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first section error.
    pub fn validate(&self) -> AppResult<()> {
        if !self.user.height_cm.is_finite() || self.user.height_cm <= 0.0 {
            return Err(AppError::config(format!(
                "user height {} must be positive",
                self.user.height_cm
            )));
        }
        self.situp.validate()?;
        self.sit_and_reach.validate()?;
        self.step_test.validate()?;
        self.heart_rate.validate()
    }
}
