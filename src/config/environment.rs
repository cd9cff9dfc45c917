// ABOUTME: Environment variable overrides for measurement and heart-rate feed settings
// ABOUTME: Reads PIERRE_MEASURE_* and PIERRE_HEART_RATE_* variables over a base configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::MeasureConfig;
use crate::errors::{AppError, AppResult};
use crate::orchestrator::HeartRateMode;
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Path of an optional JSON config file
pub const CONFIG_FILE_VAR: &str = "PIERRE_MEASURE_CONFIG_FILE";
/// User height in centimeters
pub const USER_HEIGHT_VAR: &str = "PIERRE_MEASURE_USER_HEIGHT_CM";
/// Sit-up countdown length
pub const SITUP_COUNTDOWN_VAR: &str = "PIERRE_MEASURE_SITUP_COUNTDOWN_MS";
/// Sit-up inactivity timeout
pub const SITUP_INACTIVITY_VAR: &str = "PIERRE_MEASURE_SITUP_INACTIVITY_MS";
/// Sit-and-reach hold length in seconds
pub const REACH_HOLD_SEC_VAR: &str = "PIERRE_MEASURE_REACH_HOLD_SEC";
/// Sit-and-reach nominal frame rate
pub const REACH_FPS_VAR: &str = "PIERRE_MEASURE_REACH_FPS";
/// Sit-and-reach hold tolerance
pub const REACH_TOLERANCE_VAR: &str = "PIERRE_MEASURE_REACH_TOLERANCE_CM";
/// Step test heart-rate mode, `automatic` or `manual`
pub const STEP_MODE_VAR: &str = "PIERRE_MEASURE_STEP_MODE";
/// Step test stepping length
pub const STEP_STEPPING_SEC_VAR: &str = "PIERRE_MEASURE_STEP_STEPPING_SEC";
/// Step test recovery length
pub const STEP_RECOVERY_SEC_VAR: &str = "PIERRE_MEASURE_STEP_RECOVERY_SEC";
/// Heart-rate feed endpoint
pub const HEART_RATE_URL_VAR: &str = "PIERRE_HEART_RATE_URL";
/// Heart-rate poll interval
pub const HEART_RATE_POLL_VAR: &str = "PIERRE_HEART_RATE_POLL_INTERVAL_MS";
/// Heart-rate request timeout
pub const HEART_RATE_TIMEOUT_VAR: &str = "PIERRE_HEART_RATE_TIMEOUT_MS";
/// Consecutive failures before a connectivity warning
pub const HEART_RATE_FAILURES_VAR: &str = "PIERRE_HEART_RATE_FAILURE_THRESHOLD";

impl MeasureConfig {
    /// Defaults with environment overrides
    ///
    /// # Errors
    ///
    /// Returns a config error for an unparsable variable or an invalid result.
    pub fn from_env() -> AppResult<Self> {
        Self::from_env_over(Self::default())
    }

    /// Apply environment overrides on top of `base`
    ///
    /// # Errors
    ///
    /// Returns a config error for an unparsable variable or an invalid result.
    pub fn from_env_over(mut base: Self) -> AppResult<Self> {
        parse_env(USER_HEIGHT_VAR, &mut base.user.height_cm)?;

        parse_env(SITUP_COUNTDOWN_VAR, &mut base.situp.countdown_ms)?;
        parse_env(SITUP_INACTIVITY_VAR, &mut base.situp.inactivity_ms)?;

        parse_env(REACH_HOLD_SEC_VAR, &mut base.sit_and_reach.peak_hold.need_sec)?;
        parse_env(REACH_FPS_VAR, &mut base.sit_and_reach.peak_hold.fps)?;
        parse_env(REACH_TOLERANCE_VAR, &mut base.sit_and_reach.peak_hold.tol_cm)?;

        if let Ok(mode) = env::var(STEP_MODE_VAR) {
            base.step_test.mode = parse_mode(&mode)?;
        }
        parse_env(STEP_STEPPING_SEC_VAR, &mut base.step_test.stepping_sec)?;
        parse_env(STEP_RECOVERY_SEC_VAR, &mut base.step_test.recovery_sec)?;

        if let Ok(url) = env::var(HEART_RATE_URL_VAR) {
            base.heart_rate.url = url;
        }
        parse_env(HEART_RATE_POLL_VAR, &mut base.heart_rate.poll_interval_ms)?;
        parse_env(HEART_RATE_TIMEOUT_VAR, &mut base.heart_rate.request_timeout_ms)?;
        parse_env(
            HEART_RATE_FAILURES_VAR,
            &mut base.heart_rate.failure_warning_threshold,
        )?;

        base.sync_user_height();
        base.validate()?;
        Ok(base)
    }
}

fn parse_mode(value: &str) -> AppResult<HeartRateMode> {
    match value.to_lowercase().as_str() {
        "automatic" | "auto" => Ok(HeartRateMode::Automatic),
        "manual" => Ok(HeartRateMode::Manual),
        other => Err(AppError::config(format!(
            "{STEP_MODE_VAR} must be automatic or manual, got {other}"
        ))),
    }
}

/// Parse an environment variable into `target` when set
fn parse_env<T: FromStr>(key: &str, target: &mut T) -> AppResult<()> {
    let Ok(raw) = env::var(key) else {
        return Ok(());
    };
    *target = raw
        .trim()
        .parse()
        .map_err(|_| AppError::config(format!("invalid value for {key}: {raw}")))?;
    debug!(key, "Applied environment override");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("Manual").unwrap(), HeartRateMode::Manual);
        assert_eq!(parse_mode("auto").unwrap(), HeartRateMode::Automatic);
        assert!(parse_mode("chest-strap").is_err());
    }
}
