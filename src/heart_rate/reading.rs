// ABOUTME: Heart-rate relay payload parsing with tolerant field names
// ABOUTME: Accepts heart_rate, bpm, value or data.heart_rate plus an optional measured_at stamp
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::iter;

/// One heart-rate sample as reported by the relay
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeartRateReading {
    /// Reported beats per minute, possibly absent or invalid
    pub bpm: Option<f64>,
    /// When the relay says the sample was taken
    pub measured_at: Option<DateTime<Utc>>,
}

impl HeartRateReading {
    /// Reading carrying a value and no timestamp
    #[must_use]
    pub const fn from_bpm(bpm: f64) -> Self {
        Self {
            bpm: Some(bpm),
            measured_at: None,
        }
    }

    /// Parse a relay response body
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `body` is not JSON. A JSON body
    /// without a usable value is a reading with `bpm: None`.
    pub fn parse(body: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_json(&value))
    }

    /// Extract a reading from an already decoded payload
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let bpm = ["heart_rate", "bpm", "value"]
            .iter()
            .map(|key| value.get(*key))
            .chain(iter::once(
                value.get("data").and_then(|data| data.get("heart_rate")),
            ))
            .flatten()
            .find(|field| !field.is_null())
            .and_then(number);

        Self {
            bpm,
            measured_at: value.get("measured_at").and_then(timestamp),
        }
    }

    /// The value when it is finite and positive
    #[must_use]
    pub fn valid_bpm(&self) -> Option<f64> {
        self.bpm.filter(|bpm| bpm.is_finite() && *bpm > 0.0)
    }
}

/// Numbers, or strings holding a number
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// RFC 3339 strings or epoch milliseconds
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_precedence() {
        let reading = HeartRateReading::from_json(&json!({ "heart_rate": 120, "bpm": 90 }));
        assert_eq!(reading.bpm, Some(120.0));

        let reading = HeartRateReading::from_json(&json!({ "heart_rate": null, "bpm": 91 }));
        assert_eq!(reading.bpm, Some(91.0));

        let reading = HeartRateReading::from_json(&json!({ "value": "88" }));
        assert_eq!(reading.bpm, Some(88.0));

        let reading = HeartRateReading::from_json(&json!({ "data": { "heart_rate": 77 } }));
        assert_eq!(reading.bpm, Some(77.0));
    }

    #[test]
    fn test_null_and_invalid_values() {
        let reading = HeartRateReading::parse(r#"{ "heart_rate": null }"#).unwrap();
        assert_eq!(reading.bpm, None);

        let reading = HeartRateReading::from_json(&json!({ "bpm": 0 }));
        assert_eq!(reading.bpm, Some(0.0));
        assert_eq!(reading.valid_bpm(), None);

        assert!(HeartRateReading::parse("<html>").is_err());
    }

    #[test]
    fn test_measured_at_formats() {
        let reading = HeartRateReading::from_json(&json!({
            "heart_rate": 100,
            "measured_at": "2025-03-01T09:30:00Z"
        }));
        assert_eq!(
            reading.measured_at.unwrap().to_rfc3339(),
            "2025-03-01T09:30:00+00:00"
        );

        let reading =
            HeartRateReading::from_json(&json!({ "bpm": 100, "measured_at": 1_700_000_000_000_i64 }));
        assert_eq!(reading.measured_at.unwrap().timestamp(), 1_700_000_000);
    }
}
