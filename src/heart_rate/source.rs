// ABOUTME: Heart-rate source abstraction and the HTTP relay client implementation
// ABOUTME: One fetch per call; failures surface as AppError values for the tracker to absorb
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::reading::HeartRateReading;
use crate::config::HeartRateFeedConfig;
use crate::errors::{heart_rate_feed_error, AppError, AppResult};
use async_trait::async_trait;
use pierre_measure_core::constants::service_names;
use reqwest::Client;
use tracing::debug;

/// Anything that can produce the latest heart-rate reading
#[async_trait]
pub trait HeartRateSource: Send + Sync {
    /// Fetch the latest reading
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be reached or its answer
    /// cannot be decoded.
    async fn fetch(&self) -> AppResult<HeartRateReading>;
}

/// Client for the local heart-rate relay
#[derive(Debug, Clone)]
pub struct HttpHeartRateSource {
    config: HeartRateFeedConfig,
    client: Client,
}

impl HttpHeartRateSource {
    /// Create a client with the configured request timeout
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` fails validation.
    pub fn new(config: HeartRateFeedConfig) -> AppResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_default();

        Ok(Self { config, client })
    }

    /// Endpoint being polled
    #[must_use]
    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl HeartRateSource for HttpHeartRateSource {
    async fn fetch(&self) -> AppResult<HeartRateReading> {
        let response = self
            .client
            .get(&self.config.url)
            .header("cache-control", "no-store")
            .send()
            .await
            .map_err(heart_rate_feed_error)?;

        let status = response.status();
        let text = response.text().await.map_err(heart_rate_feed_error)?;

        if !status.is_success() {
            return Err(AppError::external_service(
                service_names::HEART_RATE_FEED,
                format!("relay answered {status}"),
            )
            .with_details(serde_json::json!({
                "service": service_names::HEART_RATE_FEED,
                "status_code": status.as_u16(),
                "retryable": status.is_server_error(),
            })));
        }

        let reading = HeartRateReading::parse(&text)?;
        debug!(bpm = ?reading.bpm, "heart-rate relay reading");
        Ok(reading)
    }
}
