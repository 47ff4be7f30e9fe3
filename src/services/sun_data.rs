//! Sunrise/sunset lookup via the OpenWeather current-weather endpoint.

use crate::error::SunDataError;
use crate::models::{LocationConfig, OpenWeatherConfig, SunInterval};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Sun times for one location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunReport {
    pub interval: SunInterval,
    /// Seconds east of UTC used for display
    pub timezone_offset_secs: i64,
}

impl SunReport {
    pub fn sunrise_local(&self) -> String {
        format_local(self.interval.sunrise.timestamp(), self.timezone_offset_secs)
    }

    pub fn noon_local(&self) -> String {
        format_local(self.interval.noon_unix(), self.timezone_offset_secs)
    }

    pub fn sunset_local(&self) -> String {
        format_local(self.interval.sunset.timestamp(), self.timezone_offset_secs)
    }

    /// One-line summary for the info text under the diagram
    pub fn summary(&self) -> String {
        format!(
            "Sunrise: {} | Noon: {} | Sunset: {}",
            self.sunrise_local(),
            self.noon_local(),
            self.sunset_local()
        )
    }
}

/// 12-hour wall clock time (`h:mm AM`) at `offset_secs` east of UTC
pub fn format_local(utc_secs: i64, offset_secs: i64) -> String {
    match DateTime::from_timestamp(utc_secs.saturating_add(offset_secs), 0) {
        Some(local) => local.format("%-I:%M %p").to_string(),
        None => "--:--".to_string(),
    }
}

/// Supplier of sunrise/sunset data
#[async_trait]
pub trait SunDataSource: Send + Sync {
    async fn fetch(&self, location: &LocationConfig) -> Result<SunReport, SunDataError>;
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    sys: Option<SysTimes>,
    timezone: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SysTimes {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// OpenWeather client. One attempt per call, no retries.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, SunDataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &OpenWeatherConfig) -> Result<Self, SunDataError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(SunDataError::MissingApiKey)?;
        Self::new(config.base_url.as_str(), api_key)
    }
}

#[async_trait]
impl SunDataSource for OpenWeatherClient {
    async fn fetch(&self, location: &LocationConfig) -> Result<SunReport, SunDataError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(lat = location.lat, lon = location.lon, "Fetching sun data");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            tracing::warn!(status = status.as_u16(), %message, "Sun data request failed");
            return Err(SunDataError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let weather: CurrentWeather = serde_json::from_str(&body)?;
        let sys = weather.sys.ok_or(SunDataError::MissingSys)?;
        let interval =
            SunInterval::from_unix(sys.sunrise, sys.sunset).ok_or(SunDataError::MissingSys)?;

        let timezone_offset_secs = if location.timezone_offset != 0 {
            location.timezone_offset
        } else {
            weather.timezone.unwrap_or(0)
        };

        let report = SunReport {
            interval,
            timezone_offset_secs,
        };
        tracing::info!(
            sunrise = sys.sunrise,
            sunset = sys.sunset,
            timezone_offset_secs,
            "Fetched sun data"
        );
        Ok(report)
    }
}
