use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sunrise/sunset pair driving the sun arc.
///
/// No ordering is enforced. A sunset at or before sunrise is treated as
/// wrapping across midnight by the position model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunInterval {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl SunInterval {
    pub fn new(sunrise: DateTime<Utc>, sunset: DateTime<Utc>) -> Self {
        Self { sunrise, sunset }
    }

    /// Build from Unix seconds, as delivered by the weather API.
    ///
    /// Returns `None` if either timestamp is outside chrono's range.
    pub fn from_unix(sunrise: i64, sunset: i64) -> Option<Self> {
        Some(Self {
            sunrise: DateTime::from_timestamp(sunrise, 0)?,
            sunset: DateTime::from_timestamp(sunset, 0)?,
        })
    }

    /// Solar noon approximation: midpoint of sunrise and sunset, rounded to
    /// the nearest second.
    pub fn noon_unix(&self) -> i64 {
        let sum = self.sunrise.timestamp() as f64 + self.sunset.timestamp() as f64;
        (sum / 2.0).round() as i64
    }

    /// Raw `sunset - sunrise` in milliseconds, before any wrap correction.
    pub fn raw_duration_ms(&self) -> i64 {
        (self.sunset - self.sunrise).num_milliseconds()
    }
}
