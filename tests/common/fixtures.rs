//! Test fixtures and constants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use sunpath::models::SunInterval;
use sunpath::rendering::{SvgCanvas, SvgRenderer};

/// Manila coordinates, the default location
pub const MANILA: (f64, f64) = (14.5995, 120.9842);

/// 2024-06-15 05:28:00 +08:00 as Unix seconds
pub const MANILA_SUNRISE: i64 = 1_718_400_480;

/// 2024-06-15 18:26:00 +08:00 as Unix seconds
pub const MANILA_SUNSET: i64 = 1_718_447_160;

pub const MANILA_TZ: i64 = 8 * 3600;

pub fn sunrise() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 5, 0, 0).unwrap()
}

/// Interval of the given length starting at [`sunrise`]
pub fn daylight(hours: i64) -> SunInterval {
    SunInterval::new(sunrise(), sunrise() + Duration::hours(hours))
}

/// Canvas with no extra fonts loaded
pub fn canvas(width: f64, height: f64, ratio: f64) -> SvgCanvas {
    SvgCanvas::new(width, height, ratio, Arc::new(SvgRenderer::with_fonts(Vec::new())))
}

/// Body of a successful OpenWeather current-weather response
pub fn weather_body(sunrise: i64, sunset: i64, timezone: i64) -> serde_json::Value {
    json!({
        "coord": { "lon": MANILA.1, "lat": MANILA.0 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "main": { "temp": 303.2, "humidity": 70 },
        "dt": sunrise + 3600,
        "sys": { "type": 1, "id": 7993, "country": "PH", "sunrise": sunrise, "sunset": sunset },
        "timezone": timezone,
        "name": "Manila",
        "cod": 200
    })
}
