//! Where the sun sits on the arc at a given instant.
//!
//! Pure functions of the interval and the current time; nothing is carried
//! between frames.

use crate::models::SunInterval;
use chrono::{DateTime, Utc};
use std::f64::consts::PI;

use super::context::Point;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Normalized progress through the interval and the matching arc angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// 0 at sunrise, 1 at sunset
    pub progress: f64,
    /// π at sunrise (left end), 0 at sunset (right end)
    pub angle: f64,
}

impl SunPosition {
    pub fn at(interval: &SunInterval, now: DateTime<Utc>) -> Self {
        let progress = progress(interval, now);
        Self {
            progress,
            angle: angle(progress),
        }
    }

    /// Point on an arc centred at `center` with the given radius
    pub fn point(&self, center: Point, radius: f64) -> Point {
        position(center, radius, self.angle)
    }
}

/// Daylight length in milliseconds, wrapped by one day when non-positive
pub fn duration_ms(interval: &SunInterval) -> i64 {
    let duration = interval.raw_duration_ms();
    if duration <= 0 {
        duration + DAY_MS
    } else {
        duration
    }
}

/// Time since sunrise in milliseconds, wrapped by one day when negative and
/// clamped into `[0, duration]`.
///
/// A clock running behind sunrise wraps to late in the day and clamps to the
/// sunset end.
pub fn elapsed_ms(interval: &SunInterval, now: DateTime<Utc>) -> i64 {
    let duration = duration_ms(interval);
    let mut elapsed = (now - interval.sunrise).num_milliseconds();
    if elapsed < 0 {
        elapsed += DAY_MS;
    }
    elapsed.clamp(0, duration.max(0))
}

/// Fraction of the interval that has passed, in `[0, 1]`
pub fn progress(interval: &SunInterval, now: DateTime<Utc>) -> f64 {
    let duration = duration_ms(interval);
    if duration <= 0 {
        return 0.0;
    }
    elapsed_ms(interval, now) as f64 / duration as f64
}

pub fn angle(progress: f64) -> f64 {
    PI * (1.0 - progress)
}

pub fn position(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y - radius * angle.sin(),
    )
}
