//! One frame of the sun path diagram.

use crate::models::{SunInterval, Theme};
use chrono::{DateTime, Utc};
use std::f64::consts::PI;

use super::context::{DrawContext, Font, GradientStop, Paint, Point, Rect, Rgba, Stroke};
use super::sun_position::SunPosition;

const LABEL_FONT_FAMILY: &str = "Arial";
const TRACK_COLOR: Rgba = Rgba::rgb(0xFF, 0xD7, 0x00);

/// Layout of the arc inside a surface of a given CSS size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub radius: f64,
    pub center_x: f64,
    pub base_y: f64,
}

impl FrameGeometry {
    pub fn compute(width: u32, height: u32) -> Self {
        let width = width as f64;
        let height = height as f64;

        let padding = (width * 0.03).round().max(12.0);
        let max_radius_w = (width - padding * 2.0) / 2.0;
        let max_radius_h = (height - padding * 2.0) / 2.0;
        let radius = (max_radius_w.min(max_radius_h) * 0.88).floor().max(10.0);

        let center_x = width / 2.0;
        let base_y = (height / 2.0 + radius * 0.35).round();
        let base_y = (height - padding).min(base_y.max(padding + radius));

        Self {
            width,
            height,
            padding,
            radius,
            center_x,
            base_y,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.base_y)
    }

    pub fn sun_radius(&self) -> f64 {
        (self.radius * 0.12).round().max(6.0)
    }

    pub fn label_font_size(&self) -> f64 {
        (self.radius * 0.12).round().max(10.0)
    }

    pub fn sunrise_label_at(&self) -> Point {
        let x = (self.center_x - self.radius - 6.0).round().max(6.0);
        Point::new(x, self.base_y + 8.0)
    }

    pub fn sunset_label_at(&self) -> Point {
        let x = (self.center_x + self.radius - 30.0)
            .round()
            .min(self.width - 60.0);
        Point::new(x, self.base_y + 8.0)
    }
}

/// Theme-dependent colours
#[derive(Debug, Clone, PartialEq)]
pub struct FramePalette {
    pub sky: [GradientStop; 3],
    pub baseline: Rgba,
    pub sun_core: Rgba,
    pub sun_glow: Rgba,
    pub label: Rgba,
}

impl FramePalette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                sky: [
                    GradientStop::new(0.0, Rgba::rgb(0x87, 0xCE, 0xFA)),
                    GradientStop::new(0.7, Rgba::rgb(0xB0, 0xE0, 0xE6)),
                    GradientStop::new(1.0, Rgba::rgb(0xFF, 0xFA, 0xCD)),
                ],
                baseline: Rgba::rgb(0x88, 0x88, 0x88),
                sun_core: Rgba::rgb(0xFF, 0xFA, 0xCD),
                sun_glow: Rgba::rgba(255, 215, 0, 0.35),
                label: Rgba::rgb(0x33, 0x33, 0x33),
            },
            Theme::Dark => Self {
                sky: [
                    GradientStop::new(0.0, Rgba::rgb(0x1A, 0x2A, 0x35)),
                    GradientStop::new(0.7, Rgba::rgb(0x22, 0x33, 0x40)),
                    GradientStop::new(1.0, Rgba::rgb(0x44, 0x55, 0x66)),
                ],
                baseline: Rgba::rgb(0xBB, 0xBB, 0xBB),
                sun_core: Rgba::rgb(0xFF, 0xE0, 0x66),
                sun_glow: Rgba::rgba(255, 165, 0, 0.35),
                label: Rgba::rgb(0xEE, 0xEE, 0xEE),
            },
        }
    }
}

/// What was drawn, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub geometry: FrameGeometry,
    pub position: SunPosition,
    pub sun: Point,
}

/// Draw a complete frame onto a prepared context of `width` x `height` CSS pixels.
pub fn draw_frame<C: DrawContext + ?Sized>(
    ctx: &mut C,
    width: u32,
    height: u32,
    interval: &SunInterval,
    now: DateTime<Utc>,
    theme: Theme,
) -> FrameReport {
    let geometry = FrameGeometry::compute(width, height);
    let palette = FramePalette::for_theme(theme);
    let full = Rect::new(0.0, 0.0, geometry.width, geometry.height);

    ctx.clear_rect(full);
    ctx.fill_rect(
        full,
        &Paint::Linear {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, geometry.height),
            stops: palette.sky.to_vec(),
        },
    );

    ctx.stroke_line(
        Point::new(geometry.padding, geometry.base_y),
        Point::new(geometry.width - geometry.padding, geometry.base_y),
        Stroke {
            width: 2.0,
            color: palette.baseline,
        },
    );

    ctx.stroke_arc(
        geometry.center(),
        geometry.radius,
        PI,
        0.0,
        Stroke {
            width: 3.0,
            color: TRACK_COLOR,
        },
    );

    let position = SunPosition::at(interval, now);
    let sun = position.point(geometry.center(), geometry.radius);
    let sun_radius = geometry.sun_radius();
    ctx.fill_circle(
        sun,
        sun_radius,
        &Paint::Radial {
            center: sun,
            inner_radius: (sun_radius * 0.2).max(1.0),
            outer_radius: sun_radius * 2.0,
            stops: vec![
                GradientStop::new(0.0, palette.sun_core),
                GradientStop::new(1.0, palette.sun_glow),
            ],
        },
    );

    let font = Font {
        size_px: geometry.label_font_size(),
        family: LABEL_FONT_FAMILY.to_string(),
    };
    ctx.fill_text("Sunrise", geometry.sunrise_label_at(), &font, palette.label);
    ctx.fill_text("Sunset", geometry.sunset_label_at(), &font, palette.label);

    FrameReport {
        geometry,
        position,
        sun,
    }
}
