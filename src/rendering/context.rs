//! 2D drawing primitives.
//!
//! All coordinates are in CSS pixels. The device pixel ratio is applied once
//! through [`DrawContext::set_scale`] when the surface is prepared.

/// sRGB colour with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, ignoring alpha
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(offset: f64, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Fill style, modelled on the canvas 2D API
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Gradient along the line `from -> to`
    Linear {
        from: Point,
        to: Point,
        stops: Vec<GradientStop>,
    },
    /// Concentric radial gradient between two circles sharing `center`
    Radial {
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        stops: Vec<GradientStop>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size_px: f64,
    pub family: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Immediate-mode drawing context.
///
/// Angles are radians measured clockwise from the positive x axis, since the
/// y axis points down.
pub trait DrawContext {
    /// Replace the current transform with a uniform scale
    fn set_scale(&mut self, ratio: f64);

    fn clear_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke);

    /// Stroke the circular arc from `start` to `end`, sweeping clockwise
    fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, end: f64, stroke: Stroke);

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint);

    /// Draw text with its top-left corner at `at`
    fn fill_text(&mut self, text: &str, at: Point, font: &Font, color: Rgba);
}
