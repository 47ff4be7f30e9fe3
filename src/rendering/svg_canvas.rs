//! Raster drawing surface backed by a tiny-skia pixmap.
//!
//! Draw calls are recorded as SVG elements in CSS pixel units and rasterized
//! into the backing pixmap on [`SvgCanvas::present`].

use crate::error::RenderError;
use std::f64::consts::TAU;
use std::fmt::Write as _;
use std::sync::Arc;
use tiny_skia::Pixmap;

use super::context::{DrawContext, Font, GradientStop, Paint, Point, Rect, Rgba, Stroke};
use super::surface::{CssBox, DrawingSurface, SurfaceState};
use super::svg_to_png::{encode_png, SvgRenderer};

pub struct SvgCanvas {
    renderer: Arc<SvgRenderer>,
    rect: CssBox,
    ratio: f64,
    layout_size: Option<(u32, u32)>,
    surface_state: Option<SurfaceState>,
    backing: Option<Pixmap>,
    backing_generation: u64,
    scale: f64,
    defs: String,
    body: String,
    next_gradient_id: u32,
}

impl SvgCanvas {
    /// Canvas with the given CSS box and pixel ratio. No pixel buffer is
    /// allocated until the surface is first prepared.
    pub fn new(width: f64, height: f64, ratio: f64, renderer: Arc<SvgRenderer>) -> Self {
        Self {
            renderer,
            rect: CssBox::new(width, height),
            ratio,
            layout_size: None,
            surface_state: None,
            backing: None,
            backing_generation: 0,
            scale: 1.0,
            defs: String::new(),
            body: String::new(),
            next_gradient_id: 0,
        }
    }

    /// Simulate the element being laid out at a new size
    pub fn set_bounding_box(&mut self, width: f64, height: f64) {
        self.rect = CssBox::new(width, height);
    }

    /// Simulate moving to a display with a different density
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.ratio = ratio;
    }

    pub fn layout_size(&self) -> Option<(u32, u32)> {
        self.layout_size
    }

    /// Number of times the backing buffer was reallocated
    pub fn backing_generation(&self) -> u64 {
        self.backing_generation
    }

    pub fn backing(&self) -> Option<&Pixmap> {
        self.backing.as_ref()
    }

    /// SVG document for the recorded frame, sized to the backing buffer
    pub fn to_svg(&self) -> Option<String> {
        let backing = self.backing.as_ref()?;
        let (w, h) = (backing.width(), backing.height());
        Some(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{}</defs><g transform="scale({})">{}</g></svg>"#,
            self.defs,
            Num(self.scale),
            self.body
        ))
    }

    /// Rasterize the recorded frame into the backing pixmap.
    ///
    /// Does nothing before the first resize.
    pub fn present(&mut self) -> Result<(), RenderError> {
        let Some(svg) = self.to_svg() else {
            return Ok(());
        };
        if let Some(backing) = self.backing.as_mut() {
            self.renderer.rasterize_into(svg.as_bytes(), backing)?;
        }
        Ok(())
    }

    /// Present and encode the backing buffer as PNG
    pub fn snapshot_png(&mut self) -> Result<Vec<u8>, RenderError> {
        self.present()?;
        let backing = self.backing.as_ref().ok_or(RenderError::PixmapAllocation)?;
        encode_png(backing)
    }

    /// Detach the recorded frame so it can be rasterized off the caller's thread.
    ///
    /// The canvas itself is left untouched.
    pub fn snapshot(&self) -> Result<Snapshot, RenderError> {
        let svg = self.to_svg().ok_or(RenderError::PixmapAllocation)?;
        let pixmap = self.backing.clone().ok_or(RenderError::PixmapAllocation)?;
        Ok(Snapshot {
            renderer: self.renderer.clone(),
            svg,
            pixmap,
        })
    }

    fn reset_frame(&mut self) {
        self.defs.clear();
        self.body.clear();
        self.next_gradient_id = 0;
    }

    /// Register a paint in `<defs>` if needed and return the fill attributes
    fn paint_attrs(&mut self, paint: &Paint) -> String {
        match paint {
            Paint::Solid(color) => fill_attrs(*color),
            Paint::Linear { from, to, stops } => {
                let id = self.gradient_id();
                let _ = write!(
                    self.defs,
                    r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">{}</linearGradient>"#,
                    Num(from.x),
                    Num(from.y),
                    Num(to.x),
                    Num(to.y),
                    stop_elements(stops.iter().copied())
                );
                format!(r#"fill="url(#{id})""#)
            }
            Paint::Radial {
                center,
                inner_radius,
                outer_radius,
                stops,
            } => {
                // Concentric gradients start at the inner circle: remap stop
                // offsets from [inner, outer] onto [0, 1] of the outer radius.
                let inner = if *outer_radius > 0.0 {
                    (inner_radius / outer_radius).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let remapped = stops.iter().map(|stop| {
                    GradientStop::new(inner + stop.offset * (1.0 - inner), stop.color)
                });
                let id = self.gradient_id();
                let _ = write!(
                    self.defs,
                    r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">{}</radialGradient>"#,
                    Num(center.x),
                    Num(center.y),
                    Num(*outer_radius),
                    stop_elements(remapped)
                );
                format!(r#"fill="url(#{id})""#)
            }
        }
    }

    fn gradient_id(&mut self) -> String {
        let id = format!("g{}", self.next_gradient_id);
        self.next_gradient_id += 1;
        id
    }
}

/// A frame copied out of an [`SvgCanvas`], ready to encode
pub struct Snapshot {
    renderer: Arc<SvgRenderer>,
    svg: String,
    pixmap: Pixmap,
}

impl Snapshot {
    /// Rasterize and encode as PNG. CPU-bound.
    pub fn encode_png(mut self) -> Result<Vec<u8>, RenderError> {
        self.renderer.rasterize_into(self.svg.as_bytes(), &mut self.pixmap)?;
        encode_png(&self.pixmap)
    }
}

impl DrawingSurface for SvgCanvas {
    type Context = Self;

    fn bounding_box(&self) -> CssBox {
        self.rect
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.ratio
    }

    fn set_layout_size(&mut self, width: u32, height: u32) {
        self.layout_size = Some((width, height));
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.backing = Pixmap::new(width, height);
        if self.backing.is_none() {
            tracing::warn!(width, height, "Failed to allocate backing pixmap");
        }
        self.backing_generation += 1;
        self.scale = 1.0;
        self.reset_frame();
    }

    fn context(&mut self) -> &mut Self {
        self
    }

    fn surface_state(&self) -> Option<SurfaceState> {
        self.surface_state
    }

    fn set_surface_state(&mut self, state: SurfaceState) {
        self.surface_state = Some(state);
    }
}

impl DrawContext for SvgCanvas {
    fn set_scale(&mut self, ratio: f64) {
        self.scale = ratio;
    }

    fn clear_rect(&mut self, rect: Rect) {
        let covers = match self.layout_size {
            Some((w, h)) => {
                rect.x <= 0.0 && rect.y <= 0.0 && rect.width >= w as f64 && rect.height >= h as f64
            }
            None => true,
        };
        if covers {
            self.reset_frame();
        } else {
            // Recorded elements cannot be partially erased.
            tracing::debug!(?rect, "Ignoring partial clear");
        }
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let fill = self.paint_attrs(paint);
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" {fill}/>"#,
            Num(rect.x),
            Num(rect.y),
            Num(rect.width),
            Num(rect.height)
        );
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        let _ = write!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
            Num(from.x),
            Num(from.y),
            Num(to.x),
            Num(to.y),
            stroke_attrs(stroke)
        );
    }

    fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, end: f64, stroke: Stroke) {
        let sweep = (end - start).rem_euclid(TAU);
        if sweep < 1e-9 {
            let _ = write!(
                self.body,
                r#"<circle cx="{}" cy="{}" r="{}" fill="none" {}/>"#,
                Num(center.x),
                Num(center.y),
                Num(radius),
                stroke_attrs(stroke)
            );
            return;
        }

        let from = Point::new(
            center.x + radius * start.cos(),
            center.y + radius * start.sin(),
        );
        let to = Point::new(center.x + radius * end.cos(), center.y + radius * end.sin());
        let large_arc = u8::from(sweep > std::f64::consts::PI);
        let r = Num(radius);
        let _ = write!(
            self.body,
            r#"<path d="M {} {} A {r} {r} 0 {large_arc} 1 {} {}" fill="none" {}/>"#,
            Num(from.x),
            Num(from.y),
            Num(to.x),
            Num(to.y),
            stroke_attrs(stroke)
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        let fill = self.paint_attrs(paint);
        let _ = write!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" {fill}/>"#,
            Num(center.x),
            Num(center.y),
            Num(radius)
        );
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &Font, color: Rgba) {
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}, sans-serif" font-size="{}" dominant-baseline="hanging" {}>{}</text>"#,
            Num(at.x),
            Num(at.y),
            escape_xml(&font.family),
            Num(font.size_px),
            fill_attrs(color),
            escape_xml(text)
        );
    }
}

/// Coordinate rounded to a thousandth of a CSS pixel
struct Num(f64);

impl std::fmt::Display for Num {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = (self.0 * 1000.0).round() / 1000.0;
        // avoid printing "-0"
        write!(f, "{}", if rounded == 0.0 { 0.0 } else { rounded })
    }
}

fn fill_attrs(color: Rgba) -> String {
    if color.is_opaque() {
        format!(r#"fill="{}""#, color.hex())
    } else {
        format!(r#"fill="{}" fill-opacity="{}""#, color.hex(), color.a)
    }
}

fn stroke_attrs(stroke: Stroke) -> String {
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{}""#,
        stroke.color.hex(),
        Num(stroke.width)
    );
    if !stroke.color.is_opaque() {
        let _ = write!(attrs, r#" stroke-opacity="{}""#, stroke.color.a);
    }
    attrs
}

fn stop_elements(stops: impl Iterator<Item = GradientStop>) -> String {
    stops
        .map(|stop| {
            format!(
                r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                Num(stop.offset),
                stop.color.hex(),
                stop.color.a
            )
        })
        .collect()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
