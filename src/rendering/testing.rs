//! In-memory surface that records draw calls, for unit tests.

use super::context::{DrawContext, Font, Paint, Point, Rect, Rgba, Stroke};
use super::surface::{CssBox, DrawingSurface, SurfaceState};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Rect),
    FillRect(Rect, Paint),
    Line(Point, Point, Stroke),
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        stroke: Stroke,
    },
    Circle(Point, f64, Paint),
    Text(String, Point, Font, Rgba),
}

#[derive(Debug)]
pub struct RecordingSurface {
    pub rect: CssBox,
    pub ratio: f64,
    pub layout_size: Option<(u32, u32)>,
    pub backing_size: Option<(u32, u32)>,
    pub scale: Option<f64>,
    pub layout_count: usize,
    pub resize_count: usize,
    pub scale_count: usize,
    pub state: Option<SurfaceState>,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64, ratio: f64) -> Self {
        Self {
            rect: CssBox::new(width, height),
            ratio,
            layout_size: None,
            backing_size: None,
            scale: None,
            layout_count: 0,
            resize_count: 0,
            scale_count: 0,
            state: None,
            ops: Vec::new(),
        }
    }

    pub fn texts(&self) -> Vec<(&str, Point)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(text, at, _, _) => Some((text.as_str(), *at)),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(Point, f64, &Paint)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Circle(center, radius, paint) => Some((*center, *radius, paint)),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    type Context = Self;

    fn bounding_box(&self) -> CssBox {
        self.rect
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.ratio
    }

    fn set_layout_size(&mut self, width: u32, height: u32) {
        self.layout_size = Some((width, height));
        self.layout_count += 1;
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.backing_size = Some((width, height));
        self.resize_count += 1;
        self.ops.clear();
    }

    fn context(&mut self) -> &mut Self {
        self
    }

    fn surface_state(&self) -> Option<SurfaceState> {
        self.state
    }

    fn set_surface_state(&mut self, state: SurfaceState) {
        self.state = Some(state);
    }
}

impl DrawContext for RecordingSurface {
    fn set_scale(&mut self, ratio: f64) {
        self.scale = Some(ratio);
        self.scale_count += 1;
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear(rect));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.ops.push(DrawOp::FillRect(rect, paint.clone()));
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.ops.push(DrawOp::Line(from, to, stroke));
    }

    fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, end: f64, stroke: Stroke) {
        self.ops.push(DrawOp::Arc {
            center,
            radius,
            start,
            end,
            stroke,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        self.ops.push(DrawOp::Circle(center, radius, paint.clone()));
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &Font, color: Rgba) {
        self.ops
            .push(DrawOp::Text(text.to_string(), at, font.clone(), color));
    }
}
